//! Built-in benchmark suites

pub mod conditional;
pub mod numeric;
pub mod strings;
pub mod temporal;

use crate::suite::Suite;

/// Providers for the built-in suites, in registration order
pub const PROVIDERS: &[fn() -> Suite] = &[
    strings::suite,
    temporal::suite,
    numeric::suite,
    conditional::suite,
];
