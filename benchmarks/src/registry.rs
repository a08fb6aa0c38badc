//! Suite registry
//!
//! Built once at startup from an explicit list of suite providers and only
//! read afterwards. Nothing here is global; callers own the registry and pass
//! it to whoever needs to look suites up.

use crate::error::{BenchError, Result};
use crate::suite::Suite;
use crate::suites;

#[derive(Debug, Default)]
pub struct SuiteRegistry {
    suites: Vec<Suite>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in suite, in a fixed order
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for provider in suites::PROVIDERS {
            registry.register(provider())?;
        }
        Ok(registry)
    }

    /// Add a suite after validating its definitions
    pub fn register(&mut self, suite: Suite) -> Result<()> {
        if self.suites.iter().any(|s| s.name() == suite.name()) {
            return Err(BenchError::DuplicateSuite {
                name: suite.name().to_string(),
            });
        }
        suite.validate()?;

        tracing::debug!(
            suite = suite.name(),
            functions = suite.functions().len(),
            "registered suite"
        );
        self.suites.push(suite);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Suite> {
        self.suites
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| BenchError::UnknownSuite {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Suite names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.suites.iter().map(Suite::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suite> {
        self.suites.iter()
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}
