pub mod compare;
pub mod config;
pub mod list;
pub mod run;

pub use compare::CompareArgs;
pub use config::ConfigArgs;
pub use list::ListArgs;
pub use run::RunArgs;
