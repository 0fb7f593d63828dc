//! Command implementations.

mod run;
mod validate;

pub use run::run_target;
pub use validate::run_validate;
