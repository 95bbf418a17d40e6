pub mod cli;
pub mod runtime;

mod error;

pub use crate::cli::WskloadCli;
pub use crate::error::RuntimeError;
pub use crate::runtime::LoadRuntime;
