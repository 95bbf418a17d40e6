mod config;
mod constants;
mod credentials;
mod env;
mod error;
mod outcome;
mod stats;

pub use config::*;
pub use constants::*;
pub use credentials::*;
pub use env::*;
pub use error::*;
pub use outcome::*;
pub use stats::*;
