//! Synthetic load generation against blocking action invocations.
//!
//! A [`LoadTask`] is one simulated user: it walks the configured actions in order, POSTs each
//! one, waits a random interval and starts over until told to stop.
pub mod driver;
#[doc(hidden)]
pub mod transaction;
pub mod transport;

pub use driver::{stopped, LoadTask, PassReport, Shutdown};
pub use transport::{HttpTransport, Invocation, Transport, TransportError};

pub mod prelude {
    pub use crate::driver::{LoadTask, PassReport, Shutdown};
    pub use crate::transport::{HttpTransport, Transport, TransportError};
    pub use wskload_core::{DriverStats, RequestOutcome, RunConfig, StatusPolicy, WaitRange};
}
