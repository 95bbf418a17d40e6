use thiserror::Error;
use wskload::TransportError;
use wskload_core::ConfigError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("At least one simulated user is required")]
    NoUsers,

    #[error("Spawn rate must be a positive number of users per second, got {0}")]
    SpawnRate(f64),

    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[from] TransportError),

    #[error("Simulated user task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
