use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting `{0}`")]
    Missing(&'static str),

    #[error("No action identifiers configured. Set TEST_ACTIONS or TEST_ACTION.")]
    NoActions,

    #[error("Invalid action identifier {0:?}")]
    InvalidAction(String),

    #[error("Minimum wait ({min:?}) is greater than maximum wait ({max:?})")]
    InvertedWait { min: Duration, max: Duration },

    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Base URL `{0}` is not an http(s) endpoint")]
    UnsupportedUrl(String),

    #[error("Invalid duration for `{key}`: {source}")]
    Duration {
        key: &'static str,
        #[source]
        source: humantime::DurationError,
    },

    #[error("Invalid boolean for `{key}`: {value:?}")]
    Bool { key: &'static str, value: String },
}
