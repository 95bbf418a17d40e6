use crate::REDACTED;
use serde::Serialize;
use std::fmt;

/// A string that never prints its contents through `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value. Only the transport should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The value to print in logs, masked unless `reveal` is set.
    pub fn masked(&self, reveal: bool) -> &str {
        if reveal {
            &self.0
        } else {
            REDACTED
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Static HTTP Basic credentials passed through on every invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    username: String,
    #[serde(skip_serializing)]
    password: Secret,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &Secret {
        &self.password
    }
}
