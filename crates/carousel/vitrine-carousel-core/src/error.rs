//! Error types for configuration, binding and host callback routing.

use crate::ids::InstanceId;

/// Configuration could not be loaded.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

impl ConfigError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// A candidate root could not be bound. The registry logs these and moves on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BindError {
    #[error("required element `{selector}` missing under carousel root")]
    MissingElement { selector: String },
}

impl BindError {
    pub(crate) fn missing(selector: &str) -> Self {
        Self::MissingElement {
            selector: selector.to_string(),
        }
    }
}

/// Host callbacks addressed to an instance the registry does not know.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CarouselError {
    #[error("unknown carousel instance {0:?}")]
    UnknownInstance(InstanceId),
}
