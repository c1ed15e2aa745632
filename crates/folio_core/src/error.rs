//! Choreography error types

use thiserror::Error;

/// Errors raised while configuring or driving scroll choreography
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FolioError {
    /// A trigger or target selector matched no mounted element at registration
    #[error("Reference not found: no element matches `{selector}`")]
    ReferenceNotFound { selector: String },

    /// Malformed window, tween, stagger or snap parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A target disappeared between registration and a frame
    #[error("Target missing during frame: {target}")]
    TransientTargetMissing { target: String },
}

impl FolioError {
    /// Shorthand for [`FolioError::ReferenceNotFound`]
    pub fn not_found(selector: impl std::fmt::Display) -> Self {
        Self::ReferenceNotFound {
            selector: selector.to_string(),
        }
    }

    /// Shorthand for [`FolioError::InvalidConfiguration`]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Result type for choreography operations
pub type Result<T> = std::result::Result<T, FolioError>;
