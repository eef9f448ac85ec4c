//! Capability system error types

use thiserror::Error;

/// Capability system result type
pub type PluginResult<T> = Result<T, PluginError>;

/// Capability system errors
#[derive(Error, Debug)]
pub enum PluginError {
    /// Descriptor failed validation
    #[error("Invalid capability descriptor: {reason}")]
    InvalidDescriptor { reason: String },

    /// Capability initialization failed
    #[error("Capability '{id}' initialization failed: {reason}")]
    InitializationFailed { id: String, reason: String },

    /// Capability code panicked
    #[error("Capability '{id}' panicked: {message}")]
    Panicked { id: String, message: String },

    /// A capability source could not enumerate its candidates
    #[error("Capability source '{source_type}' failed: {reason}")]
    SourceFailed { source_type: String, reason: String },

    /// Message bundle error
    #[error("Message bundle error: {0}")]
    BundleError(#[from] serde_yaml::Error),

    /// Message directory could not be listed
    #[error("Cannot read message directory {path}: {reason}")]
    BundleDirUnreadable { path: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

}

impl PluginError {
    /// Create a new initialization failed error
    pub fn initialization_failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InitializationFailed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a new source failed error
    pub fn source_failed(source_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceFailed {
            source_type: source_type.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`PluginError::Panicked`] from a caught panic payload
    pub(crate) fn from_panic(id: impl Into<String>, payload: Box<dyn std::any::Any + Send>) -> Self {
        Self::Panicked {
            id: id.into(),
            message: panic_message(payload.as_ref()),
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
