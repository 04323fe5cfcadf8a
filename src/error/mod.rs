//! Error types and handling for the repository browser
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Two situations are deliberately *not* errors here: a path that resolves to
//! nothing is reported as `Ok(None)` by the resolution APIs, and a folder that
//! simply has no entries lists as empty. Everything in this enum aborts the
//! operation that raised it; metadata generation never returns a partial
//! document.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for repository browser operations
#[derive(Error, Diagnostic, Debug)]
pub enum BrowserError {
    // Virtual filesystem errors
    #[error("Access denied: '{path}' escapes the filesystem base directory")]
    #[diagnostic(
        code(repobrowser::vfs::access_denied),
        help("Paths are resolved relative to the declared base directory and may not leave it")
    )]
    AccessDenied { path: String },

    #[error("Filesystem '{name}' is read-only")]
    #[diagnostic(code(repobrowser::vfs::read_only))]
    ReadOnly { name: String },

    #[error("Resource not found: {path}")]
    #[diagnostic(code(repobrowser::vfs::not_found))]
    ResourceNotFound { path: String },

    // Backend errors
    #[error("Backend operation failed: {message}")]
    #[diagnostic(code(repobrowser::backend::failed))]
    Backend { message: String },

    #[error("Attachment '{name}' is missing from the store")]
    #[diagnostic(code(repobrowser::backend::attachment_missing))]
    AttachmentMissing { name: String },

    // Record / manifest errors
    #[error("Invalid site definition: {path}")]
    #[diagnostic(
        code(repobrowser::site::invalid_definition),
        help("Each unit needs a 'kind' of either 'feature' or 'plugin'")
    )]
    SiteDefinitionInvalid { path: String, reason: String },

    #[error("Unknown site '{name}'")]
    #[diagnostic(code(repobrowser::site::unknown))]
    UnknownSite { name: String },

    #[error("Malformed bundle manifest: {message}")]
    #[diagnostic(code(repobrowser::manifest::malformed))]
    MalformedManifest { message: String },

    #[error("Bundle '{id}' is missing required manifest header '{header}'")]
    #[diagnostic(code(repobrowser::manifest::missing_header))]
    MissingManifestHeader { id: String, header: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(repobrowser::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(repobrowser::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(repobrowser::fs::io_error))]
    IoError { message: String },
}

impl BrowserError {
    /// Wraps a backend failure, keeping only its message
    pub fn backend(message: impl Into<String>) -> Self {
        BrowserError::Backend {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for BrowserError {
    fn from(err: std::io::Error) -> Self {
        BrowserError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BrowserError = io.into();
        assert!(matches!(err, BrowserError::IoError { .. }));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_backend_constructor() {
        let err = BrowserError::backend("view scan failed");
        assert_eq!(err.to_string(), "Backend operation failed: view scan failed");
    }
}
