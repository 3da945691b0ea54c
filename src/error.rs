//! Error types for the render pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while rendering an SVG asset
///
/// Every stage of the pipeline reports failure through this type instead of
/// panicking. Callers that don't care about the detail can collapse any of
/// these into "no output" with [`crate::SvgTemplate::render_opt`].
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Local asset file is missing or unreadable
    #[error("SVG asset not found: {path}")]
    NotFound { path: PathBuf },

    /// Remote asset could not be retrieved or came back empty
    #[error("failed to fetch SVG asset {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// Content is not well-formed XML or has no root element
    #[error("invalid SVG content: {message}")]
    ParseFailed { message: String },
}

/// Coarse classification of a [`TemplateError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    FetchFailed,
    ParseFailed,
}

impl TemplateError {
    /// Which stage of the pipeline failed
    pub fn kind(&self) -> FailureKind {
        match self {
            TemplateError::NotFound { .. } => FailureKind::NotFound,
            TemplateError::FetchFailed { .. } => FailureKind::FetchFailed,
            TemplateError::ParseFailed { .. } => FailureKind::ParseFailed,
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        TemplateError::ParseFailed {
            message: message.into(),
        }
    }

    pub(crate) fn fetch(url: &str, message: impl Into<String>) -> Self {
        TemplateError::FetchFailed {
            url: url.to_string(),
            message: message.into(),
        }
    }
}
