#![deny(clippy::unwrap_used, clippy::expect_used)]

use serde::{Deserialize, Serialize};

/// The category of a `TemplateError`, so that the caller can decide whether to retry,
/// substitute defaults or surface the problem to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// A color could not be decomposed into RGBA or grayscale plus alpha.
    InvalidColorFormat,
    /// The drawing surface (document, page or layer) could not be set up.
    RenderSurfaceError,
    /// The content stream or the finalized document could not be encoded to bytes.
    EncodingError,
    /// An options file could not be read or parsed.
    ConfigurationError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidColorFormat => "invalid color format",
            ErrorKind::RenderSurfaceError => "render surface error",
            ErrorKind::EncodingError => "encoding error",
            ErrorKind::ConfigurationError => "configuration error",
        };
        write!(formatter, "{}", name)
    }
}

/// An error with its kind, a context and possibly the propagated source error.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TemplateError {
    pub kind: ErrorKind,
    pub context: String,
    pub source_error: Option<String>,
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source_error {
            Some(source_error) => write!(
                formatter,
                "{}: {}",
                self.context,
                minimize_first_letter(source_error.to_string()),
            ),
            None => write!(formatter, "{}", self.context),
        }
    }
}

impl std::error::Error for TemplateError {}

impl TemplateError {
    /// Create a new `TemplateError` of the given kind with the given context.
    pub fn with_context<S: Into<String>>(kind: ErrorKind, context: S) -> TemplateError {
        TemplateError {
            kind,
            context: context.into(),
            source_error: None,
        }
    }

    /// Create a new `TemplateError` of the given kind with the given context and source error.
    pub fn with_error<S: Into<String>>(
        kind: ErrorKind,
        context: S,
        error: &dyn std::error::Error,
    ) -> TemplateError {
        TemplateError {
            kind,
            context: context.into(),
            source_error: Some(error.to_string()),
        }
    }

    pub fn invalid_color<S: Into<String>>(context: S) -> TemplateError {
        TemplateError::with_context(ErrorKind::InvalidColorFormat, context)
    }

    pub fn render_surface<S: Into<String>>(context: S) -> TemplateError {
        TemplateError::with_context(ErrorKind::RenderSurfaceError, context)
    }

    pub fn encoding(context: &str, error: &dyn std::error::Error) -> TemplateError {
        TemplateError::with_error(ErrorKind::EncodingError, context, error)
    }
}

/// Minimizes the first letter of a string, it is used for standardizing the error message.
pub(crate) fn minimize_first_letter(string: String) -> String {
    let mut characters = string.chars();
    match characters.next() {
        None => String::new(),
        Some(character) => character.to_lowercase().chain(characters).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_context_and_source() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "Disk is full");
        let error = TemplateError::with_error(
            ErrorKind::EncodingError,
            "Error while saving the PDF document to bytes",
            &source,
        );
        assert_eq!(
            error.to_string(),
            "Error while saving the PDF document to bytes: disk is full"
        );
        assert_eq!(error.kind, ErrorKind::EncodingError);
    }

    #[test]
    fn display_without_source_is_just_the_context() {
        let error = TemplateError::invalid_color("Unsupported color with 3 components");
        assert_eq!(error.to_string(), "Unsupported color with 3 components");
        assert_eq!(error.kind, ErrorKind::InvalidColorFormat);
        assert!(error.source_error.is_none());
    }

    #[test]
    fn minimize_first_letter_handles_empty_strings() {
        assert_eq!(minimize_first_letter(String::new()), "");
        assert_eq!(minimize_first_letter("Über".into()), "über");
    }
}
