use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{ErrorKind, TemplateError};
use crate::geometry::Rect;

/// The paper sizes a template can be rendered at, with their dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    #[default]
    A4,
    A5,
    A6,
    A7,
    A8,
    Letter,
}

impl PaperSize {
    pub const ALL: [PaperSize; 10] = [
        PaperSize::A0,
        PaperSize::A1,
        PaperSize::A2,
        PaperSize::A3,
        PaperSize::A4,
        PaperSize::A5,
        PaperSize::A6,
        PaperSize::A7,
        PaperSize::A8,
        PaperSize::Letter,
    ];

    /// Width and height in points (1/72 inch).
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PaperSize::A0 => (2384.0, 3370.0),
            PaperSize::A1 => (1684.0, 2384.0),
            PaperSize::A2 => (1191.0, 1684.0),
            PaperSize::A3 => (842.0, 1191.0),
            PaperSize::A4 => (595.0, 842.0),
            PaperSize::A5 => (420.0, 595.0),
            PaperSize::A6 => (298.0, 420.0),
            PaperSize::A7 => (210.0, 298.0),
            PaperSize::A8 => (148.0, 210.0),
            PaperSize::Letter => (612.0, 792.0),
        }
    }

    /// The page rectangle, always anchored at the origin.
    pub fn rect(&self) -> Rect {
        let (width, height) = self.dimensions();
        Rect::from_size(width, height)
    }

    /// The name shown to the user when picking a paper size.
    pub fn label(&self) -> &'static str {
        match self {
            PaperSize::A0 => "A0",
            PaperSize::A1 => "A1",
            PaperSize::A2 => "A2",
            PaperSize::A3 => "A3",
            PaperSize::A4 => "A4 (Default)",
            PaperSize::A5 => "A5",
            PaperSize::A6 => "A6",
            PaperSize::A7 => "A7",
            PaperSize::A8 => "A8",
            PaperSize::Letter => "Letter",
        }
    }
}

impl std::fmt::Display for PaperSize {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:?}", self)
    }
}

impl std::str::FromStr for PaperSize {
    type Err = TemplateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PaperSize::ALL
            .into_iter()
            .find(|paper_size| paper_size.to_string().eq_ignore_ascii_case(value.trim()))
            .ok_or(TemplateError::with_context(
                ErrorKind::ConfigurationError,
                format!("Unknown paper size {:?}", value),
            ))
    }
}

/// The ruling drawn on top of the background of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pattern {
    #[default]
    Blank,
    Grid,
    Lined,
    DoubleLined,
    Dotted,
    Crossed,
}

impl Pattern {
    pub const ALL: [Pattern; 6] = [
        Pattern::Blank,
        Pattern::Grid,
        Pattern::Lined,
        Pattern::DoubleLined,
        Pattern::Dotted,
        Pattern::Crossed,
    ];

    /// The name shown to the user when picking a pattern.
    pub fn label(&self) -> &'static str {
        match self {
            Pattern::Blank => "Blank",
            Pattern::Grid => "Grid",
            Pattern::Lined => "Lined",
            Pattern::DoubleLined => "Lined (Double Spaced)",
            Pattern::Dotted => "Dotted",
            Pattern::Crossed => "Crossed",
        }
    }

    fn identifier(&self) -> &'static str {
        match self {
            Pattern::Blank => "blank",
            Pattern::Grid => "grid",
            Pattern::Lined => "lined",
            Pattern::DoubleLined => "doubleLined",
            Pattern::Dotted => "dotted",
            Pattern::Crossed => "crossed",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.identifier())
    }
}

impl std::str::FromStr for Pattern {
    type Err = TemplateError;

    /// Accepts the camelCase identifier as well as kebab or snake case, ignoring the letter case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|character| *character != '-' && *character != '_')
            .collect();
        Pattern::ALL
            .into_iter()
            .find(|pattern| pattern.identifier().eq_ignore_ascii_case(&normalized))
            .ok_or(TemplateError::with_context(
                ErrorKind::ConfigurationError,
                format!("Unknown pattern {:?}", value),
            ))
    }
}

/// Everything needed for rendering a template. Every field falls back to its default when it is
/// missing from a JSON options file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateOptions {
    pub paper_size: PaperSize,
    pub pattern: Pattern,
    pub background_color: Color,
    pub accent_color: Color,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::default(),
            pattern: Pattern::default(),
            background_color: Color::white(),
            accent_color: Color::black(),
        }
    }
}

impl TemplateOptions {
    pub fn new(paper_size: PaperSize, pattern: Pattern) -> Self {
        Self {
            paper_size,
            pattern,
            ..Default::default()
        }
    }

    pub fn with_background_color(mut self, background_color: Color) -> Self {
        self.background_color = background_color;
        self
    }

    pub fn with_accent_color(mut self, accent_color: Color) -> Self {
        self.accent_color = accent_color;
        self
    }

    pub fn from_path(options_file_path: &Path) -> Result<Self, TemplateError> {
        let options_file_contents = std::fs::read_to_string(options_file_path).map_err(|error| {
            TemplateError::with_error(
                ErrorKind::ConfigurationError,
                format!("Failed to read the options file {:?}", options_file_path),
                &error,
            )
        })?;
        let options: TemplateOptions =
            serde_json::from_str(&options_file_contents).map_err(|error| {
                TemplateError::with_error(
                    ErrorKind::ConfigurationError,
                    format!("Failed to parse the options file {:?}", options_file_path),
                    &error,
                )
            })?;

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_sizes_match_the_table() {
        let expected = [
            (PaperSize::A0, 2384.0, 3370.0),
            (PaperSize::A1, 1684.0, 2384.0),
            (PaperSize::A2, 1191.0, 1684.0),
            (PaperSize::A3, 842.0, 1191.0),
            (PaperSize::A4, 595.0, 842.0),
            (PaperSize::A5, 420.0, 595.0),
            (PaperSize::A6, 298.0, 420.0),
            (PaperSize::A7, 210.0, 298.0),
            (PaperSize::A8, 148.0, 210.0),
            (PaperSize::Letter, 612.0, 792.0),
        ];
        for (paper_size, width, height) in expected {
            assert_eq!(paper_size.rect(), Rect::new(0.0, 0.0, width, height));
        }
    }

    #[test]
    fn defaults() {
        let options = TemplateOptions::default();
        assert_eq!(options.paper_size, PaperSize::A4);
        assert_eq!(options.pattern, Pattern::Blank);
        assert_eq!(options.background_color, Color::white());
        assert_eq!(options.accent_color, Color::black());
        assert_eq!(PaperSize::A4.label(), "A4 (Default)");
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("letter".parse::<PaperSize>().unwrap(), PaperSize::Letter);
        assert_eq!("a3".parse::<PaperSize>().unwrap(), PaperSize::A3);
        assert_eq!(
            "double-lined".parse::<Pattern>().unwrap(),
            Pattern::DoubleLined
        );
        assert_eq!(
            "doubleLined".parse::<Pattern>().unwrap(),
            Pattern::DoubleLined
        );
        let error = "A9".parse::<PaperSize>().unwrap_err();
        assert_eq!(error.kind, ErrorKind::ConfigurationError);
        assert!("hexagonal".parse::<Pattern>().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let options: TemplateOptions =
            serde_json::from_str(r#"{ "paperSize": "Letter", "pattern": "doubleLined" }"#)
                .unwrap();
        assert_eq!(options.paper_size, PaperSize::Letter);
        assert_eq!(options.pattern, Pattern::DoubleLined);
        assert_eq!(options.background_color, Color::white());
        assert_eq!(options.accent_color, Color::black());
    }

    #[test]
    fn json_colors_keep_their_raw_components() {
        let options: TemplateOptions =
            serde_json::from_str(r#"{ "accentColor": [0.2, 0.4, 0.6] }"#).unwrap();
        assert_eq!(options.accent_color.components(), &[0.2, 0.4, 0.6]);
    }

    #[test]
    fn from_path_reports_missing_files() {
        let error =
            TemplateOptions::from_path(Path::new("does/not/exist/options.json")).unwrap_err();
        assert_eq!(error.kind, ErrorKind::ConfigurationError);
        assert!(error.source_error.is_some());
    }
}
