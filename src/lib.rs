//! page-template generates the blank pages of a note-taking application: a single PDF page of a
//! given paper size, filled with a background color and ruled with one of a handful of patterns
//! (grid, lines, double-spaced lines, dots or crosses) drawn in an accent color.
//!
//! The entry point is the `render` function, which takes a `TemplateOptions` and returns a
//! `RenderedTemplate` holding the bytes of the PDF document. Rendering is synchronous and
//! self-contained: every call builds its own document, so it can be called from any number of
//! threads at once.
//!
//! ```no_run
//! use page_template::{render, Color, PaperSize, Pattern, TemplateOptions};
//!
//! let options = TemplateOptions::new(PaperSize::A4, Pattern::Grid)
//!     .with_accent_color(Color::rgba(0.2, 0.4, 0.8, 1.0));
//! let template = render(&options)?;
//! std::fs::write("grid.pdf", template.as_bytes()).map_err(|error| {
//!     page_template::TemplateError::with_error(
//!         page_template::ErrorKind::EncodingError,
//!         "Failed to write the template",
//!         &error,
//!     )
//! })?;
//! # Ok::<(), page_template::TemplateError>(())
//! ```

/// The colors accepted from the surrounding application.
///
/// A `Color` is a plain list of components, exactly as it was handed over. It is only resolved
/// into an `Rgba` when a template is rendered: four components are RGBA, two components are
/// grayscale plus alpha, and everything else is rejected with `ErrorKind::InvalidColorFormat`.
pub mod color;

/// This module contains the `TemplateError` type which is the error type used throughout this library.
///
/// Every error carries an `ErrorKind` so that the caller can tell malformed input
/// (`InvalidColorFormat`) apart from environment failures (`RenderSurfaceError`, `EncodingError`),
/// together with a context and, if the error was propagated, the message of its source.
/// None of these errors are retried internally and a failed render never returns partial output.
pub mod error;

/// Points, rectangles and the half-open floating point stride used for laying out the rules.
pub mod geometry;

/// The options of a template: the paper size table, the patterns and the `TemplateOptions` value
/// object, which can also be loaded from a camelCase JSON file.
pub mod options;

/// The drawing routines of the patterns.
pub mod pattern;

/// The module were the `PdfDocument` interface for building PDF documents is presented.
///
/// # Introduction
///
/// A `PdfDocument` is made of pages, and every page of layers. Layers collect the content stream
/// operations (colors, paths, painting operators) drawn by the caller through the methods of
/// `PdfLayer`, and every layer ends up in its own optional content group so that PDF viewers
/// can toggle it. Once everything is drawn, `write_all` assembles the catalog, the page tree and
/// the resources into the underlying `lopdf::Document`, and `save_to_bytes` serializes it.
pub mod pdf;

/// The `TemplateRenderer` and the `render` function, which turn `TemplateOptions` into a
/// `RenderedTemplate`.
pub mod template;

pub use color::{Color, Rgba};
pub use error::{ErrorKind, TemplateError};
pub use options::{PaperSize, Pattern, TemplateOptions};
pub use template::{render, RenderedTemplate, TemplateRenderer};
