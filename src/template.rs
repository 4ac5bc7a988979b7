use std::io::Write;

use time::OffsetDateTime;

use crate::error::{ErrorKind, TemplateError};
use crate::geometry::Rect;
use crate::options::{Pattern, TemplateOptions};
use crate::pattern;
use crate::pdf::PdfDocument;

/// Name of the optional content group holding the background fill.
pub const BACKGROUND_LAYER_NAME: &str = "Background";
/// Name of the optional content group holding the pattern, absent from blank templates.
pub const PATTERN_LAYER_NAME: &str = "Pattern";

/// A rendered single-page PDF document, independent from any other render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTemplate {
    bytes: Vec<u8>,
    page_rect: Rect,
}

impl RenderedTemplate {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The media box of the single page, which is the rectangle of the requested paper size.
    pub fn page_rect(&self) -> Rect {
        self.page_rect
    }

    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), TemplateError> {
        writer
            .write_all(&self.bytes)
            .and_then(|_| writer.flush())
            .map_err(|error| {
                TemplateError::with_error(
                    ErrorKind::EncodingError,
                    "Failed to write the rendered template",
                    &error,
                )
            })
    }
}

/// Renders templates, carrying the metadata written to the information dictionary of every
/// document it produces. The metadata never affects what is drawn.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    pub title: String,
    pub creator: String,
    pub creation_date: OffsetDateTime,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self {
            title: "Template".into(),
            creator: env!("CARGO_PKG_NAME").into(),
            creation_date: OffsetDateTime::now_utc(),
        }
    }
}

impl TemplateRenderer {
    /// Render the options into a one-page PDF document.
    ///
    /// Both colors are resolved before anything is drawn, so a malformed color fails the render
    /// with `ErrorKind::InvalidColorFormat` without allocating the document. Any other failure
    /// is either a `RenderSurfaceError` or an `EncodingError`, there is no partial output.
    pub fn render(&self, options: &TemplateOptions) -> Result<RenderedTemplate, TemplateError> {
        let background_color = options.background_color.to_rgba().map_err(|error| {
            TemplateError::with_error(
                ErrorKind::InvalidColorFormat,
                "Unable to resolve the background color",
                &error,
            )
        })?;
        let accent_color = options.accent_color.to_rgba().map_err(|error| {
            TemplateError::with_error(
                ErrorKind::InvalidColorFormat,
                "Unable to resolve the accent color",
                &error,
            )
        })?;

        let page_rect = options.paper_size.rect();
        log::debug!(
            "Rendering a {} template on {} paper ({}x{} pt)",
            options.pattern,
            options.paper_size,
            page_rect.width,
            page_rect.height
        );

        let identifier = document_identifier(options);
        let mut pdf_document = PdfDocument::new(identifier.clone());
        pdf_document.title = self.title.clone();
        pdf_document.creator = self.creator.clone();
        pdf_document.creation_date = self.creation_date;

        let (page_index, background_layer_index) = pdf_document.add_page_with_layer(
            page_rect.width,
            page_rect.height,
            BACKGROUND_LAYER_NAME,
        );
        pdf_document.set_fill_color_in_layer(
            page_index,
            background_layer_index,
            &background_color,
        )?;
        let background_layer =
            pdf_document.get_mut_layer_in_page(background_layer_index, page_index)?;
        background_layer.add_rectangle(page_rect);
        background_layer.fill_path();

        if options.pattern != Pattern::Blank {
            let pattern_layer_index =
                pdf_document.add_layer_to_page(page_index, PATTERN_LAYER_NAME)?;
            pdf_document.set_stroke_and_fill_color_in_layer(
                page_index,
                pattern_layer_index,
                &accent_color,
            )?;
            let pattern_layer =
                pdf_document.get_mut_layer_in_page(pattern_layer_index, page_index)?;
            pattern_layer.set_line_width(pattern::LINE_WIDTH);
            pattern::draw_pattern(options.pattern, pattern_layer, &page_rect);
        }

        pdf_document.write_all(identifier)?;
        let bytes = pdf_document.save_to_bytes()?;
        log::debug!("Rendered the template into {} bytes", bytes.len());

        Ok(RenderedTemplate { bytes, page_rect })
    }
}

/// Render the options with the default metadata, see `TemplateRenderer::render`.
pub fn render(options: &TemplateOptions) -> Result<RenderedTemplate, TemplateError> {
    TemplateRenderer::default().render(options)
}

/// A stable identifier derived from what is drawn, used as the permanent part of the document ID.
fn document_identifier(options: &TemplateOptions) -> String {
    let components = |components: &[f32]| {
        components
            .iter()
            .map(|component| format!("{:02x}", (component * 255.0).round() as u8))
            .collect::<String>()
    };
    format!(
        "{}-{}-{}-{}",
        options.paper_size,
        options.pattern,
        components(options.background_color.components()),
        components(options.accent_color.components()),
    )
}
