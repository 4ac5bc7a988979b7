use lopdf::content::Operation;
use lopdf::Object;
use std::io::BufWriter;
use time::OffsetDateTime;

use crate::color::Rgba;
use crate::error::TemplateError;
use crate::geometry::{Point, Rect};

/// Control point distance of a cubic Bézier curve approximating a quarter of a circle of radius 1.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Converts a coordinate into a PDF real number operand.
fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// One layer of PDF data, which is rendered as an optional content group of its page.
#[derive(Debug, Clone)]
pub struct PdfLayer {
    /// Name of the layer. Must be present for the optional content group.
    pub(crate) name: String,
    /// Content stream operations of this layer, in drawing order.
    pub(super) operations: Vec<Operation>,
}

impl PdfLayer {
    fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    /// Set the non-stroking (fill) color in the DeviceRGB color space. Alpha is handled by the
    /// graphics state, see `PdfDocument::set_fill_color_in_layer`.
    pub fn set_fill_color(&mut self, color: &Rgba) {
        self.push("rg", color.rgb_operands());
    }

    /// Set the stroking color in the DeviceRGB color space.
    pub fn set_stroke_color(&mut self, color: &Rgba) {
        self.push("RG", color.rgb_operands());
    }

    pub fn set_line_width(&mut self, line_width: f64) {
        self.push("w", vec![real(line_width)]);
    }

    /// Select a named graphics state from the `ExtGState` resources of the page.
    pub fn set_graphics_state(&mut self, name: &str) {
        self.push("gs", vec![Object::Name(name.as_bytes().to_vec())]);
    }

    /// Begin a new subpath at the given point.
    pub fn move_to(&mut self, point: Point) {
        self.push("m", vec![real(point.x), real(point.y)]);
    }

    pub fn line_to(&mut self, point: Point) {
        self.push("l", vec![real(point.x), real(point.y)]);
    }

    pub fn curve_to(&mut self, first_control: Point, second_control: Point, end: Point) {
        self.push(
            "c",
            vec![
                real(first_control.x),
                real(first_control.y),
                real(second_control.x),
                real(second_control.y),
                real(end.x),
                real(end.y),
            ],
        );
    }

    pub fn close_path(&mut self) {
        self.push("h", vec![]);
    }

    /// Append a line segment as its own subpath.
    pub fn add_line(&mut self, from: Point, to: Point) {
        self.move_to(from);
        self.line_to(to);
    }

    pub fn add_rectangle(&mut self, rect: Rect) {
        self.push(
            "re",
            vec![
                real(rect.x),
                real(rect.y),
                real(rect.width),
                real(rect.height),
            ],
        );
    }

    /// Append a closed ellipse inscribed in the rectangle, made of four Bézier curves starting
    /// from the rightmost point and going counterclockwise.
    pub fn add_ellipse(&mut self, rect: Rect) {
        let horizontal_offset = KAPPA * rect.width / 2.0;
        let vertical_offset = KAPPA * rect.height / 2.0;
        let (min_x, mid_x, max_x) = (rect.x, rect.mid_x(), rect.max_x());
        let (min_y, mid_y, max_y) = (rect.y, rect.mid_y(), rect.max_y());

        self.move_to(Point::new(max_x, mid_y));
        self.curve_to(
            Point::new(max_x, mid_y + vertical_offset),
            Point::new(mid_x + horizontal_offset, max_y),
            Point::new(mid_x, max_y),
        );
        self.curve_to(
            Point::new(mid_x - horizontal_offset, max_y),
            Point::new(min_x, mid_y + vertical_offset),
            Point::new(min_x, mid_y),
        );
        self.curve_to(
            Point::new(min_x, mid_y - vertical_offset),
            Point::new(mid_x - horizontal_offset, min_y),
            Point::new(mid_x, min_y),
        );
        self.curve_to(
            Point::new(mid_x + horizontal_offset, min_y),
            Point::new(max_x, mid_y - vertical_offset),
            Point::new(max_x, mid_y),
        );
        self.close_path();
    }

    /// Fill the current path with the nonzero winding rule.
    pub fn fill_path(&mut self) {
        self.push("f", vec![]);
    }

    pub fn stroke_path(&mut self) {
        self.push("S", vec![]);
    }

    /// Wrap the operations of the layer so that they are isolated in their own graphics state
    /// and marked as belonging to the given optional content group.
    fn into_marked_operations(self, ocg_reference: &OcgReference) -> Vec<Operation> {
        let mut operations = Vec::with_capacity(self.operations.len() + 4);
        operations.push(Operation::new(
            "BDC",
            vec![
                Object::Name("OC".into()),
                Object::Name(ocg_reference.0.clone().into_bytes()),
            ],
        ));
        operations.push(Operation::new("q", vec![]));
        operations.extend(self.operations);
        operations.push(Operation::new("Q", vec![]));
        operations.push(Operation::new("EMC", vec![]));

        operations
    }
}

/// The name under which an optional content group is referenced from a page's content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct OcgReference(String);

impl OcgReference {
    pub fn new(index: usize) -> Self {
        Self(format!("MC{index}"))
    }
}

#[derive(Default, Debug, Clone)]
pub struct OcgLayersMap(Vec<(OcgReference, Object)>);

impl OcgLayersMap {
    pub fn add_ocg(&mut self, object: Object) -> OcgReference {
        let length = self.0.len();
        let ocg_reference = OcgReference::new(length);
        self.0.push((ocg_reference.clone(), object));

        ocg_reference
    }
}

impl From<OcgLayersMap> for lopdf::Dictionary {
    fn from(value: OcgLayersMap) -> Self {
        let mut dictionary = lopdf::Dictionary::new();

        for entry in value.0 {
            dictionary.set((entry.0).0, entry.1);
        }

        dictionary
    }
}

/// Opacity of a named graphics state, for non-stroking (`ca`) and stroking (`CA`) operations.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Opacity {
    fill: Option<f32>,
    stroke: Option<f32>,
}

/// The `ExtGState` resources of a page, deduplicated so that each opacity is registered once.
#[derive(Default, Debug, Clone)]
pub struct GraphicsStateMap(Vec<(String, Opacity)>);

impl GraphicsStateMap {
    fn name_for(&mut self, opacity: Opacity) -> String {
        if let Some((name, _)) = self.0.iter().find(|(_, existing)| *existing == opacity) {
            return name.clone();
        }
        let name = format!("GS{}", self.0.len());
        self.0.push((name.clone(), opacity));

        name
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&GraphicsStateMap> for lopdf::Dictionary {
    fn from(value: &GraphicsStateMap) -> Self {
        value
            .0
            .iter()
            .map(|(name, opacity)| {
                let mut state = lopdf::Dictionary::from_iter(vec![("Type", "ExtGState".into())]);
                if let Some(fill) = opacity.fill {
                    state.set("ca", Object::Real(fill));
                }
                if let Some(stroke) = opacity.stroke {
                    state.set("CA", Object::Real(stroke));
                }
                (name.clone(), Object::Dictionary(state))
            })
            .collect()
    }
}

#[derive(Default, Debug, Clone)]
pub(crate) struct PdfResources {
    pub graphics_states: GraphicsStateMap,
    pub ocg_layers: OcgLayersMap,
}

impl PdfResources {
    /// Build the resource dictionary of a page, registering one optional content group per layer.
    pub(crate) fn with_layers(
        &self,
        layers: Vec<Object>,
    ) -> (lopdf::Dictionary, Vec<OcgReference>) {
        let mut dictionary = lopdf::Dictionary::new();

        let mut ocg_layers_dictionary = self.ocg_layers.clone();
        let mut ocg_references = Vec::<OcgReference>::new();

        if !layers.is_empty() {
            for layer in layers {
                ocg_references.push(ocg_layers_dictionary.add_ocg(layer));
            }

            let current_ocg_dictionary: lopdf::Dictionary = ocg_layers_dictionary.into();

            if !current_ocg_dictionary.is_empty() {
                dictionary.set("Properties", Object::Dictionary(current_ocg_dictionary));
            }
        }

        if !self.graphics_states.is_empty() {
            dictionary.set(
                "ExtGState",
                Object::Dictionary((&self.graphics_states).into()),
            );
        }

        (dictionary, ocg_references)
    }
}

#[derive(Debug, Clone)]
pub struct PdfPage {
    pub(crate) number: usize,
    /// Width of the page in points.
    pub width: f64,
    /// Height of the page in points.
    pub height: f64,
    pub layers: Vec<PdfLayer>,
    pub(crate) resources: PdfResources,
}

impl PdfPage {
    pub fn media_box(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Collect the resource dictionary of the page and its content stream, where every layer is
    /// enclosed in the marked content sequence of its optional content group.
    pub(crate) fn collect_resources_and_stream(
        &self,
        layers: &[(usize, Object)],
    ) -> Result<(lopdf::Dictionary, lopdf::Stream), TemplateError> {
        let current_layers = layers.iter().map(|layer| layer.1.clone()).collect();
        let (resource_dictionary, ocg_references) = self.resources.with_layers(current_layers);

        let mut operations = Vec::<Operation>::new();
        for (index, layer) in self.layers.iter().enumerate() {
            let ocg_reference = ocg_references.get(index).ok_or_else(|| {
                TemplateError::render_surface(format!(
                    "Unable to find the layer {} of page {} in the OCG references",
                    index, self.number
                ))
            })?;
            operations.extend(layer.clone().into_marked_operations(ocg_reference));
        }

        let content = lopdf::content::Content { operations }
            .encode()
            .map_err(|error| TemplateError::encoding("Failed to encode the page content", &error))?;

        // Page contents are left uncompressed so that they stay inspectable
        let stream = lopdf::Stream::new(lopdf::Dictionary::new(), content).with_compression(false);

        Ok((resource_dictionary, stream))
    }
}

/// A PDF document under construction, made of pages which are in turn made of layers.
///
/// Pages and layers are addressed by index, the document is assembled into the underlying
/// `lopdf::Document` only once `write_all` is called.
pub struct PdfDocument {
    pub inner_document: lopdf::Document,
    pub identifier: String,
    pub title: String,
    pub creator: String,
    pub creation_date: OffsetDateTime,
    pub(crate) pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn new(pdf_document_identifier: String) -> Self {
        PdfDocument {
            inner_document: lopdf::Document::with_version("1.5"),
            identifier: pdf_document_identifier,
            title: "Untitled".into(),
            creator: env!("CARGO_PKG_NAME").into(),
            creation_date: OffsetDateTime::UNIX_EPOCH,
            pages: Vec::new(),
        }
    }

    pub fn pages(&self) -> &[PdfPage] {
        &self.pages
    }

    /// Add a page of the given size in points, without any layer.
    pub fn add_page(&mut self, page_width: f64, page_height: f64) -> usize {
        self.pages.push(PdfPage {
            number: self.pages.len() + 1,
            width: page_width,
            height: page_height,
            layers: Vec::new(),
            resources: PdfResources::default(),
        });

        self.pages.len() - 1
    }

    /// Add a named layer on top of the existing layers of a page.
    pub fn add_layer_to_page<S: Into<String>>(
        &mut self,
        page_index: usize,
        layer_name: S,
    ) -> Result<usize, TemplateError> {
        let pdf_page = self.get_mut_page(page_index)?;
        pdf_page.layers.push(PdfLayer::new(layer_name));

        Ok(pdf_page.layers.len() - 1)
    }

    pub fn add_page_with_layer<S: Into<String>>(
        &mut self,
        page_width: f64,
        page_height: f64,
        layer_name: S,
    ) -> (usize, usize) {
        let page_index = self.add_page(page_width, page_height);
        let pdf_page = &mut self.pages[page_index];
        pdf_page.layers.push(PdfLayer::new(layer_name));

        (page_index, pdf_page.layers.len() - 1)
    }

    /// Set the fill color of a layer, selecting a graphics state with the matching opacity
    /// first when the color is translucent.
    pub fn set_fill_color_in_layer(
        &mut self,
        page_index: usize,
        layer_index: usize,
        color: &Rgba,
    ) -> Result<(), TemplateError> {
        let opacity = Opacity {
            fill: Some(color.alpha),
            stroke: None,
        };
        self.select_opacity(page_index, layer_index, color, opacity)?;
        self.get_mut_layer_in_page(layer_index, page_index)?
            .set_fill_color(color);

        Ok(())
    }

    /// Set both the stroke and the fill color of a layer, as needed for drawing a pattern.
    pub fn set_stroke_and_fill_color_in_layer(
        &mut self,
        page_index: usize,
        layer_index: usize,
        color: &Rgba,
    ) -> Result<(), TemplateError> {
        let opacity = Opacity {
            fill: Some(color.alpha),
            stroke: Some(color.alpha),
        };
        self.select_opacity(page_index, layer_index, color, opacity)?;
        let pdf_layer = self.get_mut_layer_in_page(layer_index, page_index)?;
        pdf_layer.set_stroke_color(color);
        pdf_layer.set_fill_color(color);

        Ok(())
    }

    fn select_opacity(
        &mut self,
        page_index: usize,
        layer_index: usize,
        color: &Rgba,
        opacity: Opacity,
    ) -> Result<(), TemplateError> {
        if color.is_opaque() {
            return Ok(());
        }
        let graphics_state_name = self
            .get_mut_page(page_index)?
            .resources
            .graphics_states
            .name_for(opacity);
        self.get_mut_layer_in_page(layer_index, page_index)?
            .set_graphics_state(&graphics_state_name);

        Ok(())
    }

    /// Assemble the catalog, the page tree, the resources and the content streams of every page
    /// into the underlying document.
    pub fn write_all(&mut self, instance_id: String) -> Result<(), TemplateError> {
        use lopdf::Object::*;
        use lopdf::StringFormat::*;

        let creation_date = to_pdf_timestamp_format(&self.creation_date);
        let document_info = lopdf::Dictionary::from_iter(vec![
            ("Trapped", "False".into()),
            (
                "CreationDate",
                String(creation_date.clone().into_bytes(), Literal),
            ),
            ("ModDate", String(creation_date.into_bytes(), Literal)),
            ("Title", String(self.title.clone().into_bytes(), Literal)),
            ("Creator", String(self.creator.clone().into_bytes(), Literal)),
            (
                "Producer",
                String(
                    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
                        .into_bytes(),
                    Literal,
                ),
            ),
            (
                "Identifier",
                String(self.identifier.clone().into_bytes(), Literal),
            ),
        ]);
        let document_info_id = self.inner_document.add_object(Dictionary(document_info));

        let pages_id = self.inner_document.new_object_id();
        let mut catalog = lopdf::Dictionary::from_iter(vec![
            ("Type", "Catalog".into()),
            ("PageLayout", "OneColumn".into()),
            ("PageMode", "UseNone".into()),
            ("Pages", Reference(pages_id)),
        ]);

        let mut pages = lopdf::Dictionary::from_iter(vec![
            ("Type", "Pages".into()),
            ("Count", Integer(self.pages.len() as i64)),
        ]);

        let intent_array = Array(vec![Name("View".into()), Name("Design".into())]);
        let intent_array_id = self.inner_document.add_object(intent_array);

        // Every layer of every page gets its own optional content group, so that viewers can
        // toggle the background and the pattern independently
        let mut ocg_association = Vec::<(usize, Vec<(usize, Object)>)>::new();
        for page in self.pages.iter() {
            let mut layer_indices_and_dictionary_references = Vec::new();
            for (layer_index, layer) in page.layers.iter().enumerate() {
                let ocg_dictionary = lopdf::Dictionary::from_iter(vec![
                    ("Type", Name("OCG".into())),
                    ("Name", String(layer.name.clone().into_bytes(), Literal)),
                    ("Intent", Reference(intent_array_id)),
                ]);
                let ocg_dictionary_id = self.inner_document.add_object(Dictionary(ocg_dictionary));
                layer_indices_and_dictionary_references
                    .push((layer_index, Reference(ocg_dictionary_id)));
            }
            ocg_association.push((page.number, layer_indices_and_dictionary_references));
        }

        let ocg_dictionary_references: Vec<Object> = ocg_association
            .iter()
            .flat_map(|(_, layers)| {
                layers
                    .iter()
                    .map(|(_, dictionary_reference)| dictionary_reference.clone())
            })
            .collect();

        catalog.set(
            "OCProperties",
            Dictionary(lopdf::Dictionary::from_iter(vec![
                ("OCGs", Array(ocg_dictionary_references.clone())),
                (
                    "D",
                    Dictionary(lopdf::Dictionary::from_iter(vec![
                        ("Order", Array(ocg_dictionary_references.clone())),
                        ("RBGroups", Array(vec![])),
                        ("ON", Array(ocg_dictionary_references)),
                    ])),
                ),
            ])),
        );

        let catalog_id = self.inner_document.add_object(catalog);

        self.inner_document
            .trailer
            .set("Root", Reference(catalog_id));
        self.inner_document
            .trailer
            .set("Info", Reference(document_info_id));
        self.inner_document.trailer.set(
            "ID",
            Array(vec![
                String(self.identifier.clone().into_bytes(), Literal),
                String(instance_id.into_bytes(), Literal),
            ]),
        );

        let mut page_ids = Vec::<Object>::new();

        for page in self.pages.iter() {
            let media_box_rect = page.media_box();
            let media_box = vec![
                real(media_box_rect.x),
                real(media_box_rect.y),
                real(media_box_rect.max_x()),
                real(media_box_rect.max_y()),
            ];
            let mut page_dictionary = lopdf::Dictionary::from_iter(vec![
                ("Type", "Page".into()),
                ("Rotate", Integer(0)),
                ("MediaBox", Array(media_box.clone())),
                ("TrimBox", Array(media_box.clone())),
                ("CropBox", Array(media_box)),
                ("Annots", Array(vec![])),
                ("Parent", Reference(pages_id)),
            ]);

            let unmerged_layer = ocg_association
                .iter()
                .find(|ocg| ocg.0 == page.number)
                .ok_or_else(|| {
                    TemplateError::render_surface(format!(
                        "Unable to collect the resources needed for rendering the page {}",
                        page.number
                    ))
                })?;

            let (resource_dictionary, page_stream) =
                page.collect_resources_and_stream(&unmerged_layer.1)?;

            let resources_page_id = self
                .inner_document
                .add_object(Dictionary(resource_dictionary));
            page_dictionary.set("Resources", Reference(resources_page_id));

            let page_content_id = self.inner_document.add_object(page_stream);
            page_dictionary.set("Contents", Reference(page_content_id));

            let page_id = self.inner_document.add_object(page_dictionary);
            page_ids.push(Reference(page_id))
        }

        pages.set("Kids", Array(page_ids));
        self.inner_document
            .objects
            .insert(pages_id, Dictionary(pages));

        Ok(())
    }

    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, TemplateError> {
        let mut pdf_document_bytes = Vec::new();
        let mut writer = BufWriter::new(&mut pdf_document_bytes);
        self.inner_document
            .save_to(&mut writer)
            .map_err(|error| {
                TemplateError::encoding("Error while saving the PDF document to bytes", &error)
            })?;
        writer.into_inner().map_err(|error| {
            TemplateError::encoding("Error while flushing the PDF document bytes", error.error())
        })?;

        Ok(pdf_document_bytes)
    }

    fn get_mut_page(&mut self, page_index: usize) -> Result<&mut PdfPage, TemplateError> {
        self.pages.get_mut(page_index).ok_or_else(|| {
            TemplateError::render_surface(format!(
                "Failed to find the page with index {}",
                page_index
            ))
        })
    }

    pub fn get_mut_layer_in_page(
        &mut self,
        layer_index: usize,
        page_index: usize,
    ) -> Result<&mut PdfLayer, TemplateError> {
        let pdf_page = self.get_mut_page(page_index)?;
        let pdf_layer = pdf_page.layers.get_mut(layer_index).ok_or_else(|| {
            TemplateError::render_surface(format!(
                "Failed to find the layer with index {}",
                layer_index
            ))
        })?;

        Ok(pdf_layer)
    }
}

fn to_pdf_timestamp_format(date: &OffsetDateTime) -> String {
    let offset = date.offset();
    let offset_sign = if offset.is_negative() { '-' } else { '+' };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{offset_sign}{:02}'{:02}'",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        offset.whole_hours().abs(),
        offset.minutes_past_hour().abs(),
    )
}
