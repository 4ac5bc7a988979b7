//! The drawing routines of every ruling pattern. Each routine only emits path construction and
//! painting operators: colors and line width are set up by the caller beforehand.

use crate::geometry::{stride, Point, Rect};
use crate::options::Pattern;
use crate::pdf::PdfLayer;

/// Number of cells across the width of the page, the pitch scales with the paper size.
pub const SPACING_DIVISOR: f64 = 30.0;
/// Horizontal margin of lined patterns on both sides, in points.
pub const LINE_MARGIN: f64 = 30.0;
/// Size of the square a dot is inscribed in.
pub const DOT_DIAMETER: f64 = 2.0;
/// Length of both arms of a cross.
pub const CROSS_DIAMETER: f64 = 10.0;
/// Line width of every stroked pattern.
pub const LINE_WIDTH: f64 = 0.5;

/// The distance between two consecutive rules of a pattern drawn on the given page.
pub fn pitch(page_rect: &Rect) -> f64 {
    page_rect.width / SPACING_DIVISOR
}

/// Draw the pattern onto the layer. `Pattern::Blank` draws nothing.
pub fn draw_pattern(pattern: Pattern, layer: &mut PdfLayer, page_rect: &Rect) {
    match pattern {
        Pattern::Blank => {}
        Pattern::Grid => grid_pattern(layer, page_rect),
        Pattern::Lined => lined_pattern(layer, page_rect),
        Pattern::DoubleLined => double_lined_pattern(layer, page_rect),
        Pattern::Dotted => dotted_pattern(layer, page_rect),
        Pattern::Crossed => crossed_pattern(layer, page_rect),
    }
}

/// Heights of the horizontal rules, shared by the grid and the lined patterns.
fn horizontal_rules(page_rect: &Rect) -> impl Iterator<Item = f64> + Clone {
    let grid_size = pitch(page_rect);
    stride(grid_size / 2.0, page_rect.height, grid_size)
}

/// Every intersection of the grid used by the dotted and the crossed patterns.
fn intersections(page_rect: &Rect) -> impl Iterator<Item = Point> {
    let grid_size = pitch(page_rect);
    let columns = stride(grid_size / 2.0, page_rect.width, grid_size);
    stride(grid_size / 2.0, page_rect.height, grid_size)
        .flat_map(move |y| columns.clone().map(move |x| Point::new(x, y)))
}

fn grid_pattern(layer: &mut PdfLayer, page_rect: &Rect) {
    let grid_size = pitch(page_rect);

    // Vertical grid lines
    let mut vertical_lines = 0;
    for x in stride(grid_size, page_rect.width, grid_size) {
        layer.add_line(Point::new(x, 0.0), Point::new(x, page_rect.height));
        vertical_lines += 1;
    }

    // Horizontal grid lines
    let mut horizontal_lines = 0;
    for y in horizontal_rules(page_rect) {
        layer.add_line(Point::new(0.0, y), Point::new(page_rect.width, y));
        horizontal_lines += 1;
    }

    layer.stroke_path();
    log::trace!(
        "Drew a grid of {} vertical and {} horizontal lines with pitch {:.3}",
        vertical_lines,
        horizontal_lines,
        grid_size
    );
}

fn lined_pattern(layer: &mut PdfLayer, page_rect: &Rect) {
    let mut lines = 0;
    for y in horizontal_rules(page_rect) {
        layer.add_line(
            Point::new(LINE_MARGIN, y),
            Point::new(page_rect.width - LINE_MARGIN, y),
        );
        lines += 1;
    }

    layer.stroke_path();
    log::trace!("Drew {} ruled lines", lines);
}

/// Same rules as the lined pattern with every height doubled, so the spacing is twice as large
/// and the later rules fall beyond the top of the page.
fn double_lined_pattern(layer: &mut PdfLayer, page_rect: &Rect) {
    let mut lines = 0;
    for y in horizontal_rules(page_rect) {
        layer.add_line(
            Point::new(LINE_MARGIN, y * 2.0),
            Point::new(page_rect.width - LINE_MARGIN, y * 2.0),
        );
        lines += 1;
    }

    layer.stroke_path();
    log::trace!("Drew {} double spaced lines", lines);
}

fn dotted_pattern(layer: &mut PdfLayer, page_rect: &Rect) {
    let mut dots = 0;
    for Point { x, y } in intersections(page_rect) {
        layer.add_ellipse(Rect::new(x, y, DOT_DIAMETER, DOT_DIAMETER));
        dots += 1;
    }

    layer.fill_path();
    log::trace!("Drew {} dots", dots);
}

fn crossed_pattern(layer: &mut PdfLayer, page_rect: &Rect) {
    let half_cross = CROSS_DIAMETER / 2.0;

    let mut crosses = 0;
    for Point { x, y } in intersections(page_rect) {
        // Horizontal arm
        layer.add_line(
            Point::new(x, y + half_cross),
            Point::new(x + CROSS_DIAMETER, y + half_cross),
        );
        // Vertical arm
        layer.add_line(
            Point::new(x + half_cross, y),
            Point::new(x + half_cross, y + CROSS_DIAMETER),
        );
        crosses += 1;
    }

    layer.stroke_path();
    log::trace!("Drew {} crosses", crosses);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PaperSize;
    use crate::pdf::PdfDocument;

    /// Draws the pattern into a fresh layer and returns its operations as `(operator, operands)`.
    fn draw(pattern: Pattern, paper_size: PaperSize) -> Vec<(String, Vec<f32>)> {
        let page_rect = paper_size.rect();
        let mut pdf_document = PdfDocument::new("test".into());
        let (page_index, layer_index) =
            pdf_document.add_page_with_layer(page_rect.width, page_rect.height, "Pattern");
        let layer = pdf_document
            .get_mut_layer_in_page(layer_index, page_index)
            .unwrap();
        draw_pattern(pattern, layer, &page_rect);

        layer
            .operations()
            .iter()
            .map(|operation| {
                (
                    operation.operator.clone(),
                    operation
                        .operands
                        .iter()
                        .map(|operand| operand.as_float().unwrap())
                        .collect(),
                )
            })
            .collect()
    }

    fn move_to_points(operations: &[(String, Vec<f32>)]) -> Vec<(f32, f32)> {
        operations
            .iter()
            .filter(|(operator, _)| operator == "m")
            .map(|(_, operands)| (operands[0], operands[1]))
            .collect()
    }

    #[test]
    fn blank_draws_nothing() {
        assert!(draw(Pattern::Blank, PaperSize::A4).is_empty());
    }

    #[test]
    fn pitch_scales_with_the_page_width() {
        assert!((pitch(&PaperSize::A4.rect()) - 19.833).abs() < 1e-3);
        assert!((pitch(&PaperSize::A0.rect()) - 79.467).abs() < 1e-3);
    }

    #[test]
    fn grid_lines_span_the_whole_page() {
        let operations = draw(Pattern::Grid, PaperSize::A4);
        assert_eq!(operations.last().unwrap().0, "S");
        assert_eq!(
            operations.iter().filter(|(operator, _)| operator == "S").count(),
            1
        );

        let starts = move_to_points(&operations);
        let vertical: Vec<_> = starts.iter().filter(|(_, y)| *y == 0.0).collect();
        let horizontal: Vec<_> = starts.iter().filter(|(x, _)| *x == 0.0).collect();
        assert_eq!(vertical.len(), 29);
        assert_eq!(horizontal.len(), 42);
        assert!((vertical[0].0 - 19.833).abs() < 1e-3);
        assert!((vertical[1].0 - 39.667).abs() < 1e-3);
        assert!(vertical.iter().all(|(x, _)| *x < 595.0));
        assert!((horizontal[0].1 - 9.917).abs() < 1e-3);
        assert!((horizontal[1].1 - 29.75).abs() < 1e-3);
        assert!(horizontal.iter().all(|(_, y)| *y < 842.0));
    }

    #[test]
    fn lined_rules_keep_a_fixed_margin() {
        for paper_size in [PaperSize::A8, PaperSize::Letter, PaperSize::A0] {
            let (width, _) = paper_size.dimensions();
            let operations = draw(Pattern::Lined, paper_size);
            for (operator, operands) in operations.iter() {
                match operator.as_str() {
                    "m" => assert_eq!(operands[0], 30.0),
                    "l" => assert_eq!(operands[0], (width - 30.0) as f32),
                    "S" => assert!(operands.is_empty()),
                    other => panic!("unexpected operator {}", other),
                }
            }
        }
    }

    #[test]
    fn double_lined_rules_are_twice_as_high() {
        let lined = move_to_points(&draw(Pattern::Lined, PaperSize::A5));
        let double_lined = move_to_points(&draw(Pattern::DoubleLined, PaperSize::A5));
        assert_eq!(lined.len(), double_lined.len());

        let grid_size = pitch(&PaperSize::A5.rect());
        for (index, ((_, lined_y), (_, double_y))) in lined.iter().zip(&double_lined).enumerate() {
            let expected = 2.0 * (grid_size / 2.0 + index as f64 * grid_size);
            assert!((*double_y as f64 - expected).abs() < 1e-3);
            assert!((double_y - 2.0 * lined_y).abs() < 1e-3);
        }
    }

    #[test]
    fn one_dot_per_intersection() {
        let operations = draw(Pattern::Dotted, PaperSize::A6);
        let grid_size = pitch(&PaperSize::A6.rect());
        let columns = stride(grid_size / 2.0, 298.0, grid_size).count();
        let rows = stride(grid_size / 2.0, 420.0, grid_size).count();
        assert_eq!(columns, 30);

        let dots = move_to_points(&operations);
        assert_eq!(dots.len(), columns * rows);
        assert_eq!(
            operations.iter().filter(|(operator, _)| operator == "c").count(),
            4 * columns * rows
        );
        assert_eq!(operations.last().unwrap().0, "f");

        // The first dot is inscribed in the 2x2 square at the first intersection
        let (x, y) = dots[0];
        assert!((x as f64 - (grid_size / 2.0 + DOT_DIAMETER)).abs() < 1e-3);
        assert!((y as f64 - (grid_size / 2.0 + DOT_DIAMETER / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn crosses_have_two_arms_of_ten_points() {
        let operations = draw(Pattern::Crossed, PaperSize::A7);
        let grid_size = pitch(&PaperSize::A7.rect());
        let intersections = intersections(&PaperSize::A7.rect()).count();
        assert_eq!(move_to_points(&operations).len(), 2 * intersections);

        let at = |offset: f64| (grid_size / 2.0 + offset) as f32;
        assert_eq!(operations[0], ("m".to_string(), vec![at(0.0), at(5.0)]));
        assert_eq!(operations[1], ("l".to_string(), vec![at(10.0), at(5.0)]));
        assert_eq!(operations[2], ("m".to_string(), vec![at(5.0), at(0.0)]));
        assert_eq!(operations[3], ("l".to_string(), vec![at(5.0), at(10.0)]));
        assert_eq!(operations.last().unwrap().0, "S");
    }
}
