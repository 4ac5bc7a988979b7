use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// A color exactly as it is handed over by the surrounding application: a list of components
/// in the `[0, 1]` range whose meaning depends on how many there are.
///
/// Nothing is checked when a `Color` is constructed, the components are only interpreted when
/// the template is rendered (see `Color::to_rgba`), which is also where malformed colors are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color {
    components: Vec<f32>,
}

/// A color resolved into its red, green, blue and alpha components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    pub fn rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            components: vec![red, green, blue, alpha],
        }
    }

    /// A grayscale color with alpha, which is expanded to `(gray, gray, gray, alpha)` once resolved.
    pub fn gray(gray: f32, alpha: f32) -> Self {
        Self {
            components: vec![gray, alpha],
        }
    }

    pub fn from_components(components: Vec<f32>) -> Self {
        Self { components }
    }

    pub fn white() -> Self {
        Self::from_components(Self::WHITE.to_vec())
    }

    pub fn black() -> Self {
        Self::from_components(Self::BLACK.to_vec())
    }

    pub fn components(&self) -> &[f32] {
        &self.components
    }

    /// Resolve the raw components into RGBA.
    ///
    /// Four components are taken as RGBA and two components as grayscale plus alpha; any other
    /// component count, as well as components which are not finite or fall outside `[0, 1]`,
    /// results in an `InvalidColorFormat` error.
    pub fn to_rgba(&self) -> Result<Rgba, TemplateError> {
        if let Some(component) = self
            .components
            .iter()
            .find(|component| !(0.0..=1.0).contains(*component))
        {
            return Err(TemplateError::invalid_color(format!(
                "The color component {} of {:?} is outside of the [0, 1] range",
                component, self.components
            )));
        }

        match self.components[..] {
            [red, green, blue, alpha] => Ok(Rgba {
                red,
                green,
                blue,
                alpha,
            }),
            [gray, alpha] => Ok(Rgba {
                red: gray,
                green: gray,
                blue: gray,
                alpha,
            }),
            _ => Err(TemplateError::invalid_color(format!(
                "Unsupported color space with {} components {:?}, expected RGBA or grayscale with alpha",
                self.components.len(),
                self.components
            ))),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl std::str::FromStr for Color {
    type Err = TemplateError;

    /// Parses a comma-separated list of components such as `1,1,1,1` or `0.5,1`. The component
    /// count is deliberately not checked here.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let components = value
            .split(',')
            .map(|component| {
                component.trim().parse::<f32>().map_err(|error| {
                    TemplateError::with_error(
                        crate::error::ErrorKind::InvalidColorFormat,
                        format!("Unable to parse the color component {:?}", component),
                        &error,
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_components(components))
    }
}

impl Rgba {
    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }

    /// The color operands for the `rg`/`RG` operators.
    pub(crate) fn rgb_operands(&self) -> Vec<lopdf::Object> {
        vec![self.red, self.green, self.blue]
            .into_iter()
            .map(lopdf::Object::Real)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn four_components_are_rgba() {
        let rgba = Color::rgba(0.1, 0.2, 0.3, 0.4).to_rgba().unwrap();
        assert_eq!(
            rgba,
            Rgba {
                red: 0.1,
                green: 0.2,
                blue: 0.3,
                alpha: 0.4
            }
        );
    }

    #[test]
    fn grayscale_is_expanded() {
        let rgba = Color::gray(0.5, 0.75).to_rgba().unwrap();
        assert_eq!(
            rgba,
            Rgba {
                red: 0.5,
                green: 0.5,
                blue: 0.5,
                alpha: 0.75
            }
        );
    }

    #[test]
    fn other_component_counts_are_rejected() {
        for components in [vec![], vec![0.5], vec![1.0, 0.0, 0.0], vec![0.0; 5]] {
            let error = Color::from_components(components).to_rgba().unwrap_err();
            assert_eq!(error.kind, ErrorKind::InvalidColorFormat);
        }
    }

    #[test]
    fn out_of_range_components_are_rejected() {
        let error = Color::rgba(1.5, 0.0, 0.0, 1.0).to_rgba().unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidColorFormat);
        let error = Color::gray(f32::NAN, 1.0).to_rgba().unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidColorFormat);
    }

    #[test]
    fn parses_comma_separated_components() {
        let color: Color = "1, 0.5,0,1".parse().unwrap();
        assert_eq!(color.components(), &[1.0, 0.5, 0.0, 1.0]);

        // Three components parse fine, they are only rejected once resolved
        let color: Color = "1,0,0".parse().unwrap();
        assert!(color.to_rgba().is_err());

        assert!("1,red".parse::<Color>().is_err());
    }

    #[test]
    fn deserializes_from_a_json_array() {
        let color: Color = serde_json::from_str("[0.25, 1]").unwrap();
        assert_eq!(color, Color::gray(0.25, 1.0));
    }
}
