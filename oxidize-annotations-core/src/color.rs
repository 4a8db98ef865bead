use crate::objects::Object;
use serde::{Deserialize, Serialize};

/// Annotation color in one of the PDF device color spaces.
///
/// Components range from 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Color {
    /// RGB color (red, green, blue)
    Rgb(f64, f64, f64),
    /// Grayscale color from 0.0 (black) to 1.0 (white)
    Gray(f64),
    /// CMYK color (cyan, magenta, yellow, key/black)
    Cmyk(f64, f64, f64, f64),
}

impl Color {
    /// Creates an RGB color with values clamped to 0.0-1.0.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Creates a grayscale color with value clamped to 0.0-1.0.
    pub fn gray(value: f64) -> Self {
        Color::Gray(value.clamp(0.0, 1.0))
    }

    pub fn yellow() -> Self {
        Color::Rgb(1.0, 1.0, 0.0)
    }

    /// Reads an annotation `C` array. An empty array means "transparent" and
    /// yields `None`, as does any component count other than 1, 3 or 4, or
    /// a component that is not a finite number.
    pub fn from_components(components: &[Object]) -> Option<Self> {
        let values: Option<Vec<f64>> = components
            .iter()
            .map(|c| c.as_real().filter(|v| v.is_finite()))
            .collect();
        match values?.as_slice() {
            [g] => Some(Color::gray(*g)),
            [r, g, b] => Some(Color::rgb(*r, *g, *b)),
            [c, m, y, k] => Some(Color::Cmyk(
                c.clamp(0.0, 1.0),
                m.clamp(0.0, 1.0),
                y.clamp(0.0, 1.0),
                k.clamp(0.0, 1.0),
            )),
            _ => None,
        }
    }
}
