use std::str::FromStr;

use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::config::ColorHints;
use crate::data::model::{Category, CATEGORY_ORDER};

const FALLBACK: Color32 = Color32::GRAY;

// ---------------------------------------------------------------------------
// Parsing: "#rrggbb" or a CSS colour name → Color32
// ---------------------------------------------------------------------------

fn parse_srgb(spec: &str) -> Option<Srgb<u8>> {
    let spec = spec.trim();
    Srgb::<u8>::from_str(spec)
        .ok()
        .or_else(|| palette::named::from_str(&spec.to_ascii_lowercase()))
}

fn to_color32(rgb: Srgb<u8>) -> Color32 {
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Parse a colour from the config. Accepts hex (`#ff2701`, `ff2701`, `#f21`)
/// and SVG colour names (`blue`, `lightblue`).
pub fn parse_color(spec: &str) -> Option<Color32> {
    parse_srgb(spec).map(to_color32)
}

/// Like [`parse_color`] but never fails: an unreadable value is logged and
/// replaced with grey.
pub fn color_or_fallback(spec: &str, what: &str) -> Color32 {
    parse_color(spec).unwrap_or_else(|| {
        log::warn!("Invalid colour '{spec}' for {what}, using grey");
        FALLBACK
    })
}

// ---------------------------------------------------------------------------
// Diverging scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Three-stop scale over [-1, 1] with its midpoint at 0, interpolated in
/// linear RGB.
#[derive(Debug, Clone, Copy)]
pub struct DivergingScale {
    negative: LinSrgb,
    midpoint: LinSrgb,
    positive: LinSrgb,
}

impl DivergingScale {
    pub fn new(negative: &str, midpoint: &str, positive: &str) -> Self {
        let stop = |spec: &str, what: &str| -> LinSrgb {
            let rgb = parse_srgb(spec).unwrap_or_else(|| {
                log::warn!("Invalid colour '{spec}' for {what}, using grey");
                Srgb::new(FALLBACK.r(), FALLBACK.g(), FALLBACK.b())
            });
            rgb.into_format::<f32>().into_linear()
        };
        DivergingScale {
            negative: stop(negative, "heatmap_negative"),
            midpoint: stop(midpoint, "heatmap_midpoint"),
            positive: stop(positive, "heatmap_positive"),
        }
    }

    /// Colour for a correlation value. NaN maps to grey.
    pub fn color_at(&self, value: f64) -> Color32 {
        if value.is_nan() {
            return FALLBACK;
        }
        let v = value.clamp(-1.0, 1.0) as f32;
        let mixed = if v < 0.0 {
            self.midpoint.mix(self.negative, -v)
        } else {
            self.midpoint.mix(self.positive, v)
        };
        to_color32(Srgb::<f32>::from_linear(mixed).into_format::<u8>())
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// All colours used by the charts, resolved once from the config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ChartColors {
    categories: [Color32; 5],
    pub highlight: Color32,
    pub base: Color32,
    pub heatmap: DivergingScale,
}

impl ChartColors {
    pub fn from_hints(hints: &ColorHints) -> Self {
        let categories = CATEGORY_ORDER.map(|c| color_or_fallback(hints.category(c), c.label()));
        ChartColors {
            categories,
            highlight: color_or_fallback(&hints.highlight, "highlight"),
            base: color_or_fallback(&hints.base, "base"),
            heatmap: DivergingScale::new(
                &hints.heatmap_negative,
                &hints.heatmap_midpoint,
                &hints.heatmap_positive,
            ),
        }
    }

    pub fn category(&self, category: Category) -> Color32 {
        self.categories[category.index()]
    }

    /// Bar colour in a yearly-mean chart.
    pub fn bar(&self, is_peak: bool) -> Color32 {
        if is_peak {
            self.highlight
        } else {
            self.base
        }
    }

    /// Legend entries (label → colour) in category order.
    pub fn legend_entries(&self) -> Vec<(&'static str, Color32)> {
        CATEGORY_ORDER
            .iter()
            .map(|&c| (c.label(), self.category(c)))
            .collect()
    }
}

impl Default for ChartColors {
    fn default() -> Self {
        Self::from_hints(&ColorHints::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_and_names() {
        assert_eq!(parse_color("#ff2701"), Some(Color32::from_rgb(0xff, 0x27, 0x01)));
        assert_eq!(parse_color("0b51c1"), Some(Color32::from_rgb(0x0b, 0x51, 0xc1)));
        assert_eq!(parse_color("blue"), Some(Color32::from_rgb(0, 0, 255)));
        assert_eq!(parse_color("LightBlue"), Some(Color32::from_rgb(173, 216, 230)));
        assert_eq!(parse_color("not-a-colour"), None);
    }

    #[test]
    fn test_fallback_is_grey() {
        assert_eq!(color_or_fallback("#zzzzzz", "test"), Color32::GRAY);
    }

    #[test]
    fn test_default_chart_colors() {
        let colors = ChartColors::default();
        assert_eq!(colors.category(Category::Baik), Color32::from_rgb(255, 255, 255));
        assert_eq!(colors.category(Category::Berbahaya), Color32::from_rgb(0xff, 0x27, 0x01));
        assert_eq!(colors.bar(true), Color32::from_rgb(0, 0, 255));
        assert_eq!(colors.bar(false), Color32::from_rgb(173, 216, 230));

        let legend = colors.legend_entries();
        let labels: Vec<&str> = legend.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec!["Baik", "Sedang", "Tidak Sehat", "Sangat Tidak Sehat", "Berbahaya"]
        );
    }

    #[test]
    fn test_diverging_scale_stops() {
        let scale = ChartColors::default().heatmap;
        assert_eq!(scale.color_at(-1.0), Color32::from_rgb(0xff, 0x27, 0x01));
        assert_eq!(scale.color_at(0.0), Color32::from_rgb(0xff, 0xff, 0xff));
        assert_eq!(scale.color_at(1.0), Color32::from_rgb(0x0b, 0x51, 0xc1));
        assert_eq!(scale.color_at(f64::NAN), Color32::GRAY);
        assert_eq!(scale.color_at(3.0), scale.color_at(1.0));
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text(Color32::WHITE), Color32::BLACK);
        assert_eq!(contrast_text(Color32::from_rgb(0x0b, 0x51, 0xc1)), Color32::WHITE);
    }
}
