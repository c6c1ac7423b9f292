use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

/// Colour used for categories missing from the map.
pub const DEFAULT_COLOR: &str = "#808080";

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct `#rrggbb` colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: booster category → colour
// ---------------------------------------------------------------------------

/// Maps booster version categories to distinct colours for the scatter view.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, String>,
}

impl CategoryColors {
    /// Build a colour map from the distinct categories, in their given order.
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let categories: Vec<&str> = categories.into_iter().collect();
        let mapping = categories
            .iter()
            .zip(generate_palette(categories.len()))
            .map(|(cat, color)| (cat.to_string(), color))
            .collect();
        CategoryColors { mapping }
    }

    /// Look up the colour for a category.
    pub fn color_for(&self, category: &str) -> &str {
        self.mapping
            .get(category)
            .map(String::as_str)
            .unwrap_or(DEFAULT_COLOR)
    }

    /// Legend entries (category → colour), sorted by category.
    pub fn legend_entries(&self) -> Vec<(&str, &str)> {
        self.mapping
            .iter()
            .map(|(cat, color)| (cat.as_str(), color.as_str()))
            .collect()
    }
}
