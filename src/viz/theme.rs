//! Renderer presets. One parameterized renderer replaces per-style copies of the
//! chart code: everything cosmetic lives here.

use plotters::style::RGBColor;

/// Where the "Vaccine Stage" legend goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPlacement {
    /// Two-column band under the last facet, right-aligned.
    Below,
    /// Single-column panel to the right of the facets.
    Right,
}

/// Stage colors (matplotlib/seaborn default cycle: blue, orange).
pub const STAGE_PALETTE: [RGBColor; 2] = [RGBColor(31, 119, 180), RGBColor(255, 127, 14)];

pub const DEFAULT_TITLE: &str = "UK Covid-19 Vaccine Recipients by Country";

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Registered font family name (`"sans-serif"` or `"serif"`).
    pub font_family: &'static str,
    pub title: String,
    pub legend: LegendPlacement,
    /// Width of the facet column in pixels (a right legend panel is added on top).
    pub width: u32,
    /// Height of one nation row in pixels.
    pub facet_height: u32,
    /// Outer padding around the figure.
    pub margin: u32,
    /// Vertical space reserved for the figure title.
    pub title_band: u32,
    pub title_font_px: u32,
    pub font_px: u32,
    pub palette: [RGBColor; 2],
    /// Extra attribution line printed under the source/date lines.
    pub credit: Option<String>,
}

impl Theme {
    /// Sans-serif, legend under the last facet, tight margins.
    pub fn standard() -> Self {
        Self {
            name: "standard",
            font_family: "sans-serif",
            title: DEFAULT_TITLE.into(),
            legend: LegendPlacement::Below,
            width: 900,
            facet_height: 300,
            margin: 12,
            title_band: 48,
            title_font_px: 24,
            font_px: 13,
            palette: STAGE_PALETTE,
            credit: None,
        }
    }

    /// Serif, legend in a side panel, roomier margins.
    pub fn blog() -> Self {
        Self {
            name: "blog",
            font_family: "serif",
            legend: LegendPlacement::Right,
            margin: 28,
            title_band: 64,
            ..Self::standard()
        }
    }

    /// Width of the right-hand legend panel (0 for other placements).
    pub fn legend_panel_width(&self) -> u32 {
        match self.legend {
            LegendPlacement::Right => 160,
            LegendPlacement::Below => 0,
        }
    }

    pub fn stage_color(&self, idx: usize) -> RGBColor {
        self.palette[idx % self.palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_only_cosmetically() {
        let s = Theme::standard();
        let b = Theme::blog();
        assert_eq!(s.title, b.title);
        assert_eq!(s.facet_height, b.facet_height);
        assert_ne!(s.font_family, b.font_family);
        assert_ne!(s.legend, b.legend);
        assert_eq!(s.legend_panel_width(), 0);
        assert!(b.legend_panel_width() > 0);
        assert_eq!((s.name, b.name), ("standard", "blog"));
        assert_eq!(Theme::default(), s);
    }
}
