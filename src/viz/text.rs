//! Text measurement heuristics for layout.

use super::format::format_eng;

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Width of the widest line in a block of text.
pub fn block_width_px<S: AsRef<str>>(lines: &[S], font_px: u32) -> u32 {
    lines
        .iter()
        .map(|l| estimate_text_width_px(l.as_ref(), font_px))
        .max()
        .unwrap_or(0)
}

/// Left label area for an engineering-formatted Y axis spanning `0..y_max`.
///
/// Samples `ticks + 1` evenly spaced values through the same formatter the mesh
/// uses, then pads for breathing room. Clamped to a sensible range.
pub fn left_label_area_px(y_max: f64, ticks: usize, font_px: u32) -> u32 {
    let ticks = ticks.max(1);
    let widest = (0..=ticks)
        .map(|i| {
            let v = y_max * i as f64 / ticks as f64;
            estimate_text_width_px(&format_eng(v), font_px)
        })
        .max()
        .unwrap_or(0);
    widest.saturating_add(14).clamp(36, 120)
}
