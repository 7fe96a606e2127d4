//! Legend layout and drawing for the stage legend.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{block_width_px, estimate_text_width_px};
use super::theme::LegendPlacement;

pub const LEGEND_TITLE: &str = "Vaccine Stage";

// Layout constants shared by the estimator and the drawing code
const PAD: i32 = 8;
const SWATCH_W: i32 = 24;
const SWATCH_TO_TEXT: i32 = 8;
const TRAILING_GAP: i32 = 16;
const TITLE_GAP: i32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: RGBColor,
}

fn columns(placement: LegendPlacement, n: usize) -> usize {
    match placement {
        LegendPlacement::Below => n.clamp(1, 2),
        LegendPlacement::Right => 1,
    }
}

fn line_h(font_px: u32) -> i32 {
    font_px as i32 + 6
}

fn column_w(items: &[LegendItem], font_px: u32) -> i32 {
    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    SWATCH_W + SWATCH_TO_TEXT + block_width_px(&labels, font_px) as i32 + TRAILING_GAP
}

/// Pixel size `(w, h)` of the framed legend box, title included.
pub fn legend_size_px(items: &[LegendItem], placement: LegendPlacement, font_px: u32) -> (u32, u32) {
    let cols = columns(placement, items.len());
    let rows = items.len().div_ceil(cols) as i32;
    let title_w = estimate_text_width_px(LEGEND_TITLE, font_px) as i32;
    let w = (column_w(items, font_px) * cols as i32).max(title_w) + 2 * PAD;
    let h = PAD + font_px as i32 + TITLE_GAP + rows * line_h(font_px) + PAD;
    (w as u32, h as u32)
}

/// Draw the legend box with its top-left corner at `origin` (area pixel coordinates).
pub fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[LegendItem],
    placement: LegendPlacement,
    font_family: &str,
    font_px: u32,
    origin: (i32, i32),
) -> Result<()> {
    let (w, h) = legend_size_px(items, placement, font_px);
    let (x0, y0) = origin;

    area.draw(&Rectangle::new(
        [(x0, y0), (x0 + w as i32, y0 + h as i32)],
        BLACK.mix(0.25).stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let title_style =
        TextStyle::from((font_family, font_px)).pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(
        LEGEND_TITLE,
        (x0 + w as i32 / 2, y0 + PAD),
        title_style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let label_style =
        TextStyle::from((font_family, font_px)).pos(Pos::new(HPos::Left, VPos::Center));
    let cols = columns(placement, items.len());
    let col_w = column_w(items, font_px);
    let first_row_y = y0 + PAD + font_px as i32 + TITLE_GAP + line_h(font_px) / 2;

    for (i, item) in items.iter().enumerate() {
        let (row, col) = ((i / cols) as i32, (i % cols) as i32);
        let x = x0 + PAD + col * col_w;
        let y = first_row_y + row * line_h(font_px);
        area.draw(&PathElement::new(
            vec![(x, y), (x + SWATCH_W, y)],
            item.color.stroke_width(2),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Text::new(
            item.label.as_str(),
            (x + SWATCH_W + SWATCH_TO_TEXT, y),
            label_style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<LegendItem> {
        vec![
            LegendItem {
                label: "First".into(),
                color: RED,
            },
            LegendItem {
                label: "Second".into(),
                color: BLUE,
            },
        ]
    }

    #[test]
    fn below_is_wider_and_shorter_than_right() {
        let (bw, bh) = legend_size_px(&items(), LegendPlacement::Below, 13);
        let (rw, rh) = legend_size_px(&items(), LegendPlacement::Right, 13);
        assert!(bw > rw);
        assert!(bh < rh);
    }
}
