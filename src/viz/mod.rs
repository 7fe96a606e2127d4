//! Visualization: render the faceted vaccination chart to **PNG** or **SVG**.
//!
//! - One row per nation, one line per dose stage, independent y ranges
//! - Date ticks whose density follows the data's time span
//! - Engineering-notation value axis (`1.2M`), comma-grouped latest-value labels
//! - Title, stage legend and source/date attribution
//! - Cosmetics (fonts, legend placement, margins) come from a [`Theme`] preset

pub mod format;
pub mod layout;
pub mod legend;
pub mod text;
pub mod theme;
pub mod ticks;

pub use layout::{ChartLayout, FacetLayout, SeriesLayout};
pub use theme::{LegendPlacement, Theme};
pub use ticks::{TickPolicy, TickUnit};

use crate::models::{DoseStage, Observation};
use anyhow::{Context, Result, anyhow};
use chrono::Days;
use log::{debug, info};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::FontStyle;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::fs;
use std::path::Path;
use std::sync::Once;

use format::{format_count, format_date_tick, format_eng};
use legend::{LegendItem, draw_legend, legend_size_px};
use text::left_label_area_px;

/// Default output location, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "Graphs/Vaccine count.png";

const X_LABEL_AREA_PX: u32 = 24;
const Y_LABEL_COUNT: usize = 5;
/// Latest-value labels sit this many pixels above their line end.
const ANNOTATION_OFFSET_PX: i32 = 5;
const GRID_ALPHA: f64 = 0.3;
const GRID_DOT_PX: u32 = 1;
const GRID_GAP_PX: u32 = 3;
const MAJOR_TICK_PX: i32 = 5;
const MINOR_TICK_PX: i32 = 3;

/// One-time registration of the bundled fonts for the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let fonts: [(&str, FontStyle, &'static [u8]); 4] = [
            (
                "sans-serif",
                FontStyle::Normal,
                include_bytes!("../../assets/DejaVuSans.ttf"),
            ),
            (
                "sans-serif",
                FontStyle::Bold,
                include_bytes!("../../assets/DejaVuSans-Bold.ttf"),
            ),
            (
                "serif",
                FontStyle::Normal,
                include_bytes!("../../assets/DejaVuSerif.ttf"),
            ),
            (
                "serif",
                FontStyle::Bold,
                include_bytes!("../../assets/DejaVuSerif-Bold.ttf"),
            ),
        ];
        for (name, style, bytes) in fonts {
            if plotters::style::register_font(name, style, bytes).is_err() {
                log::warn!("could not register bundled font {name} ({})", style.as_str());
            }
        }
    });
}

fn legend_items(theme: &Theme) -> Vec<LegendItem> {
    DoseStage::ALL
        .iter()
        .map(|s| LegendItem {
            label: s.label().to_string(),
            color: theme.stage_color(s.index()),
        })
        .collect()
}

fn small_font_px(theme: &Theme) -> u32 {
    theme.font_px.saturating_sub(2).max(8)
}

fn attribution_height_px(layout: &ChartLayout, theme: &Theme) -> u32 {
    layout.attribution.len() as u32 * (small_font_px(theme) + 4)
}

/// Height of the band under the last facet (attribution, and the legend when placed below).
fn footer_height_px(layout: &ChartLayout, theme: &Theme) -> u32 {
    let legend_h = match theme.legend {
        LegendPlacement::Below => legend_size_px(&legend_items(theme), theme.legend, theme.font_px).1,
        LegendPlacement::Right => 0,
    };
    attribution_height_px(layout, theme).max(legend_h) + 8
}

/// Full figure size in pixels for a layout drawn with `theme`.
pub fn figure_size_px(layout: &ChartLayout, theme: &Theme) -> (u32, u32) {
    let w = theme.width + theme.legend_panel_width() + 2 * theme.margin;
    let h = 2 * theme.margin
        + theme.title_band
        + layout.facet_count() as u32 * theme.facet_height
        + footer_height_px(layout, theme);
    (w, h)
}

/// Reshaped observations → chart file. Returns the layout that was drawn.
///
/// The output format follows the extension (`.svg` → SVG, otherwise PNG). The parent
/// directory is created when missing and an existing file is overwritten.
///
/// ### Errors
/// - no observations / no numeric values
/// - directory creation or drawing/encoding failure
pub fn plot_vaccinations<P: AsRef<Path>>(
    obs: &[Observation],
    out_path: P,
    theme: &Theme,
) -> Result<ChartLayout> {
    let layout = ChartLayout::build(obs, theme)?;
    render_layout(&layout, out_path, theme)?;
    Ok(layout)
}

/// Draw an already-built layout to `out_path`.
pub fn render_layout<P: AsRef<Path>>(layout: &ChartLayout, out_path: P, theme: &Theme) -> Result<()> {
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let path_string = out_path.to_string_lossy().into_owned();
    let size = figure_size_px(layout, theme);
    debug!(
        "rendering {} facets with the {} theme at {}x{} ({} days, {:?})",
        layout.facet_count(),
        theme.name,
        size.0,
        size.1,
        layout.days_elapsed,
        layout.ticks
    );

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_figure(root, layout, theme)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_figure(root, layout, theme)?;
    }
    info!("wrote chart to {}", out_path.display());
    Ok(())
}

fn draw_figure<DB>(root: DrawingArea<DB, Shift>, layout: &ChartLayout, theme: &Theme) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let family = theme.font_family;
    let m = theme.margin;
    let inner = root.margin(m, m, m, m);

    // ----------------------------
    // 1) Title band
    // ----------------------------
    let (title_area, rest) = inner.split_vertically(theme.title_band);
    let (title_w, title_h) = title_area.dim_in_pixel();
    title_area
        .draw(&Text::new(
            layout.title.as_str(),
            (title_w as i32 / 2, title_h as i32 / 2),
            TextStyle::from((family, theme.title_font_px, FontStyle::Bold))
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

    // ----------------------------
    // 2) Facets (+ optional side legend panel)
    // ----------------------------
    let (body, side) = match theme.legend {
        LegendPlacement::Right => {
            let (b, s) = rest.split_horizontally(theme.width);
            (b, Some(s))
        }
        LegendPlacement::Below => (rest, None),
    };
    let n = layout.facet_count();
    let (facets_area, footer) = body.split_vertically(n as u32 * theme.facet_height);

    // Shared left gutter keeps the x axes aligned across rows
    let left_px = layout
        .facets
        .iter()
        .map(|f| left_label_area_px(f.y_max, Y_LABEL_COUNT, theme.font_px))
        .max()
        .unwrap_or(48);

    for (i, (facet, area)) in layout
        .facets
        .iter()
        .zip(facets_area.split_evenly((n, 1)))
        .enumerate()
    {
        draw_facet(&area, facet, layout, theme, left_px, i + 1 == n)?;
    }

    // ----------------------------
    // 3) Legend + attribution
    // ----------------------------
    let items = legend_items(theme);
    match side {
        Some(ref panel) => draw_legend(panel, &items, theme.legend, family, theme.font_px, (8, 8))?,
        None => {
            let (footer_w, _) = footer.dim_in_pixel();
            let (legend_w, _) = legend_size_px(&items, theme.legend, theme.font_px);
            let x = footer_w as i32 - legend_w as i32 - 1;
            draw_legend(&footer, &items, theme.legend, family, theme.font_px, (x.max(0), 6))?;
        }
    }

    let small = small_font_px(theme);
    let attribution_style =
        TextStyle::from((family, small)).pos(Pos::new(HPos::Left, VPos::Top));
    for (i, line) in layout.attribution.iter().enumerate() {
        footer
            .draw(&Text::new(
                line.as_str(),
                (left_px as i32 / 2, 6 + i as i32 * (small as i32 + 4)),
                attribution_style.clone(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_facet<DB>(
    area: &DrawingArea<DB, Shift>,
    facet: &FacetLayout,
    layout: &ChartLayout,
    theme: &Theme,
    left_label_px: u32,
    show_x_labels: bool,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let family = theme.font_family;
    let major: Vec<i32> = layout.major_ticks.iter().map(|d| layout.x_of(*d)).collect();
    let minor: Vec<i32> = layout.minor_ticks.iter().map(|d| layout.x_of(*d)).collect();
    let x_span = layout.x_span();
    // Integer day offsets: the f64 coord has no default label formatting to bind key points to
    let x_range = (0i32..x_span)
        .with_key_points(major.clone())
        .with_light_points(minor.clone());

    let mut chart = ChartBuilder::on(area)
        .margin_top(4)
        .margin_right(8)
        .caption(&facet.nation, (family, theme.font_px + 3))
        .set_label_area_size(LabelAreaPosition::Left, left_label_px)
        .set_label_area_size(LabelAreaPosition::Bottom, X_LABEL_AREA_PX)
        .build_cartesian_2d(x_range, 0f64..facet.y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Dates only under the last row; upper rows share the same axis
    let x_start = layout.x_start;
    let x_label_fmt = |x: &i32| {
        if !show_x_labels {
            return String::new();
        }
        x_start
            .checked_add_days(Days::new((*x).max(0) as u64))
            .map(format_date_tick)
            .unwrap_or_default()
    };
    let y_label_fmt = |y: &f64| format_eng(*y);

    // Mesh supplies labels only; the frame and dotted grid are drawn below
    chart
        .configure_mesh()
        .axis_style(TRANSPARENT)
        .set_tick_mark_size(LabelAreaPosition::Left, 0)
        .y_labels(Y_LABEL_COUNT)
        .y_max_light_lines(0)
        .bold_line_style(TRANSPARENT)
        .light_line_style(TRANSPARENT)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((family, theme.font_px))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let grid_style = BLACK.mix(GRID_ALPHA);
    let y_grid = chart.as_coord_spec().y_spec().key_points(Y_LABEL_COUNT);
    chart
        .draw_series(
            major
                .iter()
                .map(|&x| vec![(x, 0.0), (x, facet.y_max)])
                .chain(y_grid.iter().map(|&y| vec![(0, y), (x_span, y)]))
                .map(|pts| DashedPathElement::new(pts, GRID_DOT_PX, GRID_GAP_PX, grid_style)),
        )
        .map_err(|e| anyhow!("{:?}", e))?;

    // Bottom spine with inward date ticks
    let axis_style = BLACK.mix(0.6);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0, 0.0), (x_span, 0.0)],
            axis_style,
        )))
        .map_err(|e| anyhow!("{:?}", e))?;
    let marks = major
        .iter()
        .map(|&x| (x, MAJOR_TICK_PX))
        .chain(minor.iter().map(|&x| (x, MINOR_TICK_PX)));
    chart
        .draw_series(marks.map(|(x, len)| {
            EmptyElement::at((x, 0.0)) + PathElement::new(vec![(0, 0), (0, -len)], axis_style)
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    for series in &facet.series {
        if series.points.is_empty() {
            continue;
        }
        let color = theme.stage_color(series.stage.index());
        chart
            .draw_series(LineSeries::new(
                series
                    .points
                    .iter()
                    .map(|(d, v)| (layout.x_of(*d), *v as f64)),
                color.stroke_width(2),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;

        if let Some((_, latest)) = series.latest {
            let style = TextStyle::from((family, theme.font_px))
                .color(&color)
                .pos(Pos::new(HPos::Right, VPos::Bottom));
            chart
                .draw_series(std::iter::once(
                    EmptyElement::at((x_span, latest as f64))
                        + Text::new(format_count(latest), (0, -ANNOTATION_OFFSET_PX), style),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}
