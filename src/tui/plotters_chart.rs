//! Plotters-powered fatality chart widget for Ratatui.
//!
//! Plotters rather than Ratatui's built-in `Chart` widget, because it brings
//! proper axis rendering, dashed-line support for the fitted trendline, and a
//! path to PNG/SVG export later. The output lands in the Ratatui buffer via
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Ten distinguishable colors for multi-series charts. Manufacturers past the
/// tenth reuse the palette from the start.
pub const SERIES_PALETTE: [(u8, u8, u8); 10] = [
    (31, 119, 180),  // blue
    (255, 127, 14),  // orange
    (44, 160, 44),   // green
    (214, 39, 40),   // red
    (148, 103, 189), // purple
    (140, 86, 75),   // brown
    (227, 119, 194), // pink
    (127, 127, 127), // gray
    (188, 189, 34),  // olive
    (23, 190, 207),  // teal
];

/// Color assigned to a manufacturer by its legend position.
pub fn series_color(index: usize) -> (u8, u8, u8) {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

/// One manufacturer's polyline, ready for plotting.
pub struct MakeSeries {
    pub color: (u8, u8, u8),
    /// (year, fatalities) vertices in year order.
    pub points: Vec<(f64, f64)>,
}

/// A render-only chart description.
///
/// All series and bounds are computed before the render call; the widget only
/// draws. The data prep lives in plain functions that can be unit tested
/// without a terminal.
pub struct TrendPlottersChart<'a> {
    /// One line per manufacturer, in legend order.
    pub series: &'a [MakeSeries],
    /// Index into `series` of the highlighted manufacturer, if any.
    pub selected: Option<usize>,
    /// Fitted trendline vertices for the highlighted manufacturer.
    pub trend: &'a [(f64, f64)],
    /// X bounds (event year).
    pub x_bounds: [f64; 2],
    /// Y bounds (total fatalities per year, pinned to zero at the bottom).
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for TrendPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot build a chart in a tiny area. Show a hint instead
        // of panicking mid-render.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // The backend draws Plotters primitives through Ratatui's `Canvas`
        // widget. Going through the crate-provided `widget_fn` helper keeps
        // its internal backend types out of this module.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Label areas are measured in terminal cells, so keep them tight.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are disabled: at terminal resolution they read as
            // noise, and the axes plus tick labels carry enough structure.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // 1) One line per manufacturer. The highlighted one is drawn last
            //    so it wins contested cells.
            for (idx, make) in self.series.iter().enumerate() {
                if self.selected == Some(idx) {
                    continue;
                }
                let (r, g, b) = make.color;
                chart.draw_series(LineSeries::new(
                    make.points.iter().copied(),
                    &RGBColor(r, g, b),
                ))?;
            }

            // 2) Dashed trendline, under the highlighted series but over the rest.
            if self.trend.len() >= 2 {
                let trend_color = RGBColor(160, 160, 160);
                chart.draw_series(DashedLineSeries::new(
                    self.trend.iter().copied(),
                    4,
                    4,
                    trend_color.into(),
                ))?;
            }

            if let Some(make) = self.selected.and_then(|idx| self.series.get(idx)) {
                let (r, g, b) = make.color;
                chart.draw_series(LineSeries::new(
                    make.points.iter().copied(),
                    &RGBColor(r, g, b),
                ))?;

                // 3) Vertex markers on the highlighted series.
                //
                // Not `Circle` markers: `plotters-ratatui-backend` currently
                // maps circle radii wrong (pixel radius -> normalized canvas
                // units) and draws huge blobs. A white `Pixel` per vertex
                // reads cleanly and overrides the line color underneath.
                chart.draw_series(
                    make.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
