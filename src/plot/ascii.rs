//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - selected manufacturer's points: `o`
//! - other manufacturers' points: `.`
//! - fitted trendline: `-`

use crate::domain::{SeriesPoint, TrendPoint};

/// Render the fatality chart as text.
///
/// The y axis always spans `[0, max_fatalities + 1]`, matching the
/// interactive chart.
pub fn render_ascii_chart(
    background: &[SeriesPoint],
    selected: &[SeriesPoint],
    trend: &[TrendPoint],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((year_min, year_max)) = year_range(background, selected) else {
        return "Plot: no data\n".to_string();
    };
    let x_min = f64::from(year_min);
    let x_max = f64::from(year_max);

    let max_fatalities = background
        .iter()
        .chain(selected)
        .map(|p| p.total_fatalities)
        .max()
        .unwrap_or(0);
    let y_min = 0.0;
    let y_max = (max_fatalities + 1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    // Trendline first so the data points overlay it.
    draw_trend(&mut grid, trend, x_min, x_max, y_min, y_max);

    for point in background {
        let x = map_x(f64::from(point.year), x_min, x_max, width);
        let y = map_y(point.total_fatalities as f64, y_min, y_max, height);
        grid[y][x] = '.';
    }

    for point in selected {
        let x = map_x(f64::from(point.year), x_min, x_max, width);
        let y = map_y(point.total_fatalities as f64, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: years=[{year_min}, {year_max}] | fatalities=[0, {}]\n",
        max_fatalities + 1
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn year_range(background: &[SeriesPoint], selected: &[SeriesPoint]) -> Option<(i32, i32)> {
    let mut min_year: Option<i32> = None;
    let mut max_year: Option<i32> = None;
    for point in background.iter().chain(selected) {
        min_year = Some(min_year.map_or(point.year, |m| m.min(point.year)));
        max_year = Some(max_year.map_or(point.year, |m| m.max(point.year)));
    }

    let (lo, hi) = (min_year?, max_year?);
    if lo == hi {
        // Widen a single-year chart so the point lands mid-axis.
        Some((lo - 1, hi + 1))
    } else {
        Some((lo, hi))
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_trend(
    grid: &mut [Vec<char>],
    trend: &[TrendPoint],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if trend.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for point in trend {
        let x = map_x(f64::from(point.year), x_min, x_max, width);
        let y = map_y(point.fitted, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fit_trend;

    fn point(make: &str, year: i32, total: u64) -> SeriesPoint {
        SeriesPoint {
            manufacturer: make.to_string(),
            year,
            total_fatalities: total,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let selected = vec![
            point("Boeing", 2000, 0),
            point("Boeing", 2001, 2),
            point("Boeing", 2002, 4),
        ];
        let trend = fit_trend(&selected);

        let txt = render_ascii_chart(&[], &selected, &trend, 10, 5);
        let expected = concat!(
            "Plot: years=[2000, 2002] | fatalities=[0, 5]\n",
            "          \n",
            "       --o\n",
            "    -o-   \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn background_points_render_as_dots() {
        let background = vec![point("Cessna", 2000, 1), point("Piper", 2002, 3)];
        let selected = vec![point("Boeing", 2001, 2)];

        let txt = render_ascii_chart(&background, &selected, &[], 20, 8);
        assert!(txt.contains('.'));
        assert!(txt.contains('o'));
        assert!(!txt.contains('-'));
    }

    #[test]
    fn empty_chart_says_no_data() {
        let txt = render_ascii_chart(&[], &[], &[], 20, 8);
        assert!(txt.contains("no data"));
    }

    #[test]
    fn single_year_series_still_renders() {
        let selected = vec![point("Boeing", 2000, 3)];
        let txt = render_ascii_chart(&[], &selected, &[], 20, 8);
        assert!(txt.contains("years=[1999, 2001]"));
        assert!(txt.contains('o'));
    }
}
