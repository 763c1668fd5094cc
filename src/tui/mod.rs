//! Ratatui-based terminal UI.
//!
//! The TUI draws one fatality line per manufacturer with a legend for
//! highlighting a single manufacturer (or none), a dashed trendline for the
//! highlight, and an inspector for stepping through its points year by year.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, RunOutput};
use crate::domain::{ChartConfig, DataSource, SeriesPoint};
use crate::error::AppError;
use crate::series::{fit_trend, select_manufacturer, trend_line};

mod plotters_chart;

use plotters_chart::{series_color, MakeSeries, TrendPlottersChart};

/// Start the TUI on a pre-resolved configuration.
pub fn run(config: ChartConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: ChartConfig,
    run: RunOutput,
    /// Index into `run.manufacturers`; `None` plots all lines without a highlight.
    selected: Option<usize>,
    /// Point cursor within the highlighted manufacturer's series.
    cursor: usize,
    status: String,
}

impl App {
    fn new(config: ChartConfig) -> Result<Self, AppError> {
        let run = pipeline::run_chart(&config)?;
        let status = format!("Loaded {}.", series_summary(&run));
        Ok(Self {
            config,
            run,
            selected: None,
            cursor: 0,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => self.cycle_selection(-1),
            KeyCode::Down => self.cycle_selection(1),
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }

        Ok(false)
    }

    /// Step through the legend: none -> first make -> ... -> last make -> none.
    fn cycle_selection(&mut self, delta: i32) {
        let n = self.run.manufacturers.len();
        if n == 0 {
            self.selected = None;
            self.status = "No manufacturers to highlight.".to_string();
            return;
        }

        let slots = n + 1;
        let current = match self.selected {
            None => 0,
            Some(idx) => idx + 1,
        };
        let next = if delta >= 0 {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };

        self.selected = if next == 0 { None } else { Some(next - 1) };
        self.cursor = 0;
        self.status = match self.selected {
            Some(idx) => format!("Highlighted: {}", self.run.manufacturers[idx]),
            None => "Highlight cleared.".to_string(),
        };
    }

    fn move_cursor(&mut self, delta: i32) {
        let points = self.selected_points();
        if points.is_empty() {
            self.status = "Highlight a manufacturer (↑/↓) to step through points.".to_string();
            return;
        }

        let last = points.len() - 1;
        self.cursor = if delta >= 0 {
            (self.cursor + 1).min(last)
        } else {
            self.cursor.saturating_sub(1)
        };

        let point = &points[self.cursor];
        self.status = format!(
            "{}: {} fatalities in {}.",
            point.manufacturer, point.total_fatalities, point.year
        );
    }

    fn reload(&mut self) {
        // A synthetic source gets a fresh draw on each reload; file and URL
        // sources are simply re-read.
        if let DataSource::Sample { count, seed } = self.config.source {
            self.config.source = DataSource::Sample {
                count,
                seed: seed.wrapping_add(1),
            };
        }

        match pipeline::run_chart(&self.config) {
            Ok(run) => {
                self.run = run;
                self.clamp_state();
                self.status = format!("Reloaded {}.", series_summary(&self.run));
            }
            Err(err) => {
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    /// Keep selection and cursor valid after the series changes under them.
    fn clamp_state(&mut self) {
        if let Some(idx) = self.selected {
            if idx >= self.run.manufacturers.len() {
                self.selected = None;
            }
        }
        let len = self.selected_points().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn selected_points(&self) -> Vec<SeriesPoint> {
        let name = self.selected.and_then(|idx| self.run.manufacturers.get(idx));
        select_manufacturer(&self.run.series, name.map(String::as_str))
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("itrend", Style::default().fg(Color::Cyan)),
            Span::raw(" — incident fatalities by manufacturer and year"),
        ]));

        let ingest = &self.run.ingest;
        lines.push(Line::from(Span::styled(
            format!(
                "source: {} | rows: {} | undated: {} | blank fatalities: {}",
                self.config.source.describe(),
                ingest.rows_read,
                ingest.rows_undated,
                ingest.rows_defaulted,
            ),
            Style::default().fg(Color::Gray),
        )));

        let stats = &self.run.stats;
        let years = match stats.year_span {
            Some((lo, hi)) => format!("{lo}-{hi}"),
            None => "-".to_string(),
        };
        let highlight = match self.selected {
            Some(idx) => self.run.manufacturers[idx].as_str(),
            None => "(none)",
        };
        let slope = trend_line(&self.selected_points())
            .map(|line| format!("{:+.3}/yr", line.slope))
            .unwrap_or_else(|| "-".to_string());

        lines.push(Line::from(Span::styled(
            format!(
                "points: {} | makes: {} | years: {years} | highlight: {highlight} | trend: {slope}",
                stats.n_points, stats.n_manufacturers,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_side(frame, chunks[1]);
    }

    fn draw_side(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(area);

        self.draw_legend(frame, chunks[0]);
        self.draw_inspector(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Fatalities by Year").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.run.series.is_empty() {
            let msg = Paragraph::new("No plottable points. Press r to reload, q to quit.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let (series, x_bounds, y_bounds) = chart_series(&self.run);
        let trend: Vec<(f64, f64)> = fit_trend(&self.selected_points())
            .iter()
            .map(|t| (f64::from(t.year), t.fitted))
            .collect();

        let (chart_rect, insets) = chart_layout(inner);
        let widget = TrendPlottersChart {
            series: &series,
            selected: self.selected,
            trend: &trend,
            x_bounds,
            y_bounds,
            x_label: "year",
            y_label: "fatalities",
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_count,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_legend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::with_capacity(self.run.manufacturers.len() + 1);
        items.push(ListItem::new("(none)"));
        for (idx, name) in self.run.manufacturers.iter().enumerate() {
            let (r, g, b) = series_color(idx);
            items.push(ListItem::new(Line::from(Span::styled(
                name.clone(),
                Style::default().fg(Color::Rgb(r, g, b)),
            ))));
        }

        let list = List::new(items)
            .block(Block::default().title("Manufacturer").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected.map_or(0, |idx| idx + 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_inspector(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let points = self.selected_points();
        let mut lines: Vec<Line> = Vec::new();

        if points.is_empty() {
            lines.push(Line::from(Span::styled(
                "Highlight a manufacturer",
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                "with ↑/↓ to inspect points.",
                Style::default().fg(Color::Gray),
            )));
        } else {
            let idx = self.cursor.min(points.len() - 1);
            let point = &points[idx];
            let fitted = trend_line(&points)
                .map(|line| format!("{:.1}", line.value_at(f64::from(point.year))))
                .unwrap_or_else(|| "-".to_string());

            lines.push(Line::from(format!("Make:       {}", point.manufacturer)));
            lines.push(Line::from(format!("Year:       {}", point.year)));
            lines.push(Line::from(format!("Fatalities: {}", point.total_fatalities)));
            lines.push(Line::from(format!("Fitted:     {fitted}")));
            lines.push(Line::from(Span::styled(
                format!("point {}/{} (←/→)", idx + 1, points.len()),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Point").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ manufacturer  ←/→ point  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn series_summary(run: &RunOutput) -> String {
    if run.series.is_empty() {
        "0 plottable points (blank chart)".to_string()
    } else {
        format!(
            "{} points across {} manufacturers",
            run.stats.n_points, run.stats.n_manufacturers
        )
    }
}

/// Build chart series for Plotters.
///
/// Every manufacturer becomes one polyline in legend order. The y axis is
/// pinned to zero so totals stay comparable while the highlight changes.
fn chart_series(run: &RunOutput) -> (Vec<MakeSeries>, [f64; 2], [f64; 2]) {
    let mut series = Vec::with_capacity(run.manufacturers.len());
    for (idx, name) in run.manufacturers.iter().enumerate() {
        let points: Vec<(f64, f64)> = run
            .series
            .iter()
            .filter(|p| &p.manufacturer == name)
            .map(|p| (f64::from(p.year), p.total_fatalities as f64))
            .collect();
        series.push(MakeSeries {
            color: series_color(idx),
            points,
        });
    }

    let (x0, x1) = match run.stats.year_span {
        Some((lo, hi)) if lo < hi => (f64::from(lo), f64::from(hi)),
        // A single-year series still needs a non-empty x range.
        Some((year, _)) => (f64::from(year) - 1.0, f64::from(year) + 1.0),
        None => (0.0, 1.0),
    };
    let y_max = (run.stats.max_fatalities + 1) as f64;

    (series, [x0, x1], [0.0, y_max])
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_count(v: f64) -> String {
    format!("{v:.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.0}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.0}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("year")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("fatalities")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
