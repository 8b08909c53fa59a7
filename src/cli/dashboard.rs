//! Interactive churn dashboard using ratatui
//!
//! A filter sidebar on the left and the chart pages on the right. Every change
//! to the selection recomputes the whole [`DashboardView`].

use std::io::{self, stdout};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    symbols,
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, List,
        ListItem, ListState, Paragraph, Row, Table, Tabs,
    },
};

use crate::pipeline::{
    compute_dashboard, AggregationOptions, ChargeHistogram, ChurnDataset, CorrelationMatrix,
    DashboardView, FilterField, FilterSelection, GroupRate, KeyMetrics,
};

const SIDEBAR_WIDTH: u16 = 34;

/// Chart pages, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Contract,
    MonthlyCharges,
    Tenure,
    Correlation,
    InternetService,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Contract,
        Page::MonthlyCharges,
        Page::Tenure,
        Page::Correlation,
        Page::InternetService,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Contract => "Churn by Contract",
            Page::MonthlyCharges => "Monthly Charges",
            Page::Tenure => "Churn by Tenure",
            Page::Correlation => "Correlation",
            Page::InternetService => "Churn by Internet",
        }
    }
}

/// Dashboard state, independent of the terminal
pub struct DashboardApp<'a> {
    dataset: &'a ChurnDataset,
    options: AggregationOptions,
    selection: FilterSelection,
    view: DashboardView,
    focus: usize,
    cursors: [usize; 4],
    page: usize,
    quit: bool,
}

impl<'a> DashboardApp<'a> {
    pub fn new(
        dataset: &'a ChurnDataset,
        selection: FilterSelection,
        options: AggregationOptions,
    ) -> Result<Self> {
        let view = compute_dashboard(dataset, &selection, &options)?;
        Ok(Self {
            dataset,
            options,
            selection,
            view,
            focus: 0,
            cursors: [0; 4],
            page: 0,
            quit: false,
        })
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn focused_field(&self) -> FilterField {
        FilterField::ALL[self.focus]
    }

    pub fn page(&self) -> Page {
        Page::ALL[self.page]
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn cursor(&self) -> usize {
        self.cursors[self.focus]
    }

    /// Apply one key press. Selection changes trigger a recompute.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let field = self.focused_field();
        let universe_len = self.dataset.universe(field).len();

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
            KeyCode::Tab => self.focus = (self.focus + 1) % FilterField::ALL.len(),
            KeyCode::BackTab => {
                self.focus = (self.focus + FilterField::ALL.len() - 1) % FilterField::ALL.len()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.cursors[self.focus] > 0 {
                    self.cursors[self.focus] -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursors[self.focus] + 1 < universe_len {
                    self.cursors[self.focus] += 1;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => self.page = (self.page + 1) % Page::ALL.len(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.page = (self.page + Page::ALL.len() - 1) % Page::ALL.len()
            }
            KeyCode::Char(c @ '1'..='5') => self.page = (c as usize) - ('1' as usize),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(value) = self.dataset.universe(field).get(self.cursor()) {
                    self.selection.toggle(field, value);
                    self.recompute()?;
                }
            }
            KeyCode::Char('a') => {
                self.selection.select_all(field, self.dataset);
                self.recompute()?;
            }
            KeyCode::Char('n') => {
                self.selection.clear(field);
                self.recompute()?;
            }
            KeyCode::Char('r') => {
                self.selection = FilterSelection::all(self.dataset);
                self.recompute()?;
            }
            _ => {}
        }

        Ok(())
    }

    fn recompute(&mut self) -> Result<()> {
        self.view = compute_dashboard(self.dataset, &self.selection, &self.options)?;
        Ok(())
    }
}

/// Run the dashboard until the user quits; returns the final selection
pub fn run_dashboard(
    dataset: &ChurnDataset,
    selection: FilterSelection,
    options: AggregationOptions,
) -> Result<FilterSelection> {
    let mut app = DashboardApp::new(dataset, selection, options)?;

    enable_raw_mode()?;
    with_restore(|| run_in_alternate_screen(&mut app), restore_terminal)?;

    Ok(app.selection.clone())
}

/// Run `session`, then `restore` whatever the outcome.
///
/// A session error takes precedence over a restore error.
fn with_restore<T>(
    session: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = session();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn run_in_alternate_screen(app: &mut DashboardApp<'_>) -> Result<()> {
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    run_event_loop(&mut terminal, app)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut DashboardApp<'_>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key)?;
            if app.should_quit() {
                return Ok(());
            }
        }
    }
}

/// Draw the whole dashboard
pub fn draw(frame: &mut Frame, app: &DashboardApp<'_>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(outer[0]);

    draw_sidebar(frame, app, body[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(body[1]);

    draw_metrics(frame, &app.view.overall, &app.view.selection, main[0]);
    draw_tabs(frame, app.page, main[1]);

    let view = &app.view;
    match app.page() {
        Page::Contract => draw_rate_bars(frame, " Churn Rate by Contract Type ", &view.churn_by_contract, main[2]),
        Page::MonthlyCharges => draw_histogram(frame, &view.monthly_charges, main[2]),
        Page::Tenure => draw_tenure_line(frame, &view.churn_by_tenure, main[2]),
        Page::Correlation => draw_correlation(frame, &view.correlation, main[2]),
        Page::InternetService => draw_rate_bars(
            frame,
            " Churn Rate by Internet Service ",
            &view.churn_by_internet_service,
            main[2],
        ),
    }

    draw_help(frame, outer[1]);
}

fn sidebar_title(app: &DashboardApp<'_>) -> &'static str {
    if app.selection.is_everything(app.dataset) {
        " Filter Customers (all) "
    } else {
        " Filter Customers (filtered) "
    }
}

fn draw_sidebar(frame: &mut Frame, app: &DashboardApp<'_>, area: Rect) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(sidebar_title(app))
        .title_style(Style::default().fg(Color::Cyan).bold());
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = FilterField::ALL
        .iter()
        .map(|field| Constraint::Length(app.dataset.universe(*field).len() as u16 + 2))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (idx, field) in FilterField::ALL.iter().enumerate() {
        let focused = idx == app.focus;
        let universe = app.dataset.universe(*field);
        let chosen = universe
            .iter()
            .filter(|v| app.selection.is_selected(*field, v))
            .count();

        let border_color = if focused { Color::Yellow } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {} ({}/{}) ", field.label(), chosen, universe.len()))
            .title_style(Style::default().fg(border_color).bold());

        let items: Vec<ListItem> = universe
            .iter()
            .map(|value| {
                let checked = app.selection.is_selected(*field, value);
                let checkbox = if checked { "[x]" } else { "[ ]" };
                let style = if checked {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(format!(" {} {}", checkbox, value)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow).bold());

        let mut list_state = ListState::default();
        if focused && !universe.is_empty() {
            list_state.select(Some(app.cursors[idx]));
        }

        frame.render_stateful_widget(list, chunks[idx], &mut list_state);
    }
}

fn draw_metrics(frame: &mut Frame, overall: &KeyMetrics, selection: &KeyMetrics, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

    let entries = [
        (
            "Customers",
            selection.customers.to_string(),
            overall.customers.to_string(),
        ),
        (
            "Churn Rate",
            selection.churn_rate_label(),
            overall.churn_rate_label(),
        ),
        (
            "Average Tenure",
            selection.avg_tenure_label(),
            overall.avg_tenure_label(),
        ),
        (
            "Average Monthly Charge",
            selection.avg_monthly_charge_label(),
            overall.avg_monthly_charge_label(),
        ),
    ];

    for ((title, value, all), card) in entries.into_iter().zip(cards.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(Color::Cyan));
        let content = Paragraph::new(vec![
            Line::from(Span::styled(value, Style::default().fg(Color::White).bold())),
            Line::from(Span::styled(
                format!("all: {}", all),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        frame.render_widget(content, *card);
    }
}

fn draw_tabs(frame: &mut Frame, page: usize, area: Rect) {
    let titles: Vec<String> = Page::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {}", i + 1, p.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(page)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold());

    frame.render_widget(tabs, area);
}

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).bold())
}

fn draw_empty(frame: &mut Frame, title: &str, area: Rect) {
    let message = Paragraph::new(Line::from(Span::styled(
        "  No customers match the current filters",
        Style::default().fg(Color::DarkGray),
    )))
    .block(chart_block(title));
    frame.render_widget(message, area);
}

fn rate_color(rate: f64) -> Color {
    if !rate.is_finite() {
        Color::DarkGray
    } else if rate >= 0.4 {
        Color::Red
    } else if rate >= 0.2 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn draw_rate_bars(frame: &mut Frame, title: &str, rates: &[GroupRate], area: Rect) {
    if rates.is_empty() {
        draw_empty(frame, title, area);
        return;
    }

    // Rates are scaled to per-mille so bars keep three decimals
    let bars: Vec<Bar> = rates
        .iter()
        .map(|rate| {
            let value = if rate.churn_rate.is_finite() {
                (rate.churn_rate * 1000.0).round() as u64
            } else {
                0
            };
            Bar::default()
                .value(value)
                .label(Line::from(rate.category.clone()))
                .text_value(format!("{:.3}", rate.churn_rate))
                .style(Style::default().fg(rate_color(rate.churn_rate)))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / rates.len() as u16).saturating_sub(2).clamp(1, 24);

    let chart = BarChart::default()
        .block(chart_block(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2)
        .max(1000);

    frame.render_widget(chart, area);
}

fn draw_histogram(frame: &mut Frame, histogram: &ChargeHistogram, area: Rect) {
    let (first, last) = match (histogram.bins.first(), histogram.bins.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            draw_empty(frame, " Monthly Charges Distribution by Churn ", area);
            return;
        }
    };
    let title = format!(
        " {} {:.2} – {:.2}: churned (red) vs retained (cyan) ",
        histogram.column, first.lower, last.upper
    );

    let mut chart = BarChart::default()
        .block(chart_block(&title))
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1)
        .max(histogram.max_count().max(1) as u64);

    for bin in &histogram.bins {
        let bars = [
            Bar::default()
                .value(bin.churned as u64)
                .text_value(String::new())
                .style(Style::default().fg(Color::Red)),
            Bar::default()
                .value(bin.retained as u64)
                .text_value(String::new())
                .style(Style::default().fg(Color::Cyan)),
        ];
        chart = chart.data(BarGroup::default().bars(&bars));
    }

    frame.render_widget(chart, area);
}

fn draw_tenure_line(frame: &mut Frame, rates: &[GroupRate], area: Rect) {
    let points: Vec<(f64, f64)> = rates
        .iter()
        .filter_map(|rate| {
            let x = rate.category.parse::<f64>().ok()?;
            rate.churn_rate.is_finite().then_some((x, rate.churn_rate))
        })
        .collect();

    if points.is_empty() {
        draw_empty(frame, " Churn Rate by Tenure ", area);
        return;
    }

    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let (x_min, x_max) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 1.0, x_max + 1.0)
    };

    let datasets = vec![Dataset::default()
        .name("churn rate")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Magenta))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(chart_block(" Churn Rate by Tenure "))
        .x_axis(
            Axis::default()
                .title("tenure (months)")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    format!("{:.0}", x_min),
                    format!("{:.0}", (x_min + x_max) / 2.0),
                    format!("{:.0}", x_max),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("churn rate")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(vec!["0.0".to_string(), "0.5".to_string(), "1.0".to_string()]),
        );

    frame.render_widget(chart, area);
}

fn correlation_color(value: f64) -> Color {
    match value {
        v if !v.is_finite() => Color::DarkGray,
        v if v >= 0.5 => Color::Red,
        v if v >= 0.1 => Color::LightRed,
        v if v <= -0.5 => Color::Blue,
        v if v <= -0.1 => Color::LightBlue,
        _ => Color::White,
    }
}

fn draw_correlation(frame: &mut Frame, matrix: &CorrelationMatrix, area: Rect) {
    if matrix.is_empty() {
        draw_empty(frame, " Correlation Between Features ", area);
        return;
    }

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(matrix.columns.iter().map(|c| Cell::from(c.clone()))),
    )
    .style(Style::default().fg(Color::Cyan).bold());

    let rows: Vec<Row> = matrix
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells = std::iter::once(Cell::from(name.clone()).style(Style::default().bold()))
                .chain((0..matrix.len()).map(|j| {
                    let value = matrix.get(i, j);
                    Cell::from(format!("{:>6.2}", value))
                        .style(Style::default().fg(correlation_color(value)))
                }));
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(16))
        .chain(std::iter::repeat(Constraint::Length(14)).take(matrix.len()))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(chart_block(" Correlation Between Features "));

    frame.render_widget(table, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::styled(" ↑↓", Style::default().fg(Color::Cyan)),
        Span::styled(" move  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Space", Style::default().fg(Color::Cyan)),
        Span::styled(" toggle  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::styled(" next filter  ", Style::default().fg(Color::DarkGray)),
        Span::styled("←→/1-5", Style::default().fg(Color::Cyan)),
        Span::styled(" chart  ", Style::default().fg(Color::DarkGray)),
        Span::styled("a", Style::default().fg(Color::Cyan)),
        Span::styled(" all  ", Style::default().fg(Color::DarkGray)),
        Span::styled("n", Style::default().fg(Color::Cyan)),
        Span::styled(" none  ", Style::default().fg(Color::DarkGray)),
        Span::styled("r", Style::default().fg(Color::Cyan)),
        Span::styled(" reset  ", Style::default().fg(Color::DarkGray)),
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::styled(" quit", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(help), area);
}
