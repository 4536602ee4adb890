//! SynthWeather TUI Dashboard Module
//! ===================================
//!
//! Terminal rendering of the dashboard frame. Uses Ratatui for rendering and
//! Crossbeam for frame delivery from the event loop.
//!
//! Enable with the `dashboard` feature flag.
//!
//! Panels:
//! - Header: location search box, system clock, online marker
//! - Sector map: particle field tinted by the current condition
//! - Current conditions: temperature, humidity, wind, pressure, visibility, UV
//! - AI consensus matrix: consensus temperature, agreement, one row per source
//! - Forecast timeline: day tabs, temperature bars, HIGH / LOW / AVG PRECIP

use std::io;
use std::time::Duration;

use crossbeam::channel::Receiver;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Sparkline, Table, Tabs, Wrap},
    Frame, Terminal,
};

use crate::frame::DashboardFrame;
use crate::model::{AiSource, Condition, ForecastDay, SourceStatus, UvLevel, UV_SCALE_MAX};
use crate::search::LocationSearch;
use crate::store::DashboardEvent;

/// Where the dashboard sends the events it emits.
pub type EventSink = Box<dyn FnMut(DashboardEvent) + Send>;

const AMBER: Color = Color::Rgb(245, 158, 11);

// =============================================================================
// PALETTE
// =============================================================================

fn status_color(status: SourceStatus) -> Color {
    match status {
        SourceStatus::Analyzing => AMBER,
        SourceStatus::Syncing => Color::Cyan,
        SourceStatus::Complete => Color::Green,
    }
}

fn source_accent(source: AiSource) -> Color {
    match source {
        AiSource::Perplexity => Color::Rgb(139, 92, 246),
        AiSource::Grok => Color::Rgb(239, 68, 68),
        AiSource::NanoBananaPro => Color::Rgb(251, 191, 36),
    }
}

fn condition_color(condition: Condition) -> Color {
    match condition {
        Condition::Clear => AMBER,
        Condition::PartlyCloudy => Color::Rgb(148, 163, 184),
        Condition::Overcast => Color::Rgb(71, 85, 105),
        Condition::LightRain => Color::Rgb(6, 182, 212),
        Condition::Thunderstorm => Color::Rgb(239, 68, 68),
        Condition::Fog => Color::DarkGray,
    }
}

fn uv_color(level: UvLevel) -> Color {
    match level {
        UvLevel::Low => Color::Green,
        UvLevel::Moderate => AMBER,
        UvLevel::High => Color::Rgb(249, 115, 22),
        UvLevel::Extreme => Color::Red,
    }
}

// =============================================================================
// WEATHER DASHBOARD
// =============================================================================

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
    Quit,
}

/// TUI Dashboard for the synthetic weather engine.
pub struct WeatherDashboard {
    rx: Receiver<DashboardFrame>,
    emit: EventSink,
    latest: Option<DashboardFrame>,
    search: LocationSearch,
    /// Last day tab requested. The engine applies every `SelectDay`, so this
    /// is ahead of the frames, never behind.
    requested_day: ForecastDay,
    frame_count: usize,
}

impl WeatherDashboard {
    /// Create a new dashboard reading frames from `rx` and emitting UI
    /// events into `emit`.
    pub fn new(rx: Receiver<DashboardFrame>, emit: EventSink) -> Self {
        Self {
            rx,
            emit,
            latest: None,
            search: LocationSearch::new(),
            requested_day: ForecastDay::default(),
            frame_count: 0,
        }
    }

    /// Keep only the newest frame from the channel.
    pub fn drain_frames(&mut self) {
        while let Ok(frame) = self.rx.try_recv() {
            self.latest = Some(frame);
        }
    }

    pub fn latest(&self) -> Option<&DashboardFrame> {
        self.latest.as_ref()
    }

    pub fn search(&self) -> &LocationSearch {
        &self.search
    }

    fn loading(&self) -> bool {
        self.latest.as_ref().map(|f| f.loading).unwrap_or(false)
    }

    /// Day tab the next Tab/Left press moves from.
    pub fn requested_day(&self) -> ForecastDay {
        self.requested_day
    }

    fn select_day(&mut self, day: ForecastDay) {
        self.requested_day = day;
        (self.emit)(DashboardEvent::SelectDay(day));
    }

    /// Translate a key press into search edits and emitted events.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Ignored;
        }

        let loading = self.loading();
        match key.code {
            KeyCode::Esc => {
                (self.emit)(DashboardEvent::Shutdown);
                KeyOutcome::Quit
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                (self.emit)(DashboardEvent::Shutdown);
                KeyOutcome::Quit
            }
            KeyCode::Enter => match self.search.submit(loading) {
                Some(location) => {
                    (self.emit)(DashboardEvent::SubmitSearch(location));
                    KeyOutcome::Handled
                }
                None => KeyOutcome::Ignored,
            },
            KeyCode::Backspace => {
                if self.search.backspace(loading) {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Tab | KeyCode::Right => {
                let day = self.requested_day.next();
                self.select_day(day);
                KeyOutcome::Handled
            }
            KeyCode::BackTab | KeyCode::Left => {
                let day = self.requested_day.previous();
                self.select_day(day);
                KeyOutcome::Handled
            }
            KeyCode::F(n) => match ForecastDay::from_index(usize::from(n).wrapping_sub(1)) {
                Some(day) => {
                    self.select_day(day);
                    KeyOutcome::Handled
                }
                None => KeyOutcome::Ignored,
            },
            KeyCode::Char(c) => {
                if self.search.push(c, loading) {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Run the TUI main loop (blocks until Esc pressed)
    pub fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore terminal even if drawing failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        loop {
            self.drain_frames();

            terminal.draw(|f| self.ui(f))?;
            self.frame_count += 1;

            // Handle input (non-blocking with 50ms timeout)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) == KeyOutcome::Quit {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Render the UI
    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),  // Header
                Constraint::Min(12),    // Map / conditions / consensus
                Constraint::Length(12), // Forecast
                Constraint::Length(1),  // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        let Some(frame) = self.latest.as_ref() else {
            let waiting = Paragraph::new("Waiting for the consensus engine...")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(waiting, chunks[1]);
            return;
        };

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(28),
                Constraint::Percentage(30),
                Constraint::Percentage(42),
            ])
            .split(chunks[1]);

        render_map(f, body[0], frame);
        render_conditions(f, body[1], frame);
        render_consensus(f, body[2], frame);
        render_forecast(f, chunks[2], frame);

        // === FOOTER ===
        let footer = Paragraph::new("Enter: scan  |  Tab/←/→/F1-F3: forecast day  |  Esc: quit")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[3]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(45),
                Constraint::Percentage(25),
            ])
            .split(area);

        let title = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("SYNTH", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("WEATHER", Style::default().fg(AMBER).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(Span::styled(
                "MULTI-AI CONSENSUS ENGINE",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        f.render_widget(title, cols[0]);

        let loading = self.loading();
        let input_style = if self.search.accepts_input(loading) {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let button_style = if self.search.can_submit(loading) {
            Style::default().fg(Color::Black).bg(AMBER).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let query = if self.search.query().is_empty() {
            Span::styled("Enter location coordinates...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.search.query().to_string(), input_style)
        };
        let search = Paragraph::new(Line::from(vec![
            Span::raw("⌕ "),
            query,
            Span::raw("  "),
            Span::styled(format!(" {} ", self.search.button_label(loading)), button_style),
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(AMBER)));
        f.render_widget(search, cols[1]);

        let clock = self
            .latest
            .as_ref()
            .map(|frame| frame.clock_label())
            .unwrap_or_else(|| "--:--:--".to_string());
        let status = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("SYSTEM TIME ", Style::default().fg(Color::DarkGray)),
                Span::styled(clock, Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled("● ", Style::default().fg(Color::Green)),
                Span::raw("ONLINE"),
                Span::styled(format!("  f{}", self.frame_count), Style::default().fg(Color::DarkGray)),
            ]),
        ]);
        f.render_widget(status, cols[2]);
    }
}

// =============================================================================
// PANELS
// =============================================================================

fn render_map(f: &mut Frame, area: Rect, frame: &DashboardFrame) {
    let block = Block::default()
        .title(format!("SECTOR MAP · {}", frame.snapshot.location))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height < 2 {
        return;
    }

    // Particle field above a one-line condition badge
    let width = inner.width as usize;
    let height = inner.height as usize - 1;
    let mut grid = vec![vec![' '; width]; height];
    for particle in &frame.map_particles {
        let col = ((particle.x / 100.0) * width as f64) as usize;
        let row = ((particle.y / 100.0) * height as f64) as usize;
        let glyph = if particle.size < 2.0 {
            '·'
        } else if particle.size < 3.0 {
            '•'
        } else {
            '●'
        };
        if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = glyph;
        }
    }

    let tint = Style::default().fg(condition_color(frame.snapshot.condition));
    let mut lines: Vec<Line> = grid
        .into_iter()
        .map(|row| Line::from(Span::styled(row.into_iter().collect::<String>(), tint)))
        .collect();

    let badge = if frame.loading {
        Span::styled("SCANNING...", Style::default().fg(AMBER).add_modifier(Modifier::SLOW_BLINK))
    } else {
        Span::styled(
            frame.snapshot.condition.label().to_uppercase(),
            tint.add_modifier(Modifier::BOLD),
        )
    };
    lines.push(Line::from(badge));

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_conditions(f: &mut Frame, area: Rect, frame: &DashboardFrame) {
    let block = Block::default()
        .title("CURRENT CONDITIONS · LIVE")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(3)])
        .split(inner);

    let s = &frame.snapshot;
    let dim = Style::default().fg(Color::DarkGray);
    let value_style = if frame.loading {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{}", s.temperature), value_style.add_modifier(Modifier::BOLD)),
            Span::styled("°C", dim),
        ]),
        Line::from(Span::styled(s.condition.label(), Style::default().fg(condition_color(s.condition)))),
        Line::from(""),
        Line::from(vec![Span::styled("HUMIDITY   ", dim), Span::styled(format!("{}%", s.humidity), value_style)]),
        Line::from(vec![Span::styled("WIND       ", dim), Span::styled(format!("{} km/h", s.wind_speed), value_style)]),
        Line::from(vec![Span::styled("PRESSURE   ", dim), Span::styled(format!("{} hPa", s.pressure), value_style)]),
        Line::from(vec![Span::styled("VISIBILITY ", dim), Span::styled(format!("{} km", s.visibility), value_style)]),
    ];
    f.render_widget(Paragraph::new(lines), rows[0]);

    let level = frame.uv_level();
    let percent = (u16::from(s.uv_index) * 100 / u16::from(UV_SCALE_MAX)).min(100);
    let uv = Gauge::default()
        .block(Block::default().title(format!("UV INDEX · {}", level.label())).borders(Borders::TOP))
        .gauge_style(Style::default().fg(uv_color(level)))
        .percent(percent)
        .label(format!("{}/{}", s.uv_index, UV_SCALE_MAX));
    f.render_widget(uv, rows[1]);
}

fn confidence_bar(confidence: u8, cells: usize) -> String {
    let filled = (usize::from(confidence) * cells + 50) / 100;
    let filled = filled.min(cells);
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

fn render_consensus(f: &mut Frame, area: Rect, frame: &DashboardFrame) {
    let block = Block::default()
        .title(format!(
            "AI CONSENSUS MATRIX · {}% AGREEMENT",
            frame.consensus.average_confidence
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(4)])
        .split(inner);

    let consensus = Paragraph::new(Line::from(vec![
        Span::styled("CONSENSUS TEMPERATURE  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}", frame.consensus.consensus_temperature),
            Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
        ),
        Span::raw("°C"),
    ]));
    f.render_widget(consensus, rows[0]);

    let header_cells = ["SOURCE", "STATUS", "TEMP", "CONFIDENCE", "PREDICTION"]
        .iter()
        .map(|h| Span::styled(*h, Style::default().add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let table_rows: Vec<Row> = frame
        .readings
        .iter()
        .map(|reading| {
            Row::new(vec![
                Span::styled(reading.source.label(), Style::default().fg(source_accent(reading.source))),
                Span::styled(
                    format!("● {}", reading.status.label()),
                    Style::default().fg(status_color(reading.status)),
                ),
                Span::raw(format!("{}°C", reading.temperature)),
                Span::styled(
                    format!("{} {}%", confidence_bar(reading.confidence, 8), reading.confidence),
                    Style::default().fg(source_accent(reading.source)),
                ),
                Span::styled(
                    reading.prediction.clone(),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(header);
    f.render_widget(table, rows[1]);
}

fn render_forecast(f: &mut Frame, area: Rect, frame: &DashboardFrame) {
    let block = Block::default()
        .title("72-HOUR FORECAST · PREDICTIVE MODEL")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Day tabs
            Constraint::Min(3),    // Temperature bars
            Constraint::Length(1), // Conditions
            Constraint::Length(1), // Precipitation
            Constraint::Length(1), // Summary
        ])
        .split(inner);

    let tabs = Tabs::new(ForecastDay::ALL.iter().map(|d| d.label()).collect::<Vec<_>>())
        .select(frame.selected_day.index())
        .highlight_style(Style::default().fg(Color::Black).bg(AMBER).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, rows[0]);

    // Minimum bar height of 4 keeps the lowest hour visible
    let bars: Vec<u64> = frame
        .bar_heights()
        .iter()
        .map(|h| 4 + (h * 96.0).round() as u64)
        .collect();
    let sparkline = Sparkline::default()
        .data(&bars)
        .max(100)
        .style(Style::default().fg(AMBER));
    f.render_widget(sparkline, rows[1]);

    let glyphs: String = frame.forecast.iter().map(|h| h.condition.glyph()).collect();
    f.render_widget(Paragraph::new(glyphs).style(Style::default().fg(Color::Gray)), rows[2]);

    let precipitation: String = frame
        .forecast
        .iter()
        .map(|h| match h.precipitation_chance {
            0..=14 => ' ',
            15..=29 => '.',
            30..=44 => ':',
            _ => '⁞',
        })
        .collect();
    f.render_widget(Paragraph::new(precipitation).style(Style::default().fg(Color::Cyan)), rows[3]);

    let summary = &frame.forecast_summary;
    let line = Line::from(vec![
        Span::styled("HIGH ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}°C", summary.rounded_high()), Style::default().fg(Color::Rgb(249, 115, 22))),
        Span::styled("   LOW ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}°C", summary.rounded_low()), Style::default().fg(Color::Cyan)),
        Span::styled("   AVG PRECIP ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}%", summary.average_precipitation), Style::default().fg(Color::Cyan)),
    ]);
    f.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), rows[4]);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DashboardStore, SearchTiming};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::{Arc, Mutex};
    use std::time::UNIX_EPOCH;

    fn dashboard() -> (WeatherDashboard, crossbeam::channel::Sender<DashboardFrame>, Arc<Mutex<Vec<DashboardEvent>>>) {
        let (tx, rx) = crossbeam::channel::unbounded();
        let emitted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&emitted);
        let dashboard = WeatherDashboard::new(
            rx,
            Box::new(move |event| sink.lock().unwrap().push(event)),
        );
        (dashboard, tx, emitted)
    }

    fn frame(loading: bool) -> DashboardFrame {
        let mut store = DashboardStore::new(
            Box::new(StdRng::seed_from_u64(11)),
            "Kyiv",
            SearchTiming::default(),
            UNIX_EPOCH,
        );
        if loading {
            store.submit_search("Odesa").unwrap();
        }
        store.frame()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_enter_submits_trimmed_location() {
        let (mut dashboard, _tx, emitted) = dashboard();
        for c in " Oslo ".chars() {
            dashboard.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(dashboard.handle_key(press(KeyCode::Enter)), KeyOutcome::Handled);
        assert_eq!(
            emitted.lock().unwrap().as_slice(),
            &[DashboardEvent::SubmitSearch("Oslo".to_string())]
        );
    }

    #[test]
    fn test_enter_on_blank_query_emits_nothing() {
        let (mut dashboard, _tx, emitted) = dashboard();
        dashboard.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(dashboard.handle_key(press(KeyCode::Enter)), KeyOutcome::Ignored);
        assert!(emitted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_input_locked_while_loading() {
        let (mut dashboard, tx, emitted) = dashboard();
        dashboard.handle_key(press(KeyCode::Char('A')));
        tx.send(frame(true)).unwrap();
        dashboard.drain_frames();

        assert_eq!(dashboard.handle_key(press(KeyCode::Char('B'))), KeyOutcome::Ignored);
        assert_eq!(dashboard.handle_key(press(KeyCode::Enter)), KeyOutcome::Ignored);
        assert_eq!(dashboard.search().query(), "A");
        assert!(emitted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_day_keys_emit_select_day() {
        let (mut dashboard, tx, emitted) = dashboard();
        tx.send(frame(false)).unwrap();
        dashboard.drain_frames();

        dashboard.handle_key(press(KeyCode::Tab));
        dashboard.handle_key(press(KeyCode::Left));
        dashboard.handle_key(press(KeyCode::F(3)));
        assert_eq!(dashboard.handle_key(press(KeyCode::F(9))), KeyOutcome::Ignored);

        assert_eq!(
            emitted.lock().unwrap().as_slice(),
            &[
                DashboardEvent::SelectDay(ForecastDay::Tomorrow),
                DashboardEvent::SelectDay(ForecastDay::Today),
                DashboardEvent::SelectDay(ForecastDay::DayAfter),
            ]
        );
        assert_eq!(dashboard.requested_day(), ForecastDay::DayAfter);
    }

    #[test]
    fn test_repeated_tab_before_next_frame_keeps_moving() {
        let (mut dashboard, tx, emitted) = dashboard();
        tx.send(frame(false)).unwrap();
        dashboard.drain_frames();

        // No frame arrives between the presses
        dashboard.handle_key(press(KeyCode::Tab));
        dashboard.handle_key(press(KeyCode::Tab));
        dashboard.handle_key(press(KeyCode::Tab));
        dashboard.handle_key(press(KeyCode::BackTab));

        assert_eq!(
            emitted.lock().unwrap().as_slice(),
            &[
                DashboardEvent::SelectDay(ForecastDay::Tomorrow),
                DashboardEvent::SelectDay(ForecastDay::DayAfter),
                DashboardEvent::SelectDay(ForecastDay::Today),
                DashboardEvent::SelectDay(ForecastDay::DayAfter),
            ]
        );
    }

    #[test]
    fn test_escape_quits_with_shutdown() {
        let (mut dashboard, _tx, emitted) = dashboard();
        assert_eq!(dashboard.handle_key(press(KeyCode::Esc)), KeyOutcome::Quit);
        assert_eq!(emitted.lock().unwrap().as_slice(), &[DashboardEvent::Shutdown]);
    }

    #[test]
    fn test_drain_keeps_newest_frame() {
        let (mut dashboard, tx, _emitted) = dashboard();
        tx.send(frame(false)).unwrap();
        tx.send(frame(true)).unwrap();
        dashboard.drain_frames();
        assert!(dashboard.latest().map(|f| f.loading).unwrap_or(false));
    }

    #[test]
    fn test_confidence_bar() {
        assert_eq!(confidence_bar(100, 8), "████████");
        assert_eq!(confidence_bar(50, 8), "████░░░░");
        assert_eq!(confidence_bar(0, 4), "░░░░");
    }
}
