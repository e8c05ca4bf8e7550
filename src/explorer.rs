//! Terminal-based year explorer using ratatui
//!
//! Step through years with the arrow keys or type one in; the elapsed
//! time, timeline and table update on every change.

use std::io::stdout;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::Backend,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    style::{Color, Style, Modifier},
};
use tracing::{debug, info, warn};

use crate::ascii::render_timeline;
use crate::calendar::Year;
use crate::config::VisualizerConfig;
use crate::convergence::ConvergenceTable;
use crate::error::Result;
use crate::export::{export_helix_png, export_timeline_png};
use crate::figure::{build_helix_figure, build_timeline_figure};
use crate::report::{Reading, TITLE};

/// Years moved by PageUp/PageDown.
const PAGE_STEP: i64 = 100;

/// What the loop should do after a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplorerAction {
    Continue,
    Export,
    Quit,
}

/// Explorer state, independent of the terminal.
pub struct ExplorerState {
    config: VisualizerConfig,
    table: ConvergenceTable,
    reading: Reading,
    /// Year being typed, if any
    entry: Option<String>,
    show_help: bool,
    /// Message to display until the next key press
    message: Option<String>,
}

impl ExplorerState {
    pub fn new(config: VisualizerConfig, year: Year) -> Self {
        let reading = Reading::compute(&config.epoch, year);
        Self {
            config,
            table: ConvergenceTable::reference(),
            reading,
            entry: None,
            show_help: false,
            message: None,
        }
    }

    pub fn year(&self) -> Year {
        self.reading.year
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Jump to a year and recompute.
    pub fn set_year(&mut self, year: Year) {
        self.reading = Reading::compute(&self.config.epoch, year);
        debug!("Year {} -> {:.9} Gyr", year.value(), self.reading.elapsed_gyr);
    }

    pub fn step(&mut self, delta: i64) {
        self.set_year(self.year().offset(delta));
    }

    pub fn reset(&mut self) {
        self.set_year(Year(self.config.default_year));
        self.message = Some(format!("Reset to {}", self.config.default_year));
    }

    fn commit_entry(&mut self) {
        let Some(text) = self.entry.take() else { return };
        match text.parse::<i64>() {
            Ok(value) => self.set_year(Year(value)),
            Err(_) => self.message = Some(format!("Not a year: '{}'", text)),
        }
    }

    fn handle_entry_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.commit_entry(),
            KeyCode::Esc => self.entry = None,
            KeyCode::Backspace => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(entry) = self.entry.as_mut() {
                    // A minus sign is only valid as the first character
                    if c.is_ascii_digit() || (c == '-' && entry.is_empty()) {
                        entry.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, code: KeyCode) -> ExplorerAction {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return ExplorerAction::Continue;
        }

        if self.entry.is_some() {
            self.handle_entry_key(code);
            return ExplorerAction::Continue;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ExplorerAction::Quit,
            KeyCode::Char('?') => self.show_help = true,

            KeyCode::Up | KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.step(1),
            KeyCode::Down | KeyCode::Left => self.step(-1),
            KeyCode::PageUp => self.step(PAGE_STEP),
            KeyCode::PageDown => self.step(-PAGE_STEP),

            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                self.entry = Some(c.to_string());
            }

            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('e') | KeyCode::Char('E') => return ExplorerAction::Export,
            _ => {}
        }
        ExplorerAction::Continue
    }

    /// Write both chart PNGs for the current year into the working directory.
    fn export_images(&mut self) {
        let year = self.year();
        let render = &self.config.render;
        let timeline_path = format!("convergence_timeline_{}.png", year.value());
        let helix_path = format!("convergence_helix_{}.png", year.value());

        let timeline = build_timeline_figure(&self.table, year);
        let helix = build_helix_figure(&self.config.helix, &self.table, year);

        let result = export_timeline_png(&timeline, render.timeline_width, render.timeline_height, &timeline_path)
            .and_then(|_| export_helix_png(&helix, render.helix_width, render.helix_height, &helix_path));

        self.message = Some(match result {
            Ok(_) => {
                info!("Exported {} and {}", timeline_path, helix_path);
                format!("Exported: {}, {}", timeline_path, helix_path)
            }
            Err(e) => format!("Export failed: {}", e),
        });
    }

    fn render_reading(&self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(
                self.reading.result_line(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(self.reading.yantra_description()),
        ];
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", TITLE)))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let constants = &self.config.epoch;
        let lines: Vec<Line> = self
            .table
            .iter()
            .map(|p| {
                let text = format!(
                    "{:>6}  {:<20} {:.9}",
                    p.year.value(),
                    p.label,
                    constants.elapsed_gyr(p.year)
                );
                if p.year == self.year() {
                    Line::from(Span::styled(
                        text,
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(text)
                }
            })
            .collect();

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Convergence Points "))
            .render(area, buf);
    }

    fn render_timeline(&self, area: Rect, buf: &mut Buffer) {
        let width = (area.width.saturating_sub(2) as usize).max(16);
        let text = render_timeline(&self.table, self.year(), width);
        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(" Timeline "))
            .render(area, buf);
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let help = vec![
            "Up/Right/+   next year",
            "Down/Left    previous year",
            "PgUp/PgDn    +/- 100 years",
            "0-9, -       type a year, Enter to apply",
            "r            reset to default year",
            "e            export PNG charts",
            "q/Esc        quit",
        ];
        let height = (help.len() as u16 + 2).min(area.height);
        let width = 46.min(area.width);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        Clear.render(popup, buf);
        Paragraph::new(help.into_iter().map(Line::from).collect::<Vec<_>>())
            .block(Block::default().borders(Borders::ALL).title(" Help "))
            .render(popup, buf);
    }

    /// Closest convergence point and its signed distance in years.
    pub fn nearest_point(&self) -> Option<(&'static str, i128)> {
        let year = self.year();
        self.table
            .nearest(year)
            .map(|p| (p.label, p.year.value() as i128 - year.value() as i128))
    }

    fn status_line(&self) -> String {
        let entry = self
            .entry
            .as_ref()
            .map(|e| format!(" | Year: {}_", e))
            .unwrap_or_default();
        let nearest = self
            .nearest_point()
            .map(|(label, distance)| format!(" | Nearest: {} ({:+})", label, distance))
            .unwrap_or_default();
        let msg = self.message.as_ref().map(|m| format!(" | {}", m)).unwrap_or_default();
        format!(
            " {}{}{}{} | Arrows:Step  0-9:Type  E:Export  ?:Help  Q:Quit",
            self.year(),
            nearest,
            entry,
            msg
        )
    }
}

/// Run the explorer
pub fn run_explorer(config: VisualizerConfig, year: Year) -> Result<()> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = terminal::disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = terminal::disable_raw_mode();
            let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
            return Err(e.into());
        }
    };

    let result = event_loop(&mut terminal, ExplorerState::new(config, year));

    // Cleanup runs on every exit path, including errors from the loop
    let restored = terminal::disable_raw_mode()
        .and_then(|_| execute!(terminal.backend_mut(), LeaveAlternateScreen))
        .and_then(|_| terminal.show_cursor());
    if let Err(e) = &restored {
        warn!("Failed to restore terminal: {}", e);
    }

    result?;
    restored?;
    Ok(())
}

/// Draw one frame of the explorer.
fn draw_frame<B: Backend>(terminal: &mut Terminal<B>, state: &ExplorerState) -> Result<()> {
    terminal.draw(|f| {
        let size = f.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(size);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(20)])
            .split(main_chunks[1]);

        state.render_reading(main_chunks[0], f.buffer_mut());
        state.render_table(body[0], f.buffer_mut());
        state.render_timeline(body[1], f.buffer_mut());

        let status = Paragraph::new(state.status_line())
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        f.render_widget(status, main_chunks[2]);

        if state.show_help {
            state.render_help(size, f.buffer_mut());
        }
    })?;
    Ok(())
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, mut state: ExplorerState) -> Result<()> {
    loop {
        draw_frame(terminal, &state)?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match state.handle_key(key.code) {
                    ExplorerAction::Quit => return Ok(()),
                    ExplorerAction::Export => state.export_images(),
                    ExplorerAction::Continue => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(year: i64) -> ExplorerState {
        ExplorerState::new(VisualizerConfig::default(), Year(year))
    }

    #[test]
    fn test_step_recomputes() {
        let mut s = state(1993);
        let before = s.reading().elapsed_gyr;
        s.handle_key(KeyCode::Up);
        assert_eq!(s.year(), Year(1994));
        assert!(s.reading().elapsed_gyr > before);

        s.handle_key(KeyCode::PageDown);
        assert_eq!(s.year(), Year(1894));
    }

    #[test]
    fn test_step_across_era_boundary() {
        let mut s = state(1);
        s.handle_key(KeyCode::Down);
        assert_eq!(s.year(), Year(0));
        assert_eq!(s.reading().result_line(), "Time since Big Bang for 0: 13.799998 billion years");
    }

    #[test]
    fn test_typed_negative_year() {
        let mut s = state(1993);
        for code in [KeyCode::Char('-'), KeyCode::Char('5'), KeyCode::Char('1'), KeyCode::Char('1')] {
            s.handle_key(code);
        }
        assert_eq!(s.entry(), Some("-511"));
        s.handle_key(KeyCode::Char('4'));
        s.handle_key(KeyCode::Enter);
        assert_eq!(s.entry(), None);
        assert_eq!(s.year(), Year(-5114));
    }

    #[test]
    fn test_entry_backspace_and_cancel() {
        let mut s = state(1993);
        s.handle_key(KeyCode::Char('2'));
        s.handle_key(KeyCode::Char('0'));
        s.handle_key(KeyCode::Backspace);
        assert_eq!(s.entry(), Some("2"));
        s.handle_key(KeyCode::Esc);
        assert_eq!(s.entry(), None);
        assert_eq!(s.year(), Year(1993));
    }

    #[test]
    fn test_invalid_entry_keeps_year() {
        let mut s = state(1993);
        s.handle_key(KeyCode::Char('-'));
        s.handle_key(KeyCode::Enter);
        assert_eq!(s.year(), Year(1993));
        assert!(s.message().unwrap().contains("Not a year"));
    }

    #[test]
    fn test_reset_and_actions() {
        let mut s = state(-3228);
        s.handle_key(KeyCode::Char('r'));
        assert_eq!(s.year(), Year(1993));
        assert_eq!(s.handle_key(KeyCode::Char('e')), ExplorerAction::Export);
        assert_eq!(s.handle_key(KeyCode::Char('q')), ExplorerAction::Quit);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut s = state(1993);
        s.handle_key(KeyCode::Char('?'));
        assert_eq!(s.handle_key(KeyCode::Char('q')), ExplorerAction::Continue);
        assert_eq!(s.handle_key(KeyCode::Char('q')), ExplorerAction::Quit);
    }

    #[test]
    fn test_step_saturates() {
        let mut s = state(i64::MAX);
        s.handle_key(KeyCode::PageUp);
        assert_eq!(s.year(), Year(i64::MAX));
        assert!(s.reading().elapsed_gyr.is_finite());
    }

    #[test]
    fn test_render_into_buffer() {
        let s = state(1956);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        s.render_table(area, &mut buf);
        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Suez Crisis"));
        assert!(s.status_line().contains("1956 CE"));
    }

    #[test]
    fn test_status_shows_nearest_point() {
        let mut s = state(2000);
        assert_eq!(s.nearest_point(), Some(("Your Birth", -7)));
        assert!(s.status_line().contains("Nearest: Your Birth (-7)"));

        s.set_year(Year(-9000));
        assert_eq!(s.nearest_point(), Some(("Rama's Birth", 3886)));
    }

    #[test]
    fn test_draw_frame_on_test_backend() {
        use ratatui::backend::TestBackend;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut s = state(1956);
        s.handle_key(KeyCode::Char('?'));
        draw_frame(&mut terminal, &s).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Suez Crisis"));
        assert!(content.contains("Time since Big Bang for 1956"));
        assert!(content.contains("Help"));
    }
}
