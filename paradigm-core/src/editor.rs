use std::io::{self};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use paradigm_kernel::text::{byte_offset, char_len};

use crate::engine::{Resolution, TriggerEngine};
use crate::gateway::Gateway;

fn get_spinner_char(index: usize) -> String {
    const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

    SPINNER_CHARS[index % SPINNER_CHARS.len()].to_string()
}

#[derive(PartialEq)]
pub(crate) enum ExitReason {
    Cancel,
    Save,
}

/// Run the interactive editor over `content`. Returns the final document on
/// save, `None` on cancel.
pub async fn run_editor(
    content: &str,
    gateway: Arc<dyn Gateway>,
    window_radius: usize,
    quiet_period: Duration,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    // terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(content, gateway, window_radius, quiet_period);
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let exit_reason;

    // main loop
    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(reason) = app.handle_key(key) {
                    exit_reason = reason;

                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick().await?;
            last_tick = Instant::now();
        }
    }

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(if exit_reason == ExitReason::Cancel {
        None
    } else {
        Some(app.engine.text().to_string())
    })
}

/// The visible editing surface. The engine owns the document; this struct
/// owns the caret, the selection flag, the debounce clock, and the handles
/// of in-flight resolutions.
pub(crate) struct App {
    pub(crate) engine: TriggerEngine,
    /// Caret as a char offset into the engine's document.
    pub(crate) cursor: usize,
    /// Ctrl+A pressed and not yet superseded by another edit or movement.
    pub(crate) select_all: bool,

    quiet_period: Duration,
    last_keystroke: Option<Instant>,

    pending: Vec<tokio::task::JoinHandle<Resolution>>,
    spinner_increment: usize,
    scroll: u16,
}

impl App {
    pub(crate) fn new(
        content: &str,
        gateway: Arc<dyn Gateway>,
        window_radius: usize,
        quiet_period: Duration,
    ) -> Self {
        let mut engine = TriggerEngine::new(gateway, window_radius);
        // seed the document without firing triggers that were already
        // complete in the loaded content; those stay available to Ctrl+R
        engine.on_text_changed(content);
        engine.quiet_elapsed();

        Self {
            engine,
            cursor: char_len(content),
            select_all: false,
            quiet_period,
            last_keystroke: None,
            pending: Vec::new(),
            spinner_increment: 0,
            scroll: 0,
        }
    }

    pub(crate) fn resolving(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Push the surface's current text into the engine and spawn a
    /// resolution for every trigger that just completed, snapshotting the
    /// caret as it stands right now.
    fn text_changed(&mut self, text: String) {
        self.last_keystroke = Some(Instant::now());

        for occurrence in self.engine.on_text_changed(&text) {
            let task = self.engine.begin(occurrence, Some(self.cursor));
            self.pending.push(tokio::spawn(task));
        }
    }

    fn insert_char(&mut self, c: char) {
        let mut text = if self.select_all {
            self.cursor = 0;
            self.select_all = false;
            String::new()
        } else {
            self.engine.text().to_string()
        };

        text.insert(byte_offset(&text, self.cursor), c);
        self.cursor += 1;
        self.text_changed(text);
    }

    fn backspace(&mut self) {
        if self.select_all {
            self.cursor = 0;
            self.select_all = false;
            self.text_changed(String::new());
            return;
        }

        if self.cursor == 0 {
            return;
        }

        let text = self.engine.text();
        let from = byte_offset(text, self.cursor - 1);
        let to = byte_offset(text, self.cursor);

        let mut text = text.to_string();
        text.replace_range(from..to, "");
        self.cursor -= 1;
        self.text_changed(text);
    }

    /// Kick off the first resolvable trigger that automatic detection did
    /// not fire for (e.g., one already complete when the document loaded).
    fn manual_resolve(&mut self) {
        if let Some(occurrence) = self.engine.manual_candidate() {
            let task = self.engine.begin(occurrence, Some(self.cursor));
            self.pending.push(tokio::spawn(task));
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Option<ExitReason> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => return Some(ExitReason::Cancel),
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => return Some(ExitReason::Save),

            (KeyModifiers::CONTROL, KeyCode::Char('r')) => self.manual_resolve(),
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => self.select_all = true,

            (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.insert_char(c);
            }
            (KeyModifiers::NONE, KeyCode::Enter) => self.insert_char('\n'),
            (KeyModifiers::NONE, KeyCode::Backspace) => self.backspace(),

            (KeyModifiers::NONE, KeyCode::Left) => {
                self.select_all = false;
                self.cursor = self.cursor.saturating_sub(1);
            }
            (KeyModifiers::NONE, KeyCode::Right) => {
                self.select_all = false;
                if self.cursor < char_len(self.engine.text()) {
                    self.cursor += 1;
                }
            }
            (KeyModifiers::NONE, KeyCode::Home) => {
                self.select_all = false;
                self.cursor = 0;
            }
            (KeyModifiers::NONE, KeyCode::End) => {
                self.select_all = false;
                self.cursor = char_len(self.engine.text());
            }

            (KeyModifiers::NONE, KeyCode::PageUp) => {
                self.scroll = self.scroll.saturating_sub(4);
            }
            (KeyModifiers::NONE, KeyCode::PageDown) => {
                self.scroll = self.scroll.saturating_add(4);
            }

            _ => {}
        }

        None
    }

    /// Poll in-flight resolutions and the debounce clock. Finished
    /// resolutions are applied and the caret restored in the same turn; a
    /// caret the engine could not place (no capture, rejected splice) is
    /// simply left where it is.
    pub(crate) async fn on_tick(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(at) = self.last_keystroke {
            if at.elapsed() >= self.quiet_period {
                self.engine.quiet_elapsed();
                self.last_keystroke = None;
            }
        }

        let mut i = 0;
        while i < self.pending.len() {
            if !self.pending[i].is_finished() {
                i += 1;
                continue;
            }

            let resolution = self.pending.remove(i).await?;
            let applied = self.engine.apply(resolution);

            if let Some(caret) = applied.caret {
                self.cursor = std::cmp::min(caret, char_len(self.engine.text()));
                self.select_all = false;
            }
        }

        Ok(())
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(f.area());

    draw_document(f, app, chunks[0]);
    draw_status(f, app, chunks[1]);
}

fn draw_document(f: &mut Frame, app: &mut App, area: Rect) {
    let text = app.engine.text();
    let at = byte_offset(text, app.cursor);
    let (before, after) = text.split_at(at);

    let caret = Span::styled(
        "▏",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    // Draw a styled caret glyph between the two halves; a real terminal
    // cursor would need (x, y) math over the wrapped layout.
    let mut body = Text::default();
    body.extend(Text::from(before.to_string()));
    body.push_line(Line::from(vec![caret]));
    body.extend(Text::from(after.to_string()));

    let style = if app.select_all {
        Style::default().bg(Color::Rgb(40, 48, 60))
    } else {
        Style::default()
    };

    let widget = Paragraph::new(body)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(Span::styled(
            " Document (Ctrl+S save, Ctrl+Q quit, Ctrl+R resolve) ",
            Style::default().fg(Color::Cyan),
        )))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    f.render_widget(widget, area);
}

fn draw_status(f: &mut Frame, app: &mut App, area: Rect) {
    let session = app.engine.session();

    let line = if session.is_processing() || app.resolving() {
        app.spinner_increment += 1;
        Line::from(vec![
            Span::styled(
                get_spinner_char(app.spinner_increment),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" resolving…"),
        ])
    } else if let Some(error) = session.last_error() {
        Line::from(Span::styled(
            format!("✗ {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if session.is_typing() {
        Line::from(Span::styled("typing…", Style::default().fg(Color::Gray)))
    } else {
        Line::from(Span::styled(
            format!("{} triggers known", app.engine.occurrences().len()),
            Style::default().fg(Color::DarkGray),
        ))
    };

    let widget = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
    f.render_widget(widget, area);
}
