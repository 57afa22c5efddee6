//! Terminal host: owns the form data and drives the control's lifecycle.
//!
//! The host mirrors what an embedding form would do:
//! - initialize the control with a notify callback and a mount point
//! - route terminal input to it
//! - when notified, pull the output, write it back into its own context and
//!   refresh, so the control always renders the bound value
//! - tear the control down on exit

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use choices_picker_tui::{ControlAdapter, MountPoint, RefreshOutcome};
use choices_picker_types::{Effect, HostContext, Outputs};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::backend::{CrosstermBackend, TestBackend};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::{debug, info};

const HINTS: &[(&str, &str)] = &[
    ("↑/↓", " move  "),
    ("Enter", " select  "),
    ("Del", " clear  "),
    ("q", " quit"),
];

pub struct Host {
    context: HostContext,
    control: ControlAdapter,
    container: MountPoint,
    output_changed: Rc<Cell<bool>>,
}

impl Host {
    pub fn new(context: HostContext) -> Result<Self> {
        let container = MountPoint::default();
        let output_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&output_changed);

        let mut control = ControlAdapter::new();
        control.initialize(&context, move || flag.set(true), container.clone())?;
        let mut host = Self {
            context,
            control,
            container,
            output_changed,
        };
        host.refresh()?;
        Ok(host)
    }

    fn refresh(&mut self) -> Result<()> {
        match self.control.refresh(&self.context)? {
            RefreshOutcome::Rendered(kind) => debug!(?kind, "control rendered"),
            RefreshOutcome::Skipped(missing) => info!(%missing, "control not rendered: host metadata missing"),
        }
        Ok(())
    }

    /// Pull output if the control signalled a change. Returns whether the
    /// bound value was updated.
    fn sync_output(&mut self) -> Result<bool> {
        if !self.output_changed.replace(false) {
            return Ok(false);
        }
        let outputs = self.control.collect_output()?;
        debug!(value = ?outputs.value, "output collected");
        self.context.value = outputs.value;
        self.refresh()?;
        Ok(true)
    }

    /// Feed one terminal event through the control. Returns whether a redraw
    /// is needed.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        let effects: Vec<Effect> = match event {
            Event::Key(key) => self.control.handle_key_events(key),
            Event::Mouse(mouse) => self.control.handle_mouse_events(mouse),
            Event::Resize(_, _) => return Ok(true),
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
        };
        let synced = self.sync_output()?;
        Ok(synced || !effects.is_empty())
    }

    /// The value currently bound in the host's form.
    pub fn bound_output(&self) -> Outputs {
        Outputs {
            value: self.context.value,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let [body, footer] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let block = Block::default().borders(Borders::ALL).title(" choices-picker ");
        let inner = block.inner(body);
        frame.render_widget(block, body);
        self.container.draw(frame, inner);

        let mut spans = vec![Span::raw(format!("value: {}  ", display_value(self.context.value)))];
        for (key, action) in HINTS {
            spans.push(Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)));
            spans.push(Span::raw(*action));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), footer);
    }

    /// Render the mounted control alone into an off-screen buffer.
    pub fn snapshot(&self, width: u16, height: u16) -> Result<Vec<String>> {
        let mut terminal = Terminal::new(TestBackend::new(width, height))?;
        terminal.draw(|frame| {
            let area = frame.area();
            self.container.draw(frame, area);
        })?;
        let buffer = terminal.backend().buffer();
        Ok((0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect())
    }

    pub fn finish(mut self) -> Result<Outputs> {
        self.control.teardown()?;
        Ok(self.bound_output())
    }
}

fn display_value(value: Option<i32>) -> String {
    value.map_or_else(|| "none".to_string(), |value| value.to_string())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && (key.code == KeyCode::Char('q')
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, host: &mut Host) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| {
                let area = frame.area();
                host.draw(frame, area);
            })?;
        }
        let input = event::read()?;
        if let Event::Key(key) = &input
            && is_quit(key)
        {
            return Ok(());
        }
        dirty = host.handle_event(input)?;
    }
}

/// Run `session` against the host, then tear the control down whether or not
/// the session failed. The session's error wins over a teardown error.
fn finish_after(mut host: Host, session: impl FnOnce(&mut Host) -> Result<()>) -> Result<Outputs> {
    let result = session(&mut host);
    let outputs = host.finish();
    result?;
    outputs
}

fn run_in_terminal(host: &mut Host) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, host);
    let cleanup = cleanup_terminal(&mut terminal);
    result?;
    cleanup
}

/// Run the control full-screen until the user quits; returns the bound value.
pub fn run_interactive(context: HostContext) -> Result<Outputs> {
    finish_after(Host::new(context)?, run_in_terminal)
}

/// Render one frame of the control and return its lines.
pub fn render_once(context: HostContext, width: u16, height: u16) -> Result<(Vec<String>, Outputs)> {
    let host = Host::new(context)?;
    let lines = host.snapshot(width, height)?;
    let outputs = host.finish()?;
    Ok((lines, outputs))
}
