// src/tui/mod.rs
mod views;

use crate::analytics::overview::SessionsOverview;
use crate::analytics::DashboardReport;
use crate::types::{EvalFilter, EvaluationPanel, UiCommand, UiEvent};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Evaluations,
    Positions,
    Trades,
    Sessions,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Evaluations,
        Tab::Positions,
        Tab::Trades,
        Tab::Sessions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "1 Overview",
            Tab::Evaluations => "2 Evaluations",
            Tab::Positions => "3 Positions",
            Tab::Trades => "4 Trades",
            Tab::Sessions => "5 Sessions",
        }
    }

    fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

pub struct App {
    pub tab: Tab,
    pub report: Option<DashboardReport>,
    pub evaluations: EvaluationPanel,
    pub sessions: Option<SessionsOverview>,
    pub status: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            tab: Tab::default(),
            report: None,
            evaluations: EvaluationPanel::default(),
            sessions: None,
            status: None,
        }
    }

    pub fn on_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Report(report) => {
                self.report = Some(*report);
                self.status = None;
            }
            UiEvent::Evaluations(panel) => {
                self.evaluations = panel;
            }
            UiEvent::Sessions(overview) => {
                self.sessions = Some(*overview);
            }
            UiEvent::Status(msg) => {
                self.status = Some(msg);
            }
        }
    }

    /// Maps a key to a local tab switch or an engine command.
    /// `Some(Quit)` ends the UI loop.
    pub fn on_key(&mut self, code: KeyCode) -> Option<UiCommand> {
        match code {
            KeyCode::Char('q') => Some(UiCommand::Quit),
            KeyCode::Char('1') => self.switch(Tab::Overview),
            KeyCode::Char('2') => self.switch(Tab::Evaluations),
            KeyCode::Char('3') => self.switch(Tab::Positions),
            KeyCode::Char('4') => self.switch(Tab::Trades),
            KeyCode::Char('5') => self.switch(Tab::Sessions),
            KeyCode::Char('u') => Some(UiCommand::Reload),
            KeyCode::Char('a') => Some(UiCommand::SetFilter(EvalFilter::All)),
            KeyCode::Char('s') => Some(UiCommand::SetFilter(EvalFilter::Signals)),
            KeyCode::Char('r') => Some(UiCommand::SetFilter(EvalFilter::Rejected)),
            KeyCode::Down | KeyCode::Char('j') => Some(UiCommand::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(UiCommand::SelectPrev),
            _ => None,
        }
    }

    fn switch(&mut self, tab: Tab) -> Option<UiCommand> {
        self.tab = tab;
        None
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(
    mut rx: mpsc::Receiver<UiEvent>,
    commands: mpsc::Sender<UiCommand>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    loop {
        terminal.draw(|f| views::ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = app.on_key(key.code) {
                        if commands.send(command).await.is_err() {
                            warn!("Engine is gone, closing the dashboard");
                            break;
                        }
                        if command == UiCommand::Quit {
                            break;
                        }
                    }
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.on_event(event);
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
