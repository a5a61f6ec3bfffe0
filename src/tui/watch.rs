use crate::core::poller::PollOutcome;
use crate::core::progress::{PollEvent, PollEventReceiver};
use crate::core::task::TaskStatus;
use crate::tui::render::{render_status, state_color};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::Text,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

/// Full-screen live view of one running task, fed by the poll-event channel.
/// The poll loop decides when to stop; the watcher only displays and lets
/// the user leave with `q`.
pub struct TaskWatcher {
    task_id: String,
    events: PollEventReceiver,
    latest: Option<TaskStatus>,
    outcome: Option<PollOutcome>,
}

impl TaskWatcher {
    pub fn new(task_id: String, events: PollEventReceiver) -> Self {
        Self {
            task_id,
            events,
            latest: None,
            outcome: None,
        }
    }

    pub fn run(&mut self) -> io::Result<Option<PollOutcome>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn run_app<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> io::Result<Option<PollOutcome>> {
        loop {
            while let Ok(event) = self.events.try_recv() {
                match event {
                    PollEvent::Tick(status) => self.latest = Some(status),
                    PollEvent::Finished(outcome) => self.outcome = Some(outcome),
                }
            }

            terminal.draw(|f| self.ui(f))?;

            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                break;
            }
        }
        Ok(self.outcome)
    }

    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        let title = Paragraph::new(format!("Task {}", self.task_id)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("auctionr watch"),
        );
        f.render_widget(title, chunks[0]);

        let body = match &self.latest {
            Some(status) => render_status(status),
            None => Text::from("Waiting for first status check..."),
        };
        let body = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(body, chunks[1]);

        if let Some(status) = &self.latest
            && let Some(progress) = status.progress
        {
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title("Progress"))
                .gauge_style(Style::default().fg(state_color(status.state)))
                .percent(progress.min(100) as u16);
            f.render_widget(gauge, chunks[2]);
        }

        let footer = match self.outcome {
            Some(PollOutcome::Completed) => "Task completed — press q to exit",
            Some(PollOutcome::ServerError) => "Task ended in ERROR — press q to exit",
            Some(PollOutcome::TransportFailed) => "Status check failed — press q to exit",
            None => "Polling... press q to stop watching",
        };
        f.render_widget(Paragraph::new(footer), chunks[3]);
    }
}
