use crate::core::controller::StatusView;
use crate::core::task::TaskStatus;
use crate::tui::render::{render_error, render_status};
use crossterm::style::{Color as TermColor, Stylize};
use log::debug;
use ratatui::style::{Color, Modifier};
use ratatui::text::{Line, Text};

/// Line-oriented status view for submit commands: prints the rendered status
/// with ANSI styling, prefixed with the target key when several submissions
/// share one console.
pub struct ConsoleStatusView {
    prefix: Option<String>,
}

impl ConsoleStatusView {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn for_target(key: &str) -> Self {
        Self {
            prefix: Some(format!("[{key}] ")),
        }
    }

    fn print_line(&self, line: &Line) {
        let mut out = String::new();
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix);
        }
        for span in &line.spans {
            let mut styled = span.content.to_string().stylize();
            if let Some(color) = span.style.fg.and_then(term_color) {
                styled = styled.with(color);
            }
            if span.style.add_modifier.contains(Modifier::BOLD) {
                styled = styled.bold();
            }
            out.push_str(&styled.to_string());
        }
        println!("{out}");
    }

    fn print_text(&self, text: &Text) {
        for line in &text.lines {
            self.print_line(line);
        }
    }
}

impl Default for ConsoleStatusView {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusView for ConsoleStatusView {
    fn alert(&mut self, message: &str) {
        self.print_line(&Line::from(message.to_string().bold().yellow().to_string()));
    }

    fn set_busy(&mut self, label: &str) {
        self.print_line(&Line::from(label.to_string()));
    }

    fn set_idle(&mut self) {
        // Nothing to restore on a line-oriented console.
        debug!("console view idle");
    }

    fn show_status(&mut self, status: &TaskStatus) {
        self.print_text(&render_status(status));
    }

    fn show_error(&mut self, message: &str) {
        self.print_text(&render_error(message));
    }
}

fn term_color(color: Color) -> Option<TermColor> {
    match color {
        Color::Gray => Some(TermColor::Grey),
        Color::Blue => Some(TermColor::Blue),
        Color::Green => Some(TermColor::Green),
        Color::Red => Some(TermColor::Red),
        Color::Yellow => Some(TermColor::Yellow),
        _ => None,
    }
}
