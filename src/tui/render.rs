//! Pure rendering of task status snapshots.
//!
//! Everything here is a function of its input: the same `TaskStatus` always
//! produces the same styled text, and nothing in this module touches the
//! guard, the poller, or the terminal.

use crate::core::task::{TaskState, TaskStatus};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const PROGRESS_BAR_WIDTH: usize = 30;

/// One distinct color per state; the NOT_STARTED color doubles as the
/// fallback for states the server invented after this client shipped.
pub fn state_color(state: TaskState) -> Color {
    match state {
        TaskState::NotStarted | TaskState::Unknown => Color::Gray,
        TaskState::InProgress => Color::Blue,
        TaskState::Completed => Color::Green,
        TaskState::Error => Color::Red,
        TaskState::Warning => Color::Yellow,
    }
}

pub fn progress_bar(progress: u8) -> String {
    let pct = progress.min(100) as usize;
    let filled = pct * PROGRESS_BAR_WIDTH / 100;
    format!(
        "[{}{}] {pct:>3}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

pub fn render_status(status: &TaskStatus) -> Text<'static> {
    let color = state_color(status.state);

    let mut lines = vec![Line::from(Span::styled(
        status.state.label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];

    if let Some(stage) = &status.stage {
        lines.push(Line::from(format!("Stage: {stage}")));
    }
    if let Some(substage) = &status.substage {
        lines.push(Line::from(format!("Current: {substage}")));
    }
    if let Some(progress) = status.progress {
        lines.push(Line::from(progress_bar(progress)));
    }
    if let Some(message) = &status.message {
        lines.push(Line::from(message.clone()));
    }
    if let Some(context) = &status.error_context {
        lines.push(Line::from(Span::styled(
            context.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    Text::from(lines)
}

/// "Error: <message>" in the error styling, for failures that never produced
/// a status snapshot.
pub fn render_error(message: &str) -> Text<'static> {
    Text::from(Line::from(Span::styled(
        format!("Error: {message}"),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_status() -> TaskStatus {
        TaskStatus {
            state: TaskState::InProgress,
            stage: Some("Uploading".to_string()),
            substage: Some("Lot 42".to_string()),
            progress: Some(55),
            message: Some("halfway there".to_string()),
            error_context: None,
        }
    }

    fn first_span_style(text: &Text) -> Style {
        text.lines[0].spans[0].style
    }

    #[test]
    fn rendering_is_deterministic() {
        let status = full_status();
        assert_eq!(render_status(&status), render_status(&status));
    }

    #[test]
    fn each_state_has_a_distinct_color() {
        let states = [
            TaskState::NotStarted,
            TaskState::InProgress,
            TaskState::Completed,
            TaskState::Error,
            TaskState::Warning,
        ];
        let colors: Vec<Color> = states.iter().map(|s| state_color(*s)).collect();
        let mut deduped = colors.clone();
        deduped.dedup();
        assert_eq!(colors.len(), deduped.len());
    }

    #[test]
    fn unknown_state_uses_the_not_started_color() {
        assert_eq!(
            state_color(TaskState::Unknown),
            state_color(TaskState::NotStarted)
        );
    }

    #[test]
    fn state_label_is_bold_and_state_colored() {
        let text = render_status(&full_status());
        let style = first_span_style(&text);
        assert_eq!(style.fg, Some(Color::Blue));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(text.lines[0].spans[0].content, "IN_PROGRESS");
    }

    #[test]
    fn optional_fields_render_only_when_present() {
        let text = render_status(&full_status());
        let rendered: Vec<String> = text.lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(rendered[1], "Stage: Uploading");
        assert_eq!(rendered[2], "Current: Lot 42");
        assert!(rendered[3].ends_with(" 55%"));
        assert_eq!(rendered[4], "halfway there");

        let bare = TaskStatus {
            state: TaskState::Completed,
            ..TaskStatus::default()
        };
        assert_eq!(render_status(&bare).lines.len(), 1);
    }

    #[test]
    fn error_context_renders_in_the_error_color() {
        let status = TaskStatus {
            state: TaskState::Error,
            error_context: Some("traceback: boom".to_string()),
            ..TaskStatus::default()
        };
        let text = render_status(&status);
        let last = text.lines.last().unwrap();
        assert_eq!(last.spans[0].style.fg, Some(Color::Red));
        assert_eq!(last.to_string(), "traceback: boom");
    }

    #[test]
    fn progress_bar_is_proportional_and_clamped() {
        assert!(progress_bar(0).starts_with("[░"));
        assert!(progress_bar(0).ends_with("  0%"));
        assert!(progress_bar(100).contains("█"));
        assert!(!progress_bar(100).contains("░"));
        assert!(progress_bar(100).ends_with("100%"));
        // Out-of-range input clamps instead of overflowing the bar.
        assert_eq!(progress_bar(200), progress_bar(100));

        let half = progress_bar(50);
        assert_eq!(half.matches('█').count(), 15);
        assert_eq!(half.matches('░').count(), 15);
    }

    #[test]
    fn render_error_carries_the_message() {
        let text = render_error("invalid bid");
        assert_eq!(text.lines[0].to_string(), "Error: invalid bid");
        assert_eq!(first_span_style(&text).fg, Some(Color::Red));
    }
}
