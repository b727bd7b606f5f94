use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Tab};

/// Render the tab bar with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));
    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    for tab in Tab::ALL {
        spans.push(Span::styled(format!(" {} ", tab_label(app, tab)), tab_style(app, tab == app.tab)));
        spans.push(sep.clone());
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let rule = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            rule,
            Style::default().fg(app.theme.dim).bg(bg),
        ))),
        chunks[1],
    );
}

fn tab_label(app: &App, tab: Tab) -> String {
    match tab {
        Tab::Subtasks => {
            let (done, total, _) = app.task.progress();
            format!("Subtasks {}/{}", done, total)
        }
        Tab::Comments => format!("Comments ({})", app.thread.len()),
        Tab::Activities => "Activities".to_string(),
    }
}

fn tab_style(app: &App, active: bool) -> Style {
    if active {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn tabs_show_counts() {
        let app = demo_app();
        let output = render_to_string(60, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "  Subtasks 2/4 \u{2502} Comments (3) \u{2502} Activities \u{2502}"
        );
        assert_eq!(lines[1], "\u{2500}".repeat(60));
    }
}
