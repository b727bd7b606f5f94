pub mod activity_view;
pub mod composer_view;
pub mod emoji_popup;
pub mod header;
mod helpers;
pub mod mention_popup;
pub mod prompt_popup;
pub mod status_row;
pub mod subtasks;
pub mod tab_bar;
pub mod thread_view;

#[cfg(test)]
pub mod test_helpers;

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Tab};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let now = Local::now();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (3) | tab bar (2) | content | status row (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    tab_bar::render_tab_bar(frame, app, chunks[1]);

    // Cleared here, set again by the composer when a trigger is visible
    app.mention_anchor = None;

    let content = chunks[2];
    let mut composer_area = None;
    match app.tab {
        Tab::Subtasks => subtasks::render_subtasks(frame, app, content),
        Tab::Activities => activity_view::render_activities(frame, app, content, now),
        Tab::Comments => {
            let wanted = composer_view::composer_height(app, content.width);
            // The thread keeps at least a couple of rows
            let height = wanted.min(content.height.saturating_sub(2)).max(3);
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(height)])
                .split(content);
            thread_view::render_thread(frame, app, split[0], now);
            composer_view::render_composer(frame, app, split[1]);
            composer_area = Some(split[1]);
        }
    }

    status_row::render_status_row(frame, app, chunks[3]);

    // Popups, drawn over everything else
    if let Some(composer) = composer_area {
        emoji_popup::render_emoji_popup(frame, app, composer);
    }
    mention_popup::render_mention_popup(frame, app);
    prompt_popup::render_prompt_popup(frame, app, area);
}
