use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::composer::Composer;
use crate::io::attachment_io::pick_file;
use crate::io::preview::PreviewLoader;
use crate::model::seed::{demo_task, demo_thread};
use crate::model::{AppConfig, DateField, MemberDirectory, TaskDetail, Thread};
use crate::util::time::parse_date;

use super::input;
use super::render;
use super::theme::Theme;

/// Which panel tab is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Subtasks,
    Comments,
    Activities,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Subtasks, Tab::Comments, Tab::Activities];

    pub fn index(self) -> usize {
        match self {
            Tab::Subtasks => 0,
            Tab::Comments => 1,
            Tab::Activities => 2,
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Keys go to the comment composer
    Compose,
    /// A one-line prompt is open
    Prompt,
}

/// What a prompt's answer is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Link,
    Attach,
    AddSubtask,
    Rename,
    Description,
    Assignee,
    Date(DateField),
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::Link => "Link URL",
            PromptKind::Attach => "Attach file",
            PromptKind::AddSubtask => "New subtask",
            PromptKind::Rename => "Task title",
            PromptKind::Description => "Description",
            PromptKind::Assignee => "Toggle assignee",
            PromptKind::Date(DateField::Start) => "Start date (YYYY-MM-DD)",
            PromptKind::Date(DateField::Due) => "Due date (YYYY-MM-DD)",
        }
    }
}

/// A single-line text prompt
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    /// Cursor position in chars
    pub cursor: usize,
    pub error: Option<String>,
    /// Mode to go back to when the prompt closes
    pub return_mode: Mode,
}

impl Prompt {
    pub fn new(kind: PromptKind, initial: &str, return_mode: Mode) -> Self {
        Prompt {
            kind,
            input: initial.to_string(),
            cursor: initial.chars().count(),
            error: None,
            return_mode,
        }
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
        self.error = None;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.input.remove(at);
        self.error = None;
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let at = self.byte_at(self.cursor);
            self.input.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}

/// Main application state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub directory: Arc<MemberDirectory>,
    pub task: TaskDetail,
    pub thread: Thread,
    pub composer: Composer,
    pub previews: PreviewLoader,
    pub tab: Tab,
    pub mode: Mode,
    pub prompt: Option<Prompt>,
    pub subtask_cursor: usize,
    /// Lines scrolled up from the bottom of the comment thread
    pub thread_scroll: usize,
    /// Lines scrolled down in the activity feed
    pub activity_scroll: usize,
    /// One-shot message in the status row
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// Screen cells of the open mention trigger, from the last frame
    pub mention_anchor: Option<Rect>,
    /// First visible editor row of the composer, from the last frame
    pub composer_scroll: usize,
}

impl App {
    pub fn new(config: AppConfig, now: DateTime<Local>) -> Self {
        let directory = Arc::new(MemberDirectory::from_config(&config.members));
        let theme = Theme::from_config(&config.ui, directory.members());
        let user = config.user.name.clone();
        let mut composer = Composer::new(user.clone(), Arc::clone(&directory));
        composer.set_show_toolbar(config.ui.show_toolbar);

        App {
            theme,
            task: demo_task(&user),
            thread: demo_thread(now),
            composer,
            directory,
            config,
            previews: PreviewLoader::new(),
            tab: Tab::Comments,
            mode: Mode::Navigate,
            prompt: None,
            subtask_cursor: 0,
            thread_scroll: 0,
            activity_scroll: 0,
            status_message: None,
            should_quit: false,
            mention_anchor: None,
            composer_scroll: 0,
        }
    }

    pub fn user(&self) -> &str {
        &self.config.user.name
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn focus_composer(&mut self) {
        self.tab = Tab::Comments;
        self.mode = Mode::Compose;
    }

    /// Leaving the composer counts as losing focus.
    pub fn leave_composer(&mut self) {
        self.composer.blur();
        self.mode = Mode::Navigate;
    }

    pub fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.prompt = Some(Prompt::new(kind, initial, self.mode));
        self.mode = Mode::Prompt;
    }

    pub fn cancel_prompt(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            self.mode = prompt.return_mode;
        }
    }

    /// Apply the prompt's answer. A prompt with invalid input stays open with
    /// an error instead.
    pub fn confirm_prompt(&mut self, now: DateTime<Local>) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let input = prompt.input.trim().to_string();
        self.mode = prompt.return_mode;
        match prompt.kind {
            PromptKind::Link => {
                self.composer.apply_link(&input);
            }
            PromptKind::Attach => {
                if !input.is_empty() {
                    self.attach_file(Path::new(&input));
                }
            }
            PromptKind::AddSubtask => {
                if self.task.add_subtask(&input, now) {
                    self.subtask_cursor = self.task.subtasks.len() - 1;
                }
            }
            PromptKind::Rename => {
                self.task.rename(&input, now);
            }
            PromptKind::Description => {
                self.task.set_description(&input, now);
            }
            PromptKind::Assignee => {
                if input.is_empty() {
                    return;
                }
                match self.directory.filter(&input).first() {
                    Some(member) => {
                        let name = member.name.clone();
                        let assigned = self.task.toggle_assignee(&name, now);
                        let verb = if assigned { "assigned" } else { "unassigned" };
                        self.set_status(format!("{} {}", verb, name));
                    }
                    None => self.set_status(format!("no member matches \"{}\"", input)),
                }
            }
            PromptKind::Date(field) => {
                if input.is_empty() {
                    return;
                }
                match parse_date(&input) {
                    Some(date) => {
                        self.task.set_date(field, date, now);
                    }
                    None => {
                        let mut prompt = prompt;
                        prompt.error = Some("expected YYYY-MM-DD".into());
                        self.prompt = Some(prompt);
                        self.mode = Mode::Prompt;
                    }
                }
            }
        }
    }

    /// Send the composer's content as a new comment.
    pub fn submit_comment(&mut self, now: DateTime<Local>) {
        if self.composer.submit(&mut self.thread, now).is_some() {
            self.thread_scroll = 0;
        }
    }

    /// Add a file from disk to the pending attachments and start its preview.
    pub fn attach_file(&mut self, path: &Path) {
        match pick_file(path) {
            Ok(picked) => {
                let attachment = self
                    .composer
                    .attachments_mut()
                    .add(&picked.name, picked.size, &picked.mime);
                if attachment.wants_preview() {
                    self.previews
                        .request(attachment.id, picked.path, picked.mime);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not attach file");
                self.set_status(e.to_string());
            }
        }
    }

    /// Apply finished previews; ones for removed files are dropped.
    pub fn poll_previews(&mut self) {
        for ready in self.previews.poll() {
            self.composer
                .attachments_mut()
                .apply_preview(ready.id, ready.preview);
        }
    }
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config, Local::now());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    tracing::info!(user = %app.user(), "tui started");
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.poll_previews();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key, Local::now());
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app() -> App {
        App::new(AppConfig::default(), Local::now())
    }

    #[test]
    fn starts_on_comments_with_seed_data() {
        let app = app();
        assert_eq!(app.tab, Tab::Comments);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.thread.len(), 3);
        assert_eq!(app.task.subtasks.len(), 4);
        assert!(app.composer.show_toolbar());
    }

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(Tab::Activities.next(), Tab::Subtasks);
        assert_eq!(Tab::Subtasks.prev(), Tab::Activities);
    }

    #[test]
    fn prompt_editing() {
        let mut p = Prompt::new(PromptKind::Rename, "héllo", Mode::Navigate);
        p.left();
        p.backspace();
        p.insert('L');
        assert_eq!(p.input, "hélLo");
        p.home();
        p.delete();
        assert_eq!(p.input, "élLo");
        p.end();
        p.insert_str("!\n?");
        assert_eq!(p.input, "élLo!?");
    }

    #[test]
    fn link_prompt_returns_to_composer() {
        let mut app = app();
        app.focus_composer();
        app.composer.paste("docs");
        app.open_prompt(PromptKind::Link, "");
        assert_eq!(app.mode, Mode::Prompt);
        app.cancel_prompt();
        assert_eq!(app.mode, Mode::Compose);
        assert_eq!(app.composer.document().to_html(), "<p>docs</p>");
    }

    #[test]
    fn bad_date_keeps_prompt_open() {
        let mut app = app();
        app.open_prompt(PromptKind::Date(DateField::Due), "");
        if let Some(p) = &mut app.prompt {
            p.insert_str("next week");
        }
        app.confirm_prompt(Local::now());
        assert_eq!(app.mode, Mode::Prompt);
        assert_eq!(
            app.prompt.as_ref().and_then(|p| p.error.clone()),
            Some("expected YYYY-MM-DD".into())
        );
        if let Some(p) = &mut app.prompt {
            p.input = "2024-02-01".into();
        }
        app.confirm_prompt(Local::now());
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.task.due_date.map(|d| d.to_string()), Some("2024-02-01".into()));
    }

    #[test]
    fn assignee_prompt_toggles_first_match() {
        let mut app = app();
        app.open_prompt(PromptKind::Assignee, "rahma");
        app.confirm_prompt(Local::now());
        assert!(app.task.assignees.contains(&"Rahmadini".to_string()));
        assert_eq!(app.status_message.as_deref(), Some("assigned Rahmadini"));
    }

    #[test]
    fn attach_missing_file_reports_error() {
        let mut app = app();
        let tmp = TempDir::new().unwrap();
        app.attach_file(&tmp.path().join("nope.png"));
        assert!(app.composer.attachments().is_empty());
        assert!(app.status_message.unwrap().starts_with("no such file"));
    }

    #[test]
    fn attached_text_file_gets_preview() {
        let mut app = app();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "first line\nsecond").unwrap();
        app.attach_file(&path);
        assert_eq!(app.composer.attachments().len(), 1);

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while app.composer.attachments().items()[0].preview.is_none()
            && std::time::Instant::now() < deadline
        {
            app.poll_previews();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(
            app.composer.attachments().items()[0]
                .preview
                .as_ref()
                .map(|p| p.summary()),
            Some("\u{201C}first line\u{201D}".into())
        );
    }

    #[test]
    fn submit_resets_scroll() {
        let mut app = app();
        app.thread_scroll = 4;
        app.composer.paste("hello");
        app.submit_comment(Local::now());
        assert_eq!(app.thread.len(), 4);
        assert_eq!(app.thread_scroll, 0);
    }
}
