mod init;
pub use init::cmd_init;

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::composer::Composer;
use crate::io::attachment_io::pick_file;
use crate::io::config_io;
use crate::io::preview::load_preview;
use crate::model::{AppConfig, MemberDirectory, Thread};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(
    cmd: Commands,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Init(args) => cmd_init(args, config_path),
        Commands::Members(args) => cmd_members(args, &load_config(config_path)?),
        Commands::Render(args) => cmd_render(args, load_config(config_path)?),
    }
}

/// The `--config` file, else `./chime.toml`, else built-in defaults.
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let dir = std::env::current_dir()?;
    let (config, _) = config_io::load_config(config_path, &dir)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_members(args: MembersArgs, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let directory = MemberDirectory::from_config(&config.members);
    let members = match &args.query {
        Some(query) => directory.filter(query),
        None => directory.members().to_vec(),
    };

    if args.json {
        let out: Vec<MemberJson> = members.iter().map(member_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if members.is_empty() {
        println!("no members match");
    } else {
        for member in &members {
            println!("{}", format_member_line(member));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

fn cmd_render(args: RenderArgs, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let directory = Arc::new(MemberDirectory::from_config(&config.members));
    let mut composer = Composer::new(config.user.name.clone(), directory);
    type_into(&mut composer, &args.text);

    for path in &args.attach {
        let picked = pick_file(path)?;
        let id = composer
            .attachments_mut()
            .add(&picked.name, picked.size, &picked.mime)
            .id;
        if let Some(preview) = load_preview(&picked.path, &picked.mime) {
            composer.attachments_mut().apply_preview(id, preview);
        }
    }

    let mut thread = Thread::new();
    let Some(comment) = composer.submit(&mut thread, Local::now()) else {
        return Err("nothing to send: the comment is empty".into());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comment_to_json(comment))?);
    } else if args.markdown {
        println!("{}", comment.body.to_markdown());
    } else {
        println!("{}", comment.body.to_html());
    }
    Ok(())
}

fn press(composer: &mut Composer, code: KeyCode, modifiers: KeyModifiers) {
    composer.handle_key(KeyEvent::new(code, modifiers));
}

/// Type `text` key by key. `@name` followed by a space, punctuation or the
/// end of the text is completed to a mention of the member with that full
/// name; newlines start a new block.
pub fn type_into(composer: &mut Composer, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if composer.suggestions().is_open()
            && is_boundary(c)
            && let Some(consumed) = complete_mention(composer, &chars[i..])
        {
            i += consumed;
            continue;
        }
        match c {
            '\n' => press(composer, KeyCode::Enter, KeyModifiers::SHIFT),
            '\r' => {}
            _ => press(composer, KeyCode::Char(c), KeyModifiers::NONE),
        }
        i += 1;
    }
    if composer.suggestions().is_open() {
        complete_mention(composer, &[]);
    }
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || (c.is_ascii_punctuation() && c != '@' && c != '-' && c != '_')
}

/// Commit the candidate whose full name the query plus `rest` spell out,
/// preferring the longest name. Returns how many chars of `rest` it used,
/// including one space that the mention's own trailing space replaces.
fn complete_mention(composer: &mut Composer, rest: &[char]) -> Option<usize> {
    let session = composer.suggestions().session()?;
    let query = session.query.to_lowercase();

    let mut best: Option<(usize, Vec<char>)> = None;
    for (index, member) in session.candidates.iter().enumerate() {
        let name = member.name.to_lowercase();
        let Some(remainder) = name.strip_prefix(&query) else {
            continue;
        };
        let remainder: Vec<char> = remainder.chars().collect();
        if remainder.len() > rest.len() {
            continue;
        }
        let spelled = rest[..remainder.len()]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .eq(remainder.iter().copied());
        let ends = rest.get(remainder.len()).is_none_or(|c| is_boundary(*c));
        if spelled && ends && best.as_ref().is_none_or(|(_, b)| remainder.len() > b.len()) {
            best = Some((index, remainder));
        }
    }
    let (index, remainder) = best?;
    let target = session.candidates[index].name.clone();

    // The query cannot hold whitespace, so only the first word is typed;
    // the commit replaces the whole trigger with the member's name.
    for c in rest.iter().take_while(|c| !c.is_whitespace()).take(remainder.len()) {
        press(composer, KeyCode::Char(*c), KeyModifiers::NONE);
    }
    let session = composer.suggestions().session()?;
    let index = session.candidates.iter().position(|m| m.name == target)?;
    let count = session.candidates.len();
    for _ in 0..(index + count - session.selected) % count {
        press(composer, KeyCode::Down, KeyModifiers::NONE);
    }
    press(composer, KeyCode::Enter, KeyModifiers::NONE);

    let mut used = remainder.len();
    if rest.get(used) == Some(&' ') {
        used += 1;
    }
    Some(used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn composer() -> Composer {
        let config = AppConfig::default();
        Composer::new(
            config.user.name.clone(),
            Arc::new(MemberDirectory::from_config(&config.members)),
        )
    }

    fn html(text: &str) -> String {
        let mut c = composer();
        type_into(&mut c, text);
        c.document().to_html()
    }

    fn mention(name: &str) -> String {
        format!(
            r#"<span data-type="mention" data-id="{0}" data-label="{0}">@{0}</span>"#,
            name
        )
    }

    #[test]
    fn single_word_mention_mid_sentence() {
        assert_eq!(
            html("thanks @aldyyy for the review"),
            format!("<p>thanks {} for the review</p>", mention("Aldyyy"))
        );
    }

    #[test]
    fn multi_word_mention_at_the_end() {
        assert_eq!(
            html("cc @dea ananda"),
            format!("<p>cc {} </p>", mention("Dea Ananda"))
        );
    }

    #[test]
    fn unknown_names_stay_text() {
        assert_eq!(html("mail @nobody now"), "<p>mail @nobody now</p>");
    }

    #[test]
    fn newlines_start_blocks() {
        assert_eq!(html("one\ntwo"), "<p>one</p><p>two</p>");
    }
}
