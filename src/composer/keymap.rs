use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::suggestion::Direction;

/// A formatting or insertion action bound to a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleStrike,
    ToggleCodeBlock,
    ToggleCode,
    InsertLink,
    ToggleBlockquote,
    ToggleBulletList,
    ToggleOrderedList,
    OpenMention,
}

impl Command {
    pub fn label(self) -> &'static str {
        match self {
            Command::ToggleStrike => "strikethrough",
            Command::ToggleCodeBlock => "code block",
            Command::ToggleCode => "inline code",
            Command::InsertLink => "link",
            Command::ToggleBlockquote => "quote",
            Command::ToggleBulletList => "bullet list",
            Command::ToggleOrderedList => "ordered list",
            Command::OpenMention => "mention",
        }
    }
}

/// Suggestion-session keys taken over while the popup is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKey {
    Move(Direction),
    Commit,
    Dismiss,
}

/// Where one key event goes. Everything but `PassThrough` is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Suggestion(SuggestionKey),
    Submit,
    Command(Command),
    PassThrough,
}

impl Route {
    pub fn is_consumed(self) -> bool {
        self != Route::PassThrough
    }
}

/// How a chord treats the Alt modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltRule {
    Ignored,
    Required,
    Forbidden,
}

/// One entry of the primary+Shift chord table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    /// Unshifted key on the physical keyboard: a lowercase letter or a digit
    pub key: char,
    pub alt: AltRule,
    pub command: Command,
}

const fn chord(key: char, alt: AltRule, command: Command) -> Chord {
    Chord { key, alt, command }
}

/// Ctrl/Cmd+Shift chords in match order. Code block must precede inline
/// code: both sit on `C` and only Alt tells them apart.
pub const FORMAT_CHORDS: &[Chord] = &[
    chord('x', AltRule::Ignored, Command::ToggleStrike),
    chord('c', AltRule::Required, Command::ToggleCodeBlock),
    chord('c', AltRule::Forbidden, Command::ToggleCode),
    chord('u', AltRule::Ignored, Command::InsertLink),
    chord('9', AltRule::Ignored, Command::ToggleBlockquote),
    chord('8', AltRule::Ignored, Command::ToggleBulletList),
    chord('7', AltRule::Ignored, Command::ToggleOrderedList),
    chord('2', AltRule::Ignored, Command::OpenMention),
];

/// Classifies composer key events: suggestion navigation first, then
/// submission, then the chord table.
#[derive(Debug, Clone, Copy)]
pub struct KeyRouter {
    chords: &'static [Chord],
}

impl Default for KeyRouter {
    fn default() -> Self {
        KeyRouter {
            chords: FORMAT_CHORDS,
        }
    }
}

impl KeyRouter {
    pub fn new(chords: &'static [Chord]) -> Self {
        KeyRouter { chords }
    }

    pub fn route(&self, key: KeyEvent, session_open: bool) -> Route {
        let mods = key.modifiers;

        if session_open {
            return match key.code {
                KeyCode::Up => Route::Suggestion(SuggestionKey::Move(Direction::Previous)),
                KeyCode::Down => Route::Suggestion(SuggestionKey::Move(Direction::Next)),
                KeyCode::Enter => Route::Suggestion(SuggestionKey::Commit),
                KeyCode::Esc => Route::Suggestion(SuggestionKey::Dismiss),
                _ => Route::PassThrough,
            };
        }

        if key.code == KeyCode::Enter {
            // Shift+Enter and other modified Enters belong to the editor
            return if mods.is_empty() {
                Route::Submit
            } else {
                Route::PassThrough
            };
        }

        let Some(physical) = physical_key(key) else {
            return Route::PassThrough;
        };
        let primary = mods.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
        if !primary || !physical.shift {
            return Route::PassThrough;
        }
        let alt = mods.contains(KeyModifiers::ALT);
        self.chords
            .iter()
            .find(|c| {
                c.key == physical.key
                    && match c.alt {
                        AltRule::Ignored => true,
                        AltRule::Required => alt,
                        AltRule::Forbidden => !alt,
                    }
            })
            .map_or(Route::PassThrough, |c| Route::Command(c.command))
    }
}

/// The key as it sits on the keyboard plus whether Shift was involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Physical {
    key: char,
    shift: bool,
}

/// Reverse of terminal shift handling: legacy terminals report Ctrl+Shift+9
/// as `(` without SHIFT, kitty reports `9` or `(` with SHIFT, and letters may
/// come uppercase with or without the flag.
fn physical_key(key: KeyEvent) -> Option<Physical> {
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let flagged = key.modifiers.contains(KeyModifiers::SHIFT);
    if c.is_ascii_uppercase() {
        return Some(Physical {
            key: c.to_ascii_lowercase(),
            shift: true,
        });
    }
    if let Some(base) = unshift_symbol(c) {
        return Some(Physical {
            key: base,
            shift: true,
        });
    }
    Some(Physical { key: c, shift: flagged })
}

fn unshift_symbol(c: char) -> Option<char> {
    match c {
        '~' => Some('`'),
        '!' => Some('1'),
        '@' => Some('2'),
        '#' => Some('3'),
        '$' => Some('4'),
        '%' => Some('5'),
        '^' => Some('6'),
        '&' => Some('7'),
        '*' => Some('8'),
        '(' => Some('9'),
        ')' => Some('0'),
        '_' => Some('-'),
        '+' => Some('='),
        '{' => Some('['),
        '}' => Some(']'),
        '|' => Some('\\'),
        ':' => Some(';'),
        '"' => Some('\''),
        '<' => Some(','),
        '>' => Some('.'),
        '?' => Some('/'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    fn ch(c: char, mods: KeyModifiers) -> KeyEvent {
        key(KeyCode::Char(c), mods)
    }

    const CS: KeyModifiers = KeyModifiers::CONTROL.union(KeyModifiers::SHIFT);
    const CSA: KeyModifiers = CS.union(KeyModifiers::ALT);

    fn route(k: KeyEvent) -> Route {
        KeyRouter::default().route(k, false)
    }

    #[test]
    fn session_keys_are_consumed() {
        let r = KeyRouter::default();
        assert_eq!(
            r.route(key(KeyCode::Up, KeyModifiers::NONE), true),
            Route::Suggestion(SuggestionKey::Move(Direction::Previous))
        );
        assert_eq!(
            r.route(key(KeyCode::Down, KeyModifiers::NONE), true),
            Route::Suggestion(SuggestionKey::Move(Direction::Next))
        );
        assert_eq!(
            r.route(key(KeyCode::Enter, KeyModifiers::NONE), true),
            Route::Suggestion(SuggestionKey::Commit)
        );
        assert_eq!(
            r.route(key(KeyCode::Esc, KeyModifiers::NONE), true),
            Route::Suggestion(SuggestionKey::Dismiss)
        );
    }

    #[test]
    fn other_keys_pass_through_while_session_open() {
        let r = KeyRouter::default();
        for k in [
            ch('a', KeyModifiers::NONE),
            ch('x', CS),
            ch('c', CSA),
            key(KeyCode::Backspace, KeyModifiers::NONE),
            key(KeyCode::Left, KeyModifiers::NONE),
            key(KeyCode::Tab, KeyModifiers::NONE),
            ch(' ', KeyModifiers::NONE),
        ] {
            assert_eq!(r.route(k, true), Route::PassThrough, "{:?}", k);
            assert!(!r.route(k, true).is_consumed());
        }
    }

    #[test]
    fn plain_enter_submits() {
        assert_eq!(route(key(KeyCode::Enter, KeyModifiers::NONE)), Route::Submit);
    }

    #[test]
    fn shift_enter_is_not_consumed() {
        let r = route(key(KeyCode::Enter, KeyModifiers::SHIFT));
        assert_eq!(r, Route::PassThrough);
        assert!(!r.is_consumed());
    }

    #[test]
    fn code_block_wins_over_inline_code_with_alt() {
        assert_eq!(
            route(ch('c', CSA)),
            Route::Command(Command::ToggleCodeBlock)
        );
        assert_eq!(
            route(ch('C', CSA)),
            Route::Command(Command::ToggleCodeBlock)
        );
        assert_eq!(
            route(ch('C', KeyModifiers::SUPER | KeyModifiers::SHIFT | KeyModifiers::ALT)),
            Route::Command(Command::ToggleCodeBlock)
        );
    }

    #[test]
    fn code_block_is_order_sensitive_in_the_table() {
        let block = FORMAT_CHORDS
            .iter()
            .position(|c| c.command == Command::ToggleCodeBlock);
        let inline = FORMAT_CHORDS
            .iter()
            .position(|c| c.command == Command::ToggleCode);
        assert!(block < inline);
    }

    #[test]
    fn inline_code_without_alt() {
        assert_eq!(route(ch('c', CS)), Route::Command(Command::ToggleCode));
        assert_eq!(
            route(ch('C', KeyModifiers::CONTROL)),
            Route::Command(Command::ToggleCode)
        );
    }

    #[test]
    fn format_chords() {
        let cases = [
            (ch('x', CS), Command::ToggleStrike),
            (ch('X', CS), Command::ToggleStrike),
            (ch('u', CS), Command::InsertLink),
            (ch('9', CS), Command::ToggleBlockquote),
            (ch('(', KeyModifiers::CONTROL), Command::ToggleBlockquote),
            (ch('8', CS), Command::ToggleBulletList),
            (ch('*', CS), Command::ToggleBulletList),
            (ch('7', CS), Command::ToggleOrderedList),
            (ch('&', KeyModifiers::CONTROL), Command::ToggleOrderedList),
            (ch('@', KeyModifiers::CONTROL), Command::OpenMention),
            (ch('2', CS), Command::OpenMention),
            (ch('x', CSA), Command::ToggleStrike),
        ];
        for (k, cmd) in cases {
            assert_eq!(route(k), Route::Command(cmd), "{:?}", k);
        }
    }

    #[test]
    fn chords_need_primary_and_shift() {
        assert_eq!(route(ch('x', KeyModifiers::CONTROL)), Route::PassThrough);
        assert_eq!(route(ch('X', KeyModifiers::SHIFT)), Route::PassThrough);
        assert_eq!(route(ch('9', KeyModifiers::CONTROL)), Route::PassThrough);
        assert_eq!(route(ch('b', KeyModifiers::CONTROL)), Route::PassThrough);
        assert_eq!(route(ch('a', KeyModifiers::NONE)), Route::PassThrough);
    }

    #[test]
    fn unmapped_chords_pass_through() {
        assert_eq!(route(ch('z', CS)), Route::PassThrough);
        assert_eq!(route(key(KeyCode::F(2), CS)), Route::PassThrough);
    }

    #[test]
    fn custom_table_is_honored() {
        const ONLY_QUOTE: &[Chord] = &[chord('q', AltRule::Ignored, Command::ToggleBlockquote)];
        let r = KeyRouter::new(ONLY_QUOTE);
        assert_eq!(
            r.route(ch('q', CS), false),
            Route::Command(Command::ToggleBlockquote)
        );
        assert_eq!(r.route(ch('x', CS), false), Route::PassThrough);
    }
}
