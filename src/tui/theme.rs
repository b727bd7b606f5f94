use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Member, Priority, Status, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub border: Color,
    pub mention: Color,
    pub link: Color,
    /// Per-member mention chip colors
    pub mention_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let rgb = |hex: u32| Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8);
        Theme {
            background: rgb(0x11_13_18),
            text: rgb(0xC9_D1_D9),
            text_bright: rgb(0xF0_F6_FC),
            highlight: rgb(0x7C_3A_ED),
            dim: rgb(0x6E_76_81),
            red: rgb(0xF8_51_49),
            yellow: rgb(0xD2_99_22),
            green: rgb(0x3F_B9_50),
            cyan: rgb(0x39_C5_CF),
            purple: rgb(0xA3_71_F7),
            blue: rgb(0x58_A6_FF),
            selection_bg: rgb(0x26_3A_5C),
            border: rgb(0x30_36_3D),
            mention: rgb(0x1D_4E_D8),
            link: rgb(0x58_A6_FF),
            mention_colors: HashMap::new(),
        }
    }
}

/// `#RRGGBB` to an RGB color. Anything else is rejected.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

impl Theme {
    /// Build a theme from the `[ui]` config and the member directory.
    /// `[ui.mention_colors]` wins over a member's own color.
    pub fn from_config(ui: &UiConfig, members: &[Member]) -> Self {
        let mut theme = Theme::default();

        for (slot, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            if let Some(target) = theme.slot_mut(slot) {
                *target = color;
            }
        }

        for member in members {
            if let Some(color) = member.color.as_deref().and_then(parse_hex_color) {
                theme.mention_colors.insert(member.name.clone(), color);
            }
        }
        for (name, value) in &ui.mention_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.mention_colors.insert(name.clone(), color);
            }
        }

        theme
    }

    /// The color a `[ui.colors]` key names, if any.
    fn slot_mut(&mut self, slot: &str) -> Option<&mut Color> {
        Some(match slot {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "red" => &mut self.red,
            "yellow" => &mut self.yellow,
            "green" => &mut self.green,
            "cyan" => &mut self.cyan,
            "purple" => &mut self.purple,
            "blue" => &mut self.blue,
            "selection_bg" => &mut self.selection_bg,
            "border" => &mut self.border,
            "mention" => &mut self.mention,
            "link" => &mut self.link,
            _ => return None,
        })
    }

    /// Chip color for a mentioned member, falling back to the mention color
    pub fn mention_color(&self, name: &str) -> Color {
        self.mention_colors.get(name).copied().unwrap_or(self.mention)
    }

    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Todo => self.text,
            Status::InProgress => self.highlight,
            Status::Done => self.green,
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::None => self.dim,
            Priority::Low => self.blue,
            Priority::Medium => self.yellow,
            Priority::High => self.highlight,
            Priority::Urgent => self.red,
        }
    }
}
