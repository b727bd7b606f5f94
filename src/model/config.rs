use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from chime.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default = "default_members")]
    pub members: Vec<MemberConfig>,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            user: UserConfig::default(),
            members: default_members(),
            ui: UiConfig::default(),
        }
    }
}

/// The identity comments and activities are attributed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            name: "Jason Duong".into(),
        }
    }
}

/// One mentionable member of the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberConfig {
    pub name: String,
    /// Chip color for mentions of this member, as "#RRGGBB"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the formatting toolbar above the composer on startup
    #[serde(default = "default_true")]
    pub show_toolbar: bool,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Theme overrides keyed by theme slot ("background", "text", "highlight", ...)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Mention chip colors keyed by member name; wins over the member's own color
    #[serde(default)]
    pub mention_colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_toolbar: true,
            show_key_hints: true,
            colors: HashMap::new(),
            mention_colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_members() -> Vec<MemberConfig> {
    let member = |name: &str, color: &str| MemberConfig {
        name: name.into(),
        color: Some(color.into()),
    };
    vec![
        member("Dea Ananda", "#1D4ED8"),
        member("Akmal Nasrulloh", "#7C3AED"),
        member("Aldyyy", "#15803D"),
        member("Rahmadini", "#15803D"),
        member("Jason Duong", "#1D4ED8"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.user.name, "Jason Duong");
        assert_eq!(config.members.len(), 5);
        assert!(config.ui.show_toolbar);
    }

    #[test]
    fn members_override_replaces_the_whole_list() {
        let config: AppConfig = toml::from_str(
            r##"
[user]
name = "Ada"

[[members]]
name = "Ada"

[[members]]
name = "Grace"
color = "#FF4444"

[ui]
show_toolbar = false

[ui.mention_colors]
Ada = "#00FF00"
"##,
        )
        .unwrap();
        assert_eq!(config.user.name, "Ada");
        assert_eq!(config.members.len(), 2);
        assert_eq!(config.members[1].color.as_deref(), Some("#FF4444"));
        assert!(!config.ui.show_toolbar);
        assert!(config.ui.show_key_hints);
        assert_eq!(config.ui.mention_colors["Ada"], "#00FF00");
    }
}
