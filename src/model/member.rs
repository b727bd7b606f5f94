use serde::Serialize;

use super::config::MemberConfig;

/// Maximum number of candidates a mention suggestion shows
pub const MAX_SUGGESTIONS: usize = 5;

/// A mentionable identity. The display name doubles as the stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            color: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.name
    }

    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Avatar initials: first letter of each word, uppercased, at most two.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Ordered, read-only collection of mentionable members.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: Vec<Member>,
}

impl MemberDirectory {
    pub fn new(members: Vec<Member>) -> Self {
        MemberDirectory { members }
    }

    pub fn from_config(members: &[MemberConfig]) -> Self {
        MemberDirectory {
            members: members
                .iter()
                .map(|m| Member {
                    name: m.name.clone(),
                    color: m.color.clone(),
                })
                .collect(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id() == id)
    }

    /// Members whose name contains `query` (case-insensitive), in directory
    /// order, capped at [`MAX_SUGGESTIONS`].
    pub fn filter(&self, query: &str) -> Vec<Member> {
        let needle = query.to_lowercase();
        self.members
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect()
    }
}
