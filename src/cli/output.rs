use serde::Serialize;

use crate::model::{Attachment, Comment, Member, MentionToken};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct MemberJson {
    pub id: String,
    pub name: String,
    pub initials: String,
}

#[derive(Serialize)]
pub struct MentionJson {
    pub id: String,
    pub label: String,
}

#[derive(Serialize)]
pub struct CommentJson {
    pub id: String,
    pub author: String,
    pub timestamp: String,
    pub html: String,
    pub markdown: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<MentionJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn member_to_json(member: &Member) -> MemberJson {
    MemberJson {
        id: member.id().to_string(),
        name: member.name.clone(),
        initials: member.initials(),
    }
}

fn mention_to_json(token: &MentionToken) -> MentionJson {
    MentionJson {
        id: token.id.clone(),
        label: token.label.clone(),
    }
}

pub fn comment_to_json(comment: &Comment) -> CommentJson {
    CommentJson {
        id: comment.id.clone(),
        author: comment.author.clone(),
        timestamp: comment.timestamp.to_rfc3339(),
        html: comment.body.to_html(),
        markdown: comment.body.to_markdown(),
        text: comment.body.plain_text(),
        mentions: comment
            .body
            .mentions()
            .into_iter()
            .map(mention_to_json)
            .collect(),
        attachments: comment.attachments.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// `AN  Akmal Nasrulloh`: initials padded to a column, then the name
pub fn format_member_line(member: &Member) -> String {
    format!("{:<4}{}", member.initials(), member.name)
}
