use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// What changed, one variant per kind of task edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityDetail {
    Checklist { item: String, checked: bool },
    StatusChange { from: String, to: String },
    PriorityChange { from: String, to: String },
    AssigneeAdd { name: String },
    AssigneeRemove { name: String },
    DateChange { field: String, value: String },
    FieldEdit { field: String, value: String },
    SubtaskAdded { name: String },
    Created,
}

impl ActivityDetail {
    /// Second line of an activity entry, if the kind has one
    pub fn summary(&self) -> Option<String> {
        match self {
            ActivityDetail::Checklist { item, checked } => {
                let mark = if *checked { "[x]" } else { "[ ]" };
                Some(format!("{} {}", mark, item))
            }
            ActivityDetail::StatusChange { from, to }
            | ActivityDetail::PriorityChange { from, to } => {
                Some(format!("{} \u{2192} {}", from, to))
            }
            ActivityDetail::AssigneeAdd { name } => Some(format!("+ {}", name)),
            ActivityDetail::AssigneeRemove { name } => Some(format!("\u{2212} {}", name)),
            ActivityDetail::DateChange { field, value }
            | ActivityDetail::FieldEdit { field, value } => Some(format!("{}: {}", field, value)),
            ActivityDetail::SubtaskAdded { name } => Some(format!("+ {}", name)),
            ActivityDetail::Created => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: String,
    pub user: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    pub timestamp: DateTime<Local>,
    pub detail: ActivityDetail,
}

/// Activity feed of a task, newest entry first
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<Activity>,
    next_id: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        ActivityLog::default()
    }

    pub fn entries(&self) -> &[Activity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(
        &mut self,
        user: &str,
        action: &str,
        task_name: Option<&str>,
        detail: ActivityDetail,
        timestamp: DateTime<Local>,
    ) {
        self.next_id += 1;
        tracing::info!(user, action, "activity recorded");
        self.entries.insert(
            0,
            Activity {
                id: format!("act-{}", self.next_id),
                user: user.to_string(),
                action: action.to_string(),
                task_name: task_name.map(str::to_string),
                timestamp,
                detail,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_serializes_with_type_tag() {
        let detail = ActivityDetail::StatusChange {
            from: "To Do".into(),
            to: "Done".into(),
        };
        let json = serde_json::to_string(&detail).unwrap();
        assert_eq!(json, r#"{"type":"status_change","from":"To Do","to":"Done"}"#);
        assert_eq!(
            serde_json::to_string(&ActivityDetail::Created).unwrap(),
            r#"{"type":"created"}"#
        );
    }

    #[test]
    fn detail_round_trips_from_json() {
        let detail: ActivityDetail =
            serde_json::from_str(r#"{"type":"checklist","item":"Wireframes","checked":true}"#)
                .unwrap();
        assert_eq!(detail.summary().as_deref(), Some("[x] Wireframes"));
    }

    #[test]
    fn newest_first() {
        let mut log = ActivityLog::new();
        let now = Local::now();
        log.record("A", "created task", Some("T"), ActivityDetail::Created, now);
        log.record(
            "A",
            "added subtask",
            None,
            ActivityDetail::SubtaskAdded { name: "x".into() },
            now,
        );
        assert_eq!(log.entries()[0].action, "added subtask");
        assert_eq!(log.entries()[1].action, "created task");
        assert_ne!(log.entries()[0].id, log.entries()[1].id);
    }
}
