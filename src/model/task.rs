use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

use super::activity::{ActivityDetail, ActivityLog};
use crate::util::time::short_date;
use crate::util::unicode::ellipsize_chars;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    pub fn next(self) -> Status {
        match self {
            Status::Todo => Status::InProgress,
            Status::InProgress => Status::Done,
            Status::Done => Status::Todo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(rename = "no-priority")]
    None,
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::None => "None",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    pub fn next(self) -> Priority {
        match self {
            Priority::None => Priority::Low,
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Urgent,
            Priority::Urgent => Priority::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtask {
    pub id: String,
    pub name: String,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Which date field of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    Due,
}

impl DateField {
    pub fn label(self) -> &'static str {
        match self {
            DateField::Start => "Start date",
            DateField::Due => "Due date",
        }
    }
}

/// A task as shown in the detail panel. Every mutation goes through a method
/// that records an activity for `actor`.
#[derive(Debug, Clone)]
pub struct TaskDetail {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assignees: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub subtasks: Vec<Subtask>,
    pub activities: ActivityLog,
    actor: String,
    next_subtask: u64,
}

impl TaskDetail {
    pub fn new(title: &str, actor: &str) -> Self {
        TaskDetail {
            title: title.to_string(),
            description: String::new(),
            status: Status::Todo,
            priority: Priority::None,
            assignees: Vec::new(),
            start_date: None,
            due_date: None,
            subtasks: Vec::new(),
            activities: ActivityLog::new(),
            actor: actor.to_string(),
            next_subtask: 0,
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    fn log(&mut self, action: &str, detail: ActivityDetail, now: DateTime<Local>) {
        let actor = self.actor.clone();
        self.activities.record(&actor, action, None, detail, now);
    }

    /// `(done, total, percent)` of the subtask checklist
    pub fn progress(&self) -> (usize, usize, u32) {
        let total = self.subtasks.len();
        let done = self.subtasks.iter().filter(|s| s.done).count();
        let percent = if total == 0 {
            0
        } else {
            (done as f64 / total as f64 * 100.0).round() as u32
        };
        (done, total, percent)
    }

    /// Add a subtask without logging (used to seed a task).
    pub fn seed_subtask(&mut self, name: &str, done: bool, note: Option<&str>) {
        self.next_subtask += 1;
        self.subtasks.push(Subtask {
            id: self.next_subtask.to_string(),
            name: name.to_string(),
            done,
            note: note.map(str::to_string),
        });
    }

    pub fn toggle_subtask(&mut self, index: usize, now: DateTime<Local>) -> bool {
        let Some(subtask) = self.subtasks.get_mut(index) else {
            return false;
        };
        subtask.done = !subtask.done;
        let (action, item, checked) = if subtask.done {
            ("checked subtask", subtask.name.clone(), true)
        } else {
            ("unchecked subtask", subtask.name.clone(), false)
        };
        self.log(action, ActivityDetail::Checklist { item, checked }, now);
        true
    }

    pub fn add_subtask(&mut self, name: &str, now: DateTime<Local>) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.seed_subtask(name, false, None);
        self.log(
            "added subtask",
            ActivityDetail::SubtaskAdded {
                name: name.to_string(),
            },
            now,
        );
        true
    }

    pub fn set_status(&mut self, status: Status, now: DateTime<Local>) -> bool {
        if status == self.status {
            return false;
        }
        let from = self.status.label().to_string();
        self.status = status;
        self.log(
            "changed status",
            ActivityDetail::StatusChange {
                from,
                to: status.label().to_string(),
            },
            now,
        );
        true
    }

    pub fn set_priority(&mut self, priority: Priority, now: DateTime<Local>) -> bool {
        if priority == self.priority {
            return false;
        }
        let from = self.priority.label().to_string();
        self.priority = priority;
        self.log(
            "changed priority",
            ActivityDetail::PriorityChange {
                from,
                to: priority.label().to_string(),
            },
            now,
        );
        true
    }

    /// Assign `name` if unassigned, unassign otherwise. Returns whether the
    /// member is assigned afterwards.
    pub fn toggle_assignee(&mut self, name: &str, now: DateTime<Local>) -> bool {
        if let Some(pos) = self.assignees.iter().position(|n| n == name) {
            self.assignees.remove(pos);
            self.log(
                "unassigned",
                ActivityDetail::AssigneeRemove {
                    name: name.to_string(),
                },
                now,
            );
            false
        } else {
            self.assignees.push(name.to_string());
            self.log(
                "assigned",
                ActivityDetail::AssigneeAdd {
                    name: name.to_string(),
                },
                now,
            );
            true
        }
    }

    pub fn rename(&mut self, title: &str, now: DateTime<Local>) -> bool {
        let title = title.trim();
        if title.is_empty() || title == self.title {
            return false;
        }
        self.title = title.to_string();
        self.log(
            "renamed task",
            ActivityDetail::FieldEdit {
                field: "Title".into(),
                value: title.to_string(),
            },
            now,
        );
        true
    }

    pub fn set_description(&mut self, text: &str, now: DateTime<Local>) -> bool {
        if text == self.description {
            return false;
        }
        self.description = text.to_string();
        self.log(
            "updated description",
            ActivityDetail::FieldEdit {
                field: "Description".into(),
                value: ellipsize_chars(text, 60),
            },
            now,
        );
        true
    }

    pub fn set_date(&mut self, field: DateField, date: NaiveDate, now: DateTime<Local>) -> bool {
        let slot = match field {
            DateField::Start => &mut self.start_date,
            DateField::Due => &mut self.due_date,
        };
        if *slot == Some(date) {
            return false;
        }
        *slot = Some(date);
        let action = match field {
            DateField::Start => "changed start date",
            DateField::Due => "changed due date",
        };
        self.log(
            action,
            ActivityDetail::DateChange {
                field: field.label().to_string(),
                value: short_date(date),
            },
            now,
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task() -> TaskDetail {
        let mut task = TaskDetail::new("Design System", "Jason Duong");
        task.seed_subtask("Collect moodboards", true, None);
        task.seed_subtask("Wireframing", false, Some("Note: two variants"));
        task
    }

    #[test]
    fn toggling_a_subtask_logs_checklist_activity() {
        let mut task = task();
        assert!(task.toggle_subtask(1, Local::now()));
        assert!(task.subtasks[1].done);
        let entry = &task.activities.entries()[0];
        assert_eq!(entry.action, "checked subtask");
        assert_eq!(entry.user, "Jason Duong");
        assert_eq!(
            entry.detail,
            ActivityDetail::Checklist {
                item: "Wireframing".into(),
                checked: true
            }
        );
        assert!(!task.toggle_subtask(9, Local::now()));
    }

    #[test]
    fn progress_rounds_percent() {
        let mut task = task();
        task.seed_subtask("Third", false, None);
        assert_eq!(task.progress(), (1, 3, 33));
        assert_eq!(TaskDetail::new("t", "u").progress(), (0, 0, 0));
    }

    #[test]
    fn no_op_edits_log_nothing() {
        let mut task = task();
        let now = Local::now();
        assert!(!task.set_status(Status::Todo, now));
        assert!(!task.set_priority(Priority::None, now));
        assert!(!task.add_subtask("   ", now));
        assert!(!task.rename(" Design System ", now));
        assert!(task.activities.is_empty());
    }

    #[test]
    fn status_change_records_labels() {
        let mut task = task();
        task.set_status(Status::InProgress, Local::now());
        assert_eq!(
            task.activities.entries()[0].detail,
            ActivityDetail::StatusChange {
                from: "To Do".into(),
                to: "In Progress".into()
            }
        );
    }

    #[test]
    fn assignee_toggle_adds_then_removes() {
        let mut task = task();
        let now = Local::now();
        assert!(task.toggle_assignee("Aldyyy", now));
        assert!(!task.toggle_assignee("Aldyyy", now));
        assert!(task.assignees.is_empty());
        assert_eq!(task.activities.entries()[0].action, "unassigned");
        assert_eq!(task.activities.entries()[1].action, "assigned");
    }

    #[test]
    fn long_descriptions_are_truncated_in_the_log() {
        let mut task = task();
        let text = "x".repeat(80);
        task.set_description(&text, Local::now());
        assert_eq!(task.description.len(), 80);
        match &task.activities.entries()[0].detail {
            ActivityDetail::FieldEdit { field, value } => {
                assert_eq!(field, "Description");
                assert_eq!(value.len(), 63);
                assert!(value.ends_with("..."));
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn date_change_uses_short_format() {
        let mut task = task();
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        assert!(task.set_date(DateField::Due, date, Local::now()));
        assert!(!task.set_date(DateField::Due, date, Local::now()));
        assert_eq!(
            task.activities.entries()[0].detail,
            ActivityDetail::DateChange {
                field: "Due date".into(),
                value: "Feb 3, 2025".into()
            }
        );
    }

    #[test]
    fn status_and_priority_cycle() {
        assert_eq!(Status::Done.next(), Status::Todo);
        assert_eq!(Priority::Urgent.next(), Priority::None);
        assert_eq!(serde_json::to_string(&Priority::None).unwrap(), "\"no-priority\"");
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"in-progress\"");
    }
}
