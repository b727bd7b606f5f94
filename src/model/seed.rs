//! Demo content the TUI starts with when there is nothing else to show.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

use super::activity::ActivityDetail;
use super::attachment::{Attachment, AttachmentId};
use super::comment::Thread;
use super::document::{Document, MentionToken};
use super::task::{Priority, Status, TaskDetail};

fn mention(name: &str) -> MentionToken {
    MentionToken {
        id: name.into(),
        label: name.into(),
    }
}

pub fn demo_task(actor: &str) -> TaskDetail {
    let mut task = TaskDetail::new("Design System", actor);
    task.description =
        "Build the KPI dashboard design system: tokens, components and page templates.".into();
    task.status = Status::InProgress;
    task.priority = Priority::High;
    task.assignees = vec![
        "Dea Ananda".into(),
        "Akmal Nasrulloh".into(),
        "Aldyyy".into(),
    ];
    task.start_date = NaiveDate::from_ymd_opt(2024, 1, 7);
    task.seed_subtask(
        "Understanding client design brief",
        true,
        Some("Blocker : The brief from client was not clear so it took time to understand it"),
    );
    task.seed_subtask("Collect moodboards about KPI programs", true, None);
    task.seed_subtask(
        "Meeting & Mind Mapping with Tyler",
        false,
        Some("Note : Some employees have different KPI cases"),
    );
    task.seed_subtask("Wireframing and Creating alternative versions", false, None);

    let created: DateTime<Local> = Local
        .with_ymd_and_hms(2024, 1, 7, 14, 0, 0)
        .single()
        .unwrap_or_else(Local::now);
    task.activities.record(
        "Rahmadini",
        "created task",
        Some("Design System"),
        ActivityDetail::Created,
        created,
    );
    task
}

pub fn demo_thread(now: DateTime<Local>) -> Thread {
    let mut thread = Thread::new();

    let mut first = Document::new();
    first.append_text(
        "Hey team, I've been reviewing the design brief and I think we need to adjust the KPI dashboard layout. ",
    );
    first.append_mention(mention("Rahmadini"));
    first.append_text(" can you take a look at the wireframes? 🤔");
    thread.push("Dea Ananda", now - Duration::hours(2), first, vec![]);

    let mut second = Document::new();
    second.append_text(
        "I agree with the changes. The current layout doesn't align well with the client's requirements. ",
    );
    second.append_mention(mention("Dea Ananda"));
    second.append_text(" we should schedule a review meeting.");
    thread.push("Akmal Nasrulloh", now - Duration::minutes(90), second, vec![]);

    let third = Document::from_plain("Yup that's right. It should be user-friendly and intuitive ✨");
    thread.push(
        "Aldyyy",
        now - Duration::minutes(45),
        third,
        vec![
            Attachment {
                id: AttachmentId(1),
                name: "KPI-Dashboard-Wireframe-v2.pdf".into(),
                size: 2_450_000,
                mime: "application/pdf".into(),
                preview: None,
            },
            Attachment {
                id: AttachmentId(2),
                name: "design-mockup.png".into(),
                size: 845_000,
                mime: "image/png".into(),
                preview: None,
            },
        ],
    );

    thread.mark_read_up_to(1);
    thread
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_thread_has_divider_before_last_comment() {
        let thread = demo_thread(Local::now());
        assert_eq!(thread.len(), 3);
        assert_eq!(thread.first_unread(), Some(2));
        assert_eq!(thread.comments()[0].body.mentions()[0].id, "Rahmadini");
    }

    #[test]
    fn demo_task_starts_with_created_activity() {
        let task = demo_task("Jason Duong");
        assert_eq!(task.progress(), (2, 4, 50));
        assert_eq!(task.activities.entries()[0].detail, ActivityDetail::Created);
    }
}
