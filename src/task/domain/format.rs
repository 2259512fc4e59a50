//! Human-readable rendering of history entries.
//!
//! Rendering is a pure total function: any syntactically valid entry maps
//! to a sentence, with malformed stored values degrading to generic
//! phrasing instead of failing.

use super::{ActionKind, HistoryEntry, TaskPriority, TaskStatus};
use chrono::{Datelike, NaiveDate};

/// Renders a history entry as a Japanese sentence.
#[must_use]
pub fn human_readable_change(entry: &HistoryEntry) -> String {
    match entry.action() {
        ActionKind::Created => creation_sentence(entry.new_value()),
        ActionKind::Deleted => "タスクを削除しました".to_owned(),
        ActionKind::Updated | ActionKind::StatusChanged | ActionKind::PriorityChanged => {
            field_sentence(entry)
        }
    }
}

fn creation_sentence(title: Option<&str>) -> String {
    title.map_or_else(
        || "タスクを作成しました".to_owned(),
        |value| format!("タスク「{value}」を作成しました"),
    )
}

fn field_sentence(entry: &HistoryEntry) -> String {
    let old_value = entry.old_value();
    let new_value = entry.new_value();
    match entry.field_name() {
        "title" => format!(
            "タイトルを「{}」から「{}」に変更しました",
            old_value.unwrap_or(""),
            new_value.unwrap_or("")
        ),
        "description" => "説明を更新しました".to_owned(),
        "status" => format!(
            "ステータスを「{}」から「{}」に変更しました",
            status_label(old_value),
            status_label(new_value)
        ),
        "priority" => format!(
            "優先度を「{}」から「{}」に変更しました",
            priority_label(old_value),
            priority_label(new_value)
        ),
        "due_date" => due_date_sentence(old_value, new_value),
        "completed" => completed_sentence(new_value),
        "category_id" => "カテゴリを変更しました".to_owned(),
        other => format!("{other}を変更しました"),
    }
}

/// Maps a stored status value to its display label.
///
/// Unknown or missing stored values fall back to the raw string so the
/// sentence never fails to render.
fn status_label(value: Option<&str>) -> &str {
    let raw = value.unwrap_or("");
    TaskStatus::try_from(raw).map_or(raw, |status| status.label())
}

fn priority_label(value: Option<&str>) -> &str {
    let raw = value.unwrap_or("");
    TaskPriority::try_from(raw).map_or(raw, |priority| priority.label())
}

fn completed_sentence(new_value: Option<&str>) -> String {
    if new_value == Some("true") {
        "タスクを完了にしました".to_owned()
    } else {
        "タスクを未完了に戻しました".to_owned()
    }
}

/// Renders a due date change, reparsing the stored ISO-8601 values.
///
/// Any present-but-unparseable value degrades the sentence to the generic
/// form rather than raising.
fn due_date_sentence(old_value: Option<&str>, new_value: Option<&str>) -> String {
    const GENERIC: &str = "期限を変更しました";
    match (old_value, new_value) {
        (None, Some(new_raw)) => parse_date(new_raw).map_or_else(
            || GENERIC.to_owned(),
            |date| format!("期限を{}に設定しました", japanese_date(date)),
        ),
        (Some(_), None) => "期限を解除しました".to_owned(),
        (Some(old_raw), Some(new_raw)) => match (parse_date(old_raw), parse_date(new_raw)) {
            (Some(old_date), Some(new_date)) => format!(
                "期限を{}から{}に変更しました",
                japanese_date(old_date),
                japanese_date(new_date)
            ),
            _ => GENERIC.to_owned(),
        },
        (None, None) => GENERIC.to_owned(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn japanese_date(date: NaiveDate) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}
