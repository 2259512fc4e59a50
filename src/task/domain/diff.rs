//! Tracked-field table and diff extraction between task snapshots.
//!
//! The set of audited fields, their storage names, their action kinds, and
//! their serializations live in one declarative table so the audit policy
//! is data, not scattered conditionals. Diff order follows the table's
//! declared order, never hash or insertion order.

use super::{ActionKind, Task};

/// A task field whose changes are subject to audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    /// The task title.
    Title,
    /// The task description.
    Description,
    /// The workflow status.
    Status,
    /// The priority.
    Priority,
    /// The due date.
    DueDate,
    /// The completion flag.
    Completed,
    /// The category reference.
    Category,
}

impl TrackedField {
    /// Returns the field name stored on history entries.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
            Self::Completed => "completed",
            Self::Category => "category_id",
        }
    }

    /// Returns the action kind recorded for a change to this field.
    #[must_use]
    pub const fn action_kind(self) -> ActionKind {
        match self {
            Self::Status => ActionKind::StatusChanged,
            Self::Priority => ActionKind::PriorityChanged,
            _ => ActionKind::Updated,
        }
    }
}

/// One row of the tracked-field table: a field and its stable serializer.
pub struct TrackedFieldSpec {
    /// The audited field.
    pub field: TrackedField,
    serialize: fn(&Task) -> Option<String>,
}

impl TrackedFieldSpec {
    /// Serializes this field's current value on the given task.
    ///
    /// Serializations are stable across saves: dates as ISO-8601, enums as
    /// their storage names, booleans as `"true"`/`"false"`, references as
    /// hyphenated lowercase UUIDs. `None` means the field is unset.
    #[must_use]
    pub fn serialized(&self, task: &Task) -> Option<String> {
        (self.serialize)(task)
    }
}

/// Audited fields in declared order.
///
/// Fields absent from this table (position, owner, timestamps) never
/// produce history entries.
pub const TRACKED_FIELDS: &[TrackedFieldSpec] = &[
    TrackedFieldSpec {
        field: TrackedField::Title,
        serialize: serialize_title,
    },
    TrackedFieldSpec {
        field: TrackedField::Description,
        serialize: serialize_description,
    },
    TrackedFieldSpec {
        field: TrackedField::Status,
        serialize: serialize_status,
    },
    TrackedFieldSpec {
        field: TrackedField::Priority,
        serialize: serialize_priority,
    },
    TrackedFieldSpec {
        field: TrackedField::DueDate,
        serialize: serialize_due_date,
    },
    TrackedFieldSpec {
        field: TrackedField::Completed,
        serialize: serialize_completed,
    },
    TrackedFieldSpec {
        field: TrackedField::Category,
        serialize: serialize_category,
    },
];

fn serialize_title(task: &Task) -> Option<String> {
    Some(task.title().as_str().to_owned())
}

fn serialize_description(task: &Task) -> Option<String> {
    task.description().map(str::to_owned)
}

fn serialize_status(task: &Task) -> Option<String> {
    Some(task.status().as_str().to_owned())
}

fn serialize_priority(task: &Task) -> Option<String> {
    Some(task.priority().as_str().to_owned())
}

fn serialize_due_date(task: &Task) -> Option<String> {
    task.due_date().map(|date| date.format("%Y-%m-%d").to_string())
}

fn serialize_completed(task: &Task) -> Option<String> {
    let flag = if task.completed() { "true" } else { "false" };
    Some(flag.to_owned())
}

fn serialize_category(task: &Task) -> Option<String> {
    task.category_id().map(|id| id.into_inner().to_string())
}

/// A single tracked field's change between two task snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// The changed field.
    pub field: TrackedField,
    /// Serialized value before the change, if the field was set.
    pub old_value: Option<String>,
    /// Serialized value after the change, if the field is set.
    pub new_value: Option<String>,
}

/// Extracts the tracked-field changes between two snapshots of one task.
///
/// Walks [`TRACKED_FIELDS`] in declared order and emits one [`FieldChange`]
/// per field whose serialized values differ. Fields outside the table are
/// never emitted, and unchanged fields are skipped.
#[must_use]
pub fn extract_changes(before: &Task, after: &Task) -> Vec<FieldChange> {
    TRACKED_FIELDS
        .iter()
        .filter_map(|spec| {
            let old_value = spec.serialized(before);
            let new_value = spec.serialized(after);
            (old_value != new_value).then_some(FieldChange {
                field: spec.field,
                old_value,
                new_value,
            })
        })
        .collect()
}
