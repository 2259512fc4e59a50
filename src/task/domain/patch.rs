//! Patch-style updates for task records.

use super::{CategoryId, TaskPriority, TaskStatus, TaskTitle};
use chrono::NaiveDate;

/// Requested update for one nullable field.
///
/// Distinguishes "leave the field alone" from "clear the field", which a
/// plain `Option` cannot express in a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchField<T> {
    /// Keep the current value.
    Keep,
    /// Replace the current value.
    Set(T),
    /// Clear the current value.
    Clear,
}

impl<T> Default for PatchField<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T: Clone> PatchField<T> {
    /// Applies this update to a field slot.
    pub fn apply_to(&self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *slot = Some(value.clone()),
            Self::Clear => *slot = None,
        }
    }

    /// Returns `true` when this update leaves the field alone.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Set of requested field updates for one task save.
///
/// Built by the caller, applied by [`Task::apply`](super::Task::apply).
/// Untouched fields default to keeping their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<TaskTitle>,
    description: PatchField<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_date: PatchField<NaiveDate>,
    category_id: PatchField<CategoryId>,
    completed: Option<bool>,
    position: Option<i32>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a new title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Requests a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = PatchField::Set(description.into());
        self
    }

    /// Requests clearing the description.
    #[must_use]
    pub fn clearing_description(mut self) -> Self {
        self.description = PatchField::Clear;
        self
    }

    /// Requests a new workflow status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requests a new priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Requests a new due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = PatchField::Set(due_date);
        self
    }

    /// Requests clearing the due date.
    #[must_use]
    pub fn clearing_due_date(mut self) -> Self {
        self.due_date = PatchField::Clear;
        self
    }

    /// Requests a new category reference.
    #[must_use]
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = PatchField::Set(category_id);
        self
    }

    /// Requests clearing the category reference.
    #[must_use]
    pub fn clearing_category(mut self) -> Self {
        self.category_id = PatchField::Clear;
        self
    }

    /// Requests a new completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Requests a new list position.
    #[must_use]
    pub const fn with_position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns `true` when the patch requests no field updates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_keep()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_keep()
            && self.category_id.is_keep()
            && self.completed.is_none()
            && self.position.is_none()
    }

    /// Returns the requested title, if any.
    #[must_use]
    pub const fn title(&self) -> Option<&TaskTitle> {
        self.title.as_ref()
    }

    /// Returns the requested description update.
    #[must_use]
    pub const fn description(&self) -> &PatchField<String> {
        &self.description
    }

    /// Returns the requested status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the requested priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the requested due date update.
    #[must_use]
    pub const fn due_date(&self) -> &PatchField<NaiveDate> {
        &self.due_date
    }

    /// Returns the requested category update.
    #[must_use]
    pub const fn category_id(&self) -> &PatchField<CategoryId> {
        &self.category_id
    }

    /// Returns the requested completion flag, if any.
    #[must_use]
    pub const fn completed(&self) -> Option<bool> {
        self.completed
    }

    /// Returns the requested list position, if any.
    #[must_use]
    pub const fn position(&self) -> Option<i32> {
        self.position
    }
}
