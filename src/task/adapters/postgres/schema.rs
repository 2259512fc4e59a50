//! Diesel schema for task and history persistence.

diesel::table! {
    /// Actor identities referenced by tasks and history entries.
    actors (id) {
        /// Actor identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Email address.
        #[max_length = 255]
        email -> Varchar,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning actor.
        owner_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority level.
        #[max_length = 50]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Optional category reference.
        category_id -> Nullable<Uuid>,
        /// Completion flag.
        completed -> Bool,
        /// List position within the owner's tasks.
        position -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable field-level audit entries, cascading with their task.
    task_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Audited task.
        task_id -> Uuid,
        /// Acting user.
        actor_id -> Uuid,
        /// Monotonic insertion sequence, used only to break ordering ties
        /// between entries sharing a timestamp.
        seq -> Int8,
        /// Changed field name.
        #[max_length = 100]
        field_name -> Varchar,
        /// Serialized value before the change.
        old_value -> Nullable<Text>,
        /// Serialized value after the change.
        new_value -> Nullable<Text>,
        /// Action kind.
        #[max_length = 50]
        action -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> actors (owner_id));
diesel::joinable!(task_history -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(actors, tasks, task_history);
