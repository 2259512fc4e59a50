//! Integration tests for [`PostgresTaskStore`] using embedded `PostgreSQL`.
//!
//! These tests exercise the `PostgreSQL` adapters against a real database
//! instance, verifying transactional task-plus-history writes, uniqueness
//! and cascade behaviour, and read-side ordering.
//!
//! Uses `pg-embed-setup-unpriv` for embedded `PostgreSQL` lifecycle management.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]
#![expect(
    clippy::print_stderr,
    reason = "Test cleanup warnings are informational"
)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use tasktrail::task::{
    adapters::postgres::{PostgresActorDirectory, PostgresTaskStore},
    domain::{
        ActionKind, Actor, ActorId, HistoryEntry, HistoryEntryId, NewTaskData,
        PersistedHistoryEntryData, Task, TaskId, TaskPatch, TaskPriority, TaskStatus, TaskTitle,
    },
    ports::{ActorDirectory, HistoryRepository, TaskRepository, TaskRepositoryError},
};
use tokio::runtime::Runtime;

/// SQL to create the base schema for tests.
const CREATE_SCHEMA_SQL: &str =
    include_str!("../migrations/2026-08-07-000000_create_audit_tables/up.sql");

/// Template database name for pre-migrated schema.
const TEMPLATE_DB: &str = "tasktrail_test_template";

/// Creates a tokio runtime for async operations in tests.
fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
fn ensure_template(cluster: &TestCluster) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            // Execute each SQL file statement-by-statement since diesel::sql_query
            // cannot execute multiple statements in a single call
            execute_sql_statements(&mut conn, CREATE_SCHEMA_SQL)?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    Ok(())
}

/// Executes multiple SQL statements from a single string.
///
/// Splits on semicolons and executes each non-empty statement individually.
fn execute_sql_statements(conn: &mut PgConnection, sql: &str) -> eyre::Result<()> {
    for statement in sql.split(';') {
        let trimmed = statement.trim();
        // Skip empty statements and comment-only lines
        if trimmed.is_empty() || trimmed.lines().all(|line| line.trim().starts_with("--")) {
            continue;
        }
        diesel::sql_query(trimmed)
            .execute(conn)
            .map_err(|e| eyre::eyre!("SQL error: {e}\nStatement: {trimmed}"))?;
    }
    Ok(())
}

/// Creates a test database from template and returns the adapters.
fn setup_adapters(
    cluster: &TestCluster,
    db_name: &str,
) -> Result<(PostgresTaskStore, PostgresActorDirectory), Box<dyn std::error::Error + Send + Sync>> {
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let url = cluster.connection().database_url(db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    // Use pool size of 1 for test isolation and deterministic behaviour
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    Ok((
        PostgresTaskStore::new(pool.clone()),
        PostgresActorDirectory::new(pool),
    ))
}

/// Cleans up a test database.
fn cleanup_database(cluster: &TestCluster, db_name: &str) {
    if let Err(e) = cluster.drop_database(db_name) {
        eprintln!("Warning: failed to drop test database {db_name}: {e}");
    }
}

/// Guard that ensures test database cleanup runs even if test panics.
struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        cleanup_database(self.cluster, &self.db_name);
    }
}

fn due(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn timestamp(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

fn test_actor() -> Actor {
    Actor::new(ActorId::new(), "Alice Example", "alice@example.com")
}

/// Creates a task owned by the actor, registering the actor first.
fn seeded_task(
    rt: &Runtime,
    store: &PostgresTaskStore,
    directory: &PostgresActorDirectory,
    actor: &Actor,
) -> Task {
    rt.block_on(directory.record(actor)).expect("record actor");
    let title = TaskTitle::new("Prepare release notes").expect("valid title");
    let data = NewTaskData::new(actor.id(), title)
        .with_description("Cover the storage changes")
        .with_priority(TaskPriority::Low)
        .with_due_date(due(2024, 1, 1));
    let task = Task::create(data, &DefaultClock);
    let entry = HistoryEntry::creation(&task, actor.id(), &DefaultClock);
    rt.block_on(store.create(&task, std::slice::from_ref(&entry)))
        .expect("store task");
    task
}

fn entry_at(
    task_id: TaskId,
    actor_id: ActorId,
    field_name: &str,
    created_at: DateTime<Utc>,
) -> HistoryEntry {
    HistoryEntry::from_persisted(PersistedHistoryEntryData {
        id: HistoryEntryId::new(),
        task_id,
        actor_id,
        field_name: field_name.to_owned(),
        old_value: Some("pending".to_owned()),
        new_value: Some("in_progress".to_owned()),
        action: ActionKind::StatusChanged,
        created_at,
    })
}

// ============================================================================
// Task round trips
// ============================================================================

#[rstest]
fn store_and_retrieve_task(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_store_retrieve_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor = test_actor();
    let task = seeded_task(&rt, &store, &directory, &actor);

    let retrieved = rt
        .block_on(store.find_by_id(task.id()))
        .expect("find_by_id should succeed")
        .expect("task should exist");

    assert_eq!(retrieved.id(), task.id());
    assert_eq!(retrieved.owner(), actor.id());
    assert_eq!(retrieved.title().as_str(), "Prepare release notes");
    assert_eq!(retrieved.description(), Some("Cover the storage changes"));
    assert_eq!(retrieved.status(), TaskStatus::Pending);
    assert_eq!(retrieved.priority(), TaskPriority::Low);
    assert_eq!(retrieved.due_date(), Some(due(2024, 1, 1)));
    assert!(!retrieved.completed());
}

#[rstest]
fn find_by_id_returns_none_for_missing(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_find_none_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, _directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let result = rt
        .block_on(store.find_by_id(TaskId::new()))
        .expect("query ok");
    assert!(result.is_none());
}

#[rstest]
fn create_rejects_duplicate_task_identifier(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_dup_task_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor = test_actor();
    let task = seeded_task(&rt, &store, &directory, &actor);

    let result = rt.block_on(store.create(&task, &[]));

    assert!(
        matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
        "Expected DuplicateTask error, got: {result:?}"
    );
}

// ============================================================================
// Transactional update + history
// ============================================================================

#[rstest]
fn update_persists_task_and_history_together(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_update_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor = test_actor();
    let task = seeded_task(&rt, &store, &directory, &actor);

    let mut updated = task.clone();
    let patch = TaskPatch::new()
        .with_status(TaskStatus::InProgress)
        .clearing_due_date();
    updated.apply(&patch, &DefaultClock);
    let entry = entry_at(task.id(), actor.id(), "status", timestamp(9, 0));

    rt.block_on(store.update(&updated, std::slice::from_ref(&entry)))
        .expect("update should succeed");

    let retrieved = rt
        .block_on(store.find_by_id(task.id()))
        .expect("find")
        .expect("exists");
    assert_eq!(retrieved.status(), TaskStatus::InProgress);
    // The cleared due date must persist as NULL, not keep the old value.
    assert_eq!(retrieved.due_date(), None);

    let entries = rt
        .block_on(store.list_for_task(task.id()))
        .expect("history listing");
    assert_eq!(entries.len(), 2);
}

#[rstest]
fn update_of_missing_task_rolls_back_history(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_update_missing_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor = test_actor();
    rt.block_on(directory.record(&actor)).expect("record actor");

    let title = TaskTitle::new("Never stored").expect("valid title");
    let ghost = Task::create(NewTaskData::new(actor.id(), title), &DefaultClock);
    let entry = entry_at(ghost.id(), actor.id(), "status", timestamp(9, 0));

    let result = rt.block_on(store.update(&ghost, std::slice::from_ref(&entry)));

    assert!(
        matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == ghost.id()),
        "Expected NotFound error, got: {result:?}"
    );
    let entries = rt
        .block_on(store.list_for_task(ghost.id()))
        .expect("history listing");
    assert!(entries.is_empty());
}

#[rstest]
fn history_write_failure_rolls_back_task_mutation(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_history_rollback_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor = test_actor();
    let task = seeded_task(&rt, &store, &directory, &actor);

    let mut updated = task.clone();
    let patch = TaskPatch::new().with_status(TaskStatus::Completed);
    updated.apply(&patch, &DefaultClock);
    // An entry referencing an unregistered actor violates the foreign key,
    // which must abort the task mutation with it.
    let rogue_entry = entry_at(task.id(), ActorId::new(), "status", timestamp(9, 0));

    let result = rt.block_on(store.update(&updated, std::slice::from_ref(&rogue_entry)));
    assert!(matches!(result, Err(TaskRepositoryError::Persistence(_))));

    let retrieved = rt
        .block_on(store.find_by_id(task.id()))
        .expect("find")
        .expect("exists");
    assert_eq!(retrieved.status(), TaskStatus::Pending);

    let entries = rt
        .block_on(store.list_for_task(task.id()))
        .expect("history listing");
    assert_eq!(entries.len(), 1); // creation entry only
}

// ============================================================================
// Cascade delete
// ============================================================================

#[rstest]
fn delete_cascades_history_rows(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_cascade_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor = test_actor();
    let task = seeded_task(&rt, &store, &directory, &actor);

    let entry = entry_at(task.id(), actor.id(), "status", timestamp(9, 0));
    rt.block_on(store.update(&task, std::slice::from_ref(&entry)))
        .expect("update should succeed");

    rt.block_on(store.delete(task.id()))
        .expect("delete should succeed");

    assert!(
        rt.block_on(store.find_by_id(task.id()))
            .expect("find")
            .is_none()
    );
    let entries = rt
        .block_on(store.list_for_task(task.id()))
        .expect("history listing");
    assert!(entries.is_empty());
}

#[rstest]
fn delete_of_missing_task_reports_not_found(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_delete_missing_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, _directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let missing = TaskId::new();
    let result = rt.block_on(store.delete(missing));

    assert!(
        matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == missing),
        "Expected NotFound error, got: {result:?}"
    );
}

// ============================================================================
// Read-side ordering
// ============================================================================

#[rstest]
fn history_listing_orders_newest_first_with_stable_ties(
    shared_test_cluster: &'static TestCluster,
) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_history_order_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor = test_actor();
    let task = seeded_task(&rt, &store, &directory, &actor);

    // Insert saves out of chronological order.
    let late = entry_at(task.id(), actor.id(), "status", timestamp(12, 0));
    rt.block_on(store.update(&task, std::slice::from_ref(&late)))
        .expect("late update");
    let early_first = entry_at(task.id(), actor.id(), "title", timestamp(9, 0));
    let early_second = entry_at(task.id(), actor.id(), "due_date", timestamp(9, 0));
    rt.block_on(store.update(&task, &[early_first.clone(), early_second.clone()]))
        .expect("early update");

    let entries = rt
        .block_on(store.list_for_task(task.id()))
        .expect("history listing");

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].id(), late.id());
    // The two 09:00 entries keep their save order via the seq tie-breaker.
    assert_eq!(entries[1].id(), early_first.id());
    assert_eq!(entries[2].id(), early_second.id());
}

#[rstest]
fn owner_listing_orders_by_position(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_owner_order_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor = test_actor();
    rt.block_on(directory.record(&actor)).expect("record actor");

    let mut stored_ids = Vec::new();
    for (title, position) in [("Third", 2), ("First", 0), ("Second", 1)] {
        let task_title = TaskTitle::new(title).expect("valid title");
        let data = NewTaskData::new(actor.id(), task_title).with_position(position);
        let task = Task::create(data, &DefaultClock);
        rt.block_on(store.create(&task, &[])).expect("store task");
        stored_ids.push((position, task.id()));
    }
    stored_ids.sort_by_key(|(position, _)| *position);

    let listed = rt
        .block_on(store.list_for_owner(actor.id()))
        .expect("list tasks");

    let listed_ids: Vec<_> = listed.iter().map(Task::id).collect();
    let expected: Vec<_> = stored_ids.iter().map(|(_, id)| *id).collect();
    assert_eq!(listed_ids, expected);
}

// ============================================================================
// Actor directory
// ============================================================================

#[rstest]
fn actor_directory_upserts_and_finds(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_actor_dir_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let (_store, directory) = setup_adapters(shared_test_cluster, &db_name).expect("adapter setup");

    let rt = test_runtime();
    let actor_id = ActorId::new();
    let original = Actor::new(actor_id, "Alice Example", "alice@example.com");
    rt.block_on(directory.record(&original)).expect("record");

    let renamed = Actor::new(actor_id, "Alice B. Example", "alice@example.com");
    rt.block_on(directory.record(&renamed)).expect("re-record");

    let found = rt
        .block_on(directory.find(actor_id))
        .expect("find")
        .expect("actor exists");
    assert_eq!(found.name(), "Alice B. Example");

    let missing = rt
        .block_on(directory.find(ActorId::new()))
        .expect("find missing");
    assert!(missing.is_none());
}
