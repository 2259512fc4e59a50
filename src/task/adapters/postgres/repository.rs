//! `PostgreSQL` repository implementation for change-tracked task storage.

use super::{
    models::{ActorRow, HistoryRow, NewActorRow, NewHistoryRow, NewTaskRow, TaskChangeset, TaskRow},
    schema::{actors, task_history, tasks},
};
use crate::task::{
    domain::{
        ActionKind, Actor, ActorId, CategoryId, HistoryEntry, HistoryEntryId,
        PersistedHistoryEntryData, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus,
        TaskTitle,
    },
    ports::{
        ActorDirectory, ActorDirectoryError, ActorDirectoryResult, HistoryRepository,
        HistoryRepositoryError, HistoryRepositoryResult, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Lets `?` inside `connection.transaction` closures surface rollback and
/// commit failures as persistence errors.
impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task and history store.
///
/// Each task save runs the row mutation and its history inserts in one
/// database transaction: if any history insert fails, the task mutation
/// rolls back with it.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }

    async fn run_blocking_history<F, T>(&self, f: F) -> HistoryRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> HistoryRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(HistoryRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(HistoryRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskStore {
    async fn create(&self, task: &Task, history: &[HistoryEntry]) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_task_row(task);
        let entry_rows = to_new_history_rows(history);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|txn| {
                diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .execute(txn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        other => TaskRepositoryError::persistence(other),
                    })?;
                insert_history_rows(txn, &entry_rows)
            })
        })
        .await
    }

    async fn update(&self, task: &Task, history: &[HistoryEntry]) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_task_changeset(task);
        let entry_rows = to_new_history_rows(history);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|txn| {
                let updated =
                    diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                        .set(&changeset)
                        .execute(txn)
                        .map_err(TaskRepositoryError::persistence)?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                insert_history_rows(txn, &entry_rows)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_for_owner(&self, owner: ActorId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .order((tasks::position.asc(), tasks::created_at.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl HistoryRepository for PostgresTaskStore {
    async fn list_for_task(&self, task_id: TaskId) -> HistoryRepositoryResult<Vec<HistoryEntry>> {
        self.run_blocking_history(move |connection| {
            let rows = task_history::table
                .filter(task_history::task_id.eq(task_id.into_inner()))
                .order((task_history::created_at.desc(), task_history::seq.asc()))
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(HistoryRepositoryError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }
}

/// `PostgreSQL`-backed actor directory.
#[derive(Debug, Clone)]
pub struct PostgresActorDirectory {
    pool: TaskPgPool,
}

impl PostgresActorDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ActorDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ActorDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ActorDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ActorDirectoryError::persistence)?
    }
}

#[async_trait]
impl ActorDirectory for PostgresActorDirectory {
    async fn record(&self, actor: &Actor) -> ActorDirectoryResult<()> {
        let new_row = NewActorRow {
            id: actor.id().into_inner(),
            name: actor.name().to_owned(),
            email: actor.email().to_owned(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(actors::table)
                .values(&new_row)
                .on_conflict(actors::id)
                .do_update()
                .set((
                    actors::name.eq(&new_row.name),
                    actors::email.eq(&new_row.email),
                ))
                .execute(connection)
                .map_err(ActorDirectoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find(&self, id: ActorId) -> ActorDirectoryResult<Option<Actor>> {
        self.run_blocking(move |connection| {
            let row = actors::table
                .filter(actors::id.eq(id.into_inner()))
                .select(ActorRow::as_select())
                .first::<ActorRow>(connection)
                .optional()
                .map_err(ActorDirectoryError::persistence)?;
            Ok(row.map(row_to_actor))
        })
        .await
    }
}

fn insert_history_rows(
    connection: &mut PgConnection,
    rows: &[NewHistoryRow],
) -> TaskRepositoryResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(task_history::table)
        .values(rows)
        .execute(connection)
        .map_err(TaskRepositoryError::persistence)?;
    Ok(())
}

fn to_new_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        category_id: task.category_id().map(CategoryId::into_inner),
        completed: task.completed(),
        position: task.position(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_task_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        category_id: task.category_id().map(CategoryId::into_inner),
        completed: task.completed(),
        position: task.position(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        title: persisted_title,
        description,
        status: persisted_status,
        priority: persisted_priority,
        due_date,
        category_id,
        completed,
        position,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: ActorId::from_uuid(owner_id),
        title,
        description,
        status,
        priority,
        due_date,
        category_id: category_id.map(CategoryId::from_uuid),
        completed,
        position,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn to_new_history_rows(history: &[HistoryEntry]) -> Vec<NewHistoryRow> {
    history
        .iter()
        .map(|entry| NewHistoryRow {
            id: entry.id().into_inner(),
            task_id: entry.task_id().into_inner(),
            actor_id: entry.actor_id().into_inner(),
            field_name: entry.field_name().to_owned(),
            old_value: entry.old_value().map(str::to_owned),
            new_value: entry.new_value().map(str::to_owned),
            action: entry.action().as_str().to_owned(),
            created_at: entry.created_at(),
        })
        .collect()
}

fn row_to_entry(row: HistoryRow) -> HistoryRepositoryResult<HistoryEntry> {
    let HistoryRow {
        id,
        task_id,
        actor_id,
        field_name,
        old_value,
        new_value,
        action: persisted_action,
        created_at,
    } = row;

    let action = ActionKind::try_from(persisted_action.as_str())
        .map_err(HistoryRepositoryError::persistence)?;

    let data = PersistedHistoryEntryData {
        id: HistoryEntryId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        actor_id: ActorId::from_uuid(actor_id),
        field_name,
        old_value,
        new_value,
        action,
        created_at,
    };
    Ok(HistoryEntry::from_persisted(data))
}

fn row_to_actor(row: ActorRow) -> Actor {
    Actor::new(ActorId::from_uuid(row.id), row.name, row.email)
}
