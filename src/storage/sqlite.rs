//! SQLite implementations of storage interfaces.

use async_trait::async_trait;
use sea_query::{Expr, OnConflict, Order, Query, SqliteQueryBuilder};
use sqlx::{Acquire, Row, SqlitePool};

use crate::actor::ActorId;
use crate::interfaces::{EventRecord, EventStore, Result, SnapshotRecord, SnapshotStore};

use super::schema::{
    Events, Sequences, Snapshots, CREATE_EVENTS_TABLE, CREATE_SEQUENCES_TABLE,
    CREATE_SNAPSHOTS_TABLE,
};

/// Clamp a u64 bound into SQLite's signed integer range.
///
/// Stored sequences never exceed i64::MAX, so clamping preserves the bound's
/// meaning; a plain `as i64` cast would wrap bounds like `u64::MAX` to -1.
fn clamp_bound(bound: u64) -> i64 {
    i64::try_from(bound).unwrap_or(i64::MAX)
}

/// SQLite implementation of EventStore.
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    /// Create a new SQLite event store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the database schema.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_EVENTS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_SEQUENCES_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn append(&self, actor: &ActorId, payload: Vec<u8>) -> Result<u64> {
        // The counter read, the insert, and the counter bump share one
        // transaction, which serializes concurrent appends for the same
        // actor: no two appends can observe the same counter value.
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let query = Query::select()
            .column(Sequences::NextSequence)
            .from(Sequences::Table)
            .and_where(Expr::col(Sequences::Actor).eq(actor.as_str()))
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_optional(&mut *tx).await?;
        let sequence = match row {
            Some(row) => {
                let next: i64 = row.get(0);
                next as u64
            }
            None => 0,
        };

        let created_at = chrono::Utc::now().to_rfc3339();
        let insert = Query::insert()
            .into_table(Events::Table)
            .columns([
                Events::Actor,
                Events::Sequence,
                Events::CreatedAt,
                Events::Payload,
            ])
            .values_panic([
                actor.as_str().into(),
                (sequence as i64).into(),
                created_at.into(),
                payload.into(),
            ])
            .to_string(SqliteQueryBuilder);

        sqlx::query(&insert).execute(&mut *tx).await?;

        let bump = Query::insert()
            .into_table(Sequences::Table)
            .columns([Sequences::Actor, Sequences::NextSequence])
            .values_panic([actor.as_str().into(), ((sequence + 1) as i64).into()])
            .on_conflict(
                OnConflict::column(Sequences::Actor)
                    .update_column(Sequences::NextSequence)
                    .to_owned(),
            )
            .to_string(SqliteQueryBuilder);

        sqlx::query(&bump).execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(sequence)
    }

    async fn get_from(&self, actor: &ActorId, from: u64) -> Result<Vec<EventRecord>> {
        let query = Query::select()
            .column(Events::Sequence)
            .column(Events::Payload)
            .from(Events::Table)
            .and_where(Expr::col(Events::Actor).eq(actor.as_str()))
            .and_where(Expr::col(Events::Sequence).gte(clamp_bound(from)))
            .order_by(Events::Sequence, Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let sequence: i64 = row.get("sequence");
            let payload: Vec<u8> = row.get("payload");
            records.push(EventRecord {
                index: sequence as u64,
                payload,
            });
        }

        Ok(records)
    }

    async fn next_index(&self, actor: &ActorId) -> Result<u64> {
        let query = Query::select()
            .column(Sequences::NextSequence)
            .from(Sequences::Table)
            .and_where(Expr::col(Sequences::Actor).eq(actor.as_str()))
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => {
                let next: i64 = row.get(0);
                Ok(next as u64)
            }
            None => Ok(0),
        }
    }

    async fn delete_up_to(&self, actor: &ActorId, up_to: u64) -> Result<()> {
        let query = Query::delete()
            .from_table(Events::Table)
            .and_where(Expr::col(Events::Actor).eq(actor.as_str()))
            .and_where(Expr::col(Events::Sequence).lte(clamp_bound(up_to)))
            .to_string(SqliteQueryBuilder);

        sqlx::query(&query).execute(&self.pool).await?;

        Ok(())
    }
}

/// SQLite implementation of SnapshotStore.
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    /// Create a new SQLite snapshot store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the database schema.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_SNAPSHOTS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn put(&self, actor: &ActorId, snapshot: SnapshotRecord) -> Result<()> {
        let created_at = chrono::Utc::now().to_rfc3339();

        let query = Query::insert()
            .into_table(Snapshots::Table)
            .columns([
                Snapshots::Actor,
                Snapshots::Sequence,
                Snapshots::Payload,
                Snapshots::CreatedAt,
            ])
            .values_panic([
                actor.as_str().into(),
                (snapshot.index as i64).into(),
                snapshot.payload.into(),
                created_at.into(),
            ])
            .on_conflict(
                OnConflict::columns([Snapshots::Actor, Snapshots::Sequence])
                    .update_columns([Snapshots::Payload, Snapshots::CreatedAt])
                    .to_owned(),
            )
            .to_string(SqliteQueryBuilder);

        sqlx::query(&query).execute(&self.pool).await?;

        Ok(())
    }

    async fn get_latest(&self, actor: &ActorId) -> Result<Option<SnapshotRecord>> {
        let query = Query::select()
            .column(Snapshots::Sequence)
            .column(Snapshots::Payload)
            .from(Snapshots::Table)
            .and_where(Expr::col(Snapshots::Actor).eq(actor.as_str()))
            .order_by(Snapshots::Sequence, Order::Desc)
            .limit(1)
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => {
                let sequence: i64 = row.get("sequence");
                let payload: Vec<u8> = row.get("payload");
                Ok(Some(SnapshotRecord {
                    index: sequence as u64,
                    payload,
                }))
            }
            None => Ok(None),
        }
    }

    async fn delete_up_to(&self, actor: &ActorId, up_to: u64) -> Result<()> {
        let query = Query::delete()
            .from_table(Snapshots::Table)
            .and_where(Expr::col(Snapshots::Actor).eq(actor.as_str()))
            .and_where(Expr::col(Snapshots::Sequence).lte(clamp_bound(up_to)))
            .to_string(SqliteQueryBuilder);

        sqlx::query(&query).execute(&self.pool).await?;

        Ok(())
    }
}
