//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Events table schema.
#[derive(Iden)]
pub enum Events {
    Table,
    #[iden = "actor"]
    Actor,
    #[iden = "sequence"]
    Sequence,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "payload"]
    Payload,
}

/// Snapshots table schema.
#[derive(Iden)]
pub enum Snapshots {
    Table,
    #[iden = "actor"]
    Actor,
    #[iden = "sequence"]
    Sequence,
    #[iden = "payload"]
    Payload,
    #[iden = "created_at"]
    CreatedAt,
}

/// Per-actor index counter schema.
///
/// The counter is the append-index authority. It outlives compaction, so
/// indices never regress after events are deleted.
#[derive(Iden)]
pub enum Sequences {
    Table,
    #[iden = "actor"]
    Actor,
    #[iden = "next_sequence"]
    NextSequence,
}

/// SQL for creating the events table.
pub const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    actor TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    payload BLOB NOT NULL,
    PRIMARY KEY (actor, sequence)
);
"#;

/// SQL for creating the snapshots table.
pub const CREATE_SNAPSHOTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS snapshots (
    actor TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    payload BLOB NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (actor, sequence)
);
"#;

/// SQL for creating the sequences table.
pub const CREATE_SEQUENCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sequences (
    actor TEXT PRIMARY KEY,
    next_sequence INTEGER NOT NULL
);
"#;
