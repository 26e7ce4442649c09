//! Error types for the scheduling store.
//!
//! Every `rusqlite::Error` is classified once, when it crosses into
//! [`DbError`], so callers match on variants and never on message text.

use std::fmt;
use std::os::raw::c_int;
use std::sync::{LazyLock, PoisonError};

use regex::Regex;
use rusqlite::ffi;
use thiserror::Error;

/// Raised by the `enrollments_check_capacity` trigger.
pub const SECTION_FULL_MESSAGE: &str = "Section is full. Cannot enroll.";

/// Raised by the `enrollments_check_conflict` trigger.
pub const SCHEDULE_CONFLICT_MESSAGE: &str =
    "Schedule conflict detected. Cannot enroll in this section.";

static UNIQUE_FAILURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UNIQUE constraint failed: (.+)$").unwrap());

/// A business rule the store refused to let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerRejection {
    ScheduleConflict,
    SectionFull,
}

impl TriggerRejection {
    /// The only place trigger wording is interpreted.
    pub fn from_message(message: &str) -> Option<Self> {
        match message {
            SCHEDULE_CONFLICT_MESSAGE => Some(TriggerRejection::ScheduleConflict),
            SECTION_FULL_MESSAGE => Some(TriggerRejection::SectionFull),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerRejection::ScheduleConflict => f.write_str(SCHEDULE_CONFLICT_MESSAGE),
            TriggerRejection::SectionFull => f.write_str(SECTION_FULL_MESSAGE),
        }
    }
}

/// Step of the section write path that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Begin,
    AddDay,
    Commit,
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStage::Begin => f.write_str("Failed to begin transaction"),
            TxStage::AddDay => f.write_str("Failed to add section day"),
            TxStage::Commit => f.write_str("Failed to commit transaction"),
        }
    }
}

/// Errors that can occur while talking to the store.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row matched where one was expected, or a delete touched nothing
    #[error("No matching row")]
    NotFound,

    /// A UNIQUE or PRIMARY KEY constraint rejected the write
    #[error("UNIQUE constraint failed: {table}({})", .columns.join(", "))]
    UniqueViolation { table: String, columns: Vec<String> },

    /// A CHECK constraint rejected the write
    #[error("CHECK constraint failed: {0}")]
    CheckViolation(String),

    /// A referenced row does not exist
    #[error("FOREIGN KEY constraint failed")]
    ForeignKeyViolation,

    /// A trigger refused the write
    #[error("{0}")]
    Rejected(TriggerRejection),

    /// The section write path failed after the section row was staged
    #[error("{stage}: {source}")]
    Transaction {
        stage: TxStage,
        #[source]
        source: rusqlite::Error,
    },

    /// A previous holder of the connection panicked
    #[error("Database connection lock poisoned")]
    Poisoned,

    /// Anything the store reported that has no dedicated variant
    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl DbError {
    pub(crate) fn transaction(stage: TxStage) -> impl FnOnce(rusqlite::Error) -> DbError {
        move |source| DbError::Transaction { stage, source }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::QueryReturnedNoRows = err {
            return DbError::NotFound;
        }

        let classified = match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                classify_constraint(failure.extended_code, message.as_deref().unwrap_or_default())
            }
            _ => None,
        };

        classified.unwrap_or(DbError::Sqlite(err))
    }
}

impl<T> From<PoisonError<T>> for DbError {
    fn from(_: PoisonError<T>) -> Self {
        DbError::Poisoned
    }
}

fn classify_constraint(extended_code: c_int, message: &str) -> Option<DbError> {
    if let Some(rejection) = TriggerRejection::from_message(message) {
        return Some(DbError::Rejected(rejection));
    }

    match extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            Some(parse_unique_failure(message))
        }
        ffi::SQLITE_CONSTRAINT_CHECK => Some(DbError::CheckViolation(
            message
                .strip_prefix("CHECK constraint failed: ")
                .unwrap_or(message)
                .to_string(),
        )),
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(DbError::ForeignKeyViolation),
        _ => None,
    }
}

/// Parses `UNIQUE constraint failed: t.a, t.b` into the table and columns.
/// Unrecognised wording still yields a uniqueness violation, just without
/// a resolvable constraint.
fn parse_unique_failure(message: &str) -> DbError {
    let mut table = String::new();
    let mut columns = Vec::new();

    if let Some(caps) = UNIQUE_FAILURE.captures(message) {
        for qualified in caps[1].split(", ") {
            if let Some((t, column)) = qualified.trim().split_once('.') {
                if table.is_empty() {
                    table = t.to_string();
                }
                columns.push(column.to_string());
            }
        }
    }

    DbError::UniqueViolation { table, columns }
}
