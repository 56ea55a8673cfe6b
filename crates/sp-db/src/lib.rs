//! Storage layer for the study planner.
//!
//! Provides persistence for users, study plans and progress records using
//! `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Use one `Database` per thread, or wrap it in a `Mutex` to share it.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format (e.g., `2024-01-15T10:30:00.000Z`)
//! and calendar dates as `YYYY-MM-DD`, so lexicographic order matches
//! chronological order.
//!
//! ## Plan Storage
//!
//! A plan is stored as one `study_plans` row per entry. `study_days` holds the
//! comma-joined weekday abbreviations (e.g. `Mon,Wed,Fri`). Review intervals
//! are not stored; reloaded entries have an empty `repetition_schedule`.
//!
//! A user has at most one plan. [`Database::save_plan`] deletes the previous
//! rows and inserts the new ones inside a single transaction, so readers never
//! observe a half-replaced plan. Concurrent saves for the same user resolve as
//! last-commit-wins.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc, Weekday};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sp_core::{Difficulty, Plan, PlanEntry, Priority};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database. The transaction, if any, was
    /// rolled back.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The username is already registered.
    #[error("username already exists: {0}")]
    UsernameTaken(String),
    /// A caller-supplied value was rejected before reaching the database.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A stored row could not be converted back into a domain value.
    #[error("invalid row {id}: {message}")]
    InvalidRow { id: i64, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub created_at: String,
}

/// Hours studied for one subject on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRecord {
    pub subject: String,
    pub date: NaiveDate,
    pub hours_studied: f64,
}

/// How regularly a user studied within a window of days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Consistency {
    /// Distinct dates with at least one progress record.
    pub study_days: usize,
    /// `study_days` as a percentage of the window.
    pub percent: f64,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- One row per plan entry; the full set of rows is the user's plan
            -- study_days: comma-joined weekday abbreviations (e.g. 'Mon,Thu')
            CREATE TABLE IF NOT EXISTS study_plans (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                subject TEXT NOT NULL,
                hours REAL NOT NULL CHECK (hours > 0),
                priority TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                study_days TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_study_plans_user ON study_plans(user_id);

            -- date: calendar day (e.g. '2025-01-15')
            CREATE TABLE IF NOT EXISTS progress (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                subject TEXT NOT NULL,
                date TEXT NOT NULL,
                hours_studied REAL NOT NULL CHECK (hours_studied >= 0),
                recorded_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_progress_user_date ON progress(user_id, date);
            ",
        )?;
        Ok(())
    }

    // ========== Users ==========

    /// Registers a user and returns its ID.
    pub fn create_user(&mut self, username: &str, password: &str) -> Result<i64, DbError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DbError::InvalidInput("username cannot be empty".to_string()));
        }
        if self.find_user(username)?.is_some() {
            return Err(DbError::UsernameTaken(username.to_string()));
        }

        self.conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)",
            params![username, hash_password(password), format_timestamp(Utc::now())],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(user_id = id, username, "registered user");
        Ok(id)
    }

    /// Looks up a user by name.
    pub fn find_user(&self, username: &str) -> Result<Option<UserRecord>, DbError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE username = ?",
                [username],
                |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Returns the user if `password` matches the stored credential.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, DbError> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = ?",
                [username],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(hash) if hash == hash_password(password) => self.find_user(username),
            _ => Ok(None),
        }
    }

    // ========== Plans ==========

    /// Replaces the user's stored plan with `plan`.
    ///
    /// Runs as one transaction: on any error nothing is changed and the
    /// previous plan stays in place. Saving an empty plan clears the user's
    /// plan. Returns the number of inserted entries.
    pub fn save_plan(&mut self, user_id: i64, plan: &Plan) -> Result<usize, DbError> {
        let created_at = format_timestamp(Utc::now());
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM study_plans WHERE user_id = ?", [user_id])?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO study_plans
                (user_id, subject, hours, priority, difficulty, study_days, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for entry in &plan.entries {
                inserted += stmt.execute(params![
                    user_id,
                    entry.subject,
                    entry.hours,
                    entry.priority.as_str(),
                    entry.difficulty.as_str(),
                    entry.study_days_joined(),
                    created_at,
                ])?;
            }
        }
        tx.commit()?;
        tracing::info!(user_id, deleted, inserted, "saved study plan");
        Ok(inserted)
    }

    /// Loads the user's plan in storage order.
    ///
    /// Returns `None` when the user has no stored entries. Loaded entries have
    /// an empty `repetition_schedule`.
    pub fn load_plan(&self, user_id: i64) -> Result<Option<Plan>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, subject, hours, priority, difficulty, study_days
            FROM study_plans
            WHERE user_id = ?
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok(PlanRow {
                id: row.get(0)?,
                subject: row.get(1)?,
                hours: row.get(2)?,
                priority: row.get(3)?,
                difficulty: row.get(4)?,
                study_days: row.get(5)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        tracing::debug!(user_id, entries = entries.len(), "loaded study plan");

        if entries.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Plan { entries }))
        }
    }

    // ========== Progress ==========

    /// Records hours studied per subject for `date`, in one transaction.
    pub fn record_progress(
        &mut self,
        user_id: i64,
        date: NaiveDate,
        entries: &[(String, f64)],
    ) -> Result<usize, DbError> {
        if let Some((subject, hours)) = entries
            .iter()
            .find(|(subject, hours)| subject.trim().is_empty() || !hours.is_finite() || *hours < 0.0)
        {
            return Err(DbError::InvalidInput(format!(
                "invalid progress entry {subject:?}: {hours}"
            )));
        }

        let recorded_at = format_timestamp(Utc::now());
        let date = date.format("%Y-%m-%d").to_string();
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO progress (user_id, subject, date, hours_studied, recorded_at)
                VALUES (?, ?, ?, ?, ?)
                ",
            )?;
            for (subject, hours) in entries {
                inserted += stmt.execute(params![user_id, subject.trim(), date, hours, recorded_at])?;
            }
        }
        tx.commit()?;
        tracing::info!(user_id, inserted, %date, "recorded progress");
        Ok(inserted)
    }

    /// Lists the user's most recent progress records, newest first.
    pub fn list_progress(&self, user_id: i64, limit: usize) -> Result<Vec<ProgressRecord>, DbError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "
            SELECT id, subject, date, hours_studied
            FROM progress
            WHERE user_id = ?
            ORDER BY date DESC, id DESC
            LIMIT ?
            ",
        )?;
        let rows = stmt.query_map(params![user_id, limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, subject, date, hours_studied) = row?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|err| {
                DbError::InvalidRow {
                    id,
                    message: format!("invalid date {date:?}: {err}"),
                }
            })?;
            records.push(ProgressRecord {
                subject,
                date,
                hours_studied,
            });
        }
        Ok(records)
    }
}

/// Raw `study_plans` row before conversion into a [`PlanEntry`].
struct PlanRow {
    id: i64,
    subject: String,
    hours: f64,
    priority: String,
    difficulty: String,
    study_days: String,
}

impl PlanRow {
    fn into_entry(self) -> Result<PlanEntry, DbError> {
        let invalid = |message: String| DbError::InvalidRow {
            id: self.id,
            message,
        };
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(|err| invalid(err.to_string()))?;
        let difficulty = self
            .difficulty
            .parse::<Difficulty>()
            .map_err(|err| invalid(err.to_string()))?;
        let study_days = split_study_days(&self.study_days).map_err(invalid)?;

        Ok(PlanEntry {
            subject: self.subject,
            hours: self.hours,
            priority,
            difficulty,
            study_days,
            repetition_schedule: Vec::new(),
        })
    }
}

/// Splits a comma-joined weekday string, skipping empty tokens.
fn split_study_days(joined: &str) -> Result<Vec<Weekday>, String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Weekday>()
                .map_err(|_| format!("invalid weekday {token:?}"))
        })
        .collect()
}

/// Summarizes how many distinct days in `records` had study time.
pub fn study_consistency(records: &[ProgressRecord], window_days: u32) -> Consistency {
    let mut dates: Vec<NaiveDate> = records.iter().map(|record| record.date).collect();
    dates.sort_unstable();
    dates.dedup();

    let percent = if window_days == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss, reason = "day counts are small")]
        let days = dates.len() as f64;
        days / f64::from(window_days) * 100.0
    };
    Consistency {
        study_days: dates.len(),
        percent,
    }
}

fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
