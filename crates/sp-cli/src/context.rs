//! Per-invocation session state handed to every user-scoped command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use sp_db::{Database, UserRecord};

use crate::journal::Journal;

/// An authenticated user plus the stores the command may touch.
pub struct SessionContext {
    pub db: Database,
    pub user: UserRecord,
    pub today: NaiveDate,
    pub data_dir: PathBuf,
}

impl SessionContext {
    /// Authenticates `username` and builds the session.
    pub fn login(
        db: Database,
        username: Option<&str>,
        password: Option<&str>,
        today: NaiveDate,
        data_dir: PathBuf,
    ) -> Result<Self> {
        let Some(username) = username else {
            bail!("no user given; pass --user or set SP_USER");
        };
        let Some(password) = password else {
            bail!("no password given; pass --password or set SP_PASSWORD");
        };

        let user = db
            .authenticate(username, password)
            .context("failed to look up user")?
            .with_context(|| format!("invalid username or password for {username}"))?;
        tracing::debug!(user_id = user.id, username = %user.username, "authenticated");

        Ok(Self {
            db,
            user,
            today,
            data_dir,
        })
    }

    /// The user's focus and pomodoro session logs.
    pub fn journal(&self) -> Journal {
        Journal::for_user(&self.data_dir, self.user.id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 29).unwrap()
    }

    /// A logged-in session over an in-memory database and a temp data dir.
    pub(crate) fn session(data_dir: &std::path::Path) -> SessionContext {
        let mut db = Database::open_in_memory().unwrap();
        db.create_user("ada", "secret").unwrap();
        SessionContext::login(
            db,
            Some("ada"),
            Some("secret"),
            today(),
            data_dir.to_path_buf(),
        )
        .unwrap()
    }

    #[test]
    fn login_with_valid_credentials() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = session(temp.path());
        assert_eq!(ctx.user.username, "ada");
        assert_eq!(ctx.today, today());
    }

    #[test]
    fn login_rejects_wrong_password() {
        let mut db = Database::open_in_memory().unwrap();
        db.create_user("ada", "secret").unwrap();

        let err = SessionContext::login(db, Some("ada"), Some("nope"), today(), PathBuf::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("invalid username or password"));
    }

    #[test]
    fn login_requires_user_and_password() {
        let db = Database::open_in_memory().unwrap();
        let err = SessionContext::login(db, None, Some("x"), today(), PathBuf::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("--user"));

        let db = Database::open_in_memory().unwrap();
        let err = SessionContext::login(db, Some("ada"), None, today(), PathBuf::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("--password"));
    }
}
