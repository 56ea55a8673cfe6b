//! Account registration and credential checks.

use std::io::Write;

use anyhow::{Context, Result};
use sp_db::Database;

use crate::context::SessionContext;

/// Registers a new account and prints its id.
pub fn register<W: Write>(
    writer: &mut W,
    db: &mut Database,
    username: &str,
    password: &str,
) -> Result<()> {
    let id = db
        .create_user(username, password)
        .with_context(|| format!("failed to register {username}"))?;
    writeln!(writer, "Registered {} (id {id})", username.trim())?;
    Ok(())
}

/// Confirms that the session's credentials were accepted.
pub fn login<W: Write>(writer: &mut W, ctx: &SessionContext) -> Result<()> {
    writeln!(writer, "Logged in as {}", ctx.user.username)?;
    Ok(())
}
