//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The service calls store methods — it never executes SQL directly.

mod referral;

use rusqlite::Connection;

use crate::{config::ApiConfig, error::ApiResult};

pub struct ReferralStore {
    conn: Connection,
}

impl ReferralStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> ApiResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ApiResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open the database named by `config`, `:memory:` included.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        match config.db_path.as_str() {
            ":memory:" => Self::in_memory(),
            path => Self::open(path),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ApiResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_referrals.sql"))?;
        Ok(())
    }
}
