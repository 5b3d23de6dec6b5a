//! Store methods for the referral graph.
//!
//! All lookups are single-column equality filters; uniqueness of `address`
//! and `referral_code` is enforced by the schema's unique indexes.

use rusqlite::{params, OptionalExtension};

use super::ReferralStore;
use crate::{
    error::ApiResult,
    service::ReferralRecord,
    types::{RecordId, Tier},
};

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReferralRecord> {
    Ok(ReferralRecord {
        id: row.get(0)?,
        address: row.get(1)?,
        referral_code: row.get(2)?,
        tier: row.get(3)?,
        used_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl ReferralStore {
    // ── Lookups ───────────────────────────────────────────────────

    pub fn find_by_address(&self, address: &str) -> ApiResult<Option<ReferralRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, address, referral_code, tier, used_id, created_at
                 FROM referrals WHERE address = ?1",
                params![address],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    pub fn find_by_code(&self, code: &str) -> ApiResult<Option<ReferralRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, address, referral_code, tier, used_id, created_at
                 FROM referrals WHERE referral_code = ?1 LIMIT 1",
                params![code],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    pub fn records_by_code(&self, code: &str) -> ApiResult<Vec<ReferralRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, address, referral_code, tier, used_id, created_at
             FROM referrals WHERE referral_code = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![code], row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn record_by_id(&self, id: RecordId) -> ApiResult<Option<ReferralRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, address, referral_code, tier, used_id, created_at
                 FROM referrals WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    // ── Mutations ─────────────────────────────────────────────────

    /// Insert a new wallet row with no code of its own yet.
    pub fn insert_wallet(
        &self,
        address: &str,
        tier: Tier,
        used_id: Option<RecordId>,
    ) -> ApiResult<ReferralRecord> {
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO referrals (address, referral_code, tier, used_id, created_at)
             VALUES (?1, NULL, ?2, ?3, ?4)",
            params![address, tier, used_id, created_at],
        )?;
        Ok(ReferralRecord {
            id: self.conn.last_insert_rowid(),
            address: address.to_string(),
            referral_code: None,
            tier,
            used_id,
            created_at,
        })
    }

    /// Set the code on the row matching `address` and return the updated
    /// row(s). Empty result means no such wallet.
    pub fn set_referral_code(
        &self,
        address: &str,
        code: &str,
    ) -> ApiResult<Vec<ReferralRecord>> {
        let affected = self.conn.execute(
            "UPDATE referrals SET referral_code = ?1 WHERE address = ?2",
            params![code, address],
        )?;
        if affected == 0 {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "SELECT id, address, referral_code, tier, used_id, created_at
             FROM referrals WHERE address = ?1",
        )?;
        let rows = stmt.query_map(params![address], row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Summary / test helpers ────────────────────────────────────

    /// Number of registered wallets.
    pub fn wallet_count(&self) -> ApiResult<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM referrals", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of wallets that have claimed a referral code.
    pub fn coded_wallet_count(&self) -> ApiResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM referrals WHERE referral_code IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
