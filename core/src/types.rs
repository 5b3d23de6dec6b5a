//! Shared primitive types used across the service.

/// Row id in the `referrals` table, assigned by the store on insert.
pub type RecordId = i64;

/// Depth in the referral chain. 1 for an unreferred wallet.
pub type Tier = i64;
