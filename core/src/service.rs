//! The referral graph service — the write protocol over the `referrals` table.
//!
//! RULES:
//!   - Codes are compared and stored lower-case, always.
//!   - A wallet row is created once; `tier` and `used_id` never change after.
//!   - Uniqueness pre-checks run first, but the store's unique indexes are
//!     authoritative when a concurrent writer slips between check and act.

use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    store::ReferralStore,
    types::{RecordId, Tier},
};

/// One row of the `referrals` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralRecord {
    pub id: RecordId,
    pub address: String,
    pub referral_code: Option<String>,
    pub tier: Tier,
    pub used_id: Option<RecordId>,
    pub created_at: String,
}

/// Outcome of a code validation.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeValidation {
    /// The code is bound to at least one record.
    Valid(Vec<ReferralRecord>),
    NotFound,
}

/// Outcome of a wallet registration.
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Created(ReferralRecord),
    /// The address already has a row. Idempotent — nothing was written.
    AlreadyRegistered,
}

pub struct ReferralService {
    store: ReferralStore,
}

impl ReferralService {
    pub fn new(store: ReferralStore) -> Self {
        Self { store }
    }

    /// Direct store access for the runner's summary and for tests.
    pub fn store(&self) -> &ReferralStore {
        &self.store
    }

    /// Loose validation: no format gate, case-insensitive lookup.
    pub fn validate_code(&self, code: &str) -> ApiResult<CodeValidation> {
        let matches = self.store.records_by_code(&normalize(code))?;
        if matches.is_empty() {
            Ok(CodeValidation::NotFound)
        } else {
            Ok(CodeValidation::Valid(matches))
        }
    }

    /// Strict validation: rejects non-alphanumeric codes before any store
    /// access, then looks up a single row.
    pub fn validate_code_strict(&self, code: &str) -> ApiResult<CodeValidation> {
        if !is_alphanumeric(code) {
            return Err(ApiError::InvalidCodeFormat);
        }
        match self.store.find_by_code(&normalize(code))? {
            Some(record) => Ok(CodeValidation::Valid(vec![record])),
            None => Ok(CodeValidation::NotFound),
        }
    }

    /// Register a wallet, optionally linking it to the owner of
    /// `referral_code`.
    ///
    /// The new row's tier is `referrer.tier + 1`; a missing referrer
    /// contributes tier 0, so an unreferred wallet lands at tier 1.
    pub fn register_wallet(
        &self,
        wallet_address: &str,
        referral_code: Option<&str>,
    ) -> ApiResult<Registration> {
        if wallet_address.is_empty() {
            return Err(ApiError::MissingWalletAddress);
        }

        if self.store.find_by_address(wallet_address)?.is_some() {
            return Ok(Registration::AlreadyRegistered);
        }

        let mut used_id: Option<RecordId> = None;
        let mut referrer_tier: Tier = 0;

        if let Some(code) = referral_code.filter(|c| !c.is_empty()) {
            match self.store.find_by_code(&normalize(code))? {
                Some(referrer) => {
                    used_id = Some(referrer.id);
                    referrer_tier = referrer.tier;
                }
                None => {
                    log::warn!("unknown referral code used by {wallet_address}");
                    return Err(ApiError::InvalidReferralCode);
                }
            }
        }

        match self
            .store
            .insert_wallet(wallet_address, referrer_tier + 1, used_id)
        {
            Ok(record) => {
                log::info!(
                    "registered wallet {} at tier {}",
                    record.address,
                    record.tier
                );
                Ok(Registration::Created(record))
            }
            // Lost the race on the address pre-check; the index decides.
            Err(e) if e.is_unique_violation() => Ok(Registration::AlreadyRegistered),
            Err(e) => Err(e),
        }
    }

    /// Claim `referral_code` for the wallet at `wallet_address` and return
    /// the updated row(s).
    pub fn assign_code(
        &self,
        wallet_address: &str,
        referral_code: &str,
    ) -> ApiResult<Vec<ReferralRecord>> {
        if wallet_address.is_empty() {
            return Err(ApiError::MissingWalletAddress);
        }
        if referral_code.is_empty() {
            return Err(ApiError::MissingReferralCode);
        }
        if !is_alphanumeric(referral_code) {
            return Err(ApiError::InvalidCodeFormat);
        }

        let code = normalize(referral_code);

        if self.store.find_by_code(&code)?.is_some() {
            log::warn!("code {code} already taken, rejecting {wallet_address}");
            return Err(ApiError::CodeAlreadyTaken);
        }

        let updated = match self.store.set_referral_code(wallet_address, &code) {
            Ok(rows) => rows,
            // Lost the race on the code pre-check; the index decides.
            Err(e) if e.is_unique_violation() => return Err(ApiError::CodeAlreadyTaken),
            Err(e) => return Err(e),
        };

        if updated.is_empty() {
            return Err(ApiError::WalletNotFound);
        }
        log::info!("wallet {wallet_address} claimed code {code}");
        Ok(updated)
    }
}

/// Codes are compared and stored lower-case.
fn normalize(code: &str) -> String {
    code.to_lowercase()
}

fn is_alphanumeric(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}
