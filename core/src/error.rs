use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Wallet address is required.")]
    MissingWalletAddress,

    #[error("Referral code is required.")]
    MissingReferralCode,

    #[error("Referral code must contain only alphanumeric characters.")]
    InvalidCodeFormat,

    #[error("Invalid referral code.")]
    InvalidReferralCode,

    #[error("Referral code already exists. Please use a unique code.")]
    CodeAlreadyTaken,

    #[error("Wallet address not found.")]
    WalletNotFound,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// True when the underlying SQLite error is a UNIQUE constraint hit.
    /// The service maps these to the same outcomes as its pre-checks.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            ApiError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
