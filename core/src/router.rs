//! Maps parsed requests to service operations and shapes JSON responses.
//!
//! The HTTP gateway itself is an external collaborator; this router is the
//! whole request surface it drives. Response bodies and message strings
//! follow the deployed service per endpoint, including where endpoints
//! historically disagreed (the loose validate answers 200 on a miss, the
//! strict one answers 404).

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::ApiError,
    service::{CodeValidation, ReferralService, Registration},
};

/// Greeting served on `/` and `/test`.
pub const GREETING: &str = "safu extension referrals";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
}

/// An inbound request, already parsed off the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// The response handed back to the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }
}

pub struct Router {
    service: ReferralService,
}

impl Router {
    pub fn new(service: ReferralService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ReferralService {
        &self.service
    }

    pub fn dispatch(&self, req: &ApiRequest) -> ApiResponse {
        match (req.method, req.path.as_str()) {
            (Method::Get, "/") | (Method::Get, "/test") => {
                ApiResponse::new(200, json!(GREETING))
            }
            (Method::Get, path) if path.starts_with("/validate/") => {
                self.validate(&path["/validate/".len()..])
            }
            (Method::Get, path) if path.starts_with("/validating/") => {
                self.validating(&path["/validating/".len()..])
            }
            (Method::Post, "/check-wallet-referral-code") => self.check_wallet(&req.body),
            (Method::Post, "/set-referral-code") => self.set_referral_code(&req.body),
            _ => ApiResponse::new(404, json!({ "error": "Not found." })),
        }
    }

    // ── Handlers ──────────────────────────────────────────────────

    fn validate(&self, code: &str) -> ApiResponse {
        match self.service.validate_code(code) {
            Ok(CodeValidation::Valid(records)) => ApiResponse::new(
                200,
                json!({
                    "success": true,
                    "message": format!("{code} is valid."),
                    "data": records,
                }),
            ),
            Ok(CodeValidation::NotFound) => ApiResponse::new(
                200,
                json!({
                    "success": false,
                    "message": format!("{code} is not valid."),
                }),
            ),
            Err(err) => {
                log::error!("validate {code}: {err}");
                ApiResponse::new(500, json!({ "error": err.to_string() }))
            }
        }
    }

    fn validating(&self, code: &str) -> ApiResponse {
        match self.service.validate_code_strict(code) {
            Ok(CodeValidation::Valid(records)) => ApiResponse::new(
                200,
                json!({
                    "success": true,
                    "message": format!("{code} is valid."),
                    "data": records.first(),
                }),
            ),
            Ok(CodeValidation::NotFound) => ApiResponse::new(
                404,
                json!({
                    "success": false,
                    "message": format!("{code} is not valid."),
                }),
            ),
            Err(ApiError::InvalidCodeFormat) => ApiResponse::new(
                400,
                json!({ "error": "Invalid referral code format." }),
            ),
            Err(err) => {
                log::error!("validating {code}: {err}");
                ApiResponse::new(500, json!({ "error": "Internal Server Error" }))
            }
        }
    }

    fn check_wallet(&self, body: &serde_json::Value) -> ApiResponse {
        let wallet_address = body["walletAddress"].as_str().unwrap_or_default();
        let referral_code = body["referralCode"].as_str();

        match self.service.register_wallet(wallet_address, referral_code) {
            Ok(Registration::AlreadyRegistered) => {
                ApiResponse::new(200, json!({ "message": "Wallet already exists." }))
            }
            Ok(Registration::Created(record)) => ApiResponse::new(
                201,
                json!({
                    "message": "Wallet connected and added to the database.",
                    "wallet": [record],
                }),
            ),
            Err(ApiError::MissingWalletAddress) => {
                ApiResponse::new(400, json!({ "error": "Wallet address is required" }))
            }
            Err(ApiError::InvalidReferralCode) => {
                ApiResponse::new(400, json!({ "error": "Invalid referral code." }))
            }
            Err(err) => {
                log::error!("check-wallet-referral-code: {err}");
                ApiResponse::new(
                    500,
                    json!({
                        "error": "Error adding wallet to the database.",
                        "message": err.to_string(),
                    }),
                )
            }
        }
    }

    fn set_referral_code(&self, body: &serde_json::Value) -> ApiResponse {
        let wallet_address = body["walletAddress"].as_str().unwrap_or_default();
        let referral_code = body["referralCode"].as_str().unwrap_or_default();

        match self.service.assign_code(wallet_address, referral_code) {
            Ok(updated) => ApiResponse::new(
                200,
                json!({
                    "success": true,
                    "message": "Referral code updated successfully.",
                    "updated": updated,
                }),
            ),
            Err(ApiError::WalletNotFound) => {
                ApiResponse::new(404, json!({ "error": "Wallet address not found." }))
            }
            Err(
                err @ (ApiError::MissingWalletAddress
                | ApiError::MissingReferralCode
                | ApiError::InvalidCodeFormat
                | ApiError::CodeAlreadyTaken),
            ) => ApiResponse::new(400, json!({ "error": err.to_string() })),
            Err(err) => {
                log::error!("set-referral-code: {err}");
                ApiResponse::new(
                    500,
                    json!({
                        "error": "Failed to update referral code.",
                        "message": err.to_string(),
                    }),
                )
            }
        }
    }
}
