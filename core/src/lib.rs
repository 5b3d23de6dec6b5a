//! referral-core — referral-code management over a single `referrals` table.
//!
//! Layering, outermost first:
//!   - [`router`]  maps parsed requests to operations and shapes JSON responses.
//!   - [`service`] the referral graph write protocol and its invariants.
//!   - [`store`]   the only module that talks to SQLite.
//!
//! The HTTP gateway that feeds the router is an external collaborator; see
//! the `api-runner` binary for the JSON-lines stand-in.

pub mod config;
pub mod error;
pub mod router;
pub mod service;
pub mod store;
pub mod types;
