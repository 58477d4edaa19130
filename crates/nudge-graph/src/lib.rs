//! # nudge-graph
//!
//! Microsoft Graph device-management client.
//!
//! Authenticates once with the OAuth2 client-credentials grant (scope
//! `https://graph.microsoft.com/.default`), retrying the token request with
//! bounded exponential backoff (max 3 retries, 30s delay cap). The
//! authenticated client then exposes single-page reads over the
//! device-management resources:
//!
//! - compliance policies
//! - per-policy device compliance statuses
//! - managed devices (list + by id)
//!
//! Reads are not retried; any failure surfaces as [`GraphError`].

#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod errors;

pub use client::{GraphClient, GraphConfig};
pub use errors::GraphError;
