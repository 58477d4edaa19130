//! # nudge-core
//!
//! Foundation types and pure logic for the nudge bot.
//!
//! This crate provides the shared vocabulary the other nudge crates depend on:
//!
//! - **Device types**: `Policy`, `DeviceComplianceStatus`, `ComplianceState`,
//!   `ManagedDevice`, serde mirrors of the Microsoft Graph wire shapes
//! - **Message book**: insertion-ordered mapping from device owner to the
//!   message fragments collected for that owner during a run
//! - **Retry**: `RetryConfig` and the backoff/`Retry-After` math used when
//!   authenticating against Graph

#![deny(unsafe_code)]

pub mod device;
pub mod messages;
pub mod retry;

pub use device::{ComplianceState, DeviceComplianceStatus, ManagedDevice, Policy};
pub use messages::{MessageBook, format_fragment};
pub use retry::{RetryConfig, calculate_backoff_delay, parse_retry_after_header};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
