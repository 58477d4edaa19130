//! # nudge-bot
//!
//! Run pipeline for the device-compliance notification bot. The binary in
//! `main.rs` wires settings, credentials, and the two API clients into the
//! steps exposed here; the steps are a library so the integration tests can
//! drive them against mock servers.

#![deny(unsafe_code)]

pub mod pipeline;
