//! # nudge-chat
//!
//! Slack Web API client for direct-message delivery.
//!
//! Three calls make up a delivery: `users.lookupByEmail` resolves the
//! recipient, `conversations.open` opens (or reuses) the one-to-one channel,
//! `chat.postMessage` posts the Block Kit payload. A failure at any step is
//! reported as [`ChatError::Delivery`] naming the step.
//!
//! No retries; any transport or API error surfaces immediately.

#![deny(unsafe_code)]

pub mod blocks;
pub mod client;
pub mod errors;

pub use blocks::{Block, TextObject, render_device_report};
pub use client::{ChatClient, UserHandle};
pub use errors::{ChatError, DeliveryStep};
