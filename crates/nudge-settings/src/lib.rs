//! # nudge-settings
//!
//! Configuration management with layered sources for the nudge bot.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`NudgeSettings::default()`]
//! 2. **User file**: `~/.nudge/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `NUDGE_*` overrides (highest priority)
//!
//! Secrets (tenant id, client id, client secret, chat token) are NOT part of
//! the settings file; they come from the env file or Secret Manager via the
//! `nudge-secrets` crate. Settings only carry where to look for them.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
