//! Block Kit payload types and the fixed report layout.
//!
//! Only the shapes the bot sends are modeled: mrkdwn section blocks and
//! dividers. Serialization matches the Slack wire format exactly.

use serde::{Deserialize, Serialize};

/// A Block Kit block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A section block with mrkdwn text.
    Section {
        /// Block text.
        text: TextObject,
    },
    /// A divider block.
    Divider,
}

impl Block {
    /// Section block from mrkdwn text.
    #[must_use]
    pub fn section(text: &str) -> Self {
        Self::Section {
            text: TextObject::mrkdwn(text),
        }
    }
}

/// A Block Kit text object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    /// Text type, always `mrkdwn` for the bot's blocks.
    #[serde(rename = "type")]
    pub kind: String,
    /// The text itself.
    pub text: String,
}

impl TextObject {
    /// Mrkdwn text object.
    #[must_use]
    pub fn mrkdwn(text: &str) -> Self {
        Self {
            kind: "mrkdwn".to_string(),
            text: text.to_string(),
        }
    }
}

/// Render one owner's device report.
///
/// The layout is invariant regardless of fragment count: title section,
/// divider, body section (fragments joined by `","`), divider, footer
/// section.
#[must_use]
pub fn render_device_report(title: &str, fragments: &[String], footer: &str) -> Vec<Block> {
    vec![
        Block::section(title),
        Block::Divider,
        Block::section(&fragments.join(",")),
        Block::Divider,
        Block::section(footer),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
