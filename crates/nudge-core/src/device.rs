//! Device-management wire types.
//!
//! Serde mirrors of the Microsoft Graph shapes the bot consumes. Field names
//! are camelCase on the wire; unknown fields are ignored so Graph can add
//! properties without breaking deserialization.

use serde::{Deserialize, Serialize};

/// A device compliance policy.
///
/// Read-only snapshot of the Graph `deviceCompliancePolicy` resource,
/// reduced to the fields the bot consumes. Lives for one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Policy id assigned by Graph.
    pub id: String,
    /// Human-readable description; becomes the body of a message fragment.
    #[serde(default)]
    pub description: String,
    /// Display name, used for prefix filtering when configured.
    #[serde(default)]
    pub display_name: String,
}

/// Evaluation result of one device against one policy.
///
/// Graph `deviceComplianceDeviceStatus` resource, reduced to the fields the
/// bot consumes. `user_name` is the owner key used for chat delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceComplianceStatus {
    /// Compliance state for this (policy, device) pair.
    pub status: ComplianceState,
    /// Device display name.
    #[serde(default)]
    pub device_display_name: String,
    /// Device model.
    #[serde(default)]
    pub device_model: String,
    /// Owning user's email/username, the chat-recipient key.
    #[serde(default)]
    pub user_name: String,
}

/// Compliance state values as Graph reports them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComplianceState {
    /// State not yet evaluated.
    Unknown,
    /// Policy does not apply to this device.
    NotApplicable,
    /// Device satisfies the policy.
    Compliant,
    /// Device was brought into compliance by a remediation action.
    Remediated,
    /// Device violates the policy.
    NonCompliant,
    /// Evaluation errored.
    Error,
    /// Conflicting policy assignments.
    Conflict,
}

impl ComplianceState {
    /// Whether this state selects the device for notification.
    ///
    /// Only `compliant` qualifies; `remediated` does not.
    #[must_use]
    pub const fn is_compliant(self) -> bool {
        matches!(self, Self::Compliant)
    }
}

/// A managed device record.
///
/// Returned by the device read operations (`list_devices` / `get_device`),
/// which exist for completeness alongside the compliance reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDevice {
    /// Device id assigned by Graph.
    pub id: String,
    /// Device name.
    #[serde(default)]
    pub device_name: String,
    /// Owning user's id.
    #[serde(default)]
    pub user_id: String,
    /// Owning user's email address.
    #[serde(default)]
    pub email_address: String,
    /// Ownership type (`company`, `personal`, ...). Kept as a string;
    /// the bot never branches on it.
    #[serde(default)]
    pub managed_device_owner_type: String,
    /// Serial number.
    #[serde(default)]
    pub serial_number: String,
    /// Manufacturer.
    #[serde(default)]
    pub manufacturer: String,
    /// Whether storage is encrypted.
    #[serde(default)]
    pub is_encrypted: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
