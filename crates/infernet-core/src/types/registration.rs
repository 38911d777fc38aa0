use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::{NodeAddress, NodeInfo, NodeStatus};

/// Request body for registering a node with the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Node address being registered
    pub address: NodeAddress,

    /// Address that receives payments for work done by the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_address: Option<NodeAddress>,

    /// Version of the node software
    pub version: String,

    /// Ids of the containers this node serves
    #[serde(default)]
    pub containers: Vec<String>,
}

/// Coordinator response to a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    /// Registered node address
    pub address: NodeAddress,

    /// Identifier needed to activate the node later
    pub registration_id: String,

    /// Status after registration
    #[serde(default = "registered")]
    pub status: NodeStatus,

    /// When the coordinator accepted the registration
    pub registered_at: DateTime<Utc>,

    /// Seconds that must pass before activation is accepted
    #[serde(default)]
    pub cooldown_secs: u64,
}

const fn registered() -> NodeStatus {
    NodeStatus::Registered
}

/// Request body for activating a registered node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateRequest {
    /// Identifier returned at registration
    pub registration_id: String,
}

/// Coordinator response to a successful activation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationReceipt {
    /// Activated node address
    pub address: NodeAddress,

    /// Status after activation
    #[serde(default = "active")]
    pub status: NodeStatus,

    /// When the coordinator activated the node
    pub activated_at: DateTime<Utc>,
}

const fn active() -> NodeStatus {
    NodeStatus::Active
}

/// Locally persisted proof of registration.
///
/// Written by `register`, read by `activate`, removed by `deactivate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Registered node address
    pub address: NodeAddress,

    /// Identifier issued by the coordinator
    pub registration_id: String,

    /// Coordinator the node registered with
    pub coordinator_url: String,

    /// When the registration was accepted
    pub registered_at: DateTime<Utc>,

    /// When the node was activated, if it has been
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
}

impl RegistrationRecord {
    /// Build a record from a registration receipt
    #[must_use]
    pub fn from_receipt(receipt: &RegistrationReceipt, coordinator_url: impl Into<String>) -> Self {
        Self {
            address: receipt.address.clone(),
            registration_id: receipt.registration_id.clone(),
            coordinator_url: coordinator_url.into(),
            registered_at: receipt.registered_at,
            activated_at: None,
        }
    }

    /// Rebuild a record from coordinator info, for nodes registered elsewhere
    /// or whose state file was lost.
    ///
    /// Returns `None` if the coordinator did not report a registration id.
    #[must_use]
    pub fn from_info(
        info: &NodeInfo,
        coordinator_url: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let registration_id = info.registration_id.clone()?;
        Some(Self {
            address: info.address.clone(),
            registration_id,
            coordinator_url: coordinator_url.into(),
            registered_at: info.cooldown_start.unwrap_or(now),
            activated_at: (info.status == NodeStatus::Active).then_some(now),
        })
    }

    /// Returns true once the node has been activated
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.activated_at.is_some()
    }
}
