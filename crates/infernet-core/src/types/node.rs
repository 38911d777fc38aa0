use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NodeError;

/// Number of bytes in a node address
pub const ADDRESS_LEN: usize = 20;

/// Node identity as known to the coordinator: `0x` followed by 40 hex digits.
///
/// Parsing accepts either case; the stored form is lower-case so that two
/// spellings of the same address compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeAddress(String);

impl NodeAddress {
    /// Get the canonical `0x`-prefixed lower-case form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the all-zero address
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0[2..].bytes().all(|b| b == b'0')
    }
}

impl FromStr for NodeAddress {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| NodeError::InvalidAddress(format!("{s}: missing 0x prefix")))?;

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(NodeError::InvalidAddress(format!(
                "{s}: expected {} hex digits, got {}",
                ADDRESS_LEN * 2,
                digits.len()
            )));
        }

        let mut buf = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut buf)
            .map_err(|e| NodeError::InvalidAddress(format!("{s}: {e}")))?;

        Ok(Self(format!("0x{}", hex::encode(buf))))
    }
}

impl TryFrom<String> for NodeAddress {
    type Error = NodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeAddress> for String {
    fn from(value: NodeAddress) -> Self {
        value.0
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coordinator-side status of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Unknown to the coordinator, or deactivated
    #[default]
    Inactive,
    /// Registered, waiting for activation
    Registered,
    /// Eligible to receive work
    Active,
}

impl NodeStatus {
    /// Returns true if the lifecycle allows moving from `self` to `next`
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Inactive, Self::Registered)
                | (Self::Registered, Self::Active)
                | (Self::Registered | Self::Active, Self::Inactive)
        )
    }

    /// Check a transition, returning [`NodeError::InvalidTransition`] if it is not allowed
    pub fn ensure_transition(self, next: Self) -> crate::Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(NodeError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Registered => write!(f, "registered"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// Coordinator view of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Node address
    pub address: NodeAddress,

    /// Current status
    #[serde(default)]
    pub status: NodeStatus,

    /// Identifier issued at registration
    #[serde(default)]
    pub registration_id: Option<String>,

    /// When the activation cooldown started
    #[serde(default)]
    pub cooldown_start: Option<DateTime<Utc>>,

    /// Length of the activation cooldown in seconds
    #[serde(default)]
    pub cooldown_secs: u64,
}

impl NodeInfo {
    /// Info for a node the coordinator has no record of
    #[must_use]
    pub const fn inactive(address: NodeAddress) -> Self {
        Self {
            address,
            status: NodeStatus::Inactive,
            registration_id: None,
            cooldown_start: None,
            cooldown_secs: 0,
        }
    }

    /// Seconds left before activation is accepted, zero once the cooldown is over
    #[must_use]
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> u64 {
        let Some(start) = self.cooldown_start else {
            return 0;
        };
        let elapsed = now.signed_duration_since(start).num_seconds().max(0);
        self.cooldown_secs.saturating_sub(elapsed.unsigned_abs())
    }

    /// Earliest time at which activation is accepted
    #[must_use]
    pub fn activatable_at(&self) -> Option<DateTime<Utc>> {
        let delta = chrono::TimeDelta::try_seconds(i64::try_from(self.cooldown_secs).ok()?)?;
        self.cooldown_start?.checked_add_signed(delta)
    }
}
