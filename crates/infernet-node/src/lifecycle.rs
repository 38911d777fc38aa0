//! Node registration and activation lifecycle.
//!
//! A node moves through the coordinator-visible states
//! `inactive -> registered -> active`, and back to `inactive` on
//! deactivation. Each operation here is one-shot: it reads the coordinator's
//! view of the node, decides whether there is anything to do, performs at most
//! one state-changing call and persists the result locally.

use async_trait::async_trait;
use chrono::Utc;
use infernet_client::CoordinatorClient;
use infernet_core::{
    ActivateRequest, ActivationReceipt, NodeAddress, NodeError, NodeInfo, NodeStatus,
    RegisterRequest, RegistrationReceipt, RegistrationRecord, Result,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::NodeConfig;
use crate::state::RegistrationStore;
use crate::version::NODE_VERSION;

/// Coordinator operations the lifecycle depends on
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Base URL recorded alongside registrations
    fn url(&self) -> &str;

    /// Coordinator view of a node
    async fn node_info(&self, address: &NodeAddress) -> Result<NodeInfo>;

    /// Register a node
    async fn register(&self, request: &RegisterRequest) -> Result<RegistrationReceipt>;

    /// Activate a registered node
    async fn activate(
        &self,
        address: &NodeAddress,
        request: &ActivateRequest,
    ) -> Result<ActivationReceipt>;

    /// Deactivate a node
    async fn deactivate(&self, address: &NodeAddress) -> Result<NodeInfo>;
}

#[async_trait]
impl Coordinator for CoordinatorClient {
    fn url(&self) -> &str {
        self.base_url()
    }

    async fn node_info(&self, address: &NodeAddress) -> Result<NodeInfo> {
        self.nodes().info(address).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegistrationReceipt> {
        self.nodes().register(request).await
    }

    async fn activate(
        &self,
        address: &NodeAddress,
        request: &ActivateRequest,
    ) -> Result<ActivationReceipt> {
        self.nodes().activate(address, request).await
    }

    async fn deactivate(&self, address: &NodeAddress) -> Result<NodeInfo> {
        self.nodes().deactivate(address).await
    }
}

/// Result of [`NodeLifecycle::register`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum RegisterOutcome {
    /// The coordinator accepted a new registration
    Registered(RegistrationReceipt),
    /// The node was already registered and awaits activation
    AlreadyRegistered(NodeInfo),
    /// The node is already active
    AlreadyActive(NodeInfo),
}

/// Result of [`NodeLifecycle::activate`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum ActivateOutcome {
    /// The coordinator activated the node
    Activated(ActivationReceipt),
    /// The node was already active
    AlreadyActive(NodeInfo),
}

/// Result of [`NodeLifecycle::deactivate`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum DeactivateOutcome {
    /// The coordinator deactivated the node
    Deactivated(NodeInfo),
    /// There was nothing to deactivate
    AlreadyInactive,
}

/// Combined coordinator and local view of a node
#[derive(Debug, Clone, Serialize)]
pub struct NodeStatusReport {
    /// Coordinator view
    pub info: NodeInfo,
    /// Local registration record, if any
    pub record: Option<RegistrationRecord>,
    /// Seconds until activation is accepted
    pub cooldown_remaining_secs: u64,
}

/// Drives registration, activation and deactivation of one node
pub struct NodeLifecycle<C> {
    coordinator: C,
    store: RegistrationStore,
    address: NodeAddress,
    payment_address: Option<NodeAddress>,
    containers: Vec<String>,
    version: String,
}

impl<C: Coordinator> NodeLifecycle<C> {
    /// Create a lifecycle for `address`, persisting to `store`
    pub fn new(coordinator: C, store: RegistrationStore, address: NodeAddress) -> Self {
        Self {
            coordinator,
            store,
            address,
            payment_address: None,
            containers: Vec::new(),
            version: NODE_VERSION.to_string(),
        }
    }

    /// Create a lifecycle from a validated configuration
    pub fn from_config(coordinator: C, config: &NodeConfig) -> Result<Self> {
        let store = RegistrationStore::new(config.state_path()?);
        Ok(Self::new(coordinator, store, config.node_address()?)
            .with_payment_address(config.payment_address()?)
            .with_containers(config.container_ids()))
    }

    /// Set the payment address announced at registration
    #[must_use]
    pub fn with_payment_address(mut self, address: Option<NodeAddress>) -> Self {
        self.payment_address = address;
        self
    }

    /// Set the container ids announced at registration
    #[must_use]
    pub fn with_containers(mut self, containers: Vec<String>) -> Self {
        self.containers = containers;
        self
    }

    /// Node address this lifecycle manages
    #[must_use]
    pub const fn address(&self) -> &NodeAddress {
        &self.address
    }

    /// Backing registration store
    #[must_use]
    pub const fn store(&self) -> &RegistrationStore {
        &self.store
    }

    /// Register the node with the coordinator.
    ///
    /// Re-running against a node that is already registered or active changes
    /// nothing on the coordinator and only refreshes the local record.
    #[instrument(skip(self), fields(address = %self.address))]
    pub async fn register(&self) -> Result<RegisterOutcome> {
        let info = self.coordinator.node_info(&self.address).await?;

        match info.status {
            NodeStatus::Active => {
                warn!("Node is already active, skipping registration");
                self.refresh_record(&info)?;
                Ok(RegisterOutcome::AlreadyActive(info))
            }
            NodeStatus::Registered => {
                info!("Node is already registered, awaiting activation");
                self.refresh_record(&info)?;
                Ok(RegisterOutcome::AlreadyRegistered(info))
            }
            NodeStatus::Inactive => {
                info.status.ensure_transition(NodeStatus::Registered)?;

                let request = RegisterRequest {
                    address: self.address.clone(),
                    payment_address: self.payment_address.clone(),
                    version: self.version.clone(),
                    containers: self.containers.clone(),
                };
                let receipt = self.coordinator.register(&request).await?;

                if receipt.address != self.address {
                    return Err(NodeError::Internal(format!(
                        "coordinator registered {}, expected {}",
                        receipt.address, self.address
                    )));
                }

                let record = RegistrationRecord::from_receipt(&receipt, self.coordinator.url());
                self.store.save(&record)?;

                info!(
                    registration_id = %receipt.registration_id,
                    cooldown_secs = receipt.cooldown_secs,
                    state = %self.store.path().display(),
                    "Node registered"
                );
                Ok(RegisterOutcome::Registered(receipt))
            }
        }
    }

    /// Activate a previously registered node
    #[instrument(skip(self), fields(address = %self.address))]
    pub async fn activate(&self) -> Result<ActivateOutcome> {
        let mut record = self.store.load()?.ok_or_else(|| NodeError::NotRegistered {
            address: self.address.to_string(),
        })?;

        if record.address != self.address {
            return Err(NodeError::Config(format!(
                "registration record {} belongs to {}, but the configured node is {}",
                self.store.path().display(),
                record.address,
                self.address
            )));
        }

        let info = self.coordinator.node_info(&self.address).await?;

        match info.status {
            NodeStatus::Active => {
                warn!("Node is already active");
                if record.activated_at.is_none() {
                    record.activated_at = Some(Utc::now());
                    self.store.save(&record)?;
                }
                Ok(ActivateOutcome::AlreadyActive(info))
            }
            NodeStatus::Inactive => Err(NodeError::NotRegistered {
                address: self.address.to_string(),
            }),
            NodeStatus::Registered => {
                let remaining = info.cooldown_remaining(Utc::now());
                if remaining > 0 {
                    return Err(NodeError::CooldownPending {
                        remaining_secs: remaining,
                    });
                }

                if let Some(id) = &info.registration_id {
                    if *id != record.registration_id {
                        return Err(NodeError::State(format!(
                            "local registration {} does not match coordinator registration {id}; \
                             run `register` again",
                            record.registration_id
                        )));
                    }
                }

                let request = ActivateRequest {
                    registration_id: record.registration_id.clone(),
                };
                let receipt = self.coordinator.activate(&self.address, &request).await?;

                record.activated_at = Some(receipt.activated_at);
                self.store.save(&record)?;

                info!(activated_at = %receipt.activated_at, "Node activated");
                Ok(ActivateOutcome::Activated(receipt))
            }
        }
    }

    /// Deactivate the node and drop the local record.
    ///
    /// Deactivating a node that is already inactive succeeds.
    #[instrument(skip(self), fields(address = %self.address))]
    pub async fn deactivate(&self) -> Result<DeactivateOutcome> {
        let info = self.coordinator.node_info(&self.address).await?;

        if info.status == NodeStatus::Inactive {
            info!("Node is already inactive");
            self.store.clear()?;
            return Ok(DeactivateOutcome::AlreadyInactive);
        }

        info.status.ensure_transition(NodeStatus::Inactive)?;
        let updated = self.coordinator.deactivate(&self.address).await?;
        self.store.clear()?;

        info!(previous = %info.status, "Node deactivated");
        Ok(DeactivateOutcome::Deactivated(updated))
    }

    /// Report coordinator and local state
    #[instrument(skip(self), fields(address = %self.address))]
    pub async fn status(&self) -> Result<NodeStatusReport> {
        let info = self.coordinator.node_info(&self.address).await?;
        let record = self.store.load()?;
        let cooldown_remaining_secs = match info.status {
            NodeStatus::Registered => info.cooldown_remaining(Utc::now()),
            _ => 0,
        };

        Ok(NodeStatusReport {
            info,
            record,
            cooldown_remaining_secs,
        })
    }

    /// Bring the local record in line with the coordinator's view
    fn refresh_record(&self, info: &NodeInfo) -> Result<()> {
        let existing = self.store.load()?;

        if let Some(mut record) = existing {
            let same = record.address == info.address
                && info
                    .registration_id
                    .as_ref()
                    .is_none_or(|id| *id == record.registration_id);
            if same {
                if info.status == NodeStatus::Active && record.activated_at.is_none() {
                    record.activated_at = Some(Utc::now());
                    self.store.save(&record)?;
                }
                return Ok(());
            }
        }

        match RegistrationRecord::from_info(info, self.coordinator.url(), Utc::now()) {
            Some(record) => self.store.save(&record),
            None => {
                warn!("Coordinator reported no registration id, local record not updated");
                Ok(())
            }
        }
    }
}
