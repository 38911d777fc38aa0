//! Node lifecycle endpoints.

use crate::CoordinatorClient;
use infernet_core::{
    ActivateRequest, ActivationReceipt, NodeAddress, NodeError, NodeInfo, RegisterRequest,
    RegistrationReceipt, Result,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Node lifecycle endpoints
pub struct NodesApi<'a> {
    client: &'a CoordinatorClient,
}

#[derive(Serialize)]
struct Empty {}

impl<'a> NodesApi<'a> {
    pub(crate) fn new(client: &'a CoordinatorClient) -> Self {
        Self { client }
    }

    /// Get the coordinator's view of a node.
    ///
    /// A node the coordinator has never seen is reported as inactive rather
    /// than as an error.
    #[instrument(skip(self), fields(address = %address))]
    pub async fn info(&self, address: &NodeAddress) -> Result<NodeInfo> {
        match self.client.get(&format!("/api/v1/nodes/{address}")).await {
            Err(NodeError::NotFound { .. }) => {
                debug!("Node unknown to coordinator");
                Ok(NodeInfo::inactive(address.clone()))
            }
            other => other,
        }
    }

    /// Register a node
    #[instrument(skip(self, request), fields(address = %request.address))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegistrationReceipt> {
        self.client.post("/api/v1/nodes", request).await
    }

    /// Activate a registered node
    #[instrument(skip(self, request), fields(address = %address))]
    pub async fn activate(
        &self,
        address: &NodeAddress,
        request: &ActivateRequest,
    ) -> Result<ActivationReceipt> {
        self.client
            .post(&format!("/api/v1/nodes/{address}/activate"), request)
            .await
    }

    /// Deactivate a node, returning its updated info
    #[instrument(skip(self), fields(address = %address))]
    pub async fn deactivate(&self, address: &NodeAddress) -> Result<NodeInfo> {
        self.client
            .post(&format!("/api/v1/nodes/{address}/deactivate"), &Empty {})
            .await
    }
}
