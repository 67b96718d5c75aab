//! gRPC billing client
//!
//! Unary call to `billing.BillingService/CreateBillingAccount` over a lazily
//! connected tonic channel. One attempt per call; retries are applied by the caller.

use super::proto::{BillingRequest, BillingResponse, CREATE_BILLING_ACCOUNT_PATH};
use super::traits::BillingProvisioner;
use crate::config::BillingConfig;
use crate::domain::{BillingAccount, PatientId, ProvisioningError};
use async_trait::async_trait;
use std::time::Duration;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

/// Billing provisioner backed by the billing gRPC service
#[derive(Clone)]
pub struct GrpcBillingClient {
    channel: Channel,
    endpoint: String,
}

impl GrpcBillingClient {
    /// Create a client; no connection is made until the first call
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ProvisioningError::Configuration` if the endpoint is not a valid URI.
    pub fn new(config: &BillingConfig) -> Result<Self, ProvisioningError> {
        let channel = Endpoint::from_shared(config.endpoint.clone())
            .map_err(|e| {
                ProvisioningError::Configuration(format!(
                    "Invalid billing endpoint '{}': {e}",
                    config.endpoint
                ))
            })?
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_lazy();

        tracing::info!(endpoint = %config.endpoint, "Billing gRPC client configured");

        Ok(Self {
            channel,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BillingProvisioner for GrpcBillingClient {
    async fn create_billing_account(
        &self,
        patient_id: &PatientId,
        name: &str,
        email: &str,
    ) -> Result<BillingAccount, ProvisioningError> {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| ProvisioningError::Unavailable(format!("Service was not ready: {e}")))?;

        let request = tonic::Request::new(BillingRequest {
            patient_id: patient_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        });
        let codec = ProstCodec::<BillingRequest, BillingResponse>::default();
        let path = PathAndQuery::from_static(CREATE_BILLING_ACCOUNT_PATH);

        let response = grpc
            .unary(request, path, codec)
            .await
            .map_err(status_to_error)?
            .into_inner();

        if response.account_id.is_empty() {
            return Err(ProvisioningError::InvalidResponse(
                "Billing service returned an empty account id".to_string(),
            ));
        }

        tracing::debug!(
            patient_id = %patient_id,
            account_id = %response.account_id,
            status = %response.status,
            "Billing account created"
        );

        Ok(BillingAccount::new(response.account_id, response.status))
    }
}

/// Maps a gRPC status to a provisioning error
///
/// Transport-level and transient codes are retryable; everything else is a rejection.
pub fn status_to_error(status: Status) -> ProvisioningError {
    match status.code() {
        Code::Unavailable
        | Code::DeadlineExceeded
        | Code::Cancelled
        | Code::ResourceExhausted
        | Code::Aborted
        | Code::Unknown => {
            ProvisioningError::Unavailable(format!("{:?}: {}", status.code(), status.message()))
        }
        code => ProvisioningError::Rejected {
            code: format!("{code:?}"),
            message: status.message().to_string(),
        },
    }
}
