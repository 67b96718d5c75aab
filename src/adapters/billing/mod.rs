//! Billing provisioner client

pub mod grpc;
pub mod proto;
pub mod traits;

pub use grpc::GrpcBillingClient;
pub use traits::BillingProvisioner;
