//! Wire messages for `billing.BillingService`
//!
//! ```proto
//! service BillingService {
//!   rpc CreateBillingAccount (BillingRequest) returns (BillingResponse);
//! }
//! message BillingRequest  { string patientId = 1; string name = 2; string email = 3; }
//! message BillingResponse { string accountId = 1; string status = 2; }
//! ```

/// Fully qualified method path
pub const CREATE_BILLING_ACCOUNT_PATH: &str = "/billing.BillingService/CreateBillingAccount";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BillingRequest {
    #[prost(string, tag = "1")]
    pub patient_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub email: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BillingResponse {
    #[prost(string, tag = "1")]
    pub account_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub status: ::prost::alloc::string::String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_request_field_numbers() {
        let request = BillingRequest {
            patient_id: "p".to_string(),
            name: String::new(),
            email: String::new(),
        };
        // field 1, wire type 2 (length-delimited), length 1, "p"
        assert_eq!(request.encode_to_vec(), vec![0x0a, 0x01, b'p']);
    }

    #[test]
    fn test_response_decodes() {
        // field 1 "1233456", field 2 "ACTIVE"
        let mut bytes = vec![0x0a, 0x07];
        bytes.extend_from_slice(b"1233456");
        bytes.extend_from_slice(&[0x12, 0x06]);
        bytes.extend_from_slice(b"ACTIVE");

        let response = BillingResponse::decode(bytes.as_slice()).unwrap();
        assert_eq!(response.account_id, "1233456");
        assert_eq!(response.status, "ACTIVE");
    }
}
