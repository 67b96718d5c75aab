//! CLI command implementations

pub mod hash_password;
pub mod init;
pub mod relay;
pub mod status;
pub mod validate;
