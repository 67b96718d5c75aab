//! Record store abstraction and implementations

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_patient_store;
pub use memory::InMemoryPatientStore;
pub use traits::PatientStore;
