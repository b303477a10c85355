pub mod domain;
pub mod dynamodb;
pub mod garde;
pub mod telemetry;

pub use domain::*;

// Re-export mocks when testing feature is enabled
#[cfg(any(test, feature = "testing"))]
pub use domain::MockDeviceRepository;
#[cfg(any(test, feature = "testing"))]
pub use dynamodb::MockKeyValueStore;
