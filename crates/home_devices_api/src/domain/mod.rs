pub mod device_rules;
pub mod device_service;

pub use device_rules::*;
pub use device_service::*;
