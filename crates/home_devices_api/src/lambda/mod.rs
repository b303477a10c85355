pub mod device_handler;
pub mod home_device_listener;
pub mod response;

pub use device_handler::*;
pub use home_device_listener::*;
pub use response::*;
