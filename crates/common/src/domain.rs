mod device;
mod result;

pub use device::*;
pub use result::*;
