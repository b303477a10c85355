pub mod domain;
pub mod lambda;

pub use domain::*;
pub use lambda::*;
