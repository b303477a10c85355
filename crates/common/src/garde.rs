mod rules;
mod validate;

pub use rules::*;
pub use validate::*;
