mod client;
mod config;
mod device_repository;
mod dynamodb_store;
mod expression;
mod in_memory_store;
mod store;

pub use client::*;
pub use config::*;
pub use device_repository::*;
pub use dynamodb_store::*;
pub use expression::*;
pub use in_memory_store::*;
pub use store::*;
