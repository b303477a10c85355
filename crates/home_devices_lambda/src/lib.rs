pub mod bootstrap;
pub mod config;
pub mod deadline;
pub mod http;
pub mod listener;
