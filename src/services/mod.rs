pub mod client;
pub mod registry;
