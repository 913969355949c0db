//! Registry adapter module
//!
//! - `types`: service record and the adapter contract
//! - `adapter`: etcd-backed adapter
//! - `factory`: adapter construction and the scheme -> factory table
//! - `error`: adapter error kinds

pub mod adapter;
pub mod error;
pub mod factory;
pub mod types;

// Re-export public types for easier access
pub use adapter::{EtcdAdapter, service_key};
pub use error::AdapterError;
pub use factory::{
    AdapterFactory, AdapterRegistry, ETCD_TLS_SCHEME, EtcdTlsFactory, endpoints_for, key_prefix,
};
pub use types::{RegistryAdapter, ServiceRecord};
