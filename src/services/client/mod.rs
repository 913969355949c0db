pub mod config;
pub mod error;
pub mod etcd;
pub mod store;
pub mod types;

pub use config::*;
pub use error::*;
pub use etcd::EtcdClient;
pub use store::StoreClient;
pub use types::{EtcdResponse, Node, RawRequest, RawResponse};
