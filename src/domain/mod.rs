pub mod node;
pub mod timestamp;
pub mod types;

pub use node::{InventoryStats, Node, NodeStatus};
pub use types::{Ack, CreateNodeRequest, Health, ReserveNodeRequest};
