pub mod algorithms;
pub mod item;
pub mod node;
pub mod rectangle;
#[allow(clippy::module_inception)]
pub mod rtree;

// 重新导出主要类型
pub use algorithms::debug::InvariantViolation;
pub use item::StoredItem;
pub use node::{Node, NodeId, NodeKind};
pub use rectangle::{Point, Rectangle};
pub use rtree::{RTree, TreeError};
