//! Graph layer: version resolution, tree views, neighbors and shortest path.

pub mod neighbors;
pub mod node;
pub mod queue;
pub mod resolver;
pub mod shortest_path;
pub mod tree;

pub use neighbors::NeighborResolver;
pub use node::{NodeKind, SerializedTreeNode, TreeNode};
pub use queue::FrontierQueue;
pub use resolver::TopicResolver;
pub use shortest_path::{SearchStats, ShortestPathEngine, ShortestPathResult};
pub use tree::TreeBuilder;
