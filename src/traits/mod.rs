mod search_tree;
pub use search_tree::{NodeId, SearchTree};

mod order_statistics;
pub use order_statistics::OrderStatistics;
