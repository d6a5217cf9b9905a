mod nodes;

pub use nodes::NodeRepository;
