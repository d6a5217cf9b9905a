mod turn;

pub use turn::MemoryCore;
