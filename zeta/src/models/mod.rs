mod common;
mod domain;
mod node;
mod turn;

pub use common::*;
pub use domain::*;
pub use node::*;
pub use turn::*;
