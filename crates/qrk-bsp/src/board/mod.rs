pub mod galileo_gen2;
pub use galileo_gen2::*;
