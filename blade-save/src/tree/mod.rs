//! Property tree codec
//!
//! - `build` - Decoding a tag stream into a property tree
//! - `write` - Encoding a property tree back into a tag stream
//! - `size` - Encoded lengths of tree nodes

mod build;
pub mod size;
mod write;


pub use build::build_tree;
pub use write::write_tree;
