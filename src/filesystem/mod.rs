//! Synthetic filesystem tree and the indentation-based builder that produces it.
//!
//! A description file declares one entry per line. Lines ending in `:` are
//! directories, anything else is a file, and every three columns of leading
//! whitespace nest the entry one level deeper.

mod tree;
mod tree_builder;

pub use tree::{Directory, TreeNode};
pub use tree_builder::{IndentPolicy, TreeBuilder, TreeLoadError};
