mod arena;
mod handle;
mod node;
mod raw_count_tree;

pub(crate) use handle::Handle;
pub(crate) use raw_count_tree::{InOrder, RawCountTree};
