mod arena;
mod balance;
mod handle;
mod node;
mod raw_avl_map;
mod walk;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_avl_map::RawAvlMap;
pub(crate) use walk::{Walker, predecessor, successor};
