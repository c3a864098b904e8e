mod append;
mod insert;
mod lookup;
mod node;
mod remove;

pub(crate) use append::AppendSpine;
pub(crate) use insert::InsertResult;
pub(crate) use node::{MIN_ORDER, Node, Splinter, default_order};
