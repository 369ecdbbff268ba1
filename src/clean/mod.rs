mod names;
mod sentinel;

pub use names::{normalize, same_name};
pub(crate) use names::display;
pub use sentinel::{filter_hamlets, is_garbage, is_sentinel, SENTINELS};
