//! Session-history log implementations.

mod jsonl;
mod memory;

pub use jsonl::JsonlSessionHistory;
pub use memory::InMemorySessionHistory;
