//! Persistence strategies layered over `KvStore` backends.

pub mod write_behind;
