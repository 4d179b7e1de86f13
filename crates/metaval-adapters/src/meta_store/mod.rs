//! Rule metadata stores.

mod memory;

pub use memory::InMemoryMetaStore;
