//! In-process record store.

mod store;

pub use store::MemoryMovementStore;
