mod memory;
mod traits;

pub use memory::{MemoryObjectStore, StoreCall};
pub use traits::ObjectStore;
