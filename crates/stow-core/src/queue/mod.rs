mod memory;
mod traits;

pub use memory::MemoryQueue;
pub use traits::Queue;
