// Gateway module for storage - follows the Train Station Pattern
// All external access must go through this gateway

mod file_store;
mod kv;
mod memory_store;

pub use file_store::FileStore;
pub use kv::{load_json, remove_key, save_json, KeyValueStore};
pub use memory_store::MemoryStore;
