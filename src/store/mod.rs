pub mod file_lock;
pub mod managed_store;
