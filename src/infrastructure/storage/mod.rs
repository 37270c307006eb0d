pub(crate) mod fs_store;
pub(crate) mod memory_store;
