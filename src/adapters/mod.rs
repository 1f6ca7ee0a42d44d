mod filesystem_template_store;
mod memory_template_store;

pub use filesystem_template_store::FilesystemTemplateStore;
pub use memory_template_store::MemoryTemplateStore;
