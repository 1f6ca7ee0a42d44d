mod executor;
mod template_store;

pub use executor::{ExecutionError, MessageExecutor};
pub use template_store::{StoreError, TemplateStore, next_version, storage_name};
