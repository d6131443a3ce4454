pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod server;
pub mod ui;

pub use api::{CustomizeSession, PromptStore, RemotePromptStore, StoreError};
pub use self::core::kv::{FileKv, KvBackend, MemoryKv};
pub use self::core::storage::KvPromptStore;
