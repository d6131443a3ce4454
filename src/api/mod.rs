//! Library API: the store contract, its HTTP client and customization sessions.

mod error;
mod remote;
mod session;
mod store;

pub use error::StoreError;
pub use remote::RemotePromptStore;
pub use session::CustomizeSession;
pub use store::PromptStore;
