pub mod config;
pub mod form;
pub mod kv;
pub mod model;
pub mod router;
pub mod storage;
pub mod template;
pub mod utils;
