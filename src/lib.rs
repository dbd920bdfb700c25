pub mod antibot;
pub mod core;
pub mod features;
pub mod server;
pub mod tools;

// --- Primary core exports ---
pub use crate::core::error;
pub use crate::core::types;
pub use crate::core::types::*;
pub use crate::core::AppState;

pub use features::account_pool;
pub use tools::search;
