pub mod common;
pub mod content;
pub mod defaults;
pub mod load_state;

// Re-export common types/enums for easier access
pub use common::*;
pub use content::*;
pub use defaults::placeholder_document;
pub use load_state::LoadState;
