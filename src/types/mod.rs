// Marktree shared type definitions
// Each submodule defines types used across the application.

pub mod bookmark;
pub mod errors;
pub mod export;
pub mod search;
pub mod settings;
