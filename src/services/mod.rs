// Marktree services
// Pure tree engines (mutation, search, export selection, import merge) plus settings and validation.

pub mod export_selection;
pub mod id_allocator;
pub mod import_merger;
pub mod search_index;
pub mod settings_engine;
pub mod tree_mutator;
pub mod validation;
