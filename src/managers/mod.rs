// Marktree state managers
// Managers own mutable state: the canonical bookmark tree and the transient export/import sessions.

pub mod bookmark_store;
pub mod transfer_session;
