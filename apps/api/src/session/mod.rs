// Chat sessions: explicit session objects, a single controller that mutates
// them, and a storage trait with in-memory and Redis backends.

pub mod controller;
pub mod handlers;
pub mod models;
pub mod redis_store;
pub mod store;
