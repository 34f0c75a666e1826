//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process repositories and file store
//! - **storage**: filesystem object store with signed download links
//! - **security**: JWT session tokens and Argon2 password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
pub mod storage;
