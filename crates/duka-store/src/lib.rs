//! # duka-store: Local Document Store for Duka POS
//!
//! SQLite-backed document storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Duka POS Data Flow                               │
//! │                                                                         │
//! │  Engine operation (complete_sale)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    duka-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │   Documents   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │(documents.rs) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ get_all/get   │    │ 001_docs.sql │  │   │
//! │  │   │ WAL mode      │    │ save/delete   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │            SQLite: documents(collection, id, payload)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`documents`] - The document primitives (get_all/get/save/delete) and backup
//! - [`collection`] - The closed set of collections
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use duka_store::{Collection, Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("path/to/duka.db")).await?;
//! let products: Vec<Product> = store.documents().get_all(Collection::Products).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod documents;
pub mod error;
pub mod migrations;
pub mod pool;

// =============================================================================
// Re-exports
// =============================================================================

pub use collection::Collection;
pub use documents::{DocumentRecord, Documents};
pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};
