//! # servicepro-store: Record Store for ServicePro
//!
//! Owns the shop's collections for the length of a session and applies
//! every debt and stock side effect the core rules compute.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ServicePro Data Flow                              │
//! │                                                                         │
//! │  Desk command (finalize_delivery)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 servicepro-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Session    │    │   ShopStore   │    │ MockBackend  │  │   │
//! │  │   │ (session.rs)  │    │  (store.rs)   │    │ (mirror.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ actor, login  │───►│ Collection<T> │    │ async copy,  │  │   │
//! │  │   │ RepairDesk    │    │ ledger hook   │    │ 300ms delay  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  servicepro-core (pure rules: ledger, stock, repair, access)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Copy-on-write record lists
//! - [`seed`] - Injected initial state
//! - [`store`] - The shop store and its composite writes
//! - [`session`] - Logged-in actor
//! - [`desk`] - Repair desk and counter workflows
//! - [`mirror`] - Async mock of the remote data service
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use servicepro_store::{RepairDesk, SeedData, Session, ShopStore};
//!
//! let mut session = Session::new(ShopStore::new(SeedData::demo()));
//! session.login("tech", "123")?;
//!
//! let opened = RepairDesk::new(&mut session).open_ticket(intake)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod desk;
pub mod error;
pub mod mirror;
pub mod seed;
pub mod session;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use collection::{Collection, Record};
pub use desk::{Committed, RepairDesk};
pub use error::{StoreError, StoreResult};
pub use mirror::{Ack, MirrorConfig, MockBackend};
pub use seed::SeedData;
pub use session::{Session, DEMO_PASSWORD};
pub use store::ShopStore;

/// New record id: `{prefix}-{uuid v4}`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}
