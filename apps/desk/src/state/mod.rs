//! # State Module
//!
//! Application state for the desk. Each command takes only the state it
//! needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │   SessionState   │ │   MockBackend    │ │    ConfigState       │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  Arc<Mutex<      │ │  Arc<RwLock<     │ │  shop name           │   │
//! │  │    Session       │ │    collections   │ │  default warehouse   │   │
//! │  │  >>              │ │  >>              │ │  VAT rate            │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: exclusive access, never held across .await            │
//! │  • MockBackend: async RwLock, mirror writes only                       │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::ConfigState;
pub use session::SessionState;
