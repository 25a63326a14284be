//! # ServicePro Desk Library
//!
//! Command layer of the repair-shop back office. The front end calls the
//! functions in [`commands`]; this file wires up logging, configuration and
//! the shared state they run against.
//!
//! ## Module Organization
//! ```text
//! servicepro_desk/
//! ├── lib.rs          ◄─── You are here (bootstrap & logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Logged-in session + its store
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── auth.rs     ◄─── Login, menu
//! │   ├── sale.rs     ◄─── Counter sales
//! │   ├── repair.rs   ◄─── Ticket board, intake, delivery
//! │   ├── inventory.rs◄─── Products, goods receipt, stock report
//! │   ├── party.rs    ◄─── Customers, suppliers, staff, debt book
//! │   ├── vat.rs      ◄─── VAT invoice capture
//! │   └── config.rs   ◄─── Read-only config for the UI
//! ├── document.rs     ◄─── Document-parsing collaborator
//! ├── print.rs        ◄─── Receipt printing collaborator
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │  SessionState    │ │   MockBackend    │ │    ConfigState       │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  • Active user   │ │  • Mirrored      │ │  • Shop name         │    │
//! │  │  • ShopStore     │ │    collections   │ │  • VAT rate          │    │
//! │  │  • Access checks │ │  • Latency       │ │  • Seed path         │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  Each command takes only the state it needs.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod document;
pub mod error;
pub mod print;
pub mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use servicepro_store::{MockBackend, SeedData};

use document::{DocumentParser, UnconfiguredParser};
use error::ApiError;
use state::{ConfigState, SessionState};

/// Everything a running desk holds.
#[derive(Clone)]
pub struct App {
    pub config: ConfigState,
    pub session: SessionState,
    pub backend: MockBackend,
    pub parser: Arc<dyn DocumentParser>,
}

impl App {
    /// Builds the app state from one seed.
    ///
    /// The session store and the mock backend start from the same records.
    ///
    /// ## Document Service
    /// This crate ships no document-service client, so `bootstrap` always
    /// installs [`UnconfiguredParser`] and VAT parsing fails with a
    /// `DOCUMENT_ERROR`. `SERVICEPRO_AI_API_KEY` is only read here: a host that
    /// has a client must build it from `config.ai_api_key` and install it with
    /// [`with_parser`](Self::with_parser). See [`App::wants_parser`].
    pub fn bootstrap(config: ConfigState, seed: SeedData) -> Self {
        let backend = MockBackend::new(config.mirror(), &seed);
        let session = SessionState::new(seed);

        if config.ai_api_key.is_some() {
            warn!("Document service key set but no parser installed; call App::with_parser");
        } else {
            info!("No document service key, VAT parsing disabled");
        }

        App {
            config,
            session,
            backend,
            parser: Arc::new(UnconfiguredParser),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    /// True when a document service key is configured, i.e. the host is
    /// expected to follow up with [`with_parser`](Self::with_parser).
    pub fn wants_parser(&self) -> bool {
        self.config.ai_api_key.is_some()
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=servicepro=trace` - Show trace for servicepro crates only
/// - Default: `info,servicepro=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,servicepro=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Loads the seed the session starts from.
///
/// ## Lookup Order
/// 1. `config.seed_path` (from `SERVICEPRO_SEED_PATH`): must exist and parse
/// 2. `seed.json` in the platform data directory, when present
/// 3. Built-in demo data
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.servicepro.desk/seed.json`
/// - **Windows**: `%APPDATA%\servicepro\desk\data\seed.json`
/// - **Linux**: `~/.local/share/desk/seed.json`
pub fn load_seed(config: &ConfigState) -> Result<SeedData, ApiError> {
    if let Some(path) = &config.seed_path {
        info!(?path, "Loading seed file");
        return read_seed(path);
    }

    match default_seed_path() {
        Some(path) if path.is_file() => {
            info!(?path, "Loading seed file");
            read_seed(&path)
        }
        _ => {
            info!("Starting from demo data");
            Ok(SeedData::demo())
        }
    }
}

fn default_seed_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("com", "servicepro", "desk");
    if dirs.is_none() {
        warn!("Could not determine app data directory");
    }
    dirs.map(|d| d.data_dir().join("seed.json"))
}

fn read_seed(path: &Path) -> Result<SeedData, ApiError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ApiError::internal(format!("Cannot read {}: {}", path.display(), e)))?;
    Ok(SeedData::from_json(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_bootstrap_shares_seed() {
        let app = App::bootstrap(ConfigState::default(), SeedData::demo());
        let employees = app.session.with_session(|s| s.store().employees().len());
        assert_eq!(employees, 3);
        assert!(app.session.with_session(|s| s.actor().is_err()));
    }

    #[tokio::test]
    async fn test_parser_is_installed_by_host() {
        use servicepro_core::vat::VatDraft;

        use crate::document::DocumentResult;

        struct EmptyParser;

        #[async_trait::async_trait]
        impl DocumentParser for EmptyParser {
            async fn parse_from_text(&self, _text: &str) -> DocumentResult<Option<VatDraft>> {
                Ok(None)
            }

            async fn parse_from_image(&self, _bytes: &[u8], _mime_type: &str) -> DocumentResult<Option<VatDraft>> {
                Ok(None)
            }

            async fn suggest_repair_note(&self, _symptoms: &str) -> DocumentResult<String> {
                Ok("Vệ sinh quạt".to_string())
            }
        }

        let config = ConfigState {
            ai_api_key: Some("key-123".to_string()),
            ..Default::default()
        };
        let app = App::bootstrap(config, SeedData::demo());
        assert!(app.wants_parser());
        assert!(app.parser.suggest_repair_note("nóng máy").await.is_err());

        let app = app.with_parser(Arc::new(EmptyParser));
        assert_eq!(app.parser.suggest_repair_note("nóng máy").await.unwrap(), "Vệ sinh quạt");

        assert!(!App::bootstrap(ConfigState::default(), SeedData::demo()).wants_parser());
    }

    #[test]
    fn test_load_seed_from_path() {
        let path = std::env::temp_dir().join(format!("servicepro-seed-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, SeedData::demo().to_json().unwrap()).unwrap();

        let config = ConfigState {
            seed_path: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(load_seed(&config).unwrap(), SeedData::demo());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_seed(&config).unwrap_err().code, ErrorCode::Internal);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_configured_seed_is_an_error() {
        let config = ConfigState {
            seed_path: Some(PathBuf::from("/nonexistent/servicepro/seed.json")),
            ..Default::default()
        };
        assert!(load_seed(&config).is_err());
    }
}
