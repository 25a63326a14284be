//! # Config Commands

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current application configuration.
///
/// ## When Used
/// - App startup (shop name, default warehouse)
/// - New VAT invoice form (default rate)
/// - Slip printing and currency formatting
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
