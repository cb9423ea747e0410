// SPDX-License-Identifier: MPL-2.0
//! This module handles the registry configuration, including loading and
//! saving it to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[registry]` - Capacity of the notification collection
//! - `[defaults]` - Options applied under every `add` call
//! - `[timing]` - Countdown sampling interval and exit-transition window
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `TOAST_REGISTRY_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use toast_registry::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.registry.max_notifications = Some(5);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::notifications::{ExitTransition, MaxNotifications, TickInterval};
use crate::error::Result;
use crate::notifications::{Category, Defaults, Position, RegistryConfig, ToasterConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

/// Application name used for directory naming.
const APP_NAME: &str = "ToastRegistry";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "TOAST_REGISTRY_CONFIG_DIR";

// =============================================================================
// Section Structs
// =============================================================================

/// Registry capacity settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrySection {
    /// Maximum number of Active notifications (at least 1).
    #[serde(
        default = "default_max_notifications",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_notifications: Option<usize>,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            max_notifications: default_max_notifications(),
        }
    }
}

/// Defaults merged under every notification's options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsSection {
    #[serde(default = "default_category", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Auto-dismiss duration in milliseconds; 0 disables auto-dismiss.
    #[serde(default = "default_duration_ms", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    #[serde(default = "default_dismissible", skip_serializing_if = "Option::is_none")]
    pub dismissible: Option<bool>,

    #[serde(
        default = "default_pause_on_hover",
        skip_serializing_if = "Option::is_none"
    )]
    pub pause_on_hover: Option<bool>,

    #[serde(default = "default_position", skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            category: default_category(),
            duration_ms: default_duration_ms(),
            dismissible: default_dismissible(),
            pause_on_hover: default_pause_on_hover(),
            position: default_position(),
        }
    }
}

/// Countdown and transition timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingSection {
    /// Countdown sampling interval in milliseconds (clamped to 10..=100).
    #[serde(
        default = "default_tick_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub tick_interval_ms: Option<u64>,

    /// Exit-transition window in milliseconds.
    #[serde(
        default = "default_exit_transition_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub exit_transition_ms: Option<u64>,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            exit_transition_ms: default_exit_transition_ms(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Registry configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub defaults: DefaultsSection,

    #[serde(default)]
    pub timing: TimingSection,
}

impl Config {
    /// Converts the file representation into a toaster configuration.
    ///
    /// Missing values fall back to their defaults and out-of-range values
    /// are clamped.
    #[must_use]
    pub fn toaster_config(&self) -> ToasterConfig {
        let defaults = Defaults {
            category: self.defaults.category.unwrap_or_default(),
            duration: Duration::from_millis(
                self.defaults.duration_ms.unwrap_or(DEFAULT_DURATION_MS),
            ),
            dismissible: self.defaults.dismissible.unwrap_or(DEFAULT_DISMISSIBLE),
            pause_on_hover: self
                .defaults
                .pause_on_hover
                .unwrap_or(DEFAULT_PAUSE_ON_HOVER),
            position: self.defaults.position.unwrap_or_default(),
        };

        ToasterConfig {
            registry: RegistryConfig {
                max_notifications: MaxNotifications::new(
                    self.registry
                        .max_notifications
                        .unwrap_or(DEFAULT_MAX_NOTIFICATIONS),
                ),
                tick_interval: TickInterval::from_millis(
                    self.timing
                        .tick_interval_ms
                        .unwrap_or(DEFAULT_TICK_INTERVAL_MS),
                ),
                defaults,
            },
            exit_transition: ExitTransition::from_millis(
                self.timing
                    .exit_transition_ms
                    .unwrap_or(DEFAULT_EXIT_TRANSITION_MS),
            ),
        }
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_max_notifications() -> Option<usize> {
    Some(DEFAULT_MAX_NOTIFICATIONS)
}

fn default_category() -> Option<Category> {
    Some(Category::default())
}

fn default_position() -> Option<Position> {
    Some(Position::default())
}

fn default_duration_ms() -> Option<u64> {
    Some(DEFAULT_DURATION_MS)
}

fn default_dismissible() -> Option<bool> {
    Some(DEFAULT_DISMISSIBLE)
}

fn default_pause_on_hover() -> Option<bool> {
    Some(DEFAULT_PAUSE_ON_HOVER)
}

fn default_tick_interval_ms() -> Option<u64> {
    Some(DEFAULT_TICK_INTERVAL_MS)
}

fn default_exit_transition_ms() -> Option<u64> {
    Some(DEFAULT_EXIT_TRANSITION_MS)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config directory, honoring an explicit override first, then
/// the environment variable, then the platform default.
fn get_config_dir_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(dir) = base_dir {
        return Some(dir);
    }
    if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the config file path with an optional directory override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    get_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "falling back to default config");
                    return (
                        Config::default(),
                        Some(format!("failed to load {}: {}", path.display(), err)),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
