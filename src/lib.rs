//! breedview - terminal catalog viewer for breed records
//!
//! Fetches a public breed listing page by page, shows each breed as a card
//! with star ratings, loads more as the list is scrolled to the bottom, and
//! filters the already-fetched records as you type.
//!
//! # Features
//!
//! - **Infinite scroll**: pages load on demand, up to a fixed page ceiling
//! - **Instant search**: case-insensitive substring match over every field
//! - **Star ratings**: five-position rows with the raw score alongside
//! - **Detail toggle**: expand one card at a time to read its description
//!
//! # Example
//!
//! ```no_run
//! use breedview::{AppConfig, BreedSource, Catalog, Command, HttpBreedSource};
//!
//! fn main() -> breedview::Result<()> {
//!     let config = AppConfig::default();
//!     let source = HttpBreedSource::new(&config)?;
//!     let mut catalog = Catalog::new(config.limits());
//!
//!     while let Some(Command::FetchPage { page, limit }) = catalog.load_next_page() {
//!         match source.fetch_page(page, limit) {
//!             Ok(items) => {
//!                 catalog.apply_page(page, &items);
//!             }
//!             Err(e) => {
//!                 catalog.fail_page(page, &e);
//!                 break;
//!             }
//!         }
//!     }
//!
//!     catalog.on_query_change("egypt");
//!     for breed in catalog.visible() {
//!         println!("{} ({})", breed.name, breed.origin);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod error;
pub mod logging;
pub mod rating;
pub mod record;
pub mod tui;

// Re-export main types
pub use api::{BreedSource, HttpBreedSource, DEFAULT_ENDPOINT};
pub use catalog::{
    Catalog, CatalogEvent, CatalogLimits, Command, DISPLAY_CAP, PAGE_CEILING, PAGE_SIZE,
};
pub use error::{BreedViewError, Result};
pub use rating::Rating;
pub use record::BreedRecord;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Breed listing endpoint
    pub endpoint: String,
    /// Records requested per page
    pub page_size: u32,
    /// Maximum number of pages fetched per session
    pub page_ceiling: u32,
    /// Maximum number of search matches shown
    pub display_cap: usize,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Log file location (defaults to next to the executable)
    pub log_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: PAGE_SIZE,
            page_ceiling: PAGE_CEILING,
            display_cap: DISPLAY_CAP,
            request_timeout_secs: 30,
            log_path: None,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document; keys left out keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BreedViewError::ConfigRead(path.display().to_string(), e))?;
        Self::from_toml_str(&text)
    }

    /// `<config dir>/breedview/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("breedview").join("config.toml"))
    }

    /// Load `explicit` if given, else the default file if it exists, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn limits(&self) -> CatalogLimits {
        CatalogLimits {
            page_size: self.page_size,
            page_ceiling: self.page_ceiling,
            display_cap: self.display_cap,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_path.clone().unwrap_or_else(logging::default_log_path)
    }
}
