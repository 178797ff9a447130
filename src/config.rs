//! Project configuration.
//!
//! The generators work against a hand-authored site, so almost everything they
//! assume about it (file names, the literal markup of the grid containers, the
//! card classes, the email integration identifiers) lives here rather than in
//! code. A project may carry a `gallery.toml` at its root; values in it are
//! merged over the stock defaults below.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! index = "index.html"               # Hand-authored gallery page
//! backup = "index.html.backup"       # Rolling safety copy of the index
//! store = "collections.json"         # Collection store
//! collections_dir = "collections"    # Where collection pages are written
//!
//! [markup]
//! art_grid = '<div class="art-grid">'        # Opening tag of the loose gallery
//! series_grid = '<div class="series-grid">'  # Opening tag of the collection grid
//! art_card_class = "art-card"
//! series_card_class = "series-card"
//!
//! [site]
//! name = "Art Zaryana"
//! tagline = "Art that speaks to the soul."
//! contact_email = "oleseattle@gmail.com"
//! instagram = "https://www.instagram.com/art_zaryana/"
//! facebook = "https://www.facebook.com/profile.php?id=100082963551065"
//! copyright_year = "2025"
//!
//! [email]
//! public_key = "0NSJYK5U3mp5S7SeV"
//! service_id = "service_c40osld"
//! contact_template = "template_v2deo3f"
//! purchase_template = "template_9ptxv7o"
//!
//! [defaults]
//! background_image = "collection_bgs/stole-3419985_1920.jpg"
//! background_overlay = "rgba(64, 0, 109, 0.8)"
//! frame = "Can be requested"
//! availability = "Available"
//!
//! [render]
//! escape_html = true     # false inserts prompt answers into pages verbatim
//! preview_length = 100   # Collection card description length (characters)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional config file in the project root.
pub const CONFIG_FILENAME: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery project configuration loaded from `gallery.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Locations of the files the generators read and write.
    pub paths: PathsConfig,
    /// Literal markup used to find the grids and cards in the index.
    pub markup: MarkupConfig,
    /// Site identity shown in generated pages.
    pub site: SiteConfig,
    /// Email-delivery identifiers wired into generated forms.
    pub email: EmailConfig,
    /// Prompt defaults.
    pub defaults: DefaultsConfig,
    /// Rendering switches.
    pub render: RenderConfig,
}

impl GalleryConfig {
    /// Validate values the generators cannot work without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, marker) in [
            ("markup.art_grid", &self.markup.art_grid),
            ("markup.series_grid", &self.markup.series_grid),
        ] {
            if !marker.trim_start().starts_with('<') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be the literal opening tag of the container"
                )));
            }
        }
        for (key, class) in [
            ("markup.art_card_class", &self.markup.art_card_class),
            ("markup.series_card_class", &self.markup.series_card_class),
        ] {
            if class.trim().is_empty() || class.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single class name"
                )));
            }
        }
        if self.paths.index.trim().is_empty() || self.paths.store.trim().is_empty() {
            return Err(ConfigError::Validation(
                "paths.index and paths.store must not be empty".into(),
            ));
        }
        if self.paths.backup == self.paths.index {
            return Err(ConfigError::Validation(
                "paths.backup must differ from paths.index".into(),
            ));
        }
        if self.render.preview_length == 0 {
            return Err(ConfigError::Validation(
                "render.preview_length must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// File locations, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub index: String,
    pub backup: String,
    pub store: String,
    pub collections_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            index: "index.html".to_string(),
            backup: "index.html.backup".to_string(),
            store: "collections.json".to_string(),
            collections_dir: "collections".to_string(),
        }
    }
}

/// Markup conventions of the hand-authored index page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupConfig {
    pub art_grid: String,
    pub series_grid: String,
    pub art_card_class: String,
    pub series_card_class: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            art_grid: r#"<div class="art-grid">"#.to_string(),
            series_grid: r#"<div class="series-grid">"#.to_string(),
            art_card_class: "art-card".to_string(),
            series_card_class: "series-card".to_string(),
        }
    }
}

/// Site identity used in page titles, navigation and footers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub name: String,
    pub tagline: String,
    pub contact_email: String,
    pub instagram: String,
    pub facebook: String,
    pub copyright_year: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Art Zaryana".to_string(),
            tagline: "Art that speaks to the soul.".to_string(),
            contact_email: "oleseattle@gmail.com".to_string(),
            instagram: "https://www.instagram.com/art_zaryana/".to_string(),
            facebook: "https://www.facebook.com/profile.php?id=100082963551065".to_string(),
            copyright_year: "2025".to_string(),
        }
    }
}

/// Identifiers of the email-delivery client. The generators never talk to the
/// service; they only wire these into the forms of every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailConfig {
    pub public_key: String,
    pub service_id: String,
    pub contact_template: String,
    pub purchase_template: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            public_key: "0NSJYK5U3mp5S7SeV".to_string(),
            service_id: "service_c40osld".to_string(),
            contact_template: "template_v2deo3f".to_string(),
            purchase_template: "template_9ptxv7o".to_string(),
        }
    }
}

/// Defaults offered at the prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub background_image: String,
    pub background_overlay: String,
    pub frame: String,
    pub availability: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            background_image: "collection_bgs/stole-3419985_1920.jpg".to_string(),
            background_overlay: "rgba(64, 0, 109, 0.8)".to_string(),
            frame: "Can be requested".to_string(),
            availability: "Available".to_string(),
        }
    }
}

/// Rendering switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Escape HTML-significant characters in prompt answers. Turning this off
    /// lets an operator put markup into descriptions on purpose.
    pub escape_html: bool,
    /// Maximum description length on a collection card, in characters.
    pub preview_length: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            escape_html: true,
            preview_length: 100,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `gallery.toml` from the project root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the project config: stock defaults, overridden by `gallery.toml` if
/// present, then validated.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Absolute locations of the project files, resolved against a root.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub index: PathBuf,
    pub backup: PathBuf,
    pub store: PathBuf,
    pub collections_dir: PathBuf,
}

impl ProjectPaths {
    pub fn resolve(root: &Path, paths: &PathsConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            index: root.join(&paths.index),
            backup: root.join(&paths.backup),
            store: root.join(&paths.store),
            collections_dir: root.join(&paths.collections_dir),
        }
    }

    /// Page path of a collection file name.
    pub fn collection_page(&self, filename: &str) -> PathBuf {
        self.collections_dir.join(filename)
    }

    /// Page path of an artwork file name (artwork pages live in the root).
    pub fn artwork_page(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }
}

/// Returns a fully-commented stock `gallery.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Tools Configuration
# ==========================
#
# Place this file as gallery.toml in the site root (next to index.html).
# All options are optional; delete what you don't change.

# ---------------------------------------------------------------------------
# Files, relative to the site root
# ---------------------------------------------------------------------------
[paths]
index = "index.html"
# Copy of the index taken before any edit; restored if a run fails.
backup = "index.html.backup"
store = "collections.json"
collections_dir = "collections"

# ---------------------------------------------------------------------------
# Markup the generators look for in index.html.
# The grid markers are matched literally, attribute order and quoting included.
# ---------------------------------------------------------------------------
[markup]
art_grid = '<div class="art-grid">'
series_grid = '<div class="series-grid">'
art_card_class = "art-card"
series_card_class = "series-card"

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "Art Zaryana"
tagline = "Art that speaks to the soul."
contact_email = "oleseattle@gmail.com"
instagram = "https://www.instagram.com/art_zaryana/"
facebook = "https://www.facebook.com/profile.php?id=100082963551065"
copyright_year = "2025"

# ---------------------------------------------------------------------------
# Email delivery (contact and purchase forms)
# ---------------------------------------------------------------------------
[email]
public_key = "0NSJYK5U3mp5S7SeV"
service_id = "service_c40osld"
contact_template = "template_v2deo3f"
purchase_template = "template_9ptxv7o"

# ---------------------------------------------------------------------------
# Prompt defaults
# ---------------------------------------------------------------------------
[defaults]
# Relative to collections_dir
background_image = "collection_bgs/stole-3419985_1920.jpg"
background_overlay = "rgba(64, 0, 109, 0.8)"
frame = "Can be requested"
availability = "Available"

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Escape <, >, & and quotes in prompt answers. Set to false to write answers
# into pages verbatim (lets you use markup in descriptions).
escape_html = true
# Collection card description length, in characters.
preview_length = 100
"##
}
