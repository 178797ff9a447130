//! Shared test utilities for the gallery-tools test suite.
//!
//! Workflow tests run against a copy of `fixtures/site/`, a small gallery
//! with three loose artworks (`golden-way`, `river-song` and `lost-page`,
//! whose detail page is missing on purpose) and one seed collection card.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = setup_site();
//! let project = Project::open(site.path()).unwrap();
//! // ... run a workflow ...
//! assert_eq!(count_art_cards(&read_index(&site), "golden-way.html"), 0);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::document::Document;

/// Background image the stock configuration points new collections at.
pub const DEFAULT_BACKGROUND: &str = "collection_bgs/stole-3419985_1920.jpg";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Current contents of the site's `index.html`.
pub fn read_index(site: &TempDir) -> String {
    std::fs::read_to_string(site.path().join("index.html")).unwrap()
}

// =========================================================================
// Card counting
// =========================================================================

/// Number of `<a class="{class}" href="{href}">` elements anywhere in `html`.
pub fn count_cards(html: &str, class: &str, href: &str) -> usize {
    Document::parse(html)
        .elements()
        .iter()
        .filter(|el| el.name == "a" && el.has_class(class) && el.attr("href") == Some(href))
        .count()
}

pub fn count_art_cards(html: &str, href: &str) -> usize {
    count_cards(html, "art-card", href)
}

pub fn count_series_cards(html: &str, href: &str) -> usize {
    count_cards(html, "series-card", href)
}
