//! Recovering artwork records from existing pages.
//!
//! The unsorted gallery lives only in `index.html`: there is no data file
//! behind it. To move an artwork into a collection, its record is read back
//! from the card markup:
//!
//! ```html
//! <div class="art-grid">
//!   <a href="golden-way.html" class="art-card">
//!     <div class="art-image-container">
//!       <img src="Artpieces/golden.jpg" alt="Golden Way" class="art-image">
//!       ...
//!     </div>
//!     <div class="art-info">
//!       <h3 class="art-name">Golden Way</h3>
//!       <p class="art-description">Warm light on the river</p>
//!       <div class="art-footer">
//!         <p class="art-price">$450</p>
//!         <span class="art-status">Available</span>
//!       </div>
//!     </div>
//!   </a>
//! </div>
//! ```
//!
//! Only cards inside the art-grid container count; the same card class used
//! elsewhere on the page (a featured strip, say) is ignored. A card missing a
//! required field is skipped with a warning rather than failing the scan.
//!
//! The image on a card is often a thumbnail, so the workflow replaces it with
//! the primary image of the detail page ([`extract_primary_image`]).

use crate::config::MarkupConfig;
use crate::document::{Document, ElementId};
use crate::splice::{self, SpliceError};
use crate::types::Artwork;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScanError {
    #[error("Gallery container not found: {0}")]
    Container(#[from] SpliceError),
}

/// Class of the main image on an artwork detail page.
pub const PRIMARY_IMAGE_CLASS: &str = "artwork-image";

/// Every well-formed artwork card in the art-grid container, in page order.
pub fn scan_gallery(doc: &str, markup: &MarkupConfig) -> Result<Vec<Artwork>, ScanError> {
    // Validates the container (present, balanced) before looking inside.
    splice::find_container_span(doc, &markup.art_grid)?;

    let parsed = Document::parse(doc);
    let container = splice::locate(&parsed, &markup.art_grid)?;

    let artworks: Vec<Artwork> = splice::cards_in(&parsed, container, &markup.art_card_class)
        .into_iter()
        .filter_map(|card| read_card(&parsed, card))
        .collect();
    tracing::debug!(count = artworks.len(), "scanned gallery");
    Ok(artworks)
}

/// Text of the first descendant `tag.class` of `card`.
fn field(doc: &Document<'_>, card: ElementId, tag: &str, class: &str) -> Option<String> {
    doc.find_descendant(card, |el| el.name == tag && el.has_class(class))
        .map(|id| doc.text_content(id))
}

fn read_card(doc: &Document<'_>, card: ElementId) -> Option<Artwork> {
    let el = doc.element(card);
    let href = el.attr("href").map(str::trim).filter(|h| !h.is_empty());

    let title = field(doc, card, "h3", "art-name");
    let description = field(doc, card, "p", "art-description");
    let price = field(doc, card, "p", "art-price");
    let availability = field(doc, card, "span", "art-status");

    let (Some(href), Some(title), Some(description), Some(price), Some(availability)) =
        (href, title, description, price, availability)
    else {
        let line = doc.source()[..el.start].matches('\n').count() + 1;
        tracing::warn!(line, href = el.attr("href").unwrap_or(""), "skipping malformed artwork card");
        return None;
    };

    let image = doc
        .find_descendant(card, |e| e.name == "img" && e.has_class("art-image"))
        .and_then(|id| doc.element(id).attr("src"))
        .unwrap_or_default()
        .to_string();

    Some(Artwork {
        filename: href.to_string(),
        title,
        description,
        price,
        availability,
        image,
    })
}

/// `src` of the main image (`img.artwork-image`) on an artwork detail page.
pub fn extract_primary_image(page: &str) -> Option<String> {
    let doc = Document::parse(page);
    doc.find(|el| el.name == "img" && el.has_class(PRIMARY_IMAGE_CLASS))
        .and_then(|id| doc.element(id).attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(String::from)
}
