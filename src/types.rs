//! Shared records passed between the scanner, the store and the renderers.
//!
//! [`Artwork`] and [`Collection`] are serialized into `collections.json`; their
//! JSON field names (camelCase) are part of the on-disk format and must not
//! change.

use serde::{Deserialize, Serialize};

/// An artwork as it appears on a card: in the unsorted gallery or inside a
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Relative link to the artwork's detail page (`golden-way.html`)
    pub filename: String,
    pub title: String,
    /// Short description shown on the card
    pub description: String,
    /// Free text, never parsed as a number (`$450`, `Price on request`)
    pub price: String,
    /// Status label, conventionally `Available` or `Sold`
    pub availability: String,
    /// Relative path to the primary image
    #[serde(default)]
    pub image: String,
}

impl Artwork {
    /// Case-insensitive check for the `Available` status label.
    pub fn is_available(&self) -> bool {
        self.availability.trim().eq_ignore_ascii_case("available")
    }
}

/// A named, ordered group of artworks with its own page and index card.
///
/// The store key is not part of the record; it is the page file name without
/// `.html`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub name: String,
    pub description: String,
    /// Page file name inside the collections directory (`final-test.html`)
    pub filename: String,
    /// Background image, relative to the collections directory
    pub background_image: String,
    /// CSS color for the gradient over the background (`rgba(64, 0, 109, 0.8)`)
    pub background_overlay: String,
    /// Member artworks; the first two supply the card preview images.
    #[serde(default)]
    pub artworks: Vec<Artwork>,
}

impl Collection {
    /// Number of member artworks labelled `Available`.
    pub fn available_count(&self) -> usize {
        self.artworks.iter().filter(|a| a.is_available()).count()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.artworks.iter().any(|a| a.filename == filename)
    }
}

/// Everything shown on an artwork's detail page, as collected by the artwork
/// generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkDetails {
    pub title: String,
    pub price: String,
    /// Card text
    pub short_description: String,
    /// Page text, one entry per paragraph
    pub paragraphs: Vec<String>,
    pub medium: String,
    pub dimensions: String,
    pub year: String,
    pub frame: String,
    pub availability: String,
    /// Main image first, then any additional images
    pub images: Vec<String>,
}

impl ArtworkDetails {
    pub fn main_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or_default()
    }

    /// The card record for this artwork once its page is written as `filename`.
    pub fn to_artwork(&self, filename: &str) -> Artwork {
        Artwork {
            filename: filename.to_string(),
            title: self.title.clone(),
            description: self.short_description.clone(),
            price: self.price.clone(),
            availability: self.availability.clone(),
            image: self.main_image().to_string(),
        }
    }
}

/// Split a full description into paragraphs.
///
/// Prompts read a single line, so paragraph breaks are typed as a literal
/// `\n`. Real newlines are honored too. Blank paragraphs are dropped.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(filename: &str, availability: &str) -> Artwork {
        Artwork {
            filename: filename.to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            price: "$1".to_string(),
            availability: availability.to_string(),
            image: "Artpieces/t.jpg".to_string(),
        }
    }

    #[test]
    fn availability_is_case_insensitive() {
        assert!(artwork("a.html", "Available").is_available());
        assert!(artwork("a.html", "AVAILABLE ").is_available());
        assert!(!artwork("a.html", "Sold").is_available());
    }

    #[test]
    fn collection_counts_and_membership() {
        let c = Collection {
            name: "Final Test Collection".to_string(),
            description: String::new(),
            filename: "final-test.html".to_string(),
            background_image: String::new(),
            background_overlay: String::new(),
            artworks: vec![artwork("a.html", "Available"), artwork("b.html", "Sold")],
        };
        assert_eq!(c.available_count(), 1);
        assert!(c.contains("b.html"));
        assert!(!c.contains("c.html"));
    }

    #[test]
    fn collection_json_uses_camel_case() {
        let c = Collection {
            name: "N".to_string(),
            description: "D".to_string(),
            filename: "n.html".to_string(),
            background_image: "bg.jpg".to_string(),
            background_overlay: "rgba(0, 0, 0, 0.5)".to_string(),
            artworks: vec![],
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"backgroundImage\":\"bg.jpg\""));
        assert!(json.contains("\"backgroundOverlay\""));
    }

    #[test]
    fn artwork_without_image_deserializes() {
        let json = r#"{"filename":"a.html","title":"A","description":"d","price":"$1","availability":"Sold"}"#;
        let a: Artwork = serde_json::from_str(json).unwrap();
        assert_eq!(a.image, "");
    }

    #[test]
    fn paragraphs_split_on_literal_backslash_n() {
        assert_eq!(
            split_paragraphs(r"First part.\nSecond part.\n\n"),
            vec!["First part.", "Second part."]
        );
        assert_eq!(split_paragraphs("one\ntwo"), vec!["one", "two"]);
    }

    #[test]
    fn details_project_to_card() {
        let d = ArtworkDetails {
            title: "Golden Way".to_string(),
            price: "$450".to_string(),
            short_description: "Warm light".to_string(),
            paragraphs: vec!["Long".to_string()],
            medium: "Oil".to_string(),
            dimensions: "18x24".to_string(),
            year: "2025".to_string(),
            frame: "Can be requested".to_string(),
            availability: "Available".to_string(),
            images: vec!["Artpieces/golden.jpg".to_string(), "Artpieces/g2.jpg".to_string()],
        };
        let a = d.to_artwork("golden-way.html");
        assert_eq!(a.filename, "golden-way.html");
        assert_eq!(a.description, "Warm light");
        assert_eq!(a.image, "Artpieces/golden.jpg");
    }
}
