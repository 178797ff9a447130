//! Terminal output for the interactive generators.
//!
//! # Architecture
//!
//! Every listing, menu and summary has a `format_*` function that returns
//! `Vec<String>`, one entry per line. Format functions are pure: no I/O, no
//! global state. The workflows hand the lines to their
//! [`Prompter`](crate::prompt::Prompter), which is what writes them.
//!
//! Styling goes through a [`Palette`] passed in by the caller. A plain palette
//! produces the exact same text without escape codes, which is what tests and
//! piped output use.
//!
//! # Output Format
//!
//! ```text
//! 🎨 Collection Generator
//! ======================
//!
//! What would you like to do?
//!   1. Create a new collection
//!   2. Add artworks to existing collection
//!   3. List existing collections
//!   4. Exit
//! ```
//!
//! ```text
//! Existing Collections:
//!
//!   1. Final Test Collection (final-test.html)
//!      2 artworks
//!      Testing the generator with a description long enough to be cu...
//! ```

use crate::store::CollectionStore;
use crate::types::{Artwork, ArtworkDetails};
use colored::Colorize;

/// Description preview length in collection listings, in characters.
pub const LISTING_PREVIEW_LENGTH: usize = 60;

/// Styling capability for terminal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// No escape codes, ever.
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, |s| s.cyan().bold().to_string())
    }

    pub fn emphasis(&self, text: &str) -> String {
        self.paint(text, |s| s.bold().to_string())
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, |s| s.green().to_string())
    }

    pub fn warn(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow().to_string())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |s| s.red().to_string())
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, |s| s.blue().to_string())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Numbered list entry, indented two spaces (`  3. Golden Way`).
fn numbered(pos: usize, text: &str) -> String {
    format!("  {pos}. {text}")
}

fn preview(text: &str, max: usize) -> String {
    crate::generate::truncate_chars(text, max)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Banners and menu
// ============================================================================

/// Title line with an underline as wide as the title.
pub fn format_banner(palette: &Palette, title: &str) -> Vec<String> {
    let title = format!("🎨 {title}");
    vec![
        String::new(),
        palette.heading(&title),
        palette.warn(&"=".repeat(title.chars().count())),
        String::new(),
    ]
}

pub fn format_menu(palette: &Palette) -> Vec<String> {
    vec![
        palette.emphasis("What would you like to do?"),
        numbered(1, "Create a new collection"),
        numbered(2, "Add artworks to existing collection"),
        numbered(3, "List existing collections"),
        numbered(4, "Exit"),
    ]
}

// ============================================================================
// Collections
// ============================================================================

/// Full listing: name, page file, artwork count and a description preview
/// for every collection, in creation order.
pub fn format_collection_list(palette: &Palette, store: &CollectionStore) -> Vec<String> {
    if store.is_empty() {
        return vec![palette.warn("No collections found.")];
    }

    let mut lines = vec![palette.emphasis("Existing Collections:"), String::new()];
    for (pos, (_, collection)) in store.iter().enumerate() {
        lines.push(numbered(
            pos + 1,
            &format!("{} ({})", collection.name, collection.filename),
        ));
        lines.push(format!(
            "     {}",
            plural(collection.artworks.len(), "artwork", "artworks")
        ));
        lines.push(format!(
            "     {}",
            preview(&collection.description, LISTING_PREVIEW_LENGTH)
        ));
        lines.push(String::new());
    }
    lines
}

/// Numbered choices for picking a collection to add artworks to.
pub fn format_collection_choices(palette: &Palette, store: &CollectionStore) -> Vec<String> {
    let mut lines = vec![palette.emphasis("Select a Collection:"), String::new()];
    for (pos, (_, collection)) in store.iter().enumerate() {
        lines.push(numbered(
            pos + 1,
            &format!(
                "{} ({})",
                collection.name,
                plural(collection.artworks.len(), "artwork", "artworks")
            ),
        ));
    }
    lines
}

/// Numbered loose artworks of the index's art grid.
pub fn format_gallery_listing(palette: &Palette, artworks: &[Artwork]) -> Vec<String> {
    let mut lines = vec![palette.heading("Available artworks in main gallery:")];
    for (pos, artwork) in artworks.iter().enumerate() {
        lines.push(numbered(
            pos + 1,
            &format!("{} ({})", artwork.title, artwork.filename),
        ));
    }
    lines
}

// ============================================================================
// Artwork generator
// ============================================================================

/// Closing summary after an artwork page was written.
pub fn format_artwork_summary(
    palette: &Palette,
    details: &ArtworkDetails,
    page: &str,
    index: &str,
) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        palette.success("🎉 Artwork successfully added to the gallery!"),
        String::new(),
        palette.heading("Files created/updated:"),
        format!("  • {page} created (artwork detail page)"),
        format!("  • {index} updated (gallery card added)"),
        String::new(),
        palette.warn("Next steps:"),
        format!(
            "  1. Make sure your images are in the correct path: {}",
            details.main_image()
        ),
    ];
    if details.images.len() > 1 {
        lines.push(format!(
            "     Additional images: {}",
            details.images[1..].join(", ")
        ));
    }
    lines.extend([
        format!("  2. Test the new artwork page by opening {page}"),
        "  3. Check that the gallery card appears correctly on the main page".to_string(),
        format!("  4. Verify the new artwork links to {page}"),
        String::new(),
        palette.success(&format!(
            "✨ Your artwork \"{}\" is now live at {page}! ✨",
            details.title
        )),
    ]);
    lines
}

/// Final line for a failed run, printed to stderr.
pub fn format_failure(palette: &Palette, message: &str) -> String {
    palette.error(&format!("❌ Error: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Collection;

    fn collection(key: &str, description: &str, artworks: usize) -> Collection {
        Collection {
            name: format!("{key} name"),
            description: description.to_string(),
            filename: format!("{key}.html"),
            background_image: String::new(),
            background_overlay: String::new(),
            artworks: (0..artworks)
                .map(|i| Artwork {
                    filename: format!("a{i}.html"),
                    title: format!("A{i}"),
                    description: String::new(),
                    price: String::new(),
                    availability: "Available".to_string(),
                    image: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn plain_palette_adds_no_escapes() {
        let p = Palette::plain();
        assert_eq!(p.heading("Title"), "Title");
        assert_eq!(p.error("bad"), "bad");
        assert!(!p.is_colored());
    }

    #[test]
    fn colored_palette_wraps_text() {
        colored::control::set_override(true);
        let p = Palette::new(true);
        let s = p.success("ok");
        assert!(s.contains("ok"));
        assert!(s.contains('\u{1b}'));
        colored::control::unset_override();
    }

    #[test]
    fn banner_underline_matches_title() {
        let lines = format_banner(&Palette::plain(), "Collection Generator");
        assert_eq!(lines[1], "🎨 Collection Generator");
        assert_eq!(lines[2].chars().count(), lines[1].chars().count());
    }

    #[test]
    fn menu_lists_four_choices() {
        let lines = format_menu(&Palette::plain());
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "  1. Create a new collection");
        assert_eq!(lines[4], "  4. Exit");
    }

    #[test]
    fn empty_collection_list() {
        let lines = format_collection_list(&Palette::plain(), &CollectionStore::default());
        assert_eq!(lines, vec!["No collections found."]);
    }

    #[test]
    fn collection_list_previews_description() {
        let mut store = CollectionStore::default();
        store
            .upsert_collection("long", collection("long", &"d".repeat(80), 2))
            .unwrap();
        store
            .upsert_collection("one", collection("one", "short", 1))
            .unwrap();
        let lines = format_collection_list(&Palette::plain(), &store);

        assert_eq!(lines[2], "  1. long name (long.html)");
        assert_eq!(lines[3], "     2 artworks");
        assert_eq!(lines[4], format!("     {}...", "d".repeat(60)));
        assert_eq!(lines[6], "  2. one name (one.html)");
        assert_eq!(lines[7], "     1 artwork");
        assert_eq!(lines[8], "     short");
    }

    #[test]
    fn collection_choices_show_counts() {
        let mut store = CollectionStore::default();
        store
            .upsert_collection("a", collection("a", "", 3))
            .unwrap();
        let lines = format_collection_choices(&Palette::plain(), &store);
        assert_eq!(lines[2], "  1. a name (3 artworks)");
    }

    #[test]
    fn gallery_listing_numbers_from_one() {
        let artworks = collection("x", "", 2).artworks;
        let lines = format_gallery_listing(&Palette::plain(), &artworks);
        assert_eq!(lines[1], "  1. A0 (a0.html)");
        assert_eq!(lines[2], "  2. A1 (a1.html)");
    }

    #[test]
    fn artwork_summary_lists_additional_images() {
        let details = ArtworkDetails {
            title: "Golden Way".to_string(),
            price: String::new(),
            short_description: String::new(),
            paragraphs: vec![],
            medium: String::new(),
            dimensions: String::new(),
            year: String::new(),
            frame: String::new(),
            availability: String::new(),
            images: vec!["a.jpg".to_string(), "b.jpg".to_string(), "c.jpg".to_string()],
        };
        let lines = format_artwork_summary(&Palette::plain(), &details, "golden-way.html", "index.html");
        assert!(lines.contains(&"  • golden-way.html created (artwork detail page)".to_string()));
        assert!(lines.contains(&"     Additional images: b.jpg, c.jpg".to_string()));
        assert!(lines.last().unwrap().contains("Golden Way"));
    }

    #[test]
    fn failure_line_has_marker() {
        assert_eq!(format_failure(&Palette::plain(), "boom"), "❌ Error: boom");
    }
}
