//! Filename sanitizing for generated pages and store keys.
//!
//! Every page the generators write is addressed by a slug derived from free
//! text typed at a prompt. The same slug is the key of a collection in
//! `collections.json`, so the transformation has to be stable: sanitizing an
//! already-sanitized name must give it back unchanged.
//!
//! ## Rules
//!
//! 1. Trim surrounding whitespace and lower-case the text
//! 2. Replace every character outside `[a-z0-9-_]` with `-`
//! 3. Collapse runs of `-` into one
//! 4. Strip leading and trailing `-`
//!
//! ```text
//! "Final Test Collection"  → "final-test-collection"
//! "  Golden Way!! "        → "golden-way"
//! "Été 2024"               → "t-2024"
//! "***"                    → ""   (rejected by require_filename)
//! ```

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum NamingError {
    #[error("Filename is required")]
    Empty,
    #[error("Filename contains no valid characters: {0:?}")]
    NoValidCharacters(String),
}

/// Sanitize free text into a slug usable as a file name and a store key.
///
/// May return an empty string; use [`require_filename`] where an empty slug
/// is an error.
pub fn sanitize_filename(text: &str) -> String {
    let lowered = text.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut prev_dash = false;
    for c in lowered.chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
            c
        } else {
            '-'
        };
        if c == '-' {
            if !prev_dash {
                slug.push('-');
            }
            prev_dash = true;
        } else {
            slug.push(c);
            prev_dash = false;
        }
    }

    slug.trim_matches('-').to_string()
}

/// Sanitize a filename answer, rejecting blank input and input that
/// sanitizes to nothing.
pub fn require_filename(text: &str) -> Result<String, NamingError> {
    if text.trim().is_empty() {
        return Err(NamingError::Empty);
    }
    let slug = sanitize_filename(text);
    if slug.is_empty() {
        return Err(NamingError::NoValidCharacters(text.trim().to_string()));
    }
    Ok(slug)
}

/// Page file name for a slug (`golden-way` → `golden-way.html`).
pub fn page_filename(slug: &str) -> String {
    format!("{slug}.html")
}
