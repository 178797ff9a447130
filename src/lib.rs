//! # Gallery Tools
//!
//! Page generators for an art gallery whose `index.html` is written by hand.
//! The tools never regenerate the index: they splice generated cards into it
//! and write the pages those cards link to.
//!
//! # Architecture: Read, Stage, Commit
//!
//! Both generators follow the same shape:
//!
//! ```text
//! 1. Read     index.html, collections.json, detail pages  (fresh every workflow)
//! 2. Stage    rendered pages + spliced index              (in memory)
//! 3. Commit   backup index, write staged files            (roll back on failure)
//! ```
//!
//! Nothing is written until every prompt has been answered and every page has
//! rendered, so a bad answer leaves the project exactly as it was.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Filename sanitizer: operator input → safe page slug |
//! | [`types`] | Records shared by the store, scanner and renderers (`Artwork`, `Collection`) |
//! | [`config`] | `gallery.toml` loading, stock defaults, validation, resolved paths |
//! | [`document`] | Tolerant HTML element tree over the raw index source |
//! | [`splice`] | Container-aware edits of the index: insert, append, remove, upsert cards |
//! | [`store`] | `collections.json`: ordered collection records |
//! | [`scan`] | Artwork records read back from gallery cards and detail pages |
//! | [`generate`] | Maud renderers for cards, collection pages and artwork pages |
//! | [`output`] | Terminal formatting: banners, menus, listings, summaries |
//! | [`prompt`] | Line-oriented question/answer over any reader and writer |
//! | [`session`] | Project, backup, staged changeset, workflow errors |
//! | [`collections`] | Interactive collection generator (menu state machine) |
//! | [`artwork`] | Single-shot artwork page generator |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Element Tree Over Pattern Matching
//!
//! The index is someone's hand-written HTML. Finding "the closing tag of the
//! art grid" by counting `<div` and `</div>` strings breaks on comments,
//! scripts and attribute values containing markup. [`document`] parses the
//! source into an element tree that records byte offsets, so [`splice`] can
//! edit exact spans and leave every other byte of the file alone.
//!
//! ## Upsert, Not Append
//!
//! Cards are keyed by `href`. Re-running a generator for the same page
//! replaces its card in place instead of adding a second one.
//!
//! ## Escaped By Default
//!
//! Operator text is escaped wherever it lands in a page. `render.escape_html
//! = false` lets element text carry raw markup for sites that rely on it;
//! attribute values are escaped regardless.

pub mod artwork;
pub mod collections;
pub mod config;
pub mod document;
pub mod generate;
pub mod logging;
pub mod naming;
pub mod output;
pub mod prompt;
pub mod scan;
pub mod session;
pub mod splice;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
