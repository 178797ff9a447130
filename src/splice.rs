//! Card-level edits of the index document.
//!
//! The index page has two grids the generators maintain: the loose artwork
//! grid and the collection (series) grid. Each grid is found by its literal
//! opening tag (see [`crate::config::MarkupConfig`]); cards inside it are `<a>`
//! elements carrying the grid's card class. All operations work on the
//! element structure from [`crate::document`] and return a new string; the text
//! outside the spliced range is never touched.
//!
//! ## Operations
//!
//! | Operation | Use |
//! |-----------|-----|
//! | [`find_container_span`] | Bounds of a grid, by nested-depth matching |
//! | [`insert_after_last_match`] | Append a card after the last card of a grid |
//! | [`append_to_container`] | Append before the grid's closing tag (empty grids) |
//! | [`remove_matching_block`] | Drop a grid's cards linking to a page |
//! | [`upsert_card`] | Replace a page's card in place, or append it |
//!
//! Inserted blocks go on their own line, indented like the card they follow;
//! removed cards take their line's indentation and line break with them so the
//! page does not collect blank lines.

use crate::document::{Document, ElementId};
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SpliceError {
    #[error("Could not find {0} in the document")]
    MarkerNotFound(String),
    #[error("{0} does not start an element")]
    MarkerNotElement(String),
    #[error("Unbalanced markup: {0} is never closed")]
    Unbalanced(String),
    #[error("Found {marker} but it contains no .{card_class} cards")]
    EmptyContainer { marker: String, card_class: String },
}

/// Byte offsets of a container element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSpan {
    /// `<` of the opening tag
    pub start: usize,
    /// Just past the opening tag
    pub inner_start: usize,
    /// `<` of the matching closing tag
    pub inner_end: usize,
    /// Just past the matching closing tag
    pub end: usize,
}

/// The container element opened by `open_marker`.
///
/// Occurrences of the marker text that do not start an element (inside a
/// comment or a script, say) are skipped.
pub(crate) fn locate(doc: &Document<'_>, open_marker: &str) -> Result<ElementId, SpliceError> {
    let mut offsets = doc.source().match_indices(open_marker).map(|(i, _)| i).peekable();
    if offsets.peek().is_none() {
        return Err(SpliceError::MarkerNotFound(open_marker.to_string()));
    }
    offsets
        .find_map(|offset| doc.element_at(offset))
        .ok_or_else(|| SpliceError::MarkerNotElement(open_marker.to_string()))
}

fn container_span(
    doc: &Document<'_>,
    id: ElementId,
    open_marker: &str,
) -> Result<ContainerSpan, SpliceError> {
    let el = doc.element(id);
    match (el.close_start, el.end) {
        (Some(inner_end), Some(end)) => Ok(ContainerSpan {
            start: el.start,
            inner_start: el.open_end,
            inner_end,
            end,
        }),
        _ => Err(SpliceError::Unbalanced(open_marker.to_string())),
    }
}

/// Locate the element opened by `open_marker` and its true closing tag.
///
/// The first occurrence of the marker text that opens an element is used.
/// Nested children of any
/// depth are skipped over; a container that is still open at the end of the
/// document is an [`SpliceError::Unbalanced`] error rather than a guess.
pub fn find_container_span(doc: &str, open_marker: &str) -> Result<ContainerSpan, SpliceError> {
    let parsed = Document::parse(doc);
    let id = locate(&parsed, open_marker)?;
    container_span(&parsed, id, open_marker)
}

/// Cards (`<a>` with `card_class`) inside the container, in document order.
pub(crate) fn cards_in(doc: &Document<'_>, container: ElementId, card_class: &str) -> Vec<ElementId> {
    doc.descendants(container)
        .into_iter()
        .filter(|&id| {
            let el = doc.element(id);
            el.name == "a" && el.has_class(card_class)
        })
        .collect()
}

/// Whitespace run directly before `offset` on the same line.
fn line_indent(doc: &str, offset: usize) -> &str {
    let line_start = doc[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prefix = &doc[line_start..offset];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}

fn splice(doc: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(doc.len() + replacement.len());
    out.push_str(&doc[..range.start]);
    out.push_str(replacement);
    out.push_str(&doc[range.end..]);
    out
}

/// Insert `block` right after the last `card_class` card in the container.
///
/// The container is expected to hold at least one card (the seed entry of the
/// hand-authored page); an empty container is an error.
pub fn insert_after_last_match(
    doc: &str,
    container_marker: &str,
    card_class: &str,
    block: &str,
) -> Result<String, SpliceError> {
    let parsed = Document::parse(doc);
    let container = locate(&parsed, container_marker)?;
    container_span(&parsed, container, container_marker)?;

    let last = cards_in(&parsed, container, card_class)
        .into_iter()
        .filter_map(|id| parsed.element(id).span())
        .next_back()
        .ok_or_else(|| SpliceError::EmptyContainer {
            marker: container_marker.to_string(),
            card_class: card_class.to_string(),
        })?;

    let indent = line_indent(doc, last.start);
    let insertion = format!("\n{indent}{block}");
    Ok(splice(doc, last.end..last.end, &insertion))
}

/// Insert `block` just before the container's closing tag.
pub fn append_to_container(
    doc: &str,
    container_marker: &str,
    block: &str,
) -> Result<String, SpliceError> {
    let span = find_container_span(doc, container_marker)?;
    let container_indent = line_indent(doc, span.start);
    let closing_indent = line_indent(doc, span.inner_end);
    let insert_at = span.inner_end - closing_indent.len();

    let insertion = format!("{container_indent}  {block}\n");
    let needs_break = !doc[..insert_at].ends_with('\n');
    let insertion = if needs_break {
        format!("\n{insertion}{closing_indent}")
    } else {
        insertion
    };
    Ok(splice(doc, insert_at..insert_at, &insertion))
}

/// Range covering a card plus its line's indentation and preceding line break,
/// when the card sits alone at the start of its line.
fn removal_range(doc: &str, card: Range<usize>) -> Range<usize> {
    let indent = line_indent(doc, card.start);
    let mut start = card.start - indent.len();
    let line_start = start == 0 || doc.as_bytes()[start - 1] == b'\n';
    if line_start && start > 0 {
        start -= 1;
        if start > 0 && doc.as_bytes()[start - 1] == b'\r' {
            start -= 1;
        }
    }
    start..card.end
}

/// Remove every card (`<a>` with `card_class`) inside the container whose
/// `href` is `href`. Cards elsewhere on the page are left alone.
///
/// Returns the edited document and the number of cards removed. Removing
/// nothing is not an error; callers that care must check the count.
pub fn remove_matching_block(
    doc: &str,
    container_marker: &str,
    href: &str,
    card_class: &str,
) -> Result<(String, usize), SpliceError> {
    let parsed = Document::parse(doc);
    let container = locate(&parsed, container_marker)?;
    container_span(&parsed, container, container_marker)?;

    let ranges: Vec<Range<usize>> = cards_in(&parsed, container, card_class)
        .into_iter()
        .map(|id| parsed.element(id))
        .filter(|el| el.attr("href") == Some(href))
        .filter_map(|el| el.span())
        .map(|span| removal_range(doc, span))
        .collect();

    if ranges.is_empty() {
        tracing::warn!(href, card_class, "no card found to remove");
        return Ok((doc.to_string(), 0));
    }

    // Cards never overlap (an <a> cannot contain another card we would match
    // without also matching the outer one), so drop nested hits.
    let mut out = String::with_capacity(doc.len());
    let mut cursor = 0;
    let mut removed = 0;
    for range in ranges {
        if range.start < cursor {
            continue;
        }
        out.push_str(&doc[cursor..range.start]);
        cursor = range.end;
        removed += 1;
    }
    out.push_str(&doc[cursor..]);
    tracing::debug!(href, removed, "removed cards");
    Ok((out, removed))
}

/// Put `block` in the container as the card for `href`.
///
/// An existing card for `href` inside the container is replaced in place
/// (repeat updates never duplicate a card); otherwise the block goes after the
/// last card, or at the end of the container when it has none.
pub fn upsert_card(
    doc: &str,
    container_marker: &str,
    card_class: &str,
    href: &str,
    block: &str,
) -> Result<String, SpliceError> {
    let parsed = Document::parse(doc);
    let container = locate(&parsed, container_marker)?;
    container_span(&parsed, container, container_marker)?;

    let cards = cards_in(&parsed, container, card_class);
    let existing = cards
        .iter()
        .map(|&id| parsed.element(id))
        .find(|el| el.attr("href") == Some(href))
        .and_then(|el| el.span());

    match existing {
        Some(span) => {
            tracing::debug!(href, "replacing existing card");
            Ok(splice(doc, span, block))
        }
        None if cards.is_empty() => append_to_container(doc, container_marker, block),
        None => insert_after_last_match(doc, container_marker, card_class, block),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = r#"<div class="art-grid">"#;

    fn index_with_cards() -> String {
        r#"<main>
        <div class="art-grid">
          <a href="one.html" class="art-card">
            <div class="art-info"><h3 class="art-name">One</h3></div>
          </a>
          <a href="two.html" class="art-card">
            <div class="art-info"><h3 class="art-name">Two</h3></div>
          </a>
        </div>
        <div class="series-grid">
          <a href="collections/a.html" class="series-card"><h3>A</h3></a>
        </div>
</main>
"#
        .to_string()
    }

    // =========================================================================
    // find_container_span
    // =========================================================================

    #[test]
    fn container_span_depth_zero() {
        let doc = r#"<div class="art-grid"></div>"#;
        let span = find_container_span(doc, GRID).unwrap();
        assert_eq!(span.start, 0);
        assert_eq!(span.inner_start, GRID.len());
        assert_eq!(span.inner_end, GRID.len());
        assert_eq!(span.end, doc.len());
    }

    #[test]
    fn container_span_depth_one() {
        let doc = r#"x<div class="art-grid"><div>a</div><div>b</div></div><div>after</div>"#;
        let span = find_container_span(doc, GRID).unwrap();
        assert_eq!(&doc[span.start..span.end], r#"<div class="art-grid"><div>a</div><div>b</div></div>"#);
    }

    #[test]
    fn container_span_depth_three() {
        let inner = "<div><div><div>deep</div></div></div>";
        let doc = format!(r#"<body><div class="art-grid">{inner}</div><footer></footer></body>"#);
        let span = find_container_span(&doc, GRID).unwrap();
        assert_eq!(&doc[span.inner_start..span.inner_end], inner);
        assert_eq!(&doc[span.inner_end..span.end], "</div>");
    }

    #[test]
    fn container_span_unbalanced_is_error() {
        let doc = r#"<div class="art-grid"><div><div></div></div>"#;
        assert_eq!(
            find_container_span(doc, GRID),
            Err(SpliceError::Unbalanced(GRID.to_string()))
        );
    }

    #[test]
    fn container_span_skips_commented_marker() {
        let doc = r#"<!-- <div class="art-grid"> old grid --><main><div class="art-grid"><a></a></div></main>"#;
        let span = find_container_span(doc, GRID).unwrap();
        assert_eq!(&doc[span.start..span.end], r#"<div class="art-grid"><a></a></div>"#);
    }

    #[test]
    fn container_span_marker_only_in_comment() {
        let doc = r#"<!-- <div class="art-grid"></div> -->"#;
        assert!(matches!(
            find_container_span(doc, GRID),
            Err(SpliceError::MarkerNotElement(_))
        ));
    }

    #[test]
    fn container_span_missing_marker() {
        assert!(matches!(
            find_container_span("<div></div>", GRID),
            Err(SpliceError::MarkerNotFound(_))
        ));
    }

    // =========================================================================
    // insert_after_last_match
    // =========================================================================

    #[test]
    fn insert_after_last_card_keeps_indentation() {
        let doc = index_with_cards();
        let out = insert_after_last_match(&doc, GRID, "art-card", r#"<a href="three.html" class="art-card"></a>"#)
            .unwrap();
        let two_end = out.find("</a>\n          <a href=\"three.html\"");
        assert!(two_end.is_some(), "{out}");
        assert!(out.find("two.html").unwrap() < out.find("three.html").unwrap());
        // Series grid untouched
        assert!(out.contains(r#"<a href="collections/a.html" class="series-card"><h3>A</h3></a>"#));
    }

    #[test]
    fn insert_into_empty_container_is_error() {
        let doc = r#"<div class="series-grid">
        </div>"#;
        let result = insert_after_last_match(doc, r#"<div class="series-grid">"#, "series-card", "<a></a>");
        assert!(matches!(result, Err(SpliceError::EmptyContainer { .. })));
    }

    #[test]
    fn insert_only_considers_cards_inside_container() {
        let doc = index_with_cards();
        let out = insert_after_last_match(
            &doc,
            r#"<div class="series-grid">"#,
            "series-card",
            r#"<a href="collections/b.html" class="series-card"></a>"#,
        )
        .unwrap();
        let a = out.find("collections/a.html").unwrap();
        let b = out.find("collections/b.html").unwrap();
        assert!(a < b);
        assert!(out.find("two.html").unwrap() < a);
    }

    // =========================================================================
    // append_to_container
    // =========================================================================

    #[test]
    fn append_to_empty_container() {
        let doc = "<main>\n  <div class=\"art-grid\">\n  </div>\n</main>";
        let out = append_to_container(doc, GRID, "<a class=\"art-card\"></a>").unwrap();
        assert_eq!(
            out,
            "<main>\n  <div class=\"art-grid\">\n    <a class=\"art-card\"></a>\n  </div>\n</main>"
        );
    }

    #[test]
    fn append_to_single_line_container() {
        let doc = r#"<div class="art-grid"></div>"#;
        let out = append_to_container(doc, GRID, "<a></a>").unwrap();
        assert_eq!(out, "<div class=\"art-grid\">\n  <a></a>\n</div>");
        assert!(find_container_span(&out, GRID).is_ok());
    }

    // =========================================================================
    // remove_matching_block
    // =========================================================================

    #[test]
    fn remove_card_and_its_line() {
        let doc = index_with_cards();
        let (out, removed) = remove_matching_block(&doc, GRID, "one.html", "art-card").unwrap();
        assert_eq!(removed, 1);
        assert!(!out.contains("one.html"));
        assert!(!out.contains(">One<"));
        assert!(out.contains("two.html"));
        assert!(!out.contains("\n\n"));
        // Grid still balanced
        assert!(find_container_span(&out, GRID).is_ok());
    }

    #[test]
    fn remove_missing_card_is_noop() {
        let doc = index_with_cards();
        let (out, removed) = remove_matching_block(&doc, GRID, "nope.html", "art-card").unwrap();
        assert_eq!(removed, 0);
        assert_eq!(out, doc);
    }

    #[test]
    fn remove_requires_card_class() {
        let doc = r#"<div class="art-grid"><a href="one.html">One</a></div>"#;
        let (out, removed) = remove_matching_block(doc, GRID, "one.html", "art-card").unwrap();
        assert_eq!(removed, 0);
        assert_eq!(out, doc);
    }

    #[test]
    fn remove_every_duplicate() {
        let doc = "<div class=\"art-grid\">\n  <a href=\"x.html\" class=\"art-card\">1</a>\n  <a href=\"x.html\" class=\"art-card\">2</a>\n</div>";
        let (out, removed) = remove_matching_block(doc, GRID, "x.html", "art-card").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(out, "<div class=\"art-grid\">\n</div>");
    }

    #[test]
    fn remove_leaves_cards_outside_container() {
        let doc = "<section class=\"featured\">\n  <a href=\"g.html\" class=\"art-card\">F</a>\n</section>\n<div class=\"art-grid\">\n  <a href=\"g.html\" class=\"art-card\">G</a>\n</div>";
        let (out, removed) = remove_matching_block(doc, GRID, "g.html", "art-card").unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            out,
            "<section class=\"featured\">\n  <a href=\"g.html\" class=\"art-card\">F</a>\n</section>\n<div class=\"art-grid\">\n</div>"
        );
    }

    #[test]
    fn remove_without_container_is_error() {
        let doc = r#"<a href="g.html" class="art-card">G</a>"#;
        assert!(matches!(
            remove_matching_block(doc, GRID, "g.html", "art-card"),
            Err(SpliceError::MarkerNotFound(_))
        ));
    }

    // =========================================================================
    // upsert_card
    // =========================================================================

    #[test]
    fn upsert_replaces_existing_card() {
        let doc = index_with_cards();
        let marker = r#"<div class="series-grid">"#;
        let card = r#"<a href="collections/a.html" class="series-card"><h3>A v2</h3></a>"#;
        let once = upsert_card(&doc, marker, "series-card", "collections/a.html", card).unwrap();
        let twice = upsert_card(&once, marker, "series-card", "collections/a.html", card).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.matches("collections/a.html").count(), 1);
        assert!(twice.contains("A v2"));
    }

    #[test]
    fn upsert_appends_new_card() {
        let doc = index_with_cards();
        let marker = r#"<div class="series-grid">"#;
        let card = r#"<a href="collections/b.html" class="series-card"></a>"#;
        let out = upsert_card(&doc, marker, "series-card", "collections/b.html", card).unwrap();
        assert!(out.contains("collections/a.html"));
        assert!(out.contains("collections/b.html"));
    }

    #[test]
    fn upsert_into_empty_grid() {
        let doc = "<div class=\"art-grid\">\n</div>";
        let out = upsert_card(doc, GRID, "art-card", "x.html", r#"<a href="x.html" class="art-card"></a>"#).unwrap();
        assert!(out.contains(r#"<a href="x.html" class="art-card"></a>"#));
        assert!(find_container_span(&out, GRID).is_ok());
    }
}
