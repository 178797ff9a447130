//! Minimal structural model of an HTML document.
//!
//! The index page is hand-authored, so the generators cannot assume anything
//! beyond "mostly balanced tags". Rather than searching for closing tags with
//! offset arithmetic, the document is tokenized once into a flat list of
//! elements that own their children and remember the byte ranges of their
//! opening and closing tags. Container lookup, card lookup and card removal are
//! then tree queries, and every edit is a splice of the original text at
//! recorded offsets, so untouched markup is preserved byte for byte.
//!
//! ## Tokenizer rules
//!
//! - Tag and attribute names are case-insensitive (stored lower-cased).
//! - Void elements (`img`, `input`, `br`, ...) and `<x/>` never take children.
//! - `script`, `style`, `textarea` and `title` hold raw text up to their
//!   closing tag; markup inside them is not parsed.
//! - Comments, doctypes and processing instructions are skipped.
//! - A closing tag closes the nearest open element of the same name. Elements
//!   above it on the stack are left unclosed. A closing tag with no open
//!   element of that name is ignored.
//! - Elements still open at the end of input are unclosed ([`Element::end`] is
//!   `None`). This is how unbalanced containers are detected.

use std::ops::Range;

/// Index of an element in [`Document::elements`].
pub type ElementId = usize;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// One element and the byte offsets of its tags in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lower-cased tag name
    pub name: String,
    attrs: Vec<(String, String)>,
    /// Offset of the `<` of the opening tag
    pub start: usize,
    /// Offset just past the `>` of the opening tag
    pub open_end: usize,
    /// Offset of the `<` of the closing tag. Equals `open_end` for void
    /// elements; `None` if the element is never closed.
    pub close_start: Option<usize>,
    /// Offset just past the closing tag; `None` if never closed.
    pub end: Option<usize>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
}

impl Element {
    /// Decoded attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the whitespace-separated `class` list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    /// Whole element: opening tag through closing tag.
    pub fn span(&self) -> Option<Range<usize>> {
        self.end.map(|end| self.start..end)
    }

    /// Content between the opening and closing tags.
    pub fn inner(&self) -> Option<Range<usize>> {
        self.close_start.map(|close| self.open_end..close)
    }

    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }
}

/// Parsed element structure of an HTML text.
#[derive(Debug)]
pub struct Document<'a> {
    source: &'a str,
    elements: Vec<Element>,
}

impl<'a> Document<'a> {
    /// Tokenize `source` into its element structure. Never fails: malformed
    /// markup yields unclosed elements or is treated as text.
    pub fn parse(source: &'a str) -> Self {
        let mut parser = Parser {
            src: source,
            bytes: source.as_bytes(),
            pos: 0,
            elements: Vec::new(),
            stack: Vec::new(),
        };
        parser.run();
        Self {
            source,
            elements: parser.elements,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// All elements in document order (by opening tag).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id]
    }

    /// The element whose opening tag starts exactly at `offset`.
    pub fn element_at(&self, offset: usize) -> Option<ElementId> {
        self.elements
            .binary_search_by_key(&offset, |el| el.start)
            .ok()
    }

    /// Descendants of `id` in document order (excluding `id` itself).
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.elements[id].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.elements[next].children.iter().rev().copied());
        }
        out
    }

    /// First descendant of `id` (document order) matching `pred`.
    pub fn find_descendant<F>(&self, id: ElementId, pred: F) -> Option<ElementId>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants(id)
            .into_iter()
            .find(|&d| pred(&self.elements[d]))
    }

    /// First element of the document matching `pred`.
    pub fn find<F>(&self, pred: F) -> Option<ElementId>
    where
        F: Fn(&Element) -> bool,
    {
        self.elements.iter().position(pred)
    }

    /// Text inside an element: tags stripped, entities decoded, whitespace
    /// collapsed. Empty for void or unclosed elements.
    pub fn text_content(&self, id: ElementId) -> String {
        match self.elements[id].inner() {
            Some(range) => {
                let stripped = strip_tags(&self.source[range]);
                normalize_ws(&decode_entities(&stripped))
            }
            None => String::new(),
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    elements: Vec<Element>,
    stack: Vec<ElementId>,
}

impl Parser<'_> {
    fn run(&mut self) {
        while let Some(rel) = self.src[self.pos..].find('<') {
            let lt = self.pos + rel;
            let next = self.bytes.get(lt + 1).copied();
            match next {
                Some(b'!') if self.src[lt..].starts_with("<!--") => {
                    self.pos = match self.src[lt + 4..].find("-->") {
                        Some(r) => lt + 4 + r + 3,
                        None => self.src.len(),
                    };
                }
                Some(b'!') | Some(b'?') => {
                    self.pos = match self.src[lt..].find('>') {
                        Some(r) => lt + r + 1,
                        None => self.src.len(),
                    };
                }
                Some(b'/') if self.bytes.get(lt + 2).is_some_and(u8::is_ascii_alphabetic) => {
                    self.closing_tag(lt);
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    if !self.opening_tag(lt) {
                        // Unterminated tag: the rest is text.
                        self.pos = self.src.len();
                    }
                }
                _ => self.pos = lt + 1,
            }
        }
    }

    fn read_name(&self, mut at: usize) -> (String, usize) {
        let begin = at;
        while at < self.bytes.len() {
            let b = self.bytes[at];
            if b.is_ascii_whitespace() || b == b'>' || b == b'/' {
                break;
            }
            at += 1;
        }
        (self.src[begin..at].to_ascii_lowercase(), at)
    }

    fn closing_tag(&mut self, lt: usize) {
        let (name, after_name) = self.read_name(lt + 2);
        let end = match self.src[after_name..].find('>') {
            Some(r) => after_name + r + 1,
            None => self.src.len(),
        };
        self.pos = end;

        let Some(depth) = self.stack.iter().rposition(|&id| self.elements[id].name == name) else {
            tracing::trace!(tag = %name, offset = lt, "ignoring stray closing tag");
            return;
        };
        let id = self.stack[depth];
        self.stack.truncate(depth);
        let el = &mut self.elements[id];
        el.close_start = Some(lt);
        el.end = Some(end);
    }

    /// Parse an opening tag at `lt`. Returns false if the tag never ends.
    fn opening_tag(&mut self, lt: usize) -> bool {
        let (name, mut at) = self.read_name(lt + 1);
        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            while at < self.bytes.len() && self.bytes[at].is_ascii_whitespace() {
                at += 1;
            }
            match self.bytes.get(at) {
                None => return false,
                Some(b'>') => {
                    at += 1;
                    break;
                }
                Some(b'/') => {
                    if self.bytes.get(at + 1) == Some(&b'>') {
                        self_closing = true;
                        at += 2;
                        break;
                    }
                    at += 1;
                    continue;
                }
                Some(_) => {}
            }

            let key_start = at;
            while at < self.bytes.len() {
                let b = self.bytes[at];
                if b.is_ascii_whitespace() || b == b'=' || b == b'>' || b == b'/' {
                    break;
                }
                at += 1;
            }
            let key = self.src[key_start..at].to_ascii_lowercase();

            while at < self.bytes.len() && self.bytes[at].is_ascii_whitespace() {
                at += 1;
            }
            let mut value = String::new();
            if self.bytes.get(at) == Some(&b'=') {
                at += 1;
                while at < self.bytes.len() && self.bytes[at].is_ascii_whitespace() {
                    at += 1;
                }
                match self.bytes.get(at) {
                    Some(&q) if q == b'"' || q == b'\'' => {
                        let Some(r) = self.src[at + 1..].find(q as char) else {
                            return false;
                        };
                        value = decode_entities(&self.src[at + 1..at + 1 + r]);
                        at += r + 2;
                    }
                    Some(_) => {
                        let v_start = at;
                        while at < self.bytes.len()
                            && !self.bytes[at].is_ascii_whitespace()
                            && self.bytes[at] != b'>'
                        {
                            at += 1;
                        }
                        value = decode_entities(&self.src[v_start..at]);
                    }
                    None => return false,
                }
            }
            if !key.is_empty() {
                attrs.push((key, value));
            }
        }

        let id = self.elements.len();
        let parent = self.stack.last().copied();
        let is_void = self_closing || VOID_ELEMENTS.contains(&name.as_str());
        let is_raw = !is_void && RAW_TEXT_ELEMENTS.contains(&name.as_str());

        let mut element = Element {
            name,
            attrs,
            start: lt,
            open_end: at,
            close_start: None,
            end: None,
            parent,
            children: Vec::new(),
        };
        self.pos = at;

        if is_void {
            element.close_start = Some(at);
            element.end = Some(at);
        } else if is_raw {
            let needle = format!("</{}", element.name);
            let rest = self.src[at..].to_ascii_lowercase();
            if let Some(r) = rest.find(&needle) {
                let close = at + r;
                let end = match self.src[close..].find('>') {
                    Some(g) => close + g + 1,
                    None => self.src.len(),
                };
                element.close_start = Some(close);
                element.end = Some(end);
                self.pos = end;
            } else {
                self.pos = self.src.len();
            }
        }

        if let Some(p) = parent {
            self.elements[p].children.push(id);
        }
        self.elements.push(element);
        if !is_void && !is_raw {
            self.stack.push(id);
        }
        true
    }
}

/// Remove everything between `<` and `>`.
pub fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Collapse whitespace runs into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the character references that show up in hand-written pages:
/// the five XML entities, `&nbsp;`, and numeric references.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
