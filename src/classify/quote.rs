//! Quote and forwarded-content boundary detection.
//!
//! Two complementary techniques run over the parsed HTML body and their
//! outputs are unioned: a structural match against the container markers
//! conventional mail clients wrap quotes in, and a textual match against
//! forwarded-message separators and "On ... wrote:" attribution lines.
//! Textual hits are promoted to their parent block container so an entire
//! quoted section collapses as one unit, not just the marker line.
//!
//! Detection is pure and recomputed on demand; results identify regions by
//! root-relative child-index paths, which is stable for an unmodified body.

use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;

/// Container selectors used by mail clients to wrap quoted or forwarded
/// content.
const QUOTE_CONTAINER_SELECTORS: &str = "div.gmail_quote, div.yahoo_quoted, \
     blockquote[type=\"cite\"], div[id^=\"divRplyFwdMsg\"]";

static FORWARD_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^-{5,}\s*(Forwarded|Original) message\s*-{5,}")
        .expect("forward marker pattern is valid")
});

static ATTRIBUTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^On .+ wrote:$").expect("attribution pattern is valid"));

// Raw-string forms of the same four markers, for the cheap toggle check.
static RAW_FORWARD_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^-{5,}\s*(Forwarded|Original) message\s*-{5,}")
        .expect("raw forward marker pattern is valid")
});

static RAW_ATTRIBUTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^On .+ wrote:$").expect("raw attribution pattern is valid"));

/// Which technique identified a quoted region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMarker {
    /// A known quote container element (class, id, or cite-typed
    /// blockquote).
    Container,
    /// A "----- Forwarded/Original message -----" separator.
    ForwardedHeader,
    /// An "On ... wrote:" attribution line.
    AttributionLine,
}

/// A region of a message body judged to be quoted prior content.
///
/// The path is the sequence of child indices from the document root to the
/// region's top element, counting all sibling nodes. Purely presentational
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRegion {
    /// Root-relative child-index path to the region element.
    pub path: Vec<usize>,
    /// The marker that matched.
    pub marker: QuoteMarker,
    /// Leading text of the region, for affordance labels.
    pub preview: String,
}

/// Detects quoted/forwarded regions in an HTML message body.
///
/// Nested hits are subsumed by their outermost ancestor so each collapsed
/// section is reported once; output is in document order.
pub fn detect_quote_regions(html: &str) -> Vec<QuoteRegion> {
    let document = kuchiki::parse_html().one(html);
    collect_hits(&document)
        .into_iter()
        .map(|(node, marker)| QuoteRegion {
            path: node_path(&node),
            marker,
            preview: preview_text(&node),
        })
        .collect()
}

/// Cheap check for whether a raw body contains any quote marker at all.
///
/// Used to decide whether to show the "show quoted text" affordance
/// without walking the parsed tree on every render.
pub fn has_quoted_content(raw_body: &str) -> bool {
    raw_body.contains("gmail_quote")
        || raw_body.contains("yahoo_quoted")
        || RAW_FORWARD_MARKER.is_match(raw_body)
        || RAW_ATTRIBUTION_LINE.is_match(raw_body)
}

/// Returns the body HTML with `data-quoted="true"` set on every detected
/// region, the contract the presentation layer collapses on.
pub fn annotate_quotes(html: &str) -> String {
    let document = kuchiki::parse_html().one(html);
    for (node, _) in collect_hits(&document) {
        if let Some(element) = node.as_element() {
            element
                .attributes
                .borrow_mut()
                .insert("data-quoted", "true".to_string());
        }
    }
    extract_body_html(&document)
}

fn collect_hits(document: &NodeRef) -> Vec<(NodeRef, QuoteMarker)> {
    let mut hits: Vec<(NodeRef, QuoteMarker)> = Vec::new();

    if let Ok(matches) = document.select(QUOTE_CONTAINER_SELECTORS) {
        for m in matches {
            hits.push((m.as_node().clone(), QuoteMarker::Container));
        }
    }

    for node in document.descendants() {
        if node.as_element().is_none() {
            continue;
        }
        let own = own_text(&node);
        let trimmed = own.trim();
        if trimmed.is_empty() {
            continue;
        }
        if FORWARD_MARKER.is_match(trimmed) {
            hits.push((promote_to_block(&node), QuoteMarker::ForwardedHeader));
        } else if trimmed
            .lines()
            .any(|line| ATTRIBUTION_LINE.is_match(line.trim()))
        {
            hits.push((promote_to_block(&node), QuoteMarker::AttributionLine));
        }
    }

    dedupe_by_path(hits)
}

/// Text of the node's immediate child text nodes, excluding descendants.
///
/// Matching on own text keeps a marker from also matching every ancestor
/// whose subtree contains it.
fn own_text(node: &NodeRef) -> String {
    let mut out = String::new();
    for child in node.children() {
        if let Some(text) = child.as_text() {
            out.push_str(&text.borrow());
        }
    }
    out
}

/// Promotes a textual hit to its nearest block container, its immediate
/// parent, so the whole quoted section collapses together.
fn promote_to_block(node: &NodeRef) -> NodeRef {
    match node.parent() {
        Some(parent) if parent.as_element().is_some() => parent,
        _ => node.clone(),
    }
}

fn node_path(node: &NodeRef) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node.clone();
    while let Some(parent) = current.parent() {
        let index = parent
            .children()
            .position(|sibling| sibling == current)
            .unwrap_or(0);
        path.push(index);
        current = parent;
    }
    path.reverse();
    path
}

/// Sorts hits into document order and drops any hit nested inside (or
/// duplicating) an earlier one.
fn dedupe_by_path(hits: Vec<(NodeRef, QuoteMarker)>) -> Vec<(NodeRef, QuoteMarker)> {
    let mut keyed: Vec<(Vec<usize>, NodeRef, QuoteMarker)> = hits
        .into_iter()
        .map(|(node, marker)| (node_path(&node), node, marker))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut kept: Vec<(Vec<usize>, NodeRef, QuoteMarker)> = Vec::new();
    for (path, node, marker) in keyed {
        let subsumed = kept
            .iter()
            .any(|(kept_path, _, _)| path.starts_with(kept_path));
        if !subsumed {
            kept.push((path, node, marker));
        }
    }
    kept.into_iter()
        .map(|(_, node, marker)| (node, marker))
        .collect()
}

fn preview_text(node: &NodeRef) -> String {
    let text = node.text_contents();
    let trimmed = text.trim();
    let mut preview: String = trimmed.chars().take(80).collect();
    if trimmed.chars().count() > 80 {
        preview.push('…');
    }
    preview
}

fn extract_body_html(document: &NodeRef) -> String {
    if let Ok(mut bodies) = document.select("body") {
        if let Some(body) = bodies.next() {
            let mut out = String::new();
            for child in body.as_node().children() {
                out.push_str(&child.to_string());
            }
            return out;
        }
    }
    document.to_string()
}
