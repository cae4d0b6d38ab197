//! Plain-text rendering of rich-text documents.
//!
//! Text nodes contribute their value, block and inline nodes contribute the
//! rendering of their children, and a single space separates a node from a
//! following block sibling.

use serde_json::Value;

const BLOCK_DIVISOR: &str = " ";

const BLOCK_TYPES: &[&str] = &[
    "document",
    "paragraph",
    "heading-1",
    "heading-2",
    "heading-3",
    "heading-4",
    "heading-5",
    "heading-6",
    "ordered-list",
    "unordered-list",
    "list-item",
    "hr",
    "blockquote",
    "embedded-entry-block",
    "embedded-asset-block",
    "embedded-resource-block",
    "table",
    "table-row",
    "table-cell",
    "table-header-cell",
];

const INLINE_TYPES: &[&str] = &[
    "hyperlink",
    "entry-hyperlink",
    "asset-hyperlink",
    "resource-hyperlink",
    "embedded-entry-inline",
    "embedded-resource-inline",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Text,
    Block,
    Inline,
    Unknown,
}

fn kind(node: &Value) -> NodeKind {
    match node.get("nodeType").and_then(Value::as_str) {
        Some("text") => NodeKind::Text,
        Some(t) if BLOCK_TYPES.contains(&t) => NodeKind::Block,
        Some(t) if INLINE_TYPES.contains(&t) => NodeKind::Inline,
        _ => NodeKind::Unknown,
    }
}

/// Renders a rich-text node (normally the `document` root) as plain text.
/// Values without a `content` list, including non-objects, render as empty
/// text.
pub fn to_plain_text(root: &Value) -> String {
    let Some(children) = root.get("content").and_then(Value::as_array) else {
        return String::new();
    };

    let mut out = String::new();
    for (i, node) in children.iter().enumerate() {
        match kind(node) {
            NodeKind::Text => {
                out.push_str(node.get("value").and_then(Value::as_str).unwrap_or(""));
            }
            NodeKind::Block | NodeKind::Inline => {
                let text = to_plain_text(node);
                if text.is_empty() {
                    continue;
                }
                out.push_str(&text);
            }
            NodeKind::Unknown => {}
        }

        let next_is_block = children
            .get(i + 1)
            .is_some_and(|next| kind(next) == NodeKind::Block);
        if next_is_block {
            out.push_str(BLOCK_DIVISOR);
        }
    }
    out
}
