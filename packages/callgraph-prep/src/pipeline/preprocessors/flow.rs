//! Type-annotation stripper
//!
//! Removes structural type annotations (Flow / TypeScript style) from
//! source text, leaving plain executable syntax. Annotation spans are
//! blanked with spaces instead of deleted, so byte offsets of surviving
//! code, total line count, and all line numbers are unchanged.

use std::ops::Range;

use tree_sitter::Node;

use crate::errors::{PrepError, Result};
use crate::pipeline::preprocessors::{node_kinds, parse_source};

/// Node kinds that are pure type syntax and get blanked wholesale.
const TYPE_ONLY_KINDS: &[&str] = &[
    node_kinds::TYPE_ANNOTATION,
    node_kinds::TYPE_ALIAS_DECLARATION,
    node_kinds::INTERFACE_DECLARATION,
    node_kinds::TYPE_PARAMETERS,
    node_kinds::TYPE_ARGUMENTS,
    node_kinds::IMPLEMENTS_CLAUSE,
];

/// Strip type annotations from `src`.
///
/// The source is parsed with the TypeScript grammar; annotation nodes are
/// collected and their spans replaced by spaces (newlines kept). Syntax the
/// grammar cannot parse at all fails with a parse error rather than
/// producing corrupted output.
pub fn strip_types(src: &str) -> Result<String> {
    let tree = parse_source(tree_sitter_typescript::language_typescript(), src)?;

    let mut spans: Vec<Range<usize>> = Vec::new();
    collect_type_spans(tree.root_node(), &mut spans);
    blank_spans(src, &spans)
}

fn collect_type_spans(node: Node, spans: &mut Vec<Range<usize>>) {
    let kind = node.kind();

    if TYPE_ONLY_KINDS.contains(&kind) {
        spans.push(node.byte_range());
        return;
    }

    match kind {
        // `import type {T} from 'mod'` has no runtime effect at all
        k if k == node_kinds::IMPORT_STATEMENT && has_type_keyword(&node) => {
            spans.push(node.byte_range());
            return;
        }
        // `export type X = ...` / `export interface ...` / `export type {T}`:
        // blanking only the inner declaration would leave a dangling
        // `export`, so the whole statement goes
        k if k == node_kinds::EXPORT_STATEMENT => {
            let type_only = has_type_keyword(&node)
                || node
                    .child_by_field_name("declaration")
                    .map(|d| {
                        d.kind() == node_kinds::TYPE_ALIAS_DECLARATION
                            || d.kind() == node_kinds::INTERFACE_DECLARATION
                    })
                    .unwrap_or(false);
            if type_only {
                spans.push(node.byte_range());
                return;
            }
        }
        // `x?: T` keeps the pattern but loses both the marker and the type
        k if k == node_kinds::OPTIONAL_PARAMETER || k == node_kinds::PUBLIC_FIELD_DEFINITION => {
            for i in 0..node.child_count() {
                if let Some(child) = node.child(i) {
                    if child.kind() == "?" {
                        spans.push(child.byte_range());
                    } else {
                        collect_type_spans(child, spans);
                    }
                }
            }
            return;
        }
        _ => {}
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_type_spans(child, spans);
        }
    }
}

fn has_type_keyword(node: &Node) -> bool {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == "type" && !child.is_named() {
                return true;
            }
        }
    }
    false
}

/// Overwrite the given byte spans with spaces, keeping line breaks.
///
/// Spans come from non-overlapping tree nodes, so no merging is needed.
fn blank_spans(src: &str, spans: &[Range<usize>]) -> Result<String> {
    let mut bytes = src.as_bytes().to_vec();
    for span in spans {
        for byte in &mut bytes[span.clone()] {
            if *byte != b'\n' && *byte != b'\r' {
                *byte = b' ';
            }
        }
    }
    String::from_utf8(bytes).map_err(|e| PrepError::pipeline(format!("blanking broke UTF-8: {}", e)))
}
