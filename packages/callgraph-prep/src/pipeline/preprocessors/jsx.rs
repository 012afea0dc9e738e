//! Template-syntax desugarer
//!
//! Rewrites embedded JSX markup into plain call expressions the downstream
//! parser understands. `<Tag a={e}>kids</Tag>` becomes
//! `callGraphCreateElement(Tag, {a: e}, ...kids)`, and a textual
//! post-processing pass then collapses the factory call to a direct call on
//! the tag expression: `Tag({a: e}, ...kids)`.
//!
//! The pragma names are deliberately unconventional so the synthetic calls
//! are unambiguous and cannot collide with user code. Line numbers are
//! retained: every rewritten JSX span is padded with the newlines it
//! consumed, inside the synthetic call's parentheses.

use lazy_static::lazy_static;
use regex::Regex;
use tree_sitter::Node;

use crate::errors::Result;
use crate::pipeline::preprocessors::{node_kinds, parse_source};

/// Name emitted for element creation instead of the conventional default.
pub const PRAGMA: &str = "callGraphCreateElement";
/// Name emitted for fragments (`<>...</>`).
pub const PRAGMA_FRAG: &str = "Fragment";

lazy_static! {
    // Collapses `callGraphCreateElement(X, ` to `X(`. Textual on purpose:
    // only first arguments without a comma are matched, which is the
    // historical behavior this pass preserves.
    static ref PRAGMA_CALL: Regex =
        Regex::new(r"callGraphCreateElement\(([^,]+), ").unwrap();
}

/// Desugar all JSX in `src` into direct call expressions.
pub fn desugar(src: &str) -> Result<String> {
    let tree = parse_source(tree_sitter_typescript::language_tsx(), src)?;

    // The root node spans first token to last token; trivia outside it
    // (leading blank lines, a blanked directive line, trailing whitespace)
    // must be carried over verbatim or every following line shifts
    let root = tree.root_node();
    let mut out = String::with_capacity(src.len());
    out.push_str(&src[..root.start_byte()]);
    rewrite_node(root, src, &mut out);
    out.push_str(&src[root.end_byte()..]);

    Ok(PRAGMA_CALL.replace_all(&out, "$1(").into_owned())
}

/// Copy `node` into `out`, replacing every JSX element with a synthetic
/// call. Non-JSX nodes are reproduced byte-for-byte, including the gaps
/// (whitespace, operators) between their children.
fn rewrite_node(node: Node, src: &str, out: &mut String) {
    if is_jsx_element(&node) {
        let call = element_to_call(node, src);
        out.push_str(&pad_line_breaks(call, &src[node.byte_range()]));
        return;
    }

    if node.child_count() == 0 {
        out.push_str(&src[node.byte_range()]);
        return;
    }

    let mut pos = node.start_byte();
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            out.push_str(&src[pos..child.start_byte()]);
            rewrite_node(child, src, out);
            pos = child.end_byte();
        }
    }
    out.push_str(&src[pos..node.end_byte()]);
}

fn is_jsx_element(node: &Node) -> bool {
    // Fragments parse as elements with a nameless opening tag in current
    // grammars; older ones gave them a kind of their own.
    node.kind() == node_kinds::JSX_ELEMENT
        || node.kind() == node_kinds::JSX_SELF_CLOSING_ELEMENT
        || node.kind() == node_kinds::JSX_FRAGMENT
}

/// Build `callGraphCreateElement(tag, props, ...children)` for one element.
fn element_to_call(node: Node, src: &str) -> String {
    // Self-closing elements carry their own name and attributes; paired
    // elements keep them on the opening tag. A fragment's opening tag has
    // no name at all.
    let attr_host = if node.kind() == node_kinds::JSX_SELF_CLOSING_ELEMENT {
        Some(node)
    } else {
        named_children(&node)
            .into_iter()
            .find(|c| c.kind() == node_kinds::JSX_OPENING_ELEMENT)
    };

    let tag = attr_host
        .and_then(|host| host.child_by_field_name("name"))
        .map(|name| tag_expression(name, src))
        .unwrap_or_else(|| PRAGMA_FRAG.to_string());

    let mut call = format!("{}({}, {}", PRAGMA, tag, props_object(attr_host, src));

    // A self-closing element has no children; its named children are its
    // own name and attributes, already consumed above
    if node.kind() != node_kinds::JSX_SELF_CLOSING_ELEMENT {
        for child in named_children(&node) {
            if let Some(expr) = child_expression(child, src) {
                call.push_str(", ");
                call.push_str(&expr);
            }
        }
    }

    call.push(')');
    call
}

/// Tag expression for a JSX name: lowercase tags are intrinsic elements and
/// become string literals, everything else stays a plain expression
/// (`Tag`, `Ns.Widget`).
fn tag_expression(name: Node, src: &str) -> String {
    let text = &src[name.byte_range()];
    let simple = name.kind() == node_kinds::IDENTIFIER
        || name.kind() == node_kinds::JSX_IDENTIFIER;
    let intrinsic = text
        .chars()
        .next()
        .map(|c| c.is_lowercase())
        .unwrap_or(false);

    if simple && intrinsic {
        format!("\"{}\"", text)
    } else {
        text.to_string()
    }
}

/// Props object literal for an opening tag, or `null` when it has none.
fn props_object(attr_host: Option<Node>, src: &str) -> String {
    let host = match attr_host {
        Some(host) => host,
        None => return "null".to_string(),
    };

    let mut parts: Vec<String> = Vec::new();
    for child in named_children(&host) {
        match child.kind() {
            k if k == node_kinds::JSX_ATTRIBUTE => {
                if let Some(part) = attribute_entry(child, src) {
                    parts.push(part);
                }
            }
            // `{...rest}` on a tag spreads into the props object
            k if k == node_kinds::JSX_EXPRESSION => {
                if let Some(expr) = expression_body(child, src) {
                    parts.push(expr);
                }
            }
            _ => {}
        }
    }

    if parts.is_empty() {
        "null".to_string()
    } else {
        format!("{{{}}}", parts.join(", "))
    }
}

/// One `key: value` entry for a JSX attribute.
///
/// `a={e}` keeps the expression, `b="s"` keeps the literal, bare `c` means
/// `c: true`. Dashed or namespaced names become quoted keys.
fn attribute_entry(attr: Node, src: &str) -> Option<String> {
    let name = attr.child(0)?;
    let name_text = &src[name.byte_range()];
    let key = if is_plain_identifier(name_text) {
        name_text.to_string()
    } else {
        format!("\"{}\"", name_text)
    };

    // A bare attribute has only the name child
    let value = match attr.child(2) {
        None => "true".to_string(),
        Some(value) => match value.kind() {
            k if k == node_kinds::STRING => src[value.byte_range()].to_string(),
            k if k == node_kinds::JSX_EXPRESSION => expression_body(value, src)?,
            _ if is_jsx_element(&value) => element_to_call(value, src),
            _ => src[value.byte_range()].to_string(),
        },
    };

    Some(format!("{}: {}", key, value))
}

/// Desugared expression for one child of a JSX element, or `None` for
/// children that produce nothing (tags, whitespace-only text, comment-only
/// expression containers).
fn child_expression(child: Node, src: &str) -> Option<String> {
    match child.kind() {
        k if k == node_kinds::JSX_OPENING_ELEMENT
            || k == node_kinds::JSX_CLOSING_ELEMENT =>
        {
            None
        }
        k if k == node_kinds::JSX_TEXT || k == node_kinds::HTML_CHARACTER_REFERENCE => {
            text_literal(&src[child.byte_range()])
        }
        k if k == node_kinds::JSX_EXPRESSION => expression_body(child, src),
        _ if is_jsx_element(&child) => Some(element_to_call(child, src)),
        _ => None,
    }
}

/// The inner expression of a `{...}` container, with any JSX inside it
/// desugared as well. Comment-only containers yield `None`.
fn expression_body(container: Node, src: &str) -> Option<String> {
    let inner = named_children(&container)
        .into_iter()
        .find(|c| c.kind() != node_kinds::COMMENT)?;

    let mut out = String::new();
    rewrite_node(inner, src, &mut out);
    Some(out)
}

/// JSX text child as a string literal, whitespace-collapsed the way
/// template compilers do. Whitespace-only runs disappear entirely.
fn text_literal(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    let mut lit = String::with_capacity(collapsed.len() + 2);
    lit.push('"');
    for c in collapsed.chars() {
        match c {
            '"' => lit.push_str("\\\""),
            '\\' => lit.push_str("\\\\"),
            _ => lit.push(c),
        }
    }
    lit.push('"');
    Some(lit)
}

fn is_plain_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Re-insert the newlines a rewritten span consumed, just before the
/// closing paren, so every following line keeps its number.
fn pad_line_breaks(mut call: String, original: &str) -> String {
    let consumed = count_newlines(original);
    let produced = count_newlines(&call);
    if consumed > produced {
        call.truncate(call.len() - 1);
        for _ in 0..consumed - produced {
            call.push('\n');
        }
        call.push(')');
    }
    call
}

fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

fn named_children<'a>(node: &'a Node) -> Vec<Node<'a>> {
    let mut children = Vec::with_capacity(node.named_child_count());
    for i in 0..node.named_child_count() {
        if let Some(child) = node.named_child(i) {
            children.push(child);
        }
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_self_closing_component() {
        let out = desugar("<Tag prop={1} />;").unwrap();
        assert!(!out.contains("callGraphCreateElement("));
        assert_eq!(out, "Tag({prop: 1});");
    }

    #[test]
    fn test_intrinsic_element_with_children() {
        let out = desugar("let el = <div className=\"app\">Hello {name}!</div>;").unwrap();
        assert_eq!(
            out,
            "let el = \"div\"({className: \"app\"}, \"Hello\", name, \"!\");"
        );
    }

    #[test]
    fn test_nested_elements() {
        let out = desugar("<ul><li>one</li><li>two</li></ul>;").unwrap();
        assert_eq!(
            out,
            "\"ul\"(null, \"li\"(null, \"one\"), \"li\"(null, \"two\"));"
        );
    }

    #[test]
    fn test_fragment_uses_pragma_frag() {
        let out = desugar("<>{a}</>;").unwrap();
        assert_eq!(out, "Fragment(null, a);");
    }

    #[test]
    fn test_bare_and_spread_attributes() {
        let out = desugar("<Input disabled {...rest} />;").unwrap();
        assert_eq!(out, "Input({disabled: true, ...rest});");
    }

    #[test]
    fn test_jsx_inside_expression_child() {
        let out = desugar("<List>{items.map(i => <Item key={i} />)}</List>;").unwrap();
        assert_eq!(out, "List(null, items.map(i => Item({key: i})));");
    }

    #[test]
    fn test_line_count_retained() {
        let src = "const v = (\n  <div>\n    <Tag prop={1} />\n  </div>\n);\nafter();\n";
        let out = desugar(src).unwrap();
        assert_eq!(out.lines().count(), src.lines().count());
        // the code after the element still starts on its original line
        let line_of_after = out.lines().position(|l| l.contains("after()"));
        assert_eq!(line_of_after, Some(5));
    }

    #[test]
    fn test_leading_trivia_retained() {
        // blank lines and comments before the first statement survive
        for src in [
            "\n\nconst a = 1;\n",
            "\n// header\nconst a = 1;\n",
            "   \n\nlet b = 2;",
        ] {
            assert_eq!(desugar(src).unwrap(), src);
        }
    }

    #[test]
    fn test_blanked_directive_line_retained() {
        // what the hashbang step hands over: a space-filled first line
        let src = "                   \nlet el = <Tag />;\n";
        let out = desugar(src).unwrap();
        assert_eq!(out.lines().count(), src.lines().count());
        assert_eq!(out, "                   \nlet el = Tag(null);\n");
    }

    #[test]
    fn test_non_jsx_source_unchanged() {
        let src = "const add = (a, b) => a + b;\nadd(1, 2);\n";
        assert_eq!(desugar(src).unwrap(), src);
    }

    #[test]
    fn test_unclosed_tag_errors() {
        assert!(desugar("const x = <div>;").is_err());
    }
}
