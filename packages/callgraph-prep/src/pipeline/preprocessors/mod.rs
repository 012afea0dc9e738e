//! Pipeline Preprocessors
//!
//! Preprocessors run before the call graph parser. Each one takes source
//! text and returns transformed source text, retaining line numbers so
//! downstream diagnostics stay accurate.

pub mod flow;
pub mod hashbang;
pub mod jsx;

use tree_sitter::{Language, Parser, Tree};

use crate::errors::{PrepError, Result};

/// Tree-sitter node kinds used by the preprocessors
///
/// These constants match the exact node type names from the
/// tree-sitter-typescript grammar (shared by the TSX variant).
pub mod node_kinds {
    // JSX
    pub const JSX_ELEMENT: &str = "jsx_element";
    pub const JSX_SELF_CLOSING_ELEMENT: &str = "jsx_self_closing_element";
    pub const JSX_FRAGMENT: &str = "jsx_fragment";
    pub const JSX_OPENING_ELEMENT: &str = "jsx_opening_element";
    pub const JSX_CLOSING_ELEMENT: &str = "jsx_closing_element";
    pub const JSX_ATTRIBUTE: &str = "jsx_attribute";
    pub const JSX_EXPRESSION: &str = "jsx_expression";
    pub const JSX_TEXT: &str = "jsx_text";
    pub const HTML_CHARACTER_REFERENCE: &str = "html_character_reference";
    pub const IDENTIFIER: &str = "identifier";
    pub const JSX_IDENTIFIER: &str = "jsx_identifier";
    pub const STRING: &str = "string";
    pub const COMMENT: &str = "comment";

    // Types
    pub const TYPE_ANNOTATION: &str = "type_annotation";
    pub const TYPE_ALIAS_DECLARATION: &str = "type_alias_declaration";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";
    pub const TYPE_PARAMETERS: &str = "type_parameters";
    pub const TYPE_ARGUMENTS: &str = "type_arguments";
    pub const IMPLEMENTS_CLAUSE: &str = "implements_clause";
    pub const OPTIONAL_PARAMETER: &str = "optional_parameter";
    pub const PUBLIC_FIELD_DEFINITION: &str = "public_field_definition";
    pub const IMPORT_STATEMENT: &str = "import_statement";
    pub const EXPORT_STATEMENT: &str = "export_statement";
}

/// Parse `src` with the given grammar, rejecting sources the grammar
/// cannot make sense of.
///
/// tree-sitter itself is error-tolerant (legacy non-strict syntax parses
/// fine), so a tree containing ERROR nodes means the source is genuinely
/// malformed for this grammar and must not be rewritten.
pub(crate) fn parse_source(language: Language, src: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| PrepError::pipeline(format!("failed to load grammar: {}", e)))?;

    let tree = parser
        .parse(src, None)
        .ok_or_else(|| PrepError::parse("parser returned no tree"))?;

    if tree.root_node().has_error() {
        return Err(PrepError::parse("source contains syntax errors"));
    }

    Ok(tree)
}
