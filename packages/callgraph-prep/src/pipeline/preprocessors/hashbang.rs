//! Interpreter-directive neutralizer
//!
//! A script starting with `#!/usr/bin/env node` blows up parsers that only
//! understand the language grammar. The directive line is blanked with
//! spaces rather than removed so character count and line numbers are
//! unchanged.

/// Replace a leading `#!` line with spaces.
///
/// Sources not starting with `#!` are returned unmodified. If the source
/// has no newline at all, the entire source is blanked: the directive is
/// still there and would still break the parser, so inert whitespace wins.
pub fn neutralize(src: &str) -> String {
    if !src.starts_with("#!") {
        return src.to_string();
    }

    match src.find('\n') {
        Some(end) => {
            let (line, rest) = src.split_at(end);
            let mut out = " ".repeat(line.chars().count());
            out.push_str(rest);
            out
        }
        None => " ".repeat(src.chars().count()),
    }
}
