//! Preprocessing pipeline
//!
//! Applies an ordered list of preprocessors to source text before the
//! parser sees it. Order is significant; the transformations are not
//! commutative in general (JSX must be desugared before type syntax would
//! confuse the stripper, and so on — callers pick the order).

pub mod preprocessors;

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::errors::{PrepError, Result};

/// The closed set of source preprocessors.
///
/// This replaces a stringly-typed name-to-function registry: dispatch is a
/// `match`, so an unknown preprocessor cannot exist past the parsing of its
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preprocessor {
    /// Desugar JSX template syntax into plain call expressions
    Jsx,
    /// Strip structural type annotations
    Flow,
    /// Blank a leading `#!` interpreter directive line
    Hashbang,
}

impl Preprocessor {
    /// Run this preprocessor over `src`, producing new source text with
    /// line numbers retained.
    pub fn run(&self, src: &str) -> Result<String> {
        match self {
            Preprocessor::Jsx => preprocessors::jsx::desugar(src),
            Preprocessor::Flow => preprocessors::flow::strip_types(src),
            Preprocessor::Hashbang => Ok(preprocessors::hashbang::neutralize(src)),
        }
    }

    /// Wire name used by callers that configure pipelines from strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preprocessor::Jsx => "jsx",
            Preprocessor::Flow => "flow",
            Preprocessor::Hashbang => "hashbang",
        }
    }
}

impl fmt::Display for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preprocessor {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "jsx" => Ok(Preprocessor::Jsx),
            "flow" => Ok(Preprocessor::Flow),
            "hashbang" => Ok(Preprocessor::Hashbang),
            other => Err(PrepError::UnknownPreprocessor(other.to_string())),
        }
    }
}

/// Apply `steps` to `src` left-to-right, feeding each step's output into
/// the next. An empty list returns the input unchanged.
///
/// `file_name` is used for diagnostics only and is never validated.
pub fn run_pipeline(src: &str, file_name: &str, steps: &[Preprocessor]) -> Result<String> {
    let mut out = src.to_string();
    for step in steps {
        out = step.run(&out).map_err(|err| {
            PrepError::pipeline(format!("{} failed for {}: {}", step, file_name, err))
        })?;
    }
    Ok(out)
}

/// Best-effort variant of [`run_pipeline`] for batch callers.
///
/// A failing step is logged with the file name and full error detail, and
/// the whole unit yields `None` — the caller skips it and continues with
/// the rest of the batch. Which step failed is only visible in the log.
pub fn run_pipeline_lenient(
    src: &str,
    file_name: &str,
    steps: &[Preprocessor],
) -> Option<String> {
    match run_pipeline(src, file_name, steps) {
        Ok(out) => Some(out),
        Err(err) => {
            warn!(file = %file_name, error = %err, "preprocessing failed, skipping file");
            None
        }
    }
}
