/*
 * callgraph-prep - Source preprocessors for the call graph parser
 *
 * Preprocessors run before the parser. Each takes source text as input and
 * returns processed source text as output, retaining line numbers so that
 * downstream diagnostics stay accurate:
 *
 * - jsx      : desugar JSX templates into plain call expressions
 * - flow     : strip structural type annotations
 * - hashbang : blank a leading interpreter directive line
 */

/// Error types
pub mod errors;

/// Pipeline orchestration and the preprocessors themselves
pub mod pipeline;

pub use errors::{PrepError, Result};
pub use pipeline::preprocessors::{flow, hashbang, jsx};
pub use pipeline::{run_pipeline, run_pipeline_lenient, Preprocessor};
