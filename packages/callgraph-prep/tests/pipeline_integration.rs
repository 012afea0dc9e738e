//! Integration tests for the preprocessing pipeline
//!
//! Runs full pipelines over realistic sources the way a batch driver
//! would, checking the contract the downstream parser relies on: plain
//! executable syntax out, line numbers intact, failures contained.

use callgraph_prep::{run_pipeline, run_pipeline_lenient, Preprocessor};
use pretty_assertions::assert_eq;

#[test]
fn full_pipeline_on_component_file() {
    let src = "#!/usr/bin/env node\n\
               import type { Props } from './props';\n\
               \n\
               function Widget(props: Props) {\n\
               \x20\x20return <div className=\"widget\">{props.label}</div>;\n\
               }\n";

    // JSX goes first: the stripper's grammar does not understand markup
    let steps = [Preprocessor::Hashbang, Preprocessor::Jsx, Preprocessor::Flow];
    let out = run_pipeline(src, "widget.js", &steps).unwrap();

    assert_eq!(out.lines().count(), src.lines().count());
    assert!(!out.contains("#!"));
    assert!(!out.contains("Props"));
    assert!(!out.contains("callGraphCreateElement("));
    assert!(out.contains("\"div\"({className: \"widget\"}, props.label)"));
    // the function body is still where it was
    assert_eq!(
        out.lines().position(|l| l.contains("return")),
        src.lines().position(|l| l.contains("return"))
    );
}

#[test]
fn template_desugaring_collapses_factory_call() {
    let out = run_pipeline("<Tag prop={1} />;", "tag.jsx", &[Preprocessor::Jsx]).unwrap();
    assert!(!out.contains("callGraphCreateElement("));
    assert!(out.contains("Tag("));
    assert_eq!(out, "Tag({prop: 1});");
}

#[test]
fn failure_is_contained_not_thrown() {
    // Source the stripper cannot parse: the unit is skipped, the batch
    // driver keeps going
    let broken = "let x: = ;";
    assert!(run_pipeline(broken, "broken.js", &[Preprocessor::Flow]).is_err());
    assert_eq!(
        run_pipeline_lenient(broken, "broken.js", &[Preprocessor::Flow]),
        None
    );

    // and a healthy unit processed right after is unaffected
    let ok = run_pipeline_lenient("let y = 1;", "ok.js", &[Preprocessor::Flow]);
    assert_eq!(ok, Some("let y = 1;".to_string()));
}

#[test]
fn zero_steps_is_identity() {
    let src = "#!/usr/bin/env node\nlet x: number = <Tag />;\n";
    assert_eq!(run_pipeline(src, "anything.js", &[]).unwrap(), src);
}

#[test]
fn application_order_is_not_commutative() {
    // Both orders must complete; the results are recorded but equality is
    // deliberately not asserted in either direction — the design does not
    // guarantee commutativity.
    let src = "#!/usr/bin/env node\nlet x: number = 1;\n";
    let hashbang_first =
        run_pipeline(src, "a.js", &[Preprocessor::Hashbang, Preprocessor::Flow]).unwrap();
    let flow_first =
        run_pipeline(src, "a.js", &[Preprocessor::Flow, Preprocessor::Hashbang]).unwrap();

    assert_eq!(hashbang_first.lines().count(), src.lines().count());
    assert_eq!(flow_first.lines().count(), src.lines().count());
}

#[test]
fn display_name_is_free_form() {
    // The name is for diagnostics only, never validated
    for name in ["", "not/a/real/path.js", "spaces in names", "名前.js"] {
        assert_eq!(
            run_pipeline("let a = 1;", name, &[Preprocessor::Flow]).unwrap(),
            "let a = 1;"
        );
    }
}
