//! End-to-end pipeline tests: real directories, a memory graph, and the
//! processor driven the way the build orchestrator drives it (scripts and
//! descriptors handed over in arbitrary order).

use std::fs;
use std::path::Path;
use std::sync::Arc;

use weft_component::{ComponentOptions, ComponentProcessor};
use weft_graph::{BuildGraph, MemoryGraph};
use weft_target::TargetKind;

fn processor_for(
    target: TargetKind,
    source_dir: &Path,
) -> (ComponentProcessor, Arc<MemoryGraph>) {
    let graph = Arc::new(MemoryGraph::new(source_dir));
    let processor =
        ComponentProcessor::new(graph.clone(), ComponentOptions::new(target, source_dir));
    (processor, graph)
}

#[test]
fn end_to_end_component_with_external_sub_component() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let src = root.join("src");
    let comp = root.join("comp");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&comp).unwrap();

    fs::write(src.join("btn.js"), "Component({})\n").unwrap();
    fs::write(
        src.join("btn.json"),
        r#"{"usingComponents": {"icon": "../comp/icon"}}"#,
    )
    .unwrap();
    fs::write(src.join("btn.wxml"), "<view></view>\n").unwrap();
    fs::write(comp.join("icon.js"), "Component({})\n").unwrap();
    fs::write(comp.join("icon.json"), "{}").unwrap();

    let (processor, graph) = processor_for(TargetKind::Wx, &src);

    // The orchestrator registers the source tree up front.
    for name in ["btn.js", "btn.json", "btn.wxml"] {
        graph.register_file(&src.join(name)).unwrap();
    }

    let btn = graph.file_by_path(&src.join("btn.js")).unwrap();
    processor.analyse_script(&btn).unwrap();

    let btn_json = graph.file_by_path(&src.join("btn.json")).unwrap();
    assert!(btn_json.is_component_config());
    assert_eq!(btn_json.component().unwrap().full_path(), btn.full_path());
    assert!(btn.has_native(TargetKind::Wx));

    let out = processor.rewrite_descriptor(&btn_json).unwrap();
    let expected = format!(
        "{{\n    \"usingComponents\": {{\n        \"icon\": \"{}\"\n    }}\n}}",
        comp.join("icon").display()
    );
    assert_eq!(String::from_utf8(out.content).unwrap(), expected);

    // Resolving the usage pulled the external cluster in transitively.
    let icon = graph.file_by_path(&comp.join("icon.js")).unwrap();
    assert!(icon.is_analysed());
    let icon_json = graph.file_by_path(&comp.join("icon.json")).unwrap();
    assert!(icon_json.is_component_config());
    assert_eq!(icon_json.component().unwrap().full_path(), icon.full_path());
}

#[test]
fn analysis_is_idempotent_and_directories_scan_once() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let src = root.join("src");
    let lib = root.join("lib");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&lib).unwrap();

    fs::write(lib.join("card.js"), "Component({})\n").unwrap();
    fs::write(lib.join("card.json"), "{}").unwrap();
    fs::write(lib.join("card.wxml"), "<view></view>\n").unwrap();
    fs::write(lib.join("other.js"), "Page({})\n").unwrap();

    let (processor, graph) = processor_for(TargetKind::Wx, &src);
    let card = graph.register_file(&lib.join("card.js")).unwrap();
    let other = graph.register_file(&lib.join("other.js")).unwrap();

    processor.analyse_script(&card).unwrap();
    assert_eq!(processor.dir_index().len(), 1);
    assert!(card.has_native(TargetKind::Wx));
    assert!(graph
        .file_by_path(&lib.join("card.json"))
        .unwrap()
        .is_component_config());

    // The directory is gone: any re-scan would error, so both calls below
    // must ride the gate and the cached listing.
    fs::remove_dir_all(&lib).unwrap();
    processor.analyse_script(&card).unwrap();
    processor.analyse_script(&other).unwrap();
    assert_eq!(processor.dir_index().len(), 1);
}

#[test]
fn cyclic_usage_graph_terminates_with_one_analysis_each() {
    let src = Path::new("/src");
    let (processor, graph) = processor_for(TargetKind::Wx, src);

    for name in ["a.js", "a.json", "b.js", "b.json"] {
        graph.register_file(&src.join(name)).unwrap();
    }
    let a = graph.file_by_path(&src.join("a.js")).unwrap();
    let a_json = graph.file_by_path(&src.join("a.json")).unwrap();
    let b = graph.file_by_path(&src.join("b.js")).unwrap();
    let b_json = graph.file_by_path(&src.join("b.json")).unwrap();
    a_json.set_content(r#"{"usingComponents": {"b": "./b"}}"#);
    b_json.set_content(r#"{"usingComponents": {"a": "./a"}}"#);

    processor.analyse_script(&a).unwrap();
    let out_a = processor.rewrite_descriptor(&a_json).unwrap();
    let out_b = processor.rewrite_descriptor(&b_json).unwrap();

    assert!(a.is_analysed());
    assert!(b.is_analysed());
    assert!(a_json.is_component_config());
    assert!(b_json.is_component_config());
    assert!(String::from_utf8(out_a.content)
        .unwrap()
        .contains("\"b\": \"/b\""));
    assert!(String::from_utf8(out_b.content)
        .unwrap()
        .contains("\"a\": \"/a\""));

    // Nothing new appears if the cycle is walked again.
    let files_before = graph.file_count();
    processor.rewrite_descriptor(&a_json).unwrap();
    processor.rewrite_descriptor(&b_json).unwrap();
    assert_eq!(graph.file_count(), files_before);
}

#[test]
fn quick_target_skips_discovery_but_still_claims() {
    let src = Path::new("/src");
    let (processor, graph) = processor_for(TargetKind::Quick, src);

    for name in ["btn.js", "btn.json"] {
        graph.register_file(&src.join(name)).unwrap();
    }
    let btn = graph.file_by_path(&src.join("btn.js")).unwrap();
    let btn_json = graph.file_by_path(&src.join("btn.json")).unwrap();
    btn_json.set_content(r#"{"usingComponents": {"icon": "./icon"}}"#);

    processor.analyse_script(&btn).unwrap();
    assert!(btn.is_analysed());
    assert!(!btn_json.is_component_config());
    assert!(btn_json.component().is_none());

    // Without a bound script the descriptor passes through untouched.
    let out = processor.rewrite_descriptor(&btn_json).unwrap();
    assert_eq!(
        out.content,
        br#"{"usingComponents": {"icon": "./icon"}}"#
    );
}

#[test]
fn claimed_descriptor_short_circuits_sibling_registration() {
    let src = Path::new("/src");
    let (processor, graph) = processor_for(TargetKind::Wx, src);

    for name in ["x.js", "x.json", "x.wxml"] {
        graph.register_file(&src.join(name)).unwrap();
    }
    let x = graph.file_by_path(&src.join("x.js")).unwrap();
    let x_json = graph.file_by_path(&src.join("x.json")).unwrap();
    let foreign = graph.register_file(&src.join("other/x.js")).unwrap();
    graph.bind_component(&x_json, &foreign);

    processor.analyse_script(&x).unwrap();

    assert!(x.is_analysed());
    assert!(!x.has_native(TargetKind::Wx));
    assert!(!x_json.is_component_config());
    assert_eq!(
        x_json.component().unwrap().full_path(),
        foreign.full_path()
    );
}

#[test]
fn ambiguous_descriptor_candidates_bind_exactly_one() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let src = root.join("src");
    let lib = root.join("lib");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&lib).unwrap();

    fs::write(lib.join("w.js"), "Component({})\n").unwrap();
    fs::write(lib.join("w.json"), "{}").unwrap();
    fs::write(lib.join("w.json5"), "{}").unwrap();

    let (processor, graph) = processor_for(TargetKind::Wx, &src);
    let w = graph.register_file(&lib.join("w.js")).unwrap();
    processor.analyse_script(&w).unwrap();

    let json = graph.file_by_path(&lib.join("w.json")).unwrap();
    let json5 = graph.file_by_path(&lib.join("w.json5")).unwrap();
    let bound = [&json, &json5]
        .iter()
        .filter(|f| f.component().is_some())
        .count();
    assert_eq!(bound, 1);
    assert!(w.descriptor().is_some());
}

#[test]
fn native_flags_accumulate_across_dialect_siblings() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let src = root.join("src");
    let lib = root.join("lib");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&lib).unwrap();

    for name in ["m.js", "m.wxml", "m.swan", "m.axml", "m.ttml", "m.wxss", "m.css"] {
        fs::write(lib.join(name), "").unwrap();
    }

    let (processor, graph) = processor_for(TargetKind::Wx, &src);
    let m = graph.register_file(&lib.join("m.js")).unwrap();
    processor.analyse_script(&m).unwrap();

    for target in [TargetKind::Wx, TargetKind::Swan, TargetKind::Ant, TargetKind::Tt] {
        assert!(m.has_native(target), "missing native flag for {target}");
    }
    // no descriptor in the cluster: siblings registered, nothing bound
    assert!(m.descriptor().is_none());
    assert!(graph.file_by_path(&lib.join("m.wxml")).is_some());
}
