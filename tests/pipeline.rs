//! Conversion pipeline behavior against a scripted compiler stand-in.

use std::path::PathBuf;

use meshview_lib::fixtures::{tiny_binary_stl, ScriptedCompiler};
use meshview_lib::pipeline::{CompileError, ConversionPipeline, Stage};
use meshview_lib::source::SourceFile;

fn pipeline_with(compiler: ScriptedCompiler) -> ConversionPipeline {
    ConversionPipeline::with_compiler(Box::new(compiler))
}

#[test]
fn mesh_source_passes_through_without_invoking_compiler() {
    let (compiler, log) = ScriptedCompiler::succeeding(tiny_binary_stl());
    let mut pipeline = pipeline_with(compiler);

    let source = SourceFile::new(PathBuf::from("/models/part.stl"));
    let artifact = pipeline.ensure_mesh(&source).unwrap();

    assert_eq!(artifact.mesh_path, PathBuf::from("/models/part.stl"));
    assert_eq!(artifact.source_path, PathBuf::from("/models/part.stl"));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn cad_description_compiles_once_next_to_the_source() {
    let dir = tempfile::tempdir().unwrap();
    let scad = dir.path().join("bracket.scad");
    std::fs::write(&scad, "cube(1);").unwrap();

    let (compiler, log) = ScriptedCompiler::succeeding(tiny_binary_stl());
    let mut pipeline = pipeline_with(compiler);

    let artifact = pipeline.ensure_mesh(&SourceFile::new(scad.clone())).unwrap();

    let expected_stl = dir.path().join("bracket.stl");
    assert_eq!(artifact.mesh_path, expected_stl);
    assert!(expected_stl.exists());

    let invocations = log.lock().unwrap();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0], (Stage::CompileMesh, scad, expected_stl));
}

#[test]
fn script_runs_render_then_compile_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("gear.py");
    std::fs::write(&script, "# model").unwrap();

    let (compiler, log) = ScriptedCompiler::succeeding(tiny_binary_stl());
    let mut pipeline = pipeline_with(compiler);

    let artifact = pipeline
        .ensure_mesh(&SourceFile::new(script.clone()))
        .unwrap();

    let scad = dir.path().join("gear.scad");
    let stl = dir.path().join("gear.stl");
    assert_eq!(artifact.mesh_path, stl);

    let invocations = log.lock().unwrap();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0], (Stage::RenderScript, script, scad.clone()));
    assert_eq!(invocations[1], (Stage::CompileMesh, scad, stl));
}

#[test]
fn script_render_failure_short_circuits_the_second_stage() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("broken.py");
    std::fs::write(&script, "syntax error").unwrap();

    let (compiler, log) = ScriptedCompiler::failing_at(Stage::RenderScript, tiny_binary_stl());
    let mut pipeline = pipeline_with(compiler);

    let err = pipeline
        .ensure_mesh(&SourceFile::new(script))
        .unwrap_err();

    assert!(matches!(
        err,
        CompileError::Failed {
            stage: Stage::RenderScript,
            ..
        }
    ));
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn repeated_conversions_reuse_the_same_derived_paths() {
    let dir = tempfile::tempdir().unwrap();
    let scad = dir.path().join("plate.scad");
    std::fs::write(&scad, "cube(2);").unwrap();

    let (compiler, log) = ScriptedCompiler::succeeding(tiny_binary_stl());
    let mut pipeline = pipeline_with(compiler);
    let source = SourceFile::new(scad);

    let first = pipeline.ensure_mesh(&source).unwrap();
    let second = pipeline.ensure_mesh(&source).unwrap();

    assert_eq!(first, second);
    let invocations = log.lock().unwrap();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0], invocations[1]);
}
