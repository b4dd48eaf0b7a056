//! Watch loop behavior: change detection, failure recovery, and camera
//! stability across reloads.

use std::io::Write;
use std::path::Path;

use meshview_lib::fixtures::{tiny_binary_stl, ScriptedCompiler};
use meshview_lib::pipeline::{ConversionPipeline, Stage};
use meshview_lib::source::{signature_of, SourceFile};
use meshview_lib::state::{AppState, Status};
use meshview_lib::viewer::Viewer;
use meshview_lib::watch::{PollWatcher, TickOutcome, WatchError};

fn succeeding_pipeline() -> (ConversionPipeline, meshview_lib::fixtures::InvocationLog) {
    let (compiler, log) = ScriptedCompiler::succeeding(tiny_binary_stl());
    (ConversionPipeline::with_compiler(Box::new(compiler)), log)
}

/// Grow the file so the length component of the signature moves even when
/// the filesystem's mtime granularity is too coarse to notice the edit.
fn touch(path: &Path) {
    let mut f = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    f.write_all(b"\n// edited").unwrap();
}

#[test]
fn unchanged_source_produces_no_conversions() {
    let dir = tempfile::tempdir().unwrap();
    let scad = dir.path().join("part.scad");
    std::fs::write(&scad, "cube(1);").unwrap();

    let (mut pipeline, log) = succeeding_pipeline();
    let mut viewer = Viewer::new();
    let source = SourceFile::new(scad.clone());
    let initial = signature_of(&scad).ok();
    let mut watcher = PollWatcher::new(source, initial);

    assert!(matches!(
        watcher.tick(&mut pipeline, &mut viewer),
        TickOutcome::Unchanged
    ));
    assert!(matches!(
        watcher.tick(&mut pipeline, &mut viewer),
        TickOutcome::Unchanged
    ));
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(viewer.version(), 1);
}

#[test]
fn modification_triggers_exactly_one_reconversion() {
    let dir = tempfile::tempdir().unwrap();
    let scad = dir.path().join("part.scad");
    std::fs::write(&scad, "cube(1);").unwrap();

    let (mut pipeline, log) = succeeding_pipeline();
    let mut viewer = Viewer::new();
    let initial = signature_of(&scad).ok();
    let mut watcher = PollWatcher::new(SourceFile::new(scad.clone()), initial);

    touch(&scad);

    match watcher.tick(&mut pipeline, &mut viewer) {
        TickOutcome::Reloaded(artifact) => {
            assert_eq!(artifact.mesh_path, dir.path().join("part.stl"));
        }
        other => panic!("expected Reloaded, got {other:?}"),
    }
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(viewer.version(), 2);
    assert_eq!(viewer.triangle_count(), 1);

    // Settled again: the follow-up tick is a no-op.
    assert!(matches!(
        watcher.tick(&mut pipeline, &mut viewer),
        TickOutcome::Unchanged
    ));
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn failed_conversion_keeps_polling_without_hot_retries() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("model.py");
    std::fs::write(&script, "bad").unwrap();

    let (compiler, log) = ScriptedCompiler::failing_at(Stage::RenderScript, tiny_binary_stl());
    let mut pipeline = ConversionPipeline::with_compiler(Box::new(compiler));
    let mut viewer = Viewer::new();
    let mut watcher = PollWatcher::new(SourceFile::new(script.clone()), None);

    assert!(matches!(
        watcher.tick(&mut pipeline, &mut viewer),
        TickOutcome::Failed(WatchError::Compile(_))
    ));
    assert_eq!(log.lock().unwrap().len(), 1);

    // Signature advanced despite the failure, so an unchanged broken file
    // is not reconverted every tick.
    assert!(matches!(
        watcher.tick(&mut pipeline, &mut viewer),
        TickOutcome::Unchanged
    ));
    assert_eq!(log.lock().unwrap().len(), 1);

    // Another edit is retried normally.
    touch(&script);
    assert!(matches!(
        watcher.tick(&mut pipeline, &mut viewer),
        TickOutcome::Failed(WatchError::Compile(_))
    ));
    assert_eq!(log.lock().unwrap().len(), 2);

    // The previous scene was never replaced.
    assert_eq!(viewer.version(), 1);
    assert_eq!(viewer.triangle_count(), 12);
}

#[test]
fn deleted_then_recreated_source_reads_as_changed() {
    let dir = tempfile::tempdir().unwrap();
    let scad = dir.path().join("part.scad");
    std::fs::write(&scad, "cube(1);").unwrap();

    let (mut pipeline, log) = succeeding_pipeline();
    let mut viewer = Viewer::new();
    let initial = signature_of(&scad).ok();
    let mut watcher = PollWatcher::new(SourceFile::new(scad.clone()), initial);

    std::fs::remove_file(&scad).unwrap();
    assert!(matches!(
        watcher.tick(&mut pipeline, &mut viewer),
        TickOutcome::Failed(WatchError::Signature(_))
    ));
    assert!(log.lock().unwrap().is_empty());

    // Recreated with identical content. The deletion cleared the stored
    // signature, so this still counts as a change.
    std::fs::write(&scad, "cube(1);").unwrap();
    assert!(matches!(
        watcher.tick(&mut pipeline, &mut viewer),
        TickOutcome::Reloaded(_)
    ));
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(viewer.version(), 2);
}

#[test]
fn reload_preserves_the_camera() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("gear.py");
    std::fs::write(&script, "# model").unwrap();

    let (compiler, _log) = ScriptedCompiler::succeeding(tiny_binary_stl());
    let mut state = AppState::new(ConversionPipeline::with_compiler(Box::new(compiler)));

    state.open_path(&script);
    assert!(matches!(state.status, Status::Loaded { .. }));
    assert_eq!(state.watched_path(), Some(script.as_path()));

    // The user orbits and zooms, then edits the source.
    state.camera.rotate(40.0, -25.0);
    state.camera.zoom(3.0);
    let yaw = state.camera.yaw;
    let pitch = state.camera.pitch;
    let distance = state.camera.distance;

    touch(&script);
    let version_before = state.viewer.version();
    state.tick();

    assert!(matches!(state.status, Status::Loaded { .. }));
    assert_eq!(state.viewer.version(), version_before + 1);
    assert_eq!(state.camera.yaw, yaw);
    assert_eq!(state.camera.pitch, pitch);
    assert_eq!(state.camera.distance, distance);
}

#[test]
fn open_path_failure_still_installs_the_watcher() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("model.py");
    std::fs::write(&script, "bad").unwrap();

    let (compiler, _log) = ScriptedCompiler::failing_at(Stage::RenderScript, tiny_binary_stl());
    let mut state = AppState::new(ConversionPipeline::with_compiler(Box::new(compiler)));

    state.open_path(&script);
    assert!(matches!(state.status, Status::Error(_)));
    assert_eq!(state.watched_path(), Some(script.as_path()));
    assert_eq!(state.viewer.triangle_count(), 12);
}
