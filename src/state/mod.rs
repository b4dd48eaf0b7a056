pub mod settings;

use std::path::{Path, PathBuf};

pub use settings::{AppSettings, DisplayMode};

use crate::pipeline::{ConversionPipeline, MeshArtifact};
use crate::source::{signature_of, SourceFile};
use crate::viewer::Viewer;
use crate::viewport::camera::ArcBallCamera;
use crate::watch::{PollWatcher, TickOutcome, WatchError};

/// What the status bar reports about the last watch event.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// No file argument yet: showing the placeholder cube.
    Placeholder,
    /// The last change was converted and loaded.
    Loaded { mesh_path: PathBuf },
    /// The last change failed; the previous scene stays visible.
    Error(String),
}

/// Combined application state: the scene, the camera, and the watch loop.
/// Owned by the app and passed explicitly to the viewport and UI layers.
pub struct AppState {
    pub viewer: Viewer,
    pub camera: ArcBallCamera,
    pub pipeline: ConversionPipeline,
    pub watcher: Option<PollWatcher>,
    pub status: Status,
    pub settings: AppSettings,
}

impl AppState {
    pub fn new(pipeline: ConversionPipeline) -> Self {
        Self {
            viewer: Viewer::new(),
            camera: ArcBallCamera::new(),
            pipeline,
            watcher: None,
            status: Status::Placeholder,
            settings: AppSettings::load(),
        }
    }

    /// Start viewing `path`: classify it, convert and load once
    /// synchronously, then hand change detection to the poll watcher. Any
    /// failure is reported and the watcher still starts, so a later edit
    /// that fixes the file gets picked up.
    pub fn open_path(&mut self, path: &Path) {
        let source = SourceFile::new(path.to_path_buf());
        let initial_signature = signature_of(path).ok();

        let result = (|| -> Result<MeshArtifact, WatchError> {
            let artifact = self.pipeline.ensure_mesh(&source)?;
            self.viewer.load(&artifact.mesh_path)?;
            Ok(artifact)
        })();

        match result {
            Ok(artifact) => {
                let bbox = *self.viewer.aabb();
                self.camera.fit(&bbox);
                tracing::info!("now viewing {}", source.path.display());
                self.status = Status::Loaded {
                    mesh_path: artifact.mesh_path,
                };
            }
            Err(err) => {
                tracing::error!("initial conversion of {} failed: {err}", path.display());
                self.status = Status::Error(err.to_string());
            }
        }

        self.watcher = Some(PollWatcher::new(source, initial_signature));
    }

    /// One watcher tick, mapped onto status. The camera is deliberately
    /// left alone on reloads of the same source.
    pub fn tick(&mut self) {
        let Some(watcher) = self.watcher.as_mut() else {
            return;
        };

        match watcher.tick(&mut self.pipeline, &mut self.viewer) {
            TickOutcome::Unchanged => {}
            TickOutcome::Reloaded(artifact) => {
                self.status = Status::Loaded {
                    mesh_path: artifact.mesh_path,
                };
            }
            TickOutcome::Failed(err) => {
                tracing::warn!("watch tick failed: {err}");
                self.status = Status::Error(err.to_string());
            }
        }
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.watcher.as_ref().map(|w| w.source().path.as_path())
    }
}
