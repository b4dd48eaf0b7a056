//! Polling change detection driving reconversion and reload.
//!
//! One tick is one pass of the `Polling -> (Unchanged | Changed)` machine.
//! Ticks are scheduled by the UI loop's repaint timer, never by a thread of
//! their own, so at most one conversion is ever in flight.

use thiserror::Error;

use crate::mesh_io::LoadError;
use crate::pipeline::{CompileError, ConversionPipeline, MeshArtifact};
use crate::source::{signature_of, FileSignature, SignatureError, SourceFile};
use crate::viewer::Viewer;

/// Everything that can go wrong inside a tick. None of it stops the loop.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Result of one poll tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Signature matched the last observation, nothing to do.
    Unchanged,
    /// Source changed and the viewer now shows the new artifact.
    Reloaded(MeshArtifact),
    /// Source changed but conversion or loading failed; the previous scene
    /// stays visible and polling continues.
    Failed(WatchError),
}

pub struct PollWatcher {
    source: SourceFile,
    last_signature: Option<FileSignature>,
}

impl PollWatcher {
    /// `initial` is the signature observed around the orchestrator's first
    /// synchronous conversion, if the file existed then.
    pub fn new(source: SourceFile, initial: Option<FileSignature>) -> Self {
        Self {
            source,
            last_signature: initial,
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    /// Run one poll tick against the tracked source.
    pub fn tick(&mut self, pipeline: &mut ConversionPipeline, viewer: &mut Viewer) -> TickOutcome {
        let current = match signature_of(&self.source.path) {
            Ok(sig) => sig,
            Err(err) => {
                // Vanished mid-poll. Forget the old signature so a
                // recreated file always reads as changed, even when its
                // timestamp matches the deleted one.
                self.last_signature = None;
                return TickOutcome::Failed(err.into());
            }
        };

        if self.last_signature == Some(current) {
            return TickOutcome::Unchanged;
        }

        // Advance even if conversion fails below: a persistently broken
        // file must not turn into a hot retry loop.
        self.last_signature = Some(current);

        match self.convert_and_load(pipeline, viewer) {
            Ok(artifact) => TickOutcome::Reloaded(artifact),
            Err(err) => TickOutcome::Failed(err),
        }
    }

    fn convert_and_load(
        &self,
        pipeline: &mut ConversionPipeline,
        viewer: &mut Viewer,
    ) -> Result<MeshArtifact, WatchError> {
        let artifact = pipeline.ensure_mesh(&self.source)?;
        viewer.load(&artifact.mesh_path)?;
        Ok(artifact)
    }
}
