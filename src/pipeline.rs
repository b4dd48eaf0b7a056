//! Source-to-mesh conversion through the external CAD compiler.
//!
//! The pipeline never caches: every call recomputes from scratch. Skipping
//! work on unchanged sources is the watcher's job, based on file signatures.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::source::{SourceFile, SourceKind};

/// Which conversion stage an invocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Script -> CAD description
    RenderScript,
    /// CAD description -> mesh
    CompileMesh,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::RenderScript => write!(f, "script render"),
            Stage::CompileMesh => write!(f, "mesh compile"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to launch CAD compiler for {input}: {source}")]
    Spawn {
        input: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} stage failed for {input}: {diagnostics}")]
    Failed {
        stage: Stage,
        input: PathBuf,
        diagnostics: String,
    },
    #[error("{stage} stage exited cleanly but produced no output at {output}")]
    MissingOutput { stage: Stage, output: PathBuf },
}

/// A derived (or passed-through) mesh file plus its provenance. A new
/// artifact replaces the prior one; the viewer only borrows the path while
/// loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshArtifact {
    pub mesh_path: PathBuf,
    pub source_path: PathBuf,
}

/// Seam over the external compiler binary. The output format is chosen by
/// the compiler from the output path's extension.
pub trait MeshCompiler {
    fn convert(&mut self, stage: Stage, input: &Path, output: &Path) -> Result<(), CompileError>;
}

/// Invokes `openscad -o <output> <input>`, falling back to
/// `openscad-nightly` when the stable binary is not on PATH.
pub struct OpenScadCompiler {
    programs: Vec<String>,
}

impl Default for OpenScadCompiler {
    fn default() -> Self {
        Self {
            programs: vec!["openscad".into(), "openscad-nightly".into()],
        }
    }
}

impl MeshCompiler for OpenScadCompiler {
    fn convert(&mut self, stage: Stage, input: &Path, output: &Path) -> Result<(), CompileError> {
        let mut missing_program: Option<std::io::Error> = None;

        for program in &self.programs {
            let result = Command::new(program)
                .arg("-o")
                .arg(output)
                .arg(input)
                .output();

            match result {
                Ok(out) => {
                    if !out.status.success() {
                        return Err(CompileError::Failed {
                            stage,
                            input: input.to_path_buf(),
                            diagnostics: String::from_utf8_lossy(&out.stderr).trim().to_string(),
                        });
                    }
                    if !output.exists() {
                        return Err(CompileError::MissingOutput {
                            stage,
                            output: output.to_path_buf(),
                        });
                    }
                    tracing::info!(
                        "{stage} ({program}): {} -> {}",
                        input.display(),
                        output.display()
                    );
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    missing_program = Some(e);
                }
                Err(e) => {
                    return Err(CompileError::Spawn {
                        input: input.to_path_buf(),
                        source: e,
                    });
                }
            }
        }

        Err(CompileError::Spawn {
            input: input.to_path_buf(),
            source: missing_program.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no CAD compiler configured")
            }),
        })
    }
}

/// Turns a tracked source into a mesh file the viewer can load, invoking the
/// external compiler for whatever stages the source kind still needs.
pub struct ConversionPipeline {
    compiler: Box<dyn MeshCompiler>,
}

impl ConversionPipeline {
    /// Pipeline backed by the OpenSCAD binary on PATH.
    pub fn system() -> Self {
        Self::with_compiler(Box::new(OpenScadCompiler::default()))
    }

    pub fn with_compiler(compiler: Box<dyn MeshCompiler>) -> Self {
        Self { compiler }
    }

    /// Deterministic derived path: same directory, extension swapped, so
    /// repeated conversions overwrite instead of accumulating.
    pub fn derived_path(source: &Path, ext: &str) -> PathBuf {
        source.with_extension(ext)
    }

    pub fn ensure_mesh(&mut self, source: &SourceFile) -> Result<MeshArtifact, CompileError> {
        match source.kind {
            SourceKind::Mesh => Ok(MeshArtifact {
                mesh_path: source.path.clone(),
                source_path: source.path.clone(),
            }),
            SourceKind::CadDescription => {
                let mesh_path = Self::derived_path(&source.path, "stl");
                self.compiler
                    .convert(Stage::CompileMesh, &source.path, &mesh_path)?;
                Ok(MeshArtifact {
                    mesh_path,
                    source_path: source.path.clone(),
                })
            }
            SourceKind::Script => {
                let description = Self::derived_path(&source.path, "scad");
                self.compiler
                    .convert(Stage::RenderScript, &source.path, &description)?;
                let mesh_path = Self::derived_path(&source.path, "stl");
                self.compiler
                    .convert(Stage::CompileMesh, &description, &mesh_path)?;
                Ok(MeshArtifact {
                    mesh_path,
                    source_path: source.path.clone(),
                })
            }
        }
    }
}
