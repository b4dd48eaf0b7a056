//! Shared test fixtures: minimal mesh files and a scripted compiler stand-in.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::pipeline::{CompileError, MeshCompiler, Stage};

/// One-triangle binary STL (zero facet normal, computed from winding).
pub fn tiny_binary_stl() -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&1u32.to_le_bytes());
    let record: [f32; 12] = [
        0.0, 0.0, 0.0, // normal
        0.0, 0.0, 0.0, // a
        1.0, 0.0, 0.0, // b
        0.0, 1.0, 0.0, // c
    ];
    for f in record {
        bytes.extend_from_slice(&f.to_le_bytes());
    }
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes
}

/// One-triangle ASCII STL with an explicit +Z normal.
pub fn tiny_ascii_stl() -> String {
    "solid tri\n\
     facet normal 0 0 1\n\
      outer loop\n\
       vertex 0 0 0\n\
       vertex 1 0 0\n\
       vertex 0 1 0\n\
      endloop\n\
     endfacet\n\
     endsolid tri\n"
        .to_string()
}

/// Every invocation the scripted compiler saw, in order.
pub type InvocationLog = Arc<Mutex<Vec<(Stage, PathBuf, PathBuf)>>>;

/// Compiler stand-in for pipeline and watcher tests: records invocations
/// and writes a fixed payload to the requested output, or fails at a chosen
/// stage.
pub struct ScriptedCompiler {
    log: InvocationLog,
    fail_stage: Option<Stage>,
    output: Vec<u8>,
}

impl ScriptedCompiler {
    /// Succeeds at every stage, writing `output` to each output path.
    pub fn succeeding(output: Vec<u8>) -> (Self, InvocationLog) {
        Self::build(output, None)
    }

    /// Fails whenever `stage` is reached; other stages succeed.
    pub fn failing_at(stage: Stage, output: Vec<u8>) -> (Self, InvocationLog) {
        Self::build(output, Some(stage))
    }

    fn build(output: Vec<u8>, fail_stage: Option<Stage>) -> (Self, InvocationLog) {
        let log: InvocationLog = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                log: log.clone(),
                fail_stage,
                output,
            },
            log,
        )
    }
}

impl MeshCompiler for ScriptedCompiler {
    fn convert(&mut self, stage: Stage, input: &Path, output: &Path) -> Result<(), CompileError> {
        self.log
            .lock()
            .expect("invocation log poisoned")
            .push((stage, input.to_path_buf(), output.to_path_buf()));

        if self.fail_stage == Some(stage) {
            return Err(CompileError::Failed {
                stage,
                input: input.to_path_buf(),
                diagnostics: "scripted failure".to_string(),
            });
        }

        std::fs::write(output, &self.output).map_err(|source| CompileError::Spawn {
            input: input.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}
