//! Watched source files: kind classification and change signatures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

/// What a watched path contains, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A polygon mesh the viewer can load directly (`.stl`, `.obj`)
    Mesh,
    /// A declarative CAD description needing one compile step (`.scad`)
    CadDescription,
    /// A geometry script needing render + compile (`.py`)
    Script,
}

impl SourceKind {
    /// Infer the kind from the file extension. Unrecognized extensions are
    /// handed straight to the mesh loader, which reports a load error the
    /// watch loop survives.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("scad") => SourceKind::CadDescription,
            Some("py") => SourceKind::Script,
            _ => SourceKind::Mesh,
        }
    }
}

/// A file the viewer tracks on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        let kind = SourceKind::from_path(&path);
        Self { path, kind }
    }
}

/// Cheap comparable proxy for "has this file changed since last observed".
/// Equal signatures mean unchanged, best-effort: a rewrite landing on the
/// same mtime and byte size goes undetected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    modified: SystemTime,
    len: u64,
}

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("source file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to stat {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fingerprint the on-disk state of `path`. A missing file is a transient
/// condition, never fatal to the caller's loop.
pub fn signature_of(path: &Path) -> Result<FileSignature, SignatureError> {
    let metadata = fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SignatureError::NotFound(path.to_path_buf())
        } else {
            SignatureError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let modified = metadata.modified().map_err(|source| SignatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FileSignature {
        modified,
        len: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn kind_from_extension() {
        assert_eq!(SourceKind::from_path(Path::new("a/b.scad")), SourceKind::CadDescription);
        assert_eq!(SourceKind::from_path(Path::new("model.py")), SourceKind::Script);
        assert_eq!(SourceKind::from_path(Path::new("part.stl")), SourceKind::Mesh);
        assert_eq!(SourceKind::from_path(Path::new("part.obj")), SourceKind::Mesh);
    }

    #[test]
    fn kind_is_case_insensitive() {
        assert_eq!(SourceKind::from_path(Path::new("PART.SCAD")), SourceKind::CadDescription);
        assert_eq!(SourceKind::from_path(Path::new("Part.Stl")), SourceKind::Mesh);
    }

    #[test]
    fn unknown_extension_falls_back_to_mesh() {
        assert_eq!(SourceKind::from_path(Path::new("notes.txt")), SourceKind::Mesh);
        assert_eq!(SourceKind::from_path(Path::new("no_extension")), SourceKind::Mesh);
    }

    #[test]
    fn signature_detects_size_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.scad");
        std::fs::write(&path, b"cube(1);").unwrap();

        let first = signature_of(&path).unwrap();
        assert_eq!(first, signature_of(&path).unwrap());

        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(b"\nsphere(2);").unwrap();
        drop(f);

        assert_ne!(first, signature_of(&path).unwrap());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = signature_of(&dir.path().join("gone.stl")).unwrap_err();
        assert!(matches!(err, SignatureError::NotFound(_)));
    }
}
