//! Locating the source files to generate from.

use std::error::Error;
use std::path::{Path, PathBuf};

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT: &str = "db_generated.rs";

/// Source files for one generator run and the directory they live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl SourceSet {
    /// Resolve the inputs: a single directory (every `.rs` file directly in
    /// it) or an explicit file list. No inputs means the current directory.
    /// Generated output is never read back as input.
    pub fn discover(inputs: &[PathBuf], output: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let current = [PathBuf::from(".")];
        let inputs = if inputs.is_empty() { &current[..] } else { inputs };

        if let [dir] = inputs {
            if dir.is_dir() {
                return Self::from_dir(dir, output);
            }
        }

        let dir = match inputs[0].parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(SourceSet {
            dir,
            files: inputs.to_vec(),
        })
    }

    fn from_dir(dir: &Path, output: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let pattern = format!(
            "{}/*.rs",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        let mut files: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| format!("Glob error: {e}"))?
            .filter_map(|r| r.ok())
            .filter(|path| !is_output(path, output))
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(format!("no .rs files found in {}", dir.display()).into());
        }
        log::debug!("found {} source files in {}", files.len(), dir.display());
        Ok(SourceSet {
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// `db_generated.rs` next to the inputs.
    pub fn default_output(&self) -> PathBuf {
        self.dir.join(DEFAULT_OUTPUT)
    }
}

fn is_output(path: &Path, output: Option<&Path>) -> bool {
    if path.file_name().map_or(false, |name| name == DEFAULT_OUTPUT) {
        return true;
    }
    match output {
        Some(output) => match (path.canonicalize(), output.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => path == output,
        },
        None => false,
    }
}
