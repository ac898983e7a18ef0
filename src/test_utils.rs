// test_utils.rs

use std::env;
use std::path::{Path, PathBuf};

/// Scratch directory for I/O tests. Set `KEEP_TEST_OUTPUT` to write under
/// `test_output/<prefix>` instead of a temporary directory.
pub struct TestDir {
    dir: PathBuf,
    // Held so the temporary directory lives as long as the TestDir.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestDir {
    pub fn new(prefix: &str) -> std::io::Result<Self> {
        if env::var("KEEP_TEST_OUTPUT").is_ok() {
            let dir = env::current_dir()?.join("test_output").join(prefix);
            std::fs::create_dir_all(&dir)?;
            Ok(TestDir {
                dir,
                _temp_dir: None,
            })
        } else {
            let temp_dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
            Ok(TestDir {
                dir: temp_dir.path().to_path_buf(),
                _temp_dir: Some(temp_dir),
            })
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write `contents` to `name` inside the directory, returning the full path.
    pub fn write_file(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}
