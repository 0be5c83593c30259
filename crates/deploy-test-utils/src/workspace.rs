//! [`TestWorkspace`] builder for scaffold and deploy scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary workspace root.
///
/// # Example
///
/// ```rust,no_run
/// use deploy_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write("site/index.html", "<h1>Hi</h1>");
/// ws.assert_file_exists("site/index.html");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create an empty project directory and return its absolute path.
    pub fn project(&self, name: &str) -> PathBuf {
        let dir = self.root().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write(&self, path: &str, content: impl AsRef<[u8]>) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// A project with one `index.html`, ready to scaffold.
    pub fn static_site(&self, name: &str) -> PathBuf {
        self.write(&format!("{}/index.html", name), "<h1>Hi</h1>");
        self.root().join(name)
    }

    /// `<project>/.roobrowser/skaffold`
    pub fn bundle_dir(&self, project: &str) -> PathBuf {
        self.root().join(project).join(".roobrowser").join("skaffold")
    }

    /// Read a file relative to the root.
    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// # Panics
    /// Panics if `path` (relative to the root) does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics if `path` (relative to the root) exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
