//! Translation file trees in temporary directories

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory of translation files, removed on drop
pub struct FileTree {
    dir: TempDir,
}

impl FileTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Write `content` to `name` inside the tree
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("failed to write fixture file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> String {
        self.dir.path().display().to_string()
    }
}

/// A `messages` bundle with a root file, a German file and no `de_DE` file
pub fn german_json_tree() -> FileTree {
    let tree = FileTree::new();
    tree.write(
        "messages.json",
        r#"{
            "greeting": "Hello",
            "Customer": { "@include": "Parent", "age": "Age: {0}" },
            "Parent": { "name": "Name (Parent)" }
        }"#,
    );
    tree.write(
        "messages_de.json",
        r#"{
            "greeting": "Hallo",
            "Parent": { "name": "Name (Eltern)" }
        }"#,
    );
    tree
}
