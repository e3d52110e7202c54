//! Common test utilities for packsync integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A disposable workspace holding a content tree, a registry and an
/// install root for one integration test.
#[allow(dead_code)]
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the workspace, creating parent directories.
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Write a registry with one agent and one doc, sourced from the
    /// workspace's `content/` tree.
    pub fn write_basic_registry(&self) {
        self.write_file(
            "registry.json",
            r#"{
  "name": "fixture",
  "version": "1.0.0",
  "packs": [],
  "standalone": [
    {
      "name": "finder",
      "description": "Finds things",
      "type": "agent",
      "path": "agents/finder.md",
      "target": "agent/finder.md"
    },
    {
      "name": "deploy",
      "description": "",
      "type": "command",
      "path": "commands/deploy.md",
      "target": "command/deploy.md"
    }
  ]
}"#,
        );
        self.write_file("content/agents/finder.md", "# finder\n");
        self.write_file("content/commands/deploy.md", "# deploy\n");
    }

    /// Write a companion config pinning install roots inside the
    /// workspace so tests never touch the real home directory.
    pub fn write_install_config(&self) {
        let global = self.path.join("installed-global").display().to_string();
        let local = self.path.join("installed-local").display().to_string();
        self.write_file(
            "registry.config.json",
            &format!(
                r#"{{ "install": {{ "global_dir": "{global}", "local_dir": "{local}" }} }}"#
            ),
        );
    }
}
