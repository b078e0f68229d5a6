#![allow(clippy::expect_used, clippy::unwrap_used)]

use quire_core::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A content directory on disk that lives as long as the fixture.
pub struct ContentFixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl ContentFixture {
    /// Empty content directory.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create content dir"),
        }
    }

    /// The standard sample tree: three top-level pages and one sub page, all
    /// mentioning "example".
    pub fn sample() -> Self {
        let fixture = Self::empty();
        fixture.write(
            "example-page.md",
            "/*\nTitle: Example Page\nSort: 2\n*/\n\
             # Example Page\n\nThis is an example page with a [link](%base_url%/home).\n",
        );
        fixture.write(
            "page-with-bom.md",
            "\u{feff}/*\nTitle: Example Page With BOM\nSort: 1\n*/\n\
             Page content for the example with a byte-order mark.\n",
        );
        fixture.write(
            "page-with-bom-yaml.md",
            "\u{feff}---\nTitle: Example Page With BOM for YAML\nSort: 3\n---\n\
             Page content for the YAML example with a byte-order mark.\n",
        );
        fixture.write(
            "sub/example-sub-page.md",
            "/*\nTitle: Example Sub Page\n*/\nThis example lives in a sub directory.\n",
        );
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn config(&self) -> Config {
        Config::new(self.dir.path())
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn mkdir(&self, relative: &str) {
        fs::create_dir_all(self.path(relative)).unwrap();
    }
}

/// Route `tracing` output to the test harness when `RUST_LOG` asks for it.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
