//! Fixture scripts standing in for the panel's local binaries.
//!
//! Each [`FakeBinary`] owns a temp directory containing a small shell script
//! that records the argv it was invoked with and emits a canned response on
//! stdout. The directory is deleted when the fixture is dropped, even on
//! panic.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A fixture executable plus the file its invocations are recorded to.
pub struct FakeBinary {
    dir: TempDir,
    path: PathBuf,
}

impl FakeBinary {
    /// A binary that records its argv and prints `body` on stdout, exiting 0.
    pub fn json(body: &str) -> Self {
        Self::from_script(|argv_file| {
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{argv_file}'\ncat <<'PANELGATE_EOF'\n{body}\nPANELGATE_EOF\n"
            )
        })
    }

    /// A binary that prints `body` and exits with `code`.
    pub fn failing(code: i32, body: &str) -> Self {
        Self::from_script(|argv_file| {
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{argv_file}'\ncat <<'PANELGATE_EOF'\n{body}\nPANELGATE_EOF\nexit {code}\n"
            )
        })
    }

    /// A binary that sleeps without producing output (for deadline tests).
    pub fn sleeping(secs: u64) -> Self {
        Self::from_script(|_argv_file| format!("#!/bin/sh\nsleep {secs}\n"))
    }

    fn from_script(script: impl FnOnce(&str) -> String) -> Self {
        let dir = TempDir::new().expect("failed to create fixture dir");
        let argv_file = dir.path().join("argv.txt");
        let path = dir.path().join("fixture");

        let body = script(&argv_file.display().to_string());
        fs::write(&path, body).expect("failed to write fixture script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to mark fixture executable");

        Self { dir, path }
    }

    /// Path to the executable fixture script.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The argv tokens of the last invocation, or `None` if the fixture was
    /// never run.
    pub fn recorded_args(&self) -> Option<Vec<String>> {
        let recorded = fs::read_to_string(self.dir.path().join("argv.txt")).ok()?;
        Some(recorded.lines().map(str::to_owned).collect())
    }
}
