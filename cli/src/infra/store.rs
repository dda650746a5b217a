//! Infrastructure implementation of the `ProjectStore` port.
//!
//! `FsProjectStore` keeps one directory per project under the store root,
//! holding `config.cfg` and the generated unit files. Saves are atomic
//! (temp file + rename).

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ProjectStore;
use crate::domain::ProjectDescriptor;
use crate::domain::config_file;
use crate::domain::project::validate_project_name;
use crate::infra::paths;

/// Descriptor file name inside a project directory.
pub const CONFIG_FILE: &str = "config.cfg";

/// Filesystem-backed project store.
pub struct FsProjectStore {
    root: PathBuf,
}

impl FsProjectStore {
    /// Store at the default location (`$ASYD_HOME` or `~/.asyd`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_root(paths::store_root()?))
    }

    /// Store at an explicit root (used in tests).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn config_path(&self, name: &str) -> PathBuf {
        self.project_dir(name).join(CONFIG_FILE)
    }
}

/// Write `contents` to `path` via a temp file in the same directory, mode 0600 on Unix.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?;
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    temp.write_all(contents.as_bytes())
        .with_context(|| format!("writing temp file {}", temp.path().display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("setting permissions on {}", temp.path().display()))?;
    }

    temp.persist(path)
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}

impl ProjectStore for FsProjectStore {
    fn project_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn exists(&self, name: &str) -> bool {
        self.project_dir(name).is_dir()
    }

    fn create(&self, name: &str) -> Result<PathBuf> {
        validate_project_name(name)?;
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("creating directory {}", self.root.display()))?;
        let dir = self.project_dir(name);
        // create_dir (not _all) so an existing project is an error, not a merge.
        std::fs::create_dir(&dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                anyhow::anyhow!("project '{name}' already exists at {}", dir.display())
            } else {
                anyhow::Error::new(e).context(format!("creating directory {}", dir.display()))
            }
        })?;
        Ok(dir)
    }

    fn remove(&self, name: &str) -> Result<()> {
        validate_project_name(name)?;
        let dir = self.project_dir(name);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("removing directory {}", dir.display()))?;
        }
        Ok(())
    }

    fn load(&self, name: &str) -> Result<ProjectDescriptor> {
        validate_project_name(name)?;
        let path = self.config_path(name);
        if !path.exists() {
            anyhow::bail!("project '{name}' not found (no {})", path.display());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let descriptor = config_file::parse(name, &text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(descriptor)
    }

    fn save(&self, descriptor: &ProjectDescriptor) -> Result<()> {
        validate_project_name(&descriptor.name)?;
        let dir = self.project_dir(&descriptor.name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
        write_atomic(&self.config_path(&descriptor.name), &config_file::render(descriptor))
    }

    fn write_unit(&self, name: &str, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.project_dir(name).join(file_name);
        std::fs::write(&path, contents)
            .with_context(|| format!("writing file {}", path.display()))?;
        Ok(path)
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("reading directory {}", self.root.display()))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("reading {}", self.root.display()))?;
            let path = entry.path();
            if path.join(CONFIG_FILE).is_file()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
