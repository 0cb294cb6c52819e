use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory name used both per project and under $HOME
pub const DATA_DIR_NAME: &str = ".timebox";

/// Where tasks and settings live for this invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDir {
    /// A `.timebox` in the working directory or one of its ancestors
    Project(PathBuf),
    /// `~/.timebox`, used when no project directory exists
    Home(PathBuf),
}

impl DataDir {
    pub fn path(&self) -> &Path {
        match self {
            DataDir::Project(path) | DataDir::Home(path) => path,
        }
    }

    /// Nearest project directory above `cwd`, else the one under `home`
    pub fn locate(cwd: &Path, home: Option<&Path>) -> Result<Self> {
        let project = cwd
            .ancestors()
            .map(|dir| dir.join(DATA_DIR_NAME))
            .find(|candidate| candidate.is_dir());
        if let Some(path) = project {
            return Ok(DataDir::Project(path));
        }
        let home = home.context("Could not determine home directory")?;
        Ok(DataDir::Home(home.join(DATA_DIR_NAME)))
    }

    /// Data directory for the current process, created if missing
    pub fn ensure() -> Result<Self> {
        let cwd = env::current_dir().context("Could not determine current directory")?;
        let data_dir = Self::locate(&cwd, dirs::home_dir().as_deref())?;
        fs::create_dir_all(data_dir.path())
            .with_context(|| format!("Failed to create directory: {}", data_dir.path().display()))?;
        Ok(data_dir)
    }
}

/// Create a project `.timebox` inside `cwd`; an existing one is an error
pub fn init_project_dir(cwd: &Path) -> Result<PathBuf> {
    let data_dir = cwd.join(DATA_DIR_NAME);
    if data_dir.exists() {
        bail!("Data directory already exists: {}", data_dir.display());
    }
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;
    Ok(data_dir)
}

/// Path to the task list
pub fn tasks_file(data_dir: &Path) -> PathBuf {
    data_dir.join("tasks.json")
}

/// Path to settings.json
pub fn settings_file(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path.parent().context("File path has no parent directory")?;

    let mut temp_file = NamedTempFile::new_in(dir).context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}
