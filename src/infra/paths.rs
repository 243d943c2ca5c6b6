// src/infra/paths.rs — Path management
//
// All paths respect the QUILL_HOME environment variable for isolation.
// When QUILL_HOME is set, config and data both live under that directory.
// When unset, config uses ~/.quill/ and data uses the platform data dir.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static PROJECT_DIRS: OnceLock<ProjectDirs> = OnceLock::new();

fn project_dirs() -> &'static ProjectDirs {
    PROJECT_DIRS.get_or_init(|| {
        ProjectDirs::from("", "", "quill").expect("Could not determine home directory")
    })
}

/// Returns the QUILL_HOME override, if set.
fn quill_home() -> Option<PathBuf> {
    std::env::var_os("QUILL_HOME").map(PathBuf::from)
}

/// Configuration directory: $QUILL_HOME/ or ~/.quill/
pub fn config_dir() -> PathBuf {
    if let Some(home) = quill_home() {
        return home;
    }
    dirs_home().join(".quill")
}

/// Data directory: $QUILL_HOME/data/ or the platform-local data dir.
pub fn data_dir() -> PathBuf {
    if let Some(home) = quill_home() {
        return home.join("data");
    }
    project_dirs().data_local_dir().to_path_buf()
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Saved chat records, one JSON file per session.
/// Created lazily on first save, never at startup.
pub fn chats_dir() -> PathBuf {
    data_dir().join("chats")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
