use std::ffi::OsString;
use std::path::PathBuf;

/// Git environment variables that change where a repository is found.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    /// `GIT_DIR`
    pub git_dir: Option<PathBuf>,
    /// `GIT_OBJECT_DIRECTORY`
    pub object_directory: Option<PathBuf>,
    /// `GIT_CEILING_DIRECTORIES`, split on the platform path separator.
    pub ceiling_directories: Vec<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            git_dir: non_empty(std::env::var_os("GIT_DIR")),
            object_directory: non_empty(std::env::var_os("GIT_OBJECT_DIRECTORY")),
            ceiling_directories: std::env::var_os("GIT_CEILING_DIRECTORIES")
                .map(|v| split_path_list(&v.to_string_lossy()))
                .unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn split_path_list(list: &str) -> Vec<PathBuf> {
    let sep = if cfg!(windows) { ';' } else { ':' };
    list.split(sep)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}
