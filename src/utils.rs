use dirs::data_dir;
use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
};

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let base = data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    base.join("gig-board")
});

pub fn data_root() -> PathBuf {
    DATA_ROOT.clone()
}

/// Settings file, overridable with `GIGS_CONFIG`.
pub fn config_path() -> PathBuf {
    match std::env::var("GIGS_CONFIG") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => data_root().join("config.json"),
    }
}

pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
