//! Steam installation layout: locating the install and naming conventions.

use std::path::{Path, PathBuf};
use sysinfo::System;

pub const STEAMAPPS_DIR: &str = "steamapps";
pub const LIBRARY_FOLDERS_FILE: &str = "libraryfolders.vdf";
pub const DOWNLOADING_DIR: &str = "downloading";

/// Candidate install locations for the current platform, most likely first.
pub fn candidate_steam_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(target_os = "windows")]
    {
        paths.push(PathBuf::from("C:/Program Files (x86)/Steam"));
        paths.push(PathBuf::from("C:/Program Files/Steam"));
        if let Some(pf) = std::env::var_os("PROGRAMFILES(X86)") {
            paths.push(PathBuf::from(pf).join("Steam"));
        }
        if let Some(pf) = std::env::var_os("PROGRAMFILES") {
            paths.push(PathBuf::from(pf).join("Steam"));
        }
    }
    #[cfg(target_os = "linux")]
    {
        if let Some(home) = home_dir() {
            paths.push(home.join(".steam").join("steam"));
            paths.push(home.join(".local").join("share").join("Steam"));
        }
        paths.push(PathBuf::from("/usr/share/steam"));
    }
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home_dir() {
            paths.push(home.join("Library/Application Support/Steam"));
        }
    }

    paths
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// First candidate that looks like a Steam installation.
pub fn default_steam_path() -> Option<PathBuf> {
    candidate_steam_paths()
        .into_iter()
        .find(|p| validate_steam_directory(p))
}

/// A Steam directory is an existing directory with a `steamapps` child.
pub fn validate_steam_directory(path: &Path) -> bool {
    path.is_dir() && path.join(STEAMAPPS_DIR).is_dir()
}

/// Executable names of the Steam client on each platform.
pub const STEAM_PROCESS_NAMES: [&str; 3] = ["steam", "steam.exe", "steam_osx"];

/// Whether a process name is the Steam client itself. Helpers such as
/// `steamwebhelper` and this tool (`steam-fixer`) do not count.
pub fn is_steam_process_name(name: &str) -> bool {
    STEAM_PROCESS_NAMES
        .iter()
        .any(|candidate| name.eq_ignore_ascii_case(candidate))
}

/// Whether a Steam client process is running. Steam keeps manifests in
/// memory and writes them back on exit, undoing edits made meanwhile.
pub fn is_steam_running() -> bool {
    let mut system = System::new();
    system.refresh_processes();
    system
        .processes()
        .values()
        .any(|process| is_steam_process_name(process.name()))
}

/// `appmanifest_570.acf` → `570`.
pub fn app_id_from_manifest_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix("appmanifest_")?
        .strip_suffix(".acf")
        .filter(|id| !id.is_empty())
}

/// Library paths in `libraryfolders.vdf` carry doubled backslashes
/// (`D:\\SteamLibrary`); normalize them to forward slashes.
pub fn library_path_from_vdf(raw: &str) -> PathBuf {
    PathBuf::from(raw.replace("\\\\", "/"))
}

/// Human readable size with base-1024 units: `1536` → `"1.50 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} PB")
}
