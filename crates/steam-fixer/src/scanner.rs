//! Scanner — reads Steam's VDF files and classifies configuration problems.
//!
//! A scan runs in four passes over the main install:
//!
//! 1. **Libraries**: `steamapps/libraryfolders.vdf` → one [`LibraryInfo`] per
//!    library folder, with an existence check on its path.
//! 2. **Manifests**: every `steamapps/appmanifest_*.acf` → [`GameInfo`]. A
//!    manifest that cannot be read is recorded in [`ScanReport::warnings`] and
//!    skipped; one bad file never aborts the scan.
//! 3. **Issues**: a game whose `StagingFolder` points at another library is
//!    flagged, critical if that library no longer exists.
//! 4. **Orphaned downloads**: leftovers for installed games under the
//!    `steamapps/downloading` folder of secondary libraries.

use crate::error::{FixerError, Result};
use crate::steam::{
    app_id_from_manifest_name, library_path_from_vdf, DOWNLOADING_DIR, LIBRARY_FOLDERS_FILE,
    STEAMAPPS_DIR,
};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use vdf_core::Document;
use walkdir::WalkDir;

/// Library id of the main Steam install.
pub const MAIN_LIBRARY_ID: &str = "0";

#[derive(Debug, Clone, Serialize)]
pub struct LibraryInfo {
    pub id: String,
    pub path: PathBuf,
    pub exists: bool,
    /// `(app id, size in bytes)` as listed under the library's `apps` section.
    pub apps: Vec<(String, u64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameInfo {
    pub app_id: String,
    pub name: String,
    pub manifest_path: PathBuf,
    pub install_dir: String,
    pub staging_folder: Option<String>,
    pub size_on_disk: u64,
}

/// Critical when updates stage in a library that is gone, warning when they
/// merely stage in a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Updates stage in a library other than the install library.
    StagingFolderMismatch,
    /// Updates stage in a library whose folder no longer exists.
    MissingStagingLibrary,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueKind::StagingFolderMismatch => "staging folder mismatch",
            IssueKind::MissingStagingLibrary => "missing staging library",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameIssue {
    pub app_id: String,
    pub game_name: String,
    pub manifest_path: PathBuf,
    pub kind: IssueKind,
    pub description: String,
    pub current_value: String,
    pub expected_value: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrphanedDownload {
    pub library_id: String,
    pub library_path: PathBuf,
    pub app_id: String,
    /// Top-level entry under `downloading` to remove.
    pub root: PathBuf,
    /// Every path beneath `root` (or `root` itself for a single file).
    pub files: Vec<PathBuf>,
    pub total_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total_libraries: usize,
    pub active_libraries: usize,
    pub total_games: usize,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warnings: usize,
    pub orphaned_downloads: usize,
    pub orphaned_size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub steam_path: PathBuf,
    pub library_vdf_path: PathBuf,
    pub libraries: Vec<LibraryInfo>,
    pub games: Vec<GameInfo>,
    pub issues: Vec<GameIssue>,
    pub orphaned_downloads: Vec<OrphanedDownload>,
    /// Files skipped during the scan, with the reason.
    pub warnings: Vec<String>,
}

impl ScanReport {
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            total_libraries: self.libraries.len(),
            active_libraries: self.libraries.iter().filter(|l| l.exists).count(),
            total_games: self.games.len(),
            total_issues: self.issues.len(),
            critical_issues: self.issues_by_severity(Severity::Critical).count(),
            warnings: self.issues_by_severity(Severity::Warning).count(),
            orphaned_downloads: self.orphaned_downloads.len(),
            orphaned_size: self.orphaned_downloads.iter().map(|o| o.total_size).sum(),
        }
    }

    pub fn issues_by_severity(&self, severity: Severity) -> impl Iterator<Item = &GameIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty() || !self.orphaned_downloads.is_empty()
    }

    /// Libraries listed in `libraryfolders.vdf` whose folder is gone.
    pub fn dead_libraries(&self) -> impl Iterator<Item = &LibraryInfo> {
        self.libraries.iter().filter(|l| !l.exists)
    }

    pub fn game(&self, app_id: &str) -> Option<&GameInfo> {
        self.games.iter().find(|g| g.app_id == app_id)
    }

    pub fn library(&self, id: &str) -> Option<&LibraryInfo> {
        self.libraries.iter().find(|l| l.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct Scanner {
    steam_path: PathBuf,
    steamapps_path: PathBuf,
    library_vdf_path: PathBuf,
}

impl Scanner {
    pub fn new(steam_path: impl Into<PathBuf>) -> Self {
        let steam_path = steam_path.into();
        let steamapps_path = steam_path.join(STEAMAPPS_DIR);
        let library_vdf_path = steamapps_path.join(LIBRARY_FOLDERS_FILE);
        Self {
            steam_path,
            steamapps_path,
            library_vdf_path,
        }
    }

    pub fn library_vdf_path(&self) -> &Path {
        &self.library_vdf_path
    }

    /// Run every pass and collect the results.
    ///
    /// Fails only if `libraryfolders.vdf` cannot be loaded or the main
    /// `steamapps` directory cannot be listed.
    pub fn scan(&self) -> Result<ScanReport> {
        let libraries = self.scan_libraries()?;
        let (games, warnings) = self.scan_manifests()?;
        let issues = detect_issues(&games, &libraries);
        let orphaned_downloads = scan_orphaned_downloads(&libraries, &games);

        Ok(ScanReport {
            steam_path: self.steam_path.clone(),
            library_vdf_path: self.library_vdf_path.clone(),
            libraries,
            games,
            issues,
            orphaned_downloads,
            warnings,
        })
    }

    fn scan_libraries(&self) -> Result<Vec<LibraryInfo>> {
        let doc = vdf_core::load(&self.library_vdf_path)?;
        Ok(libraries_from_document(&doc))
    }

    fn scan_manifests(&self) -> Result<(Vec<GameInfo>, Vec<String>)> {
        let entries = std::fs::read_dir(&self.steamapps_path)
            .map_err(|e| FixerError::io(&self.steamapps_path, e))?;

        let mut manifests: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let app_id = app_id_from_manifest_name(&name)?.to_string();
                Some((app_id, entry.path()))
            })
            .collect();
        manifests.sort_by(|a, b| app_id_order(&a.0, &b.0));

        let mut games = Vec::new();
        let mut warnings = Vec::new();
        for (app_id, path) in manifests {
            match vdf_core::load(&path) {
                Ok(doc) => games.push(game_from_manifest(app_id, path, &doc)),
                Err(e) => warnings.push(format!("Failed to parse {}: {e}", path.display())),
            }
        }
        Ok((games, warnings))
    }
}

/// Numeric ids in numeric order; anything else after, lexically.
fn app_id_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Extract library folders from a parsed `libraryfolders.vdf`.
///
/// Current files nest each library as a section with a `path` field. Older
/// files map numeric ids straight to a path scalar; both are accepted.
pub fn libraries_from_document(doc: &Document) -> Vec<LibraryInfo> {
    let Some(folders) = doc.get_section(&["libraryfolders"]) else {
        return Vec::new();
    };

    folders
        .iter()
        .filter_map(|(id, value)| {
            let (raw_path, apps) = match value.as_section() {
                Some(section) => {
                    let raw = section.get_str(&["path"])?;
                    let apps: Vec<(String, u64)> = section
                        .get_section(&["apps"])
                        .map(|apps| {
                            apps.iter()
                                .map(|(app, size)| {
                                    (app.to_string(), size.as_u64().unwrap_or(0))
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    (raw, apps)
                }
                None if id.parse::<u64>().is_ok() => (value.as_str()?, Vec::new()),
                None => return None,
            };
            let path = library_path_from_vdf(raw_path);
            Some(LibraryInfo {
                id: id.to_string(),
                exists: path.is_dir(),
                path,
                apps,
            })
        })
        .collect()
}

/// Read the fields the scanner cares about from an app manifest.
pub fn game_from_manifest(app_id: String, manifest_path: PathBuf, doc: &Document) -> GameInfo {
    let field = |key: &str| doc.get(&["AppState", key]);
    GameInfo {
        app_id,
        name: field("name")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string(),
        manifest_path,
        install_dir: field("installdir")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        staging_folder: field("StagingFolder")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string()),
        size_on_disk: field("SizeOnDisk").and_then(|v| v.as_u64()).unwrap_or(0),
    }
}

/// Flag games installed in the main library whose updates stage elsewhere.
pub fn detect_issues(games: &[GameInfo], libraries: &[LibraryInfo]) -> Vec<GameIssue> {
    let mut issues = Vec::new();

    for game in games {
        let Some(staging) = game.staging_folder.as_deref() else {
            continue;
        };
        if staging == MAIN_LIBRARY_ID {
            continue;
        }
        // Unknown library ids are left alone: there is nothing to compare against
        let Some(target) = libraries.iter().find(|l| l.id == staging) else {
            continue;
        };

        let (kind, severity, description) = if target.exists {
            (
                IssueKind::StagingFolderMismatch,
                Severity::Warning,
                format!(
                    "Game installed in library {MAIN_LIBRARY_ID} but updates download to library {staging}"
                ),
            )
        } else {
            (
                IssueKind::MissingStagingLibrary,
                Severity::Critical,
                format!(
                    "Update downloads point to non-existent library at {}",
                    target.path.display()
                ),
            )
        };

        issues.push(GameIssue {
            app_id: game.app_id.clone(),
            game_name: game.name.clone(),
            manifest_path: game.manifest_path.clone(),
            kind,
            description,
            current_value: staging.to_string(),
            expected_value: MAIN_LIBRARY_ID.to_string(),
            severity,
        });
    }

    issues
}

/// Find download leftovers for installed games in secondary libraries.
pub fn scan_orphaned_downloads(
    libraries: &[LibraryInfo],
    games: &[GameInfo],
) -> Vec<OrphanedDownload> {
    let installed = |app_id: &str| games.iter().any(|g| g.app_id == app_id);
    let mut orphaned = Vec::new();

    for lib in libraries {
        if !lib.exists || lib.id == MAIN_LIBRARY_ID {
            continue;
        }
        let downloading = lib.path.join(STEAMAPPS_DIR).join(DOWNLOADING_DIR);
        let Ok(entries) = std::fs::read_dir(&downloading) else {
            continue;
        };

        let mut entries: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        entries.sort();

        for item in entries {
            let Some(name) = item.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if item.is_dir() {
                if !is_app_id(name) || !installed(name) {
                    continue;
                }
                let (files, total_size) = collect_tree(&item);
                orphaned.push(OrphanedDownload {
                    library_id: lib.id.clone(),
                    library_path: lib.path.clone(),
                    app_id: name.to_string(),
                    root: item.clone(),
                    files,
                    total_size,
                });
            } else if item.is_file() {
                let Some(app_id) = app_id_from_download_file(name) else {
                    continue;
                };
                if !installed(app_id) {
                    continue;
                }
                let total_size = item.metadata().map(|m| m.len()).unwrap_or(0);
                orphaned.push(OrphanedDownload {
                    library_id: lib.id.clone(),
                    library_path: lib.path.clone(),
                    app_id: app_id.to_string(),
                    root: item.clone(),
                    files: vec![item.clone()],
                    total_size,
                });
            }
        }
    }

    orphaned
}

fn is_app_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `state_570_1234.patch` / `depot_570_...` → `570`.
fn app_id_from_download_file(name: &str) -> Option<&str> {
    if !name.contains("depot_") && !name.contains("state_") {
        return None;
    }
    name.split('_').nth(1).filter(|id| is_app_id(id))
}

/// Every path beneath `root` and the total size of the regular files.
fn collect_tree(root: &Path) -> (Vec<PathBuf>, u64) {
    let mut files = Vec::new();
    let mut total = 0;
    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            total += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
        files.push(entry.into_path());
    }
    (files, total)
}
