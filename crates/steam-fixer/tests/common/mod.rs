//! Builds throwaway Steam installations on disk for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vdf_core::{Document, Value};

pub struct SteamFixture {
    pub dir: TempDir,
    pub steam: PathBuf,
    libraries: Vec<Library>,
}

struct Library {
    id: String,
    path: PathBuf,
    apps: Vec<(String, u64)>,
}

impl SteamFixture {
    /// An install with only the main library (`"0"`, the Steam root itself).
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let steam = dir.path().join("Steam");
        fs::create_dir_all(steam.join("steamapps")).expect("create steamapps");
        let mut fixture = Self {
            dir,
            steam: steam.clone(),
            libraries: Vec::new(),
        };
        fixture.libraries.push(Library {
            id: "0".to_string(),
            path: steam,
            apps: Vec::new(),
        });
        fixture.write_library_folders();
        fixture
    }

    pub fn steamapps(&self) -> PathBuf {
        self.steam.join("steamapps")
    }

    pub fn library_vdf(&self) -> PathBuf {
        self.steamapps().join("libraryfolders.vdf")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.dir.path().join("backups")
    }

    /// Register library `id`. When `exists` is false the folder is never
    /// created, so the library is dead.
    pub fn add_library(&mut self, id: &str, exists: bool) -> PathBuf {
        let path = self.dir.path().join(format!("Library{id}"));
        if exists {
            fs::create_dir_all(path.join("steamapps")).expect("create library");
        }
        self.libraries.push(Library {
            id: id.to_string(),
            path: path.clone(),
            apps: Vec::new(),
        });
        self.write_library_folders();
        path
    }

    pub fn add_library_app(&mut self, id: &str, app_id: &str, size: u64) {
        let lib = self
            .libraries
            .iter_mut()
            .find(|l| l.id == id)
            .expect("library registered");
        lib.apps.push((app_id.to_string(), size));
        self.write_library_folders();
    }

    pub fn write_library_folders(&self) {
        let mut folders = Document::new();
        for lib in &self.libraries {
            let mut entry = Document::new();
            entry.insert("path", lib.path.display().to_string());
            let mut apps = Document::new();
            for (app, size) in &lib.apps {
                apps.insert(app.as_str(), size.to_string());
            }
            entry.insert("apps", apps);
            folders.insert(lib.id.as_str(), entry);
        }
        let mut doc = Document::new();
        doc.insert("libraryfolders", Value::Section(folders));
        vdf_core::save(&doc, self.library_vdf()).expect("write libraryfolders.vdf");
    }

    /// Write `appmanifest_<app_id>.acf` into the main library.
    pub fn add_manifest(&self, app_id: &str, name: &str, staging: Option<&str>) -> PathBuf {
        let mut text = format!(
            "\"AppState\"\n{{\n\t\"appid\"\t\t\"{app_id}\"\n\t\"name\"\t\t\"{name}\"\n\t\"installdir\"\t\t\"{name}\"\n\t\"SizeOnDisk\"\t\t\"1000\"\n"
        );
        if let Some(staging) = staging {
            text.push_str(&format!("\t\"StagingFolder\"\t\t\"{staging}\"\n"));
        }
        text.push_str("}\n");
        let path = self.steamapps().join(format!("appmanifest_{app_id}.acf"));
        fs::write(&path, text).expect("write manifest");
        path
    }

    /// Create `<library>/steamapps/downloading/<relative>` with `contents`.
    pub fn add_download_file(&self, library: &Path, relative: &str, contents: &[u8]) -> PathBuf {
        let path = library.join("steamapps").join("downloading").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create downloading dir");
        }
        fs::write(&path, contents).expect("write download file");
        path
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("readable file")
}
