mod common;

use common::SteamFixture;
use std::fs;
use std::path::PathBuf;
use steam_fixer::scanner::{
    detect_issues, game_from_manifest, libraries_from_document, scan_orphaned_downloads,
};
use steam_fixer::{FixerError, IssueKind, Scanner, Severity};
use vdf_core::{parse, VdfError};

// ============================================================================
// Full scans
// ============================================================================

#[test]
fn clean_install_has_no_issues() {
    let fx = SteamFixture::new();
    fx.add_manifest("570", "Dota 2", Some("0"));
    fx.add_manifest("730", "Counter-Strike", None);

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert_eq!(report.libraries.len(), 1);
    assert_eq!(report.games.len(), 2);
    assert!(report.issues.is_empty());
    assert!(!report.has_issues());
    assert_eq!(report.library_vdf_path, fx.library_vdf());
}

#[test]
fn staging_in_other_existing_library_is_warning() {
    let mut fx = SteamFixture::new();
    fx.add_library("1", true);
    let manifest = fx.add_manifest("570", "Dota 2", Some("1"));

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.app_id, "570");
    assert_eq!(issue.game_name, "Dota 2");
    assert_eq!(issue.kind, IssueKind::StagingFolderMismatch);
    assert_eq!(issue.severity, Severity::Warning);
    assert_eq!(issue.current_value, "1");
    assert_eq!(issue.expected_value, "0");
    assert_eq!(issue.manifest_path, manifest);
}

#[test]
fn staging_in_missing_library_is_critical() {
    let mut fx = SteamFixture::new();
    let dead = fx.add_library("2", false);
    fx.add_manifest("570", "Dota 2", Some("2"));

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::MissingStagingLibrary);
    assert_eq!(report.issues[0].severity, Severity::Critical);
    assert!(report.issues[0]
        .description
        .contains(&dead.display().to_string()));

    let dead_ids: Vec<&str> = report.dead_libraries().map(|l| l.id.as_str()).collect();
    assert_eq!(dead_ids, vec!["2"]);
}

#[test]
fn unknown_staging_library_is_ignored() {
    let fx = SteamFixture::new();
    fx.add_manifest("570", "Dota 2", Some("9"));

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert!(report.issues.is_empty());
}

#[test]
fn staging_folder_zero_is_compared_as_text() {
    // "0" must never be confused with a missing value
    let mut fx = SteamFixture::new();
    fx.add_library("1", true);
    fx.add_manifest("570", "Dota 2", Some("0"));

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert_eq!(report.games[0].staging_folder.as_deref(), Some("0"));
    assert!(report.issues.is_empty());
}

#[test]
fn games_are_ordered_by_numeric_app_id() {
    let fx = SteamFixture::new();
    fx.add_manifest("570", "Dota 2", None);
    fx.add_manifest("10", "Counter-Strike", None);
    fx.add_manifest("1091500", "Cyberpunk 2077", None);

    let report = Scanner::new(&fx.steam).scan().unwrap();
    let ids: Vec<&str> = report.games.iter().map(|g| g.app_id.as_str()).collect();
    assert_eq!(ids, vec!["10", "570", "1091500"]);
}

#[test]
fn unreadable_manifest_becomes_warning() {
    let fx = SteamFixture::new();
    fx.add_manifest("570", "Dota 2", None);
    fs::create_dir(fx.steamapps().join("appmanifest_99.acf")).unwrap();

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert_eq!(report.games.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("appmanifest_99.acf"));
}

#[test]
fn missing_library_folders_fails_scan() {
    let fx = SteamFixture::new();
    fs::remove_file(fx.library_vdf()).unwrap();

    let err = Scanner::new(&fx.steam).scan().unwrap_err();
    assert!(matches!(err, FixerError::Vdf(VdfError::NotFound { .. })));
}

#[test]
fn non_manifest_files_are_ignored() {
    let fx = SteamFixture::new();
    fs::write(fx.steamapps().join("appmanifest_.acf"), "junk").unwrap();
    fs::write(fx.steamapps().join("readme.txt"), "junk").unwrap();

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert!(report.games.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn severity_follows_target_library_state() {
    let mut fx = SteamFixture::new();
    fx.add_library("1", true);
    fx.add_library("2", false);
    fx.add_manifest("570", "Dota 2", Some("1"));
    fx.add_manifest("730", "Counter-Strike", Some("2"));

    let report = Scanner::new(&fx.steam).scan().unwrap();
    let labels: Vec<String> = report.issues.iter().map(|i| i.severity.to_string()).collect();
    assert_eq!(labels, vec!["warning", "critical"]);
    assert_eq!(
        serde_json::to_value(Severity::Critical).unwrap(),
        serde_json::json!("critical")
    );
    assert_eq!(
        serde_json::to_value(Severity::Warning).unwrap(),
        serde_json::json!("warning")
    );
}

#[test]
fn summary_counts() {
    let mut fx = SteamFixture::new();
    let lib1 = fx.add_library("1", true);
    fx.add_library("2", false);
    fx.add_manifest("570", "Dota 2", Some("1"));
    fx.add_manifest("730", "Counter-Strike", Some("2"));
    fx.add_download_file(&lib1, "570/chunk.bin", &[0; 2048]);

    let report = Scanner::new(&fx.steam).scan().unwrap();
    let s = report.summary();
    assert_eq!(s.total_libraries, 3);
    assert_eq!(s.active_libraries, 2);
    assert_eq!(s.total_games, 2);
    assert_eq!(s.total_issues, 2);
    assert_eq!(s.critical_issues, 1);
    assert_eq!(s.warnings, 1);
    assert_eq!(s.orphaned_downloads, 1);
    assert_eq!(s.orphaned_size, 2048);
}

// ============================================================================
// libraryfolders.vdf
// ============================================================================

#[test]
fn libraries_with_apps() {
    let doc = parse(
        r#"
"libraryfolders"
{
	"0"
	{
		"path"		"/nonexistent/Steam"
		"apps"
		{
			"570"		"35000000"
			"730"		"bogus"
		}
	}
}
"#,
    );
    let libs = libraries_from_document(&doc);
    assert_eq!(libs.len(), 1);
    assert_eq!(libs[0].id, "0");
    assert_eq!(libs[0].path, PathBuf::from("/nonexistent/Steam"));
    assert!(!libs[0].exists);
    assert_eq!(
        libs[0].apps,
        vec![("570".to_string(), 35000000), ("730".to_string(), 0)]
    );
}

#[test]
fn legacy_library_format() {
    let doc = parse(
        r#"
"LibraryFolders"
{
}
"libraryfolders"
{
	"TimeNextStatsReport"		"1700000000"
	"ContentStatsID"		"-123"
	"1"		"/nonexistent/games"
}
"#,
    );
    let libs = libraries_from_document(&doc);
    assert_eq!(libs.len(), 1);
    assert_eq!(libs[0].id, "1");
    assert_eq!(libs[0].path, PathBuf::from("/nonexistent/games"));
    assert!(libs[0].apps.is_empty());
}

#[test]
fn library_without_path_is_skipped() {
    let doc = parse("\"libraryfolders\"\n{\n\t\"0\"\n\t{\n\t\t\"label\"\t\t\"x\"\n\t}\n}\n");
    assert!(libraries_from_document(&doc).is_empty());
}

#[test]
fn windows_library_paths_are_normalized() {
    let doc = parse(
        "\"libraryfolders\"\n{\n\t\"1\"\n\t{\n\t\t\"path\"\t\t\"D:\\\\SteamLibrary\"\n\t}\n}\n",
    );
    let libs = libraries_from_document(&doc);
    assert_eq!(libs[0].path, PathBuf::from("D:/SteamLibrary"));
}

#[test]
fn missing_root_section_gives_no_libraries() {
    assert!(libraries_from_document(&parse("\"other\"\n{\n}\n")).is_empty());
}

// ============================================================================
// App manifests
// ============================================================================

#[test]
fn manifest_fields() {
    let doc = parse(
        "\"AppState\"\n{\n\t\"name\"\t\t\"Dota 2\"\n\t\"installdir\"\t\t\"dota 2 beta\"\n\t\"SizeOnDisk\"\t\t\"42\"\n\t\"StagingFolder\"\t\t\" 1 \"\n}\n",
    );
    let game = game_from_manifest("570".into(), PathBuf::from("m.acf"), &doc);
    assert_eq!(game.name, "Dota 2");
    assert_eq!(game.install_dir, "dota 2 beta");
    assert_eq!(game.size_on_disk, 42);
    assert_eq!(game.staging_folder.as_deref(), Some("1"));
}

#[test]
fn manifest_defaults() {
    let doc = parse("\"AppState\"\n{\n}\n");
    let game = game_from_manifest("570".into(), PathBuf::from("m.acf"), &doc);
    assert_eq!(game.name, "Unknown");
    assert_eq!(game.install_dir, "");
    assert_eq!(game.size_on_disk, 0);
    assert_eq!(game.staging_folder, None);
}

#[test]
fn detect_issues_without_libraries_is_empty() {
    let doc = parse("\"AppState\"\n{\n\t\"StagingFolder\"\t\t\"1\"\n}\n");
    let game = game_from_manifest("570".into(), PathBuf::from("m.acf"), &doc);
    assert!(detect_issues(&[game], &[]).is_empty());
}

// ============================================================================
// Orphaned downloads
// ============================================================================

#[test]
fn orphaned_directories_and_files() {
    let mut fx = SteamFixture::new();
    let lib1 = fx.add_library("1", true);
    fx.add_manifest("570", "Dota 2", None);
    fx.add_download_file(&lib1, "570/depot_571/a.bin", &[0; 100]);
    fx.add_download_file(&lib1, "570/b.bin", &[0; 50]);
    fx.add_download_file(&lib1, "state_570_571.patch", &[0; 10]);

    let report = Scanner::new(&fx.steam).scan().unwrap();
    let orphaned = &report.orphaned_downloads;
    assert_eq!(orphaned.len(), 2);

    let dir = &orphaned[0];
    assert_eq!(dir.library_id, "1");
    assert_eq!(dir.app_id, "570");
    assert_eq!(dir.root, lib1.join("steamapps/downloading/570"));
    assert_eq!(dir.total_size, 150);
    // depot_571/, depot_571/a.bin, b.bin
    assert_eq!(dir.files.len(), 3);

    let file = &orphaned[1];
    assert_eq!(file.app_id, "570");
    assert_eq!(file.files, vec![file.root.clone()]);
    assert_eq!(file.total_size, 10);
}

#[test]
fn downloads_for_uninstalled_games_are_kept() {
    let mut fx = SteamFixture::new();
    let lib1 = fx.add_library("1", true);
    fx.add_manifest("570", "Dota 2", None);
    fx.add_download_file(&lib1, "999/a.bin", b"x");
    fx.add_download_file(&lib1, "depot_999_1.bin", b"x");
    fx.add_download_file(&lib1, "notes/a.txt", b"x");
    fx.add_download_file(&lib1, "random.bin", b"x");

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert!(report.orphaned_downloads.is_empty());
}

#[test]
fn main_library_downloads_are_not_orphaned() {
    let fx = SteamFixture::new();
    fx.add_manifest("570", "Dota 2", None);
    fx.add_download_file(&fx.steam, "570/a.bin", b"x");

    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert!(report.orphaned_downloads.is_empty());
}

#[test]
fn orphan_scan_skips_dead_libraries() {
    let mut fx = SteamFixture::new();
    fx.add_library("1", false);
    let report = Scanner::new(&fx.steam).scan().unwrap();
    assert!(scan_orphaned_downloads(&report.libraries, &report.games).is_empty());
}
