//! `steam-fixer` CLI — scan and repair Steam library configuration.
//!
//! ## Usage
//!
//! ```sh
//! # Report problems (Steam install auto-detected)
//! steam-fixer scan
//!
//! # Machine-readable report
//! steam-fixer --steam-path ~/.local/share/Steam scan --json
//!
//! # Show what would change, then apply (a backup is taken first)
//! steam-fixer fix --dry-run
//! steam-fixer fix
//!
//! # Undo a fix
//! steam-fixer list-backups
//! steam-fixer restore backup_20240101_120000
//!
//! # Keep only the newest 5 backups
//! steam-fixer cleanup-backups --keep 5
//! ```
//!
//! Logging goes to stderr; `--verbose` enables debug output and `RUST_LOG`
//! overrides both. With `--log-dir`, the same lines are also written to
//! `steam_fixer_<timestamp>.log` in that directory.
//!
//! `fix` refuses to run while the Steam client is open, since Steam writes
//! its in-memory manifests back on exit. `--force` skips that check.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use steam_fixer::config::{DEFAULT_BACKUP_DIR, DEFAULT_KEEP_BACKUPS};
use steam_fixer::steam::{
    default_steam_path, format_bytes, is_steam_running, validate_steam_directory,
};
use steam_fixer::{
    BackupManager, Fixer, FixerConfig, FixerError, LogReporter, ScanReport, Scanner, Severity,
};

#[derive(Parser)]
#[command(
    name = "steam-fixer",
    version,
    about = "Scan and repair Steam library configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Steam installation directory (auto-detected if omitted)
    #[arg(long, global = true, env = "STEAM_PATH")]
    steam_path: Option<PathBuf>,

    /// Directory holding backups
    #[arg(long, global = true, env = "STEAM_FIXER_BACKUP_DIR", default_value = DEFAULT_BACKUP_DIR)]
    backup_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write the log to a timestamped file in this directory
    #[arg(long, global = true, env = "STEAM_FIXER_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the installation and report problems
    Scan {
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Back up affected files and repair every problem found (close Steam first)
    Fix {
        /// Show what would be fixed without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Fix even if Steam appears to be running
        #[arg(long)]
        force: bool,
    },
    /// Restore files from a backup
    Restore {
        /// Backup id, as shown by list-backups
        backup_id: String,
    },
    /// List available backups, newest first
    ListBackups,
    /// Delete old backups
    CleanupBackups {
        /// Number of newest backups to keep
        #[arg(long, default_value_t = DEFAULT_KEEP_BACKUPS)]
        keep: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Scan { json } => {
            let config = resolve_config(cli.steam_path, cli.backup_dir)?;
            let report = run_scan(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_scan_report(&report);
            }
        }
        Commands::Fix { dry_run, force } => {
            let config = resolve_config(cli.steam_path, cli.backup_dir)?.with_dry_run(dry_run);
            if !dry_run {
                if !force && is_steam_running() {
                    anyhow::bail!(
                        "Steam is running. Close Steam before fixing (or pass --force)"
                    );
                }
                if force {
                    log::warn!("Skipping the Steam process check (--force)");
                }
            }
            let report = run_scan(&config)?;
            print_scan_report(&report);

            if !report.has_issues() && report.dead_libraries().next().is_none() {
                return Ok(());
            }

            let backups = BackupManager::new(&config.backup_dir)
                .context("Failed to prepare backup directory")?;
            let summary = Fixer::new(&report, &backups, &config)
                .fix_all(&mut LogReporter)
                .context("Aborted before any change was made")?;

            println!();
            println!(
                "Fixed: {}, Failed: {}",
                summary.fixed.to_string().green(),
                summary.failed.to_string().red()
            );
            if summary.dry_run {
                println!("{}", "This was a dry run. No changes were made.".yellow());
            } else if let Some(id) = &summary.backup_id {
                println!("Backup: {}", id.cyan());
            }
            if summary.failed > 0 {
                process::exit(1);
            }
        }
        Commands::Restore { backup_id } => {
            let backups = BackupManager::new(&cli.backup_dir)?;
            let restored = backups
                .restore_backup(&backup_id)
                .with_context(|| format!("Failed to restore backup {backup_id}"))?;
            println!(
                "{} Restored {restored} files from {backup_id}",
                "✓".green()
            );
        }
        Commands::ListBackups => {
            let backups = BackupManager::new(&cli.backup_dir)?;
            let list = backups.list_backups();
            if list.is_empty() {
                println!("No backups found.");
                return Ok(());
            }
            println!("{}", "Available Backups:".bold());
            for backup in list {
                println!();
                println!("  ID: {}", backup.backup_id.cyan());
                println!("  Date: {}", backup.timestamp);
                println!("  Description: {}", backup.description);
                println!("  Files: {}", backup.files.len());
            }
        }
        Commands::CleanupBackups { keep } => {
            let backups = BackupManager::new(&cli.backup_dir)?;
            let deleted = backups.cleanup_old_backups(keep)?;
            println!("Deleted {deleted} old backups");
        }
    }

    Ok(())
}

/// Default to `info`, or `debug` with `--verbose`; `RUST_LOG` wins over both.
fn init_logging(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    builder.format_target(false);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let path = dir.join(format!("steam_fixer_{stamp}.log"));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .format_timestamp_secs()
                .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
        }
        None => {
            builder.format_timestamp(None);
        }
    }

    builder.init();
    Ok(())
}

/// Copies log output to stderr and the log file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn resolve_config(steam_path: Option<PathBuf>, backup_dir: PathBuf) -> Result<FixerConfig> {
    let steam_path = match steam_path {
        Some(path) => path,
        None => default_steam_path().context(
            "Could not find a Steam installation. Please specify it with --steam-path",
        )?,
    };
    if !validate_steam_directory(&steam_path) {
        return Err(FixerError::InvalidSteamPath(steam_path).into());
    }
    Ok(FixerConfig::new(steam_path).with_backup_dir(backup_dir))
}

fn run_scan(config: &FixerConfig) -> Result<ScanReport> {
    log::info!("Scanning {}", config.steam_path.display());
    let report = Scanner::new(&config.steam_path)
        .scan()
        .context("Scan failed")?;
    for warning in &report.warnings {
        log::warn!("{warning}");
    }
    Ok(report)
}

fn print_scan_report(report: &ScanReport) {
    let s = report.summary();

    println!("{}", "Scan Results".bold());
    println!(
        "  Libraries: {} ({} active)",
        s.total_libraries, s.active_libraries
    );
    println!("  Games: {}", s.total_games);
    println!("  Issues: {}", s.total_issues);
    println!("    Critical: {}", s.critical_issues);
    println!("    Warnings: {}", s.warnings);
    println!(
        "  Orphaned downloads: {} ({})",
        s.orphaned_downloads,
        format_bytes(s.orphaned_size)
    );

    if !report.issues.is_empty() {
        println!();
        println!("{}", "Detected Issues:".bold());
        for issue in &report.issues {
            let severity = match issue.severity {
                Severity::Critical => "CRITICAL".red().bold(),
                Severity::Warning => "WARNING".yellow(),
            };
            println!(
                "  [{severity}] {} ({}): {}",
                issue.game_name.cyan(),
                issue.kind,
                issue.description
            );
        }
    }

    if !report.orphaned_downloads.is_empty() {
        println!();
        println!("{}", "Orphaned Downloads:".bold());
        for orphaned in &report.orphaned_downloads {
            let name = report
                .game(&orphaned.app_id)
                .map(|g| g.name.as_str())
                .unwrap_or("Unknown");
            println!(
                "  {name} - {} files ({})",
                orphaned.files.len(),
                format_bytes(orphaned.total_size)
            );
        }
    }

    let dead: Vec<_> = report.dead_libraries().collect();
    if !dead.is_empty() {
        println!();
        println!("{}", "Missing Libraries:".bold());
        for lib in dead {
            println!("  {} - {}", lib.id, lib.path.display());
        }
    }

    if !report.has_issues() && report.dead_libraries().next().is_none() {
        println!();
        println!("{}", "No issues found!".green());
    }
}
