use std::collections::BTreeSet;
use std::path::Path;

use crate::assets::AssetReport;
use crate::build::{BuildMode, BuildResult};
use crate::error::{AssetError, BuildError};
use crate::watcher::filter::WatchScope;

const RULE: &str = "============================================================";

/// Print the startup banner for `modwatch watch`.
pub fn print_banner(game_name: &str, scope: &WatchScope, artifact: &Path) {
    println!();
    println!("{game_name} - File Watcher");
    println!("  Watching: {}", scope.entries().join(", "));
    println!("  Output:   {}", artifact.display());
    println!();
    println!("  Commands (type a key, then Enter):");
    println!("    b - Build mod");
    println!("    a - Check assets");
    println!("    d - Decompose (extract save to source)");
    println!("    q - Quit");
    println!();
    println!("Watching {}...", scope.root().display());
}

/// A watched file change that is about to trigger a build.
pub fn print_change(rel_path: &Path) {
    println!("\nChanged: {}", rel_path.display());
}

/// Acknowledge a key typed at the console.
pub fn print_manual_trigger(action: &str) {
    println!("\n[Manual {action} triggered]");
}

pub fn print_build_skipped() {
    println!("Build skipped due to missing assets.");
}

pub fn print_quitting() {
    println!("\nQuitting...");
}

pub fn print_stopping() {
    println!("\nStopping watcher...");
}

/// Header printed before each tool run, stamped with local wall-clock time.
pub fn print_run_header(mode: BuildMode) {
    let verb = match mode {
        BuildMode::Build => "Building",
        BuildMode::Decompose => "Decomposing",
    };
    println!();
    println!("{RULE}");
    println!("{verb}: {}", chrono::Local::now().format("%H:%M:%S"));
    println!("{RULE}");
}

/// Report a finished tool run. Failure diagnostics go to stderr.
pub fn print_build_result(result: &BuildResult) {
    let label = result.mode.label();
    if result.timed_out {
        eprintln!("{label} timed out after {:.2}s!", result.elapsed.as_secs_f64());
        return;
    }
    if result.success {
        println!("{label} successful ({:.2}s)", result.elapsed.as_secs_f64());
        if result.mode == BuildMode::Decompose {
            println!("Source files updated from save file.");
        }
        return;
    }
    match result.exit_code {
        Some(code) => eprintln!("{label} FAILED (exit code {code}):"),
        None => eprintln!("{label} FAILED (terminated by signal):"),
    }
    let stderr = result.stderr.trim_end();
    if !stderr.is_empty() {
        eprintln!("{stderr}");
    }
}

/// Report a run that could not start.
pub fn print_build_error(mode: BuildMode, err: &BuildError) {
    eprintln!("{} error: {err}", mode.label());
}

/// Report a verification verdict, listing at most `limit` offending URLs.
pub fn print_asset_report(report: &AssetReport, limit: usize) {
    if report.passed() {
        if report.cached {
            println!("Asset check OK (cached)");
        } else {
            println!("Asset check OK ({} assets)", report.checked);
        }
        return;
    }
    let cached = if report.cached { " (cached)" } else { "" };
    eprintln!(
        "Asset check failed{cached}: {} missing assets",
        report.bad_urls.len()
    );
    for line in bad_url_lines(&report.bad_urls, limit) {
        eprintln!("{line}");
    }
}

pub fn print_asset_error(err: &AssetError) {
    eprintln!("Asset check failed: {err}");
}

/// The offending-URL list, truncated to `limit` entries plus a count of the rest.
pub fn bad_url_lines(bad_urls: &BTreeSet<String>, limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = bad_urls
        .iter()
        .take(limit)
        .map(|url| format!("  - {url}"))
        .collect();
    if bad_urls.len() > limit {
        lines.push(format!("  ... and {} more", bad_urls.len() - limit));
    }
    lines
}
