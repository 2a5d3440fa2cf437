//! Formatting utilities for sizes, durations, and the build summary.

use std::path::Path;
use std::time::Duration;

use cbuild_builder::TaskReport;
use console::Term;
use owo_colors::OwoColorize;

use super::colors_enabled;

/// Format file size in human-readable format.
///
/// ```
/// use cbuild_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use cbuild_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One summary line per written file.
///
/// Paths are shown relative to `cwd` when they are inside it.
pub(crate) fn summary_rows(reports: &[TaskReport], cwd: &Path) -> Vec<(String, String, u64, Duration)> {
    reports
        .iter()
        .flat_map(|report| {
            report.files.iter().map(move |file| {
                let shown = file.path.strip_prefix(cwd).unwrap_or(&file.path);
                (
                    report.target.clone(),
                    shown.display().to_string(),
                    file.size,
                    report.duration,
                )
            })
        })
        .collect()
}

/// Print the written files of every target to stderr.
pub fn print_build_summary(reports: &[TaskReport], cwd: &Path, elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).min(80);
    let rule = "─".repeat(width);
    let rows = summary_rows(reports, cwd);

    if colors_enabled() {
        eprintln!("\n{}", "Build Summary".bold().underline());
    } else {
        eprintln!("\nBuild Summary");
    }
    eprintln!("{}", rule);

    for (target, path, size, duration) in &rows {
        let detail = format!("{} ({})", format_size(*size), format_duration(*duration));
        if colors_enabled() {
            eprintln!(
                "  {} {} {} {}",
                "▸".blue(),
                target.dimmed(),
                path.bright_white().bold(),
                detail.dimmed()
            );
        } else {
            eprintln!("  ▸ {} {} {}", target, path, detail);
        }
    }

    eprintln!("{}", rule);

    let total_size: u64 = rows.iter().map(|(_, _, size, _)| size).sum();
    let total = format!("{} in {}", format_size(total_size), format_duration(elapsed));
    if colors_enabled() {
        eprintln!("  {} {}", "Total:".bold(), total.green());
    } else {
        eprintln!("  Total: {}", total);
    }
}
