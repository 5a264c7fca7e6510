//! End-of-run statistics block.

use std::fmt::Write;

use verity_scan::AggregateReport;

/// The statistics block printed after every text-mode run.
pub fn render(report: &AggregateReport) -> String {
    let rule = "=".repeat(25);
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "#    SCAN STATISTICS    #");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Scan time:       {:.2} seconds", report.scan_duration.as_secs_f64());
    let _ = writeln!(out, "Total time:      {:.2} seconds", report.total_duration.as_secs_f64());
    let _ = writeln!(out, "Files scanned:   {}", report.scanned);
    let _ = writeln!(out, "Corrupted files: {}", report.corrupted.len());
    let _ = writeln!(out, "Missing files:   {}", report.missing.len());
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[test]
    fn renders_counts_and_times() {
        let report = AggregateReport {
            scanned: 12,
            corrupted: vec![PathBuf::from("/opt/tool/data.bin")],
            scan_duration: Duration::from_millis(1500),
            total_duration: Duration::from_millis(2250),
            ..Default::default()
        };
        let text = render(&report);
        assert!(text.contains("#    SCAN STATISTICS    #"));
        assert!(text.contains("Scan time:       1.50 seconds"));
        assert!(text.contains("Total time:      2.25 seconds"));
        assert!(text.contains("Files scanned:   12"));
        assert!(text.contains("Corrupted files: 1"));
        assert!(text.contains("Missing files:   0"));
    }
}
