//! Tests for argument handling, exit codes, output, and the remediation flow.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use verity_cli::console::status_lines;
use verity_cli::{Cli, Console, ExitStatus, RepairMode, RepairResult, RunSettings, Session};
use verity_core::errors::{ConfigError, ProviderError, ScanError, VerityError};
use verity_core::traits::{ChildOutput, PackageResolver, Remediator};
use verity_core::types::{ExemptionSet, IgnoreReason, Manifest, ManifestEntry, ScanOutcome, UnreadableReason};
use verity_scan::{AggregateReport, ScanContext, ScanEngine};

/// Writer whose contents the test can read back.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct FakeResolver {
    asked: Mutex<Vec<PathBuf>>,
}

impl PackageResolver for FakeResolver {
    fn packages_for(&self, paths: &[PathBuf]) -> BTreeSet<String> {
        self.asked.lock().unwrap().extend_from_slice(paths);
        paths
            .iter()
            .filter(|p| p.to_string_lossy().contains("tool"))
            .map(|_| "tool".to_string())
            .collect()
    }
}

/// Prints like apt-get would: to the shared stdout unless told to use stderr.
struct FakeRemediator {
    succeed: bool,
    calls: Mutex<Vec<BTreeSet<String>>>,
    stdout: Captured,
    stderr: Captured,
}

impl FakeRemediator {
    fn new(succeed: bool) -> Self {
        Self::printing_to(succeed, Captured::default())
    }

    fn printing_to(succeed: bool, stdout: Captured) -> Self {
        Self {
            succeed,
            calls: Mutex::new(Vec::new()),
            stdout,
            stderr: Captured::default(),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Remediator for FakeRemediator {
    fn reinstall(&self, packages: &BTreeSet<String>, output: ChildOutput) -> bool {
        self.calls.lock().unwrap().push(packages.clone());
        let mut sink = match output {
            ChildOutput::Inherit => self.stdout.clone(),
            ChildOutput::Stderr => self.stderr.clone(),
        };
        sink.write_all(b"Reading package lists... Done\n").unwrap();
        self.succeed
    }
}

fn settings(repair: RepairMode) -> RunSettings {
    RunSettings {
        json: false,
        quiet: false,
        repair,
    }
}

fn corrupted_report() -> AggregateReport {
    AggregateReport {
        scanned: 3,
        corrupted: vec![PathBuf::from("/opt/tool/data.bin")],
        scan_duration: Duration::from_millis(10),
        ..Default::default()
    }
}

#[test]
fn test_cli_flags() {
    let cli = Cli::try_parse_from(["verity", "-j", "4", "--timeout", "60", "--yes", "-q", "-vv"]).unwrap();
    let overrides = cli.overrides();
    assert_eq!(overrides.scan_threads, Some(4));
    assert_eq!(overrides.scan_timeout_secs, Some(60));
    assert_eq!(overrides.assume_yes, Some(true));
    assert_eq!(cli.log_directive(), "verity=debug");
    assert_eq!(cli.settings().repair, RepairMode::Always);
    assert!(cli.settings().quiet);
}

#[test]
fn test_cli_rejects_bad_combinations() {
    assert!(Cli::try_parse_from(["verity", "--yes", "--no-repair"]).is_err());
    assert!(Cli::try_parse_from(["verity", "--threads", "0"]).is_err());
    assert!(Cli::try_parse_from(["verity", "--timeout", "0"]).is_err());
}

#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["verity"]).unwrap();
    assert_eq!(cli.settings().repair, RepairMode::Ask);
    assert_eq!(cli.overrides().assume_yes, None);
    assert_eq!(cli.log_directive(), "verity=warn");
    assert_eq!(Cli::try_parse_from(["verity", "--no-repair"]).unwrap().settings().repair, RepairMode::Never);
}

#[test]
fn test_exit_codes() {
    let cases = [
        (VerityError::from(ProviderError::NoPackageManager), 1),
        (
            VerityError::from(ConfigError::FileNotFound {
                path: "/nope.toml".into(),
            }),
            1,
        ),
        (
            VerityError::from(ScanError::WorkerFailed {
                worker: 0,
                message: "boom".into(),
            }),
            3,
        ),
        (
            VerityError::from(ScanError::Timeout {
                timeout_secs: 1,
                pending: 2,
            }),
            3,
        ),
        (VerityError::from(ScanError::Cancelled), 130),
    ];
    for (err, code) in cases {
        assert_eq!(ExitStatus::from(&err).code(), code, "{err}");
    }
    assert_eq!(ExitStatus::Success.code(), 0);
    assert_eq!(ExitStatus::RepairFailed.code(), 2);
}

#[test]
fn test_status_lines() {
    let path = Path::new("/usr/share/locale/de/x.mo");
    assert_eq!(status_lines(Path::new("/bin/a"), &ScanOutcome::Ok), "/bin/a: OK");
    assert_eq!(status_lines(Path::new("/etc/conf"), &ScanOutcome::Skipped), "/etc/conf: SKIPPING");
    assert_eq!(
        status_lines(
            path,
            &ScanOutcome::MissingIgnored {
                reason: IgnoreReason::Locale
            }
        ),
        "/usr/share/locale/de/x.mo: MISSING!!!\nFile is translation/locale file. Not concerned..."
    );
    assert_eq!(
        status_lines(
            Path::new("/root/secret"),
            &ScanOutcome::Unreadable {
                reason: UnreadableReason::PermissionDenied
            }
        ),
        "/root/secret: PERMISSION DENIED"
    );
    assert_eq!(
        status_lines(
            Path::new("/usr/lib/tool"),
            &ScanOutcome::Unreadable {
                reason: UnreadableReason::Other("Is a directory (os error 21)".into())
            }
        ),
        "/usr/lib/tool: UNREADABLE (Is a directory (os error 21))"
    );
    assert!(status_lines(Path::new("/usr/bin/ls"), &ScanOutcome::CorruptedDiverted).contains("diversion"));
}

#[test]
fn test_quiet_hides_ok_and_skipped() {
    let out = Captured::default();
    let console = Console::new(out.clone(), true);
    console.outcome(Path::new("/bin/a"), &ScanOutcome::Ok);
    console.outcome(Path::new("/etc/conf"), &ScanOutcome::Skipped);
    console.outcome(Path::new("/bin/b"), &ScanOutcome::Missing);
    assert_eq!(out.text(), "/bin/b: MISSING!!!\n");
}

#[test]
fn test_clean_report() {
    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::new(true);
    let session = Session::new(Console::new(out.clone(), false), settings(RepairMode::Ask), &resolver, &remediator);

    let status = session.finish(AggregateReport::default(), &mut io::Cursor::new(Vec::new()));

    assert_eq!(status, ExitStatus::Success);
    assert!(out.text().contains("No missing or corrupted files found!"));
    assert!(out.text().contains("SCAN STATISTICS"));
    assert!(resolver.asked.lock().unwrap().is_empty());
    assert_eq!(remediator.call_count(), 0);
}

#[test]
fn test_user_declines() {
    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::new(true);
    let session = Session::new(Console::new(out.clone(), false), settings(RepairMode::Ask), &resolver, &remediator);

    let status = session.finish(corrupted_report(), &mut io::Cursor::new(b"n\n".to_vec()));

    assert_eq!(status, ExitStatus::Success);
    let text = out.text();
    assert!(text.contains("/opt/tool/data.bin\n"));
    assert!(text.contains("re-install these packages:\ntool\n"));
    assert!(text.contains("Would you like to reinstall these? [Y/n]: "));
    assert!(text.contains("Not reinstalling. Exiting..."));
    assert_eq!(remediator.call_count(), 0);
}

#[test]
fn test_user_accepts_and_repair_succeeds() {
    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::new(true);
    let session = Session::new(Console::new(out.clone(), false), settings(RepairMode::Ask), &resolver, &remediator);

    let status = session.finish(corrupted_report(), &mut io::Cursor::new(b"go ahead\n".to_vec()));

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(*resolver.asked.lock().unwrap(), vec![PathBuf::from("/opt/tool/data.bin")]);
    assert_eq!(remediator.calls.lock().unwrap()[0].iter().collect::<Vec<_>>(), vec!["tool"]);
    assert!(remediator.stderr.text().is_empty());
}

#[test]
fn test_failed_repair_exits_two() {
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::new(false);
    let session = Session::new(Console::new(io::sink(), false), settings(RepairMode::Always), &resolver, &remediator);

    let status = session.finish(corrupted_report(), &mut io::Cursor::new(Vec::new()));

    assert_eq!(status, ExitStatus::RepairFailed);
    assert_eq!(remediator.call_count(), 1);
}

#[test]
fn test_no_repair_never_prompts() {
    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::new(true);
    let session = Session::new(Console::new(out.clone(), false), settings(RepairMode::Never), &resolver, &remediator);

    let status = session.finish(corrupted_report(), &mut io::Cursor::new(b"yes\n".to_vec()));

    assert_eq!(status, ExitStatus::Success);
    assert!(!out.text().contains("[Y/n]"));
    assert_eq!(remediator.call_count(), 0);
}

fn json_settings(repair: RepairMode) -> RunSettings {
    RunSettings {
        json: true,
        quiet: false,
        repair,
    }
}

#[test]
fn test_json_output() {
    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::printing_to(true, out.clone());
    let session = Session::new(Console::new(out.clone(), false), json_settings(RepairMode::Ask), &resolver, &remediator);

    let status = session.finish(corrupted_report(), &mut io::Cursor::new(b"yes\n".to_vec()));

    assert_eq!(status, ExitStatus::Success);
    let value: serde_json::Value = serde_json::from_str(&out.text()).unwrap();
    assert_eq!(value["scanned"], 3);
    assert_eq!(value["corrupted"][0], "/opt/tool/data.bin");
    assert_eq!(value["packages"], serde_json::json!(["tool"]));
    assert_eq!(value["repair"], "not_requested");
    assert_eq!(remediator.call_count(), 0);
}

#[test]
fn test_json_repair_keeps_stdout_parseable() {
    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::printing_to(true, out.clone());
    let session = Session::new(Console::new(out.clone(), false), json_settings(RepairMode::Always), &resolver, &remediator);

    let status = session.finish(corrupted_report(), &mut io::Cursor::new(Vec::new()));

    assert_eq!(status, ExitStatus::Success);
    let value: serde_json::Value = serde_json::from_str(&out.text()).unwrap();
    assert_eq!(value["packages"], serde_json::json!(["tool"]));
    assert_eq!(value["repair"], "succeeded");
    assert_eq!(remediator.stderr.text(), "Reading package lists... Done\n");
}

#[test]
fn test_json_failed_repair() {
    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::printing_to(false, out.clone());
    let session = Session::new(Console::new(out.clone(), false), json_settings(RepairMode::Always), &resolver, &remediator);

    let status = session.finish(corrupted_report(), &mut io::Cursor::new(Vec::new()));

    assert_eq!(status, ExitStatus::RepairFailed);
    let value: serde_json::Value = serde_json::from_str(&out.text()).unwrap();
    assert_eq!(value["repair"], "failed");
}

#[test]
fn test_json_clean_report() {
    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::new(true);
    let session = Session::new(Console::new(out.clone(), false), json_settings(RepairMode::Always), &resolver, &remediator);

    session.finish(AggregateReport::default(), &mut io::Cursor::new(Vec::new()));

    let value: serde_json::Value = serde_json::from_str(&out.text()).unwrap();
    assert_eq!(value["repair"], serde_json::to_value(RepairResult::NotNeeded).unwrap());
    assert_eq!(value["packages"], serde_json::json!([]));
    assert!(resolver.asked.lock().unwrap().is_empty());
}

#[test]
fn test_scan_streams_status_lines() {
    let dir = tempfile::TempDir::new().unwrap();
    let tool = dir.path().join("tool");
    std::fs::create_dir_all(&tool).unwrap();
    let data = tool.join("data.bin");
    std::fs::write(&data, b"modified").unwrap();
    let manifest = Manifest::from_entries([ManifestEntry::new(&data, "deadbeef")]);

    let out = Captured::default();
    let resolver = FakeResolver::default();
    let remediator = FakeRemediator::new(true);
    let session = Session::new(Console::new(out.clone(), false), settings(RepairMode::Never), &resolver, &remediator);
    let engine = ScanEngine::new(ScanContext::new(ExemptionSet::new()))
        .with_workers(1)
        .with_timeout(Duration::from_secs(30));

    let report = session.scan(engine, manifest).unwrap();
    assert_eq!(report.corrupted, vec![data.clone()]);
    session.finish(report, &mut io::Cursor::new(Vec::new()));

    let text = out.text();
    assert!(text.starts_with("Scanning...\n"));
    assert!(text.contains(&format!("{}: CORRUPTED!!!", data.display())));
    assert!(text.contains("Scan Complete!"));
    assert_eq!(*resolver.asked.lock().unwrap(), vec![data]);
}
