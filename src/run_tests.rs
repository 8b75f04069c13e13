//! Tests for the run module.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::*;
use driverlogic::adapter::{AdapterClass, EnumerateError};
use driverlogic::config::Cli;

fn tap(identifier: &str, alias: &str) -> TapAdapter {
    TapAdapter::new(identifier, "TAP-Windows Adapter V9", alias)
}

fn config(args: &[&str]) -> ValidatedConfig {
    let mut full = vec!["driverlogic"];
    full.extend_from_slice(args);
    ValidatedConfig::from_raw(&Cli::parse_from_iter(full), None).unwrap()
}

fn install_config() -> ValidatedConfig {
    config(&["install", "--", "setup.exe"])
}

/// Platform double returning queued snapshots and recording renames.
#[derive(Default)]
struct FakePlatform {
    snapshots: Mutex<VecDeque<Vec<TapAdapter>>>,
    renames: Mutex<Vec<(String, String)>>,
    fail_rename: bool,
}

impl FakePlatform {
    fn with_snapshots(snapshots: Vec<Vec<TapAdapter>>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
            ..Self::default()
        }
    }

    fn failing_rename(mut self) -> Self {
        self.fail_rename = true;
        self
    }

    fn renames(&self) -> Vec<(String, String)> {
        self.renames.lock().unwrap().clone()
    }
}

impl AdapterEnumerator for FakePlatform {
    fn enumerate(&self, _class: &AdapterClass) -> Result<Vec<TapAdapter>, EnumerateError> {
        Ok(self.snapshots.lock().unwrap().pop_front().unwrap_or_default())
    }
}

impl AdapterRenamer for FakePlatform {
    fn rename(&self, adapter: &TapAdapter, alias: &str) -> Result<(), RenameError> {
        if self.fail_rename {
            return Err(RenameError::Unsupported);
        }
        self.renames
            .lock()
            .unwrap()
            .push((adapter.identifier.clone(), alias.to_string()));
        Ok(())
    }
}

/// Installer double counting its runs.
#[derive(Default)]
struct FakeInstaller {
    runs: Cell<usize>,
    fail: bool,
}

impl Installer for FakeInstaller {
    async fn install(&self) -> Result<(), RunError> {
        self.runs.set(self.runs.get() + 1);
        if self.fail {
            Err(RunError::MissingInstaller)
        } else {
            Ok(())
        }
    }
}

mod run_error {
    use super::*;

    #[test]
    fn missing_installer_displays_message() {
        assert_eq!(
            RunError::MissingInstaller.to_string(),
            "No installer command given"
        );
    }

    #[test]
    fn timed_out_displays_seconds() {
        let error = RunError::InstallerTimedOut {
            program: "setup.exe".to_string(),
            timeout: Duration::from_secs(30),
        };

        assert_eq!(
            error.to_string(),
            "Installer 'setup.exe' did not finish within 30s"
        );
    }

    #[test]
    fn tracker_errors_are_transparent() {
        let error = RunError::from(TrackerError::NoNewAdapter);

        assert_eq!(error.to_string(), TrackerError::NoNewAdapter.to_string());
    }

    #[test]
    fn contract_errors_are_precondition_violations() {
        let several = RunError::from(TrackerError::MultipleNewAdapters {
            identifiers: vec!["{X}".to_string(), "{Y}".to_string()],
        });

        assert!(RunError::from(TrackerError::NoNewAdapter).is_precondition_violation());
        assert!(several.is_precondition_violation());
    }

    #[test]
    fn os_and_installer_errors_are_not_precondition_violations() {
        let enumerate = RunError::from(TrackerError::from(EnumerateError::Unsupported));

        assert!(!enumerate.is_precondition_violation());
        assert!(!RunError::MissingInstaller.is_precondition_violation());
    }

    #[test]
    fn rename_error_names_adapter() {
        let error = RunError::Rename {
            identifier: "{AAAA-1}".to_string(),
            source: RenameError::Unsupported,
        };

        assert!(error.to_string().contains("{AAAA-1}"));
    }
}

mod process_installer {
    use super::*;

    #[test]
    fn empty_command_line_is_rejected() {
        let result = ProcessInstaller::new(&[], Duration::from_secs(1));

        assert!(matches!(result, Err(RunError::MissingInstaller)));
    }

    #[test]
    fn first_element_is_the_program() {
        let command_line = vec!["setup.exe".to_string(), "/S".to_string()];
        let installer = ProcessInstaller::new(&command_line, Duration::from_secs(1)).unwrap();

        assert_eq!(installer.program, "setup.exe");
        assert_eq!(installer.args, vec!["/S"]);
    }

    #[cfg(unix)]
    fn installer(command_line: &[&str], timeout: Duration) -> ProcessInstaller {
        let command_line: Vec<String> = command_line.iter().map(ToString::to_string).collect();
        ProcessInstaller::new(&command_line, timeout).unwrap()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_exit_is_ok() {
        let result = installer(&["true"], Duration::from_secs(5)).install().await;

        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_exit_is_reported() {
        let result = installer(&["false"], Duration::from_secs(5)).install().await;

        assert!(matches!(result, Err(RunError::InstallerFailed { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_installer_times_out() {
        let result = installer(&["sleep", "5"], Duration::from_millis(100))
            .install()
            .await;

        assert!(matches!(result, Err(RunError::InstallerTimedOut { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let result = installer(&["driverlogic-no-such-installer"], Duration::from_secs(5))
            .install()
            .await;

        assert!(matches!(result, Err(RunError::InstallerIo { .. })));
    }
}

mod install {
    use super::*;

    #[tokio::test]
    async fn new_adapter_is_created_and_renamed() {
        let platform = FakePlatform::with_snapshots(vec![
            vec![tap("{OTHER-1}", "Ethernet 2")],
            vec![tap("{OTHER-1}", "Ethernet 2"), tap("{AAAA-1}", "Ethernet 3")],
        ]);
        let installer = FakeInstaller::default();

        let outcome = install_cycle(&platform, &install_config(), &installer)
            .await
            .unwrap();

        assert_eq!(installer.runs.get(), 1);
        assert_eq!(
            platform.renames(),
            vec![("{AAAA-1}".to_string(), "Mullvad".to_string())]
        );
        match outcome {
            InstallOutcome::Created(adapter) => {
                assert_eq!(adapter.identifier, "{AAAA-1}");
                assert_eq!(adapter.alias, "Mullvad");
            }
            other @ InstallOutcome::AlreadyPresent(_) => panic!("Expected created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_rename_keeps_alias() {
        let platform =
            FakePlatform::with_snapshots(vec![vec![], vec![tap("{AAAA-1}", "Ethernet 3")]]);
        let config = config(&["install", "--no-rename", "--", "setup.exe"]);

        let outcome = install_cycle(&platform, &config, &FakeInstaller::default())
            .await
            .unwrap();

        assert!(platform.renames().is_empty());
        assert_eq!(
            outcome,
            InstallOutcome::Created(tap("{AAAA-1}", "Ethernet 3"))
        );
    }

    #[tokio::test]
    async fn adapter_already_named_is_not_renamed() {
        let platform = FakePlatform::with_snapshots(vec![vec![], vec![tap("{AAAA-1}", "Mullvad")]]);

        install_cycle(&platform, &install_config(), &FakeInstaller::default())
            .await
            .unwrap();

        assert!(platform.renames().is_empty());
    }

    #[tokio::test]
    async fn existing_product_adapter_skips_installer() {
        let platform = FakePlatform::with_snapshots(vec![vec![tap("{AAAA-1}", "mullvad")]]);
        let installer = FakeInstaller::default();

        let outcome = install_cycle(&platform, &install_config(), &installer)
            .await
            .unwrap();

        assert_eq!(installer.runs.get(), 0);
        assert_eq!(
            outcome,
            InstallOutcome::AlreadyPresent(tap("{AAAA-1}", "mullvad"))
        );
    }

    #[tokio::test]
    async fn installer_failure_stops_cycle() {
        let platform = FakePlatform::with_snapshots(vec![vec![], vec![tap("{AAAA-1}", "x")]]);
        let installer = FakeInstaller {
            fail: true,
            ..FakeInstaller::default()
        };

        let result = install_cycle(&platform, &install_config(), &installer).await;

        assert!(matches!(result, Err(RunError::MissingInstaller)));
        assert!(platform.renames().is_empty());
    }

    #[tokio::test]
    async fn multiple_new_adapters_are_rejected() {
        let platform = FakePlatform::with_snapshots(vec![
            vec![],
            vec![tap("{AAAA-1}", "Ethernet 3"), tap("{BBBB-2}", "Ethernet 4")],
        ]);

        let result = install_cycle(&platform, &install_config(), &FakeInstaller::default()).await;

        assert!(matches!(
            result,
            Err(RunError::Tracker(TrackerError::MultipleNewAdapters { .. }))
        ));
        assert!(platform.renames().is_empty());
    }

    #[tokio::test]
    async fn no_new_adapter_is_rejected() {
        let platform = FakePlatform::with_snapshots(vec![
            vec![tap("{OTHER-1}", "Ethernet 2")],
            vec![tap("{OTHER-1}", "Ethernet 2")],
        ]);

        let result = install_cycle(&platform, &install_config(), &FakeInstaller::default()).await;

        assert!(matches!(
            result,
            Err(RunError::Tracker(TrackerError::NoNewAdapter))
        ));
    }

    #[tokio::test]
    async fn rename_failure_is_reported() {
        let platform =
            FakePlatform::with_snapshots(vec![vec![], vec![tap("{AAAA-1}", "Ethernet 3")]])
                .failing_rename();

        let result = install_cycle(&platform, &install_config(), &FakeInstaller::default()).await;

        assert!(matches!(result, Err(RunError::Rename { .. })));
    }
}

mod install_outcome {
    use super::*;

    #[test]
    fn created_and_already_present_print_differently() {
        let adapter = tap("{AAAA-1}", "Mullvad");

        assert_eq!(
            InstallOutcome::Created(adapter.clone()).to_string(),
            "CREATED {AAAA-1}"
        );
        assert_eq!(
            InstallOutcome::AlreadyPresent(adapter).to_string(),
            "ALREADY_PRESENT {AAAA-1}"
        );
    }

    #[tokio::test]
    async fn existing_adapter_outcome_reports_it_was_not_installed() {
        let platform = FakePlatform::with_snapshots(vec![vec![tap("{AAAA-1}", "Mullvad")]]);

        let outcome = install_cycle(&platform, &install_config(), &FakeInstaller::default())
            .await
            .unwrap();

        assert!(outcome.to_string().starts_with("ALREADY_PRESENT"));
    }
}

mod list_output {
    use super::*;

    fn adapters() -> AdapterSet {
        [tap("{BBBB-2}", "Mullvad"), tap("{AAAA-1}", "Ethernet 3")]
            .into_iter()
            .collect()
    }

    #[test]
    fn text_marks_product_adapter() {
        let config = config(&["list"]);

        let output = render_list(&adapters(), &config.signature, false).unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  {AAAA-1}"));
        assert!(lines[1].starts_with("* {BBBB-2}"));
    }

    #[test]
    fn json_flags_product_adapter() {
        let config = config(&["list"]);

        let output = render_list(&adapters(), &config.signature, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["identifier"], "{AAAA-1}");
        assert_eq!(value[0]["product_owned"], false);
        assert_eq!(value[1]["alias"], "Mullvad");
        assert_eq!(value[1]["product_owned"], true);
    }

    #[test]
    fn empty_set_renders_empty() {
        let config = config(&["list"]);

        let output = render_list(&AdapterSet::new(), &config.signature, false).unwrap();

        assert!(output.is_empty());
    }
}
