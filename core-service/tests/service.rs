//! Service façade over mocked bridges

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{DirectoryListing, FileSystemAccess, ProcessOutput, ProcessRunner};
use core_runtime::config::FixerConfig;
use core_runtime::events::{CoreEvent, RunOutcome};
use core_service::{CoreDependencies, CoreError, CoreService};
use mockall::mock;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Fs {}

    #[async_trait]
    impl FileSystemAccess for Fs {
        async fn exists(&self, path: &Path) -> BridgeResult<bool>;
        async fn is_directory(&self, path: &Path) -> BridgeResult<bool>;
        async fn create_dir_all(&self, path: &Path) -> BridgeResult<()>;
        async fn copy_file(&self, from: &Path, to: &Path) -> BridgeResult<u64>;
        async fn list_directory(&self, path: &Path) -> BridgeResult<DirectoryListing>;
        async fn canonicalize(&self, path: &Path) -> BridgeResult<PathBuf>;
    }
}

mock! {
    pub Runner {}

    #[async_trait]
    impl ProcessRunner for Runner {
        async fn run(
            &self,
            program: &Path,
            args: &[OsString],
            timeout: Option<Duration>,
        ) -> BridgeResult<ProcessOutput>;
    }
}

fn which_output(exit_code: i32, stdout: &str) -> ProcessOutput {
    ProcessOutput {
        exit_code: Some(exit_code),
        stdout: stdout.to_string(),
        stderr: String::new(),
        elapsed: Duration::from_millis(1),
    }
}

fn config(scan_only: bool) -> FixerConfig {
    FixerConfig::builder()
        .input_root("/takeout")
        .output_root("/fixed")
        .scan_only(scan_only)
        .build()
        .unwrap()
}

#[test]
fn test_zero_event_buffer_rejected() {
    let deps = CoreDependencies::new(Arc::new(MockFs::new()), Arc::new(MockRunner::new()));
    let result = CoreService::new(deps, 0);
    assert!(matches!(result, Err(CoreError::InitializationFailed(_))));
}

#[tokio::test]
async fn test_cancel_when_idle() {
    let deps = CoreDependencies::new(Arc::new(MockFs::new()), Arc::new(MockRunner::new()));
    let service = CoreService::new(deps, 16).unwrap();
    assert!(!service.cancel().await);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_missing_tool_is_capability_error() {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|program, args, _| {
            program == Path::new("which") && args == [OsString::from("exiftool")].as_slice()
        })
        .times(1)
        .returning(|_, _, _| Ok(which_output(1, "")));

    let deps = CoreDependencies::new(Arc::new(MockFs::new()), Arc::new(runner));
    let service = CoreService::new(deps, 16).unwrap();

    let err = service.run(&config(false)).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::CapabilityMissing { ref capability, .. } if capability == "exiftool"
    ));
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_scan_only_run_over_mocked_tree() {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .times(1)
        .returning(|_, _, _| Ok(which_output(0, "/usr/bin/exiftool\n")));

    let mut fs = MockFs::new();
    fs.expect_is_directory()
        .withf(|path| path == Path::new("/takeout"))
        .returning(|_| Ok(true));
    fs.expect_canonicalize()
        .returning(|path| Ok(path.to_path_buf()));
    fs.expect_list_directory()
        .withf(|path| path == Path::new("/takeout"))
        .times(1)
        .returning(|_| {
            Ok(DirectoryListing {
                files: vec![
                    PathBuf::from("/takeout/a.jpg"),
                    PathBuf::from("/takeout/a.json"),
                    PathBuf::from("/takeout/notes.txt"),
                ],
                directories: Vec::new(),
            })
        });
    fs.expect_copy_file().never();

    let deps = CoreDependencies::new(Arc::new(fs), Arc::new(runner));
    let service = CoreService::new(deps, 64).unwrap();
    let mut events = service.subscribe();

    let report = service.run(&config(true)).await.unwrap();
    assert_eq!(report.outcome, RunOutcome::ScanOnly);
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.missing_sidecar, 0);
    assert_eq!(report.summary.unsupported.len(), 1);

    let all = events.drain();
    assert!(matches!(
        all.last(),
        Some(CoreEvent::Finished(f)) if f.outcome == RunOutcome::ScanOnly && f.message == "Done."
    ));
}

#[tokio::test]
async fn test_invalid_config_surfaces_pipeline_error() {
    let deps = CoreDependencies::new(Arc::new(MockFs::new()), Arc::new(MockRunner::new()));
    let service = CoreService::new(deps, 16).unwrap();

    let config = FixerConfig {
        output_root: PathBuf::from("/takeout/inside"),
        ..config(false)
    };
    let err = service.run(&config).await.unwrap_err();
    assert!(matches!(err, CoreError::Pipeline(_)));
}
