//! Scanner tests against real directory trees

use bridge_desktop::TokioFileSystem;
use core_runtime::events::{CoreEvent, EventBus, EventStream, ProgressEvent, ProgressKind};
use core_runtime::progress::{ProgressReporter, RunCounters, RunId};
use core_scanner::{MediaKind, ScanError, TreeScanner};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

struct Harness {
    input: TempDir,
    output: TempDir,
    scanner: TreeScanner,
    reporter: ProgressReporter,
    events: EventStream,
}

impl Harness {
    fn new() -> Self {
        let bus = EventBus::new(1024);
        let events = EventStream::new(bus.subscribe());
        Self {
            input: TempDir::new().unwrap(),
            output: TempDir::new().unwrap(),
            scanner: TreeScanner::new(Arc::new(TokioFileSystem::new())),
            reporter: ProgressReporter::new(bus, RunId::new(), Arc::new(RunCounters::new())),
            events,
        }
    }

    fn touch(&self, relative: &str) {
        let path = self.input.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn progress(&mut self) -> Vec<ProgressEvent> {
        self.events
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                CoreEvent::Progress(p) => Some(p),
                CoreEvent::Finished(_) => None,
            })
            .collect()
    }
}

fn file_name(path: &Path) -> &str {
    path.file_name().unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_end_to_end_matching() {
    let mut h = Harness::new();
    for name in ["a.jpg", "a.json", "b-edited.jpg", "b.json", "c.mp4"] {
        h.touch(name);
    }

    let outcome = h
        .scanner
        .scan(
            h.input.path(),
            h.output.path(),
            &h.reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let pairs: Vec<(&str, Option<&str>)> = outcome
        .items
        .iter()
        .map(|item| {
            (
                file_name(&item.source_path),
                item.sidecar_path.as_deref().map(file_name),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("a.jpg", Some("a.json")),
            ("b-edited.jpg", Some("b.json")),
            ("c.mp4", None),
        ]
    );
    assert_eq!(outcome.items[2].kind, MediaKind::Video);

    assert_eq!(outcome.summary.total, 3);
    assert_eq!(outcome.summary.missing_sidecar, 1);
    assert_eq!(outcome.summary.photos, 2);
    assert_eq!(outcome.summary.videos, 1);

    let events = h.progress();
    let summary = events
        .iter()
        .find(|e| e.kind == ProgressKind::Summary)
        .unwrap();
    assert_eq!(
        summary.message,
        "3 files (1 json files missing, 2 photos, 1 videos)."
    );
}

#[tokio::test]
async fn test_targets_mirror_sources() {
    let h = Harness::new();
    h.touch("Photos from 2019/IMG_1.jpg");
    h.touch("Photos from 2019/IMG_1.jpg.json");
    h.touch("Albums/Trip/nested/clip.MOV");

    let outcome = h
        .scanner
        .scan(
            h.input.path(),
            h.output.path(),
            &h.reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.items.len(), 2);
    for item in &outcome.items {
        let source_rel = item.source_path.strip_prefix(h.input.path()).unwrap();
        let target_rel = item.target_path.strip_prefix(h.output.path()).unwrap();
        assert_eq!(source_rel, target_rel);
    }
}

#[tokio::test]
async fn test_preorder_is_reproducible() {
    let h = Harness::new();
    h.touch("root.jpg");
    h.touch("b/two.jpg");
    h.touch("a/one.jpg");
    h.touch("a/z/deep.jpg");

    let scan = || async {
        h.scanner
            .scan(
                h.input.path(),
                h.output.path(),
                &h.reporter,
                &CancellationToken::new(),
            )
            .await
            .unwrap()
    };
    let first = scan().await;
    let second = scan().await;

    let order: Vec<&str> = first
        .items
        .iter()
        .map(|item| file_name(&item.source_path))
        .collect();
    assert_eq!(order, vec!["root.jpg", "one.jpg", "deep.jpg", "two.jpg"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unsupported_file_reported_once() {
    let mut h = Harness::new();
    h.touch("d.txt");
    h.touch("e.jpg");

    let outcome = h
        .scanner
        .scan(
            h.input.path(),
            h.output.path(),
            &h.reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.summary.unsupported.len(), 1);
    assert_eq!(outcome.summary.unsupported[0].extension, "txt");

    let unsupported: Vec<ProgressEvent> = h
        .progress()
        .into_iter()
        .filter(|e| e.kind == ProgressKind::Unsupported)
        .collect();
    assert_eq!(unsupported.len(), 1);
    assert!(!unsupported[0].is_error);
    assert!(unsupported[0].message.contains("d.txt"));
    assert!(unsupported[0].message.contains(".txt"));
}

#[tokio::test]
async fn test_directory_events_and_counters() {
    let mut h = Harness::new();
    h.touch("x.jpg");
    h.touch("sub/y.jpg");
    h.touch("sub/z.png");

    h.scanner
        .scan(
            h.input.path(),
            h.output.path(),
            &h.reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let messages: Vec<String> = h.progress().into_iter().map(|e| e.message).collect();
    let sub = h.input.path().join("sub");
    assert_eq!(messages[0], "Scanning input folder...");
    assert!(messages.contains(&format!("Scanning {}...", h.input.path().display())));
    assert!(messages.contains(&format!("Found 1 in {}...", h.input.path().display())));
    assert!(messages.contains(&format!("Found 2 in {}...", sub.display())));

    assert_eq!(h.reporter.counters().scan.total(), 2);
    assert_eq!(h.reporter.counters().scan.done(), 2);
}

#[tokio::test]
async fn test_missing_input_root() {
    let mut h = Harness::new();
    let missing = h.input.path().join("does-not-exist");

    let err = h
        .scanner
        .scan(
            &missing,
            h.output.path(),
            &h.reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::InputRootMissing(path) if path == missing));
    let events = h.progress();
    assert!(events
        .iter()
        .any(|e| e.is_error && e.message == "Input folder does not exist."));
}

#[tokio::test]
async fn test_input_root_must_be_directory() {
    let h = Harness::new();
    h.touch("file.jpg");

    let err = h
        .scanner
        .scan(
            &h.input.path().join("file.jpg"),
            h.output.path(),
            &h.reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::InputRootMissing(_)));
}

#[tokio::test]
async fn test_cancelled_before_walk() {
    let h = Harness::new();
    h.touch("a.jpg");

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = h
        .scanner
        .scan(h.input.path(), h.output.path(), &h.reporter, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::Cancelled));
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_utf8_names_keep_their_bytes() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let h = Harness::new();
    let folder = h.input.path().join(OsStr::from_bytes(b"Fotos \xff 2019"));
    fs::create_dir(&folder).unwrap();
    let photo = folder.join(OsStr::from_bytes(b"\xff.jpg"));
    let sidecar = folder.join(OsStr::from_bytes(b"\xff.json"));
    fs::write(&photo, b"x").unwrap();
    fs::write(&sidecar, b"{}").unwrap();

    let outcome = h
        .scanner
        .scan(
            h.input.path(),
            h.output.path(),
            &h.reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.items.len(), 1);
    let item = &outcome.items[0];
    assert_eq!(item.source_path, photo);
    assert_eq!(item.sidecar_path.as_deref(), Some(sidecar.as_path()));
    assert_eq!(
        item.target_path,
        h.output
            .path()
            .join(OsStr::from_bytes(b"Fotos \xff 2019"))
            .join(OsStr::from_bytes(b"\xff.jpg"))
    );
    assert!(outcome.summary.unsupported.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_link_back_to_root_is_walked_once() {
    let mut h = Harness::new();
    h.touch("a.jpg");
    h.touch("sub/b.jpg");
    std::os::unix::fs::symlink(h.input.path(), h.input.path().join("sub/loop")).unwrap();

    let outcome = h
        .scanner
        .scan(
            h.input.path(),
            h.output.path(),
            &h.reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let names: Vec<&str> = outcome
        .items
        .iter()
        .map(|item| file_name(&item.source_path))
        .collect();
    assert_eq!(names, vec!["a.jpg", "b.jpg"]);

    let loop_dir = h.input.path().join("sub/loop");
    let messages: Vec<String> = h.progress().into_iter().map(|e| e.message).collect();
    assert!(messages.contains(&format!("Skipped {}, already scanned.", loop_dir.display())));
    assert_eq!(h.reporter.counters().scan.total(), 3);
    assert_eq!(h.reporter.counters().scan.done(), 3);
}
