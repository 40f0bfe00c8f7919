//! Integration tests for dir-usage
//!
//! These run the collector against real processes: a stand-in script that
//! records its arguments and prints canned output, and the system `du`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use dir_usage::config::CollectOptions;
use dir_usage::runner::{CapturedOutput, ProcessRunner};
use dir_usage::{UsageCollector, UsageEntry, UsageError, parse_output};

/// Helper function to create a file with specified content
fn create_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Runner that always fails to read its streams
struct BrokenPipeRunner;

impl ProcessRunner for BrokenPipeRunner {
    fn run(&self, _program: &str, _args: &[OsString]) -> dir_usage::error::Result<CapturedOutput> {
        Err(UsageError::Stream {
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"),
        })
    }
}

#[test]
fn test_stream_error_propagates() {
    let collector = UsageCollector::new(BrokenPipeRunner);
    let result = collector.collect(Some(Path::new("/anything")), None);

    assert!(matches!(result, Err(UsageError::Stream { .. })));
}

#[test]
fn test_missing_program_is_spawn_error() {
    let options = CollectOptions {
        program: "dir-usage-no-such-program".to_string(),
        depth: None,
        shell: false,
    };
    let collector = UsageCollector::from_options(&options);

    let result = collector.collect(Some(Path::new("/")), None);
    assert!(matches!(result, Err(UsageError::Spawn { .. })));
}

#[test]
fn test_result_never_longer_than_record_count() {
    let stdout = "3\t/a/b/c\x002\t/a/b\x009\t/a\x001\t/z\x00\x00";
    let records = stdout.split('\0').count();
    let entries = parse_output(stdout);

    assert!(entries.len() <= records);
    assert_eq!(
        entries,
        vec![
            UsageEntry::new("/a/b/c", Some(3)),
            UsageEntry::new("/z", Some(1))
        ]
    );
}

#[cfg(unix)]
mod unix {
    use super::*;
    use dir_usage::collector::SystemRunner;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable script that records its arguments in `args.txt`
    /// next to itself and prints `body` to stdout.
    fn fake_du(dir: &Path, body: &str) -> PathBuf {
        let script = dir.join("fake-du");
        let content = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args.txt\"\n{body}\n"
        );
        create_file(&script, &content);
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        script
    }

    fn recorded_args(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("args.txt"))
            .expect("Failed to read recorded arguments")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Through the shell the script is handed to `sh`, so the program string
    /// carries an argument of its own.
    fn collector_for(script: &Path, shell: bool) -> UsageCollector<SystemRunner> {
        let program = if shell {
            format!("sh {}", script.display())
        } else {
            script.display().to_string()
        };

        UsageCollector::from_options(&CollectOptions {
            program,
            depth: None,
            shell,
        })
    }

    #[test]
    fn test_fake_tool_through_shell() {
        let tmp = TempDir::new().unwrap();
        let script = fake_du(
            tmp.path(),
            "printf '4\\t/x/y\\0'; printf '2\\t/x\\0'; printf '1\\t/z\\0'",
        );
        let collector = collector_for(&script, true).with_working_dir(tmp.path());

        let entries = collector
            .collect(Some(Path::new("sub dir/it's")), Some(1))
            .unwrap();

        assert_eq!(
            entries,
            vec![UsageEntry::new("/x/y", Some(4)), UsageEntry::new("/z", Some(1))]
        );

        let expected_path = tmp.path().join("sub dir").join("it's");
        assert_eq!(
            recorded_args(tmp.path()),
            vec![
                "-0".to_string(),
                "-d".to_string(),
                "1".to_string(),
                expected_path.display().to_string()
            ]
        );
    }

    #[test]
    fn test_fake_tool_without_shell() {
        let tmp = TempDir::new().unwrap();
        let script = fake_du(tmp.path(), "printf '7\\t/only\\0'");
        let collector = collector_for(&script, false);

        let entries = collector.collect(Some(Path::new("/data")), None).unwrap();

        assert_eq!(entries, vec![UsageEntry::new("/only", Some(7))]);
        assert_eq!(recorded_args(tmp.path()), vec!["-0", "/data"]);
    }

    #[test]
    fn test_fake_tool_stderr_rejects_whole_result() {
        let tmp = TempDir::new().unwrap();
        let script = fake_du(
            tmp.path(),
            "printf '4\\t/root/a\\0'; printf \"du: cannot read directory '/root': Permission denied\\n\" >&2",
        );
        let collector = collector_for(&script, true);

        let err = collector
            .collect(Some(Path::new("/root")), None)
            .unwrap_err();

        assert!(matches!(err, UsageError::Invocation { .. }));
        assert_eq!(
            err.to_string(),
            "du: cannot read directory '/root': Permission denied\n"
        );
    }

    #[test]
    fn test_collect_many_against_fake_tool() {
        let tmp = TempDir::new().unwrap();
        let script = fake_du(tmp.path(), "printf '1\\t/p\\0'");
        let collector = collector_for(&script, true);
        let paths = vec![PathBuf::from("/one"), PathBuf::from("/two"), PathBuf::from("/three")];

        let results = collector.collect_many(&paths, Some(0));

        let roots: Vec<_> = results.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(roots, paths);
        for (_, result) in results {
            assert_eq!(result.unwrap(), vec![UsageEntry::new("/p", Some(1))]);
        }
    }

    #[cfg(target_os = "linux")]
    mod real_du {
        use super::*;

        #[test]
        fn test_real_du_drops_intermediate_directories() {
            let tmp = TempDir::new().unwrap();
            create_file(&tmp.path().join("a/b/file.txt"), &"x".repeat(10_000));

            let collector = UsageCollector::from_options(&CollectOptions::default());
            let entries = collector.collect(Some(tmp.path()), None).unwrap();

            let deepest = tmp.path().join("a").join("b");
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].path, deepest.display().to_string());
            assert!(entries[0].size.is_some());
        }

        #[test]
        fn test_real_du_depth_zero_reports_only_root() {
            let tmp = TempDir::new().unwrap();
            create_file(&tmp.path().join("a/b/file.txt"), "content");

            let collector = UsageCollector::from_options(&CollectOptions::default());
            let entries = collector.collect(Some(tmp.path()), Some(0)).unwrap();

            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].path, tmp.path().display().to_string());
        }

        #[test]
        fn test_real_du_handles_spaces_in_paths() {
            let tmp = TempDir::new().unwrap();
            create_file(&tmp.path().join("with space/inner/f"), "content");

            let collector = UsageCollector::from_options(&CollectOptions::default());
            let entries = collector
                .collect(Some(&tmp.path().join("with space")), None)
                .unwrap();

            let inner = tmp.path().join("with space").join("inner");
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].path, inner.display().to_string());
        }

        #[test]
        fn test_real_du_non_utf8_path_through_shell() {
            use std::ffi::OsStr;
            use std::os::unix::ffi::OsStrExt;

            let tmp = TempDir::new().unwrap();
            let root = tmp.path().join(OsStr::from_bytes(b"caf\xe9"));
            create_file(&root.join("f"), "content");

            let collector = UsageCollector::from_options(&CollectOptions::default());
            let entries = collector.collect(Some(&root), None).unwrap();

            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].path, root.display().to_string());
            assert!(entries[0].size.is_some());
        }

        #[test]
        fn test_real_du_missing_path_is_invocation_error() {
            let tmp = TempDir::new().unwrap();

            let collector = UsageCollector::from_options(&CollectOptions::default());
            let err = collector
                .collect(Some(&tmp.path().join("does-not-exist")), None)
                .unwrap_err();

            assert!(matches!(err, UsageError::Invocation { .. }));
            assert!(err.to_string().contains("does-not-exist"));
        }
    }
}
