//! End-to-end tests for the command shell over real zip archives.
//!
//! Each test builds a fresh archive in a temporary directory with
//! `zip::ZipWriter`, opens it the way the binary does and drives the shell
//! with raw command lines.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use zipsh::archive::ZipFs;
use zipsh::shell::commands::{Command, CommandError, Reply};
use zipsh::shell::{Outcome, Session, Shell, ShellError};

/// Archive record for fixtures
enum Fixture<'a> {
    Dir(&'a str),
    Leaf(&'a str, &'a str),
}

use Fixture::{Dir, Leaf};

fn build_archive(dir: &Path, entries: &[Fixture<'_>]) -> PathBuf {
    let path = dir.join("fs.zip");
    let mut writer = ZipWriter::new(File::create(&path).expect("Failed to create archive"));
    let options = SimpleFileOptions::default();

    for entry in entries {
        match entry {
            Dir(name) => writer
                .add_directory(*name, options)
                .expect("Failed to add directory"),
            Leaf(name, contents) => {
                writer.start_file(*name, options).expect("Failed to start file");
                writer
                    .write_all(contents.as_bytes())
                    .expect("Failed to write file");
            }
        }
    }

    writer.finish().expect("Failed to finish archive");
    path
}

/// Standard fixture: a couple of directories, nested files, one empty dir
fn create_test_shell() -> (TempDir, PathBuf, Shell) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let archive = build_archive(
        tmp.path(),
        &[
            Dir("dir1/"),
            Leaf("file1.txt", "This is a test file."),
            Dir("dir2/"),
            Leaf("dir2/b.txt", "b"),
            Leaf("dir2/a.txt", "a"),
            Dir("empty/"),
        ],
    );
    let shell = open_shell(&archive);
    (tmp, archive, shell)
}

fn open_shell(archive: &Path) -> Shell {
    let fs = ZipFs::open(archive).expect("Failed to open archive");
    Shell::new(Session::new(fs)).expect("Failed to build shell")
}

fn output(text: &str) -> Outcome {
    Outcome::Output(text.to_string())
}

fn failure(text: &str) -> Outcome {
    Outcome::Failure(text.to_string())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn test_blank_line_does_nothing() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute(""), Outcome::Nothing);
    assert_eq!(shell.execute("   \t "), Outcome::Nothing);
}

#[test]
fn test_unknown_command() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(
        shell.execute("frobnicate now"),
        failure("emulator: frobnicate: command not found")
    );
}

#[test]
fn test_extra_whitespace_between_tokens() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("  cd    dir2  "), Outcome::Nothing);
    assert_eq!(shell.execute("pwd"), output("/dir2"));
}

#[test]
fn test_help_lists_commands() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    let Outcome::Output(text) = shell.execute("help") else {
        panic!("help should produce output");
    };
    for name in ["ls", "cd", "pwd", "rmdir", "exit", "help"] {
        assert!(
            text.lines().any(|l| l.trim_start().starts_with(name)),
            "help is missing {name}: {text}"
        );
    }
}

struct FakeCommand(&'static str);

impl Command for FakeCommand {
    fn name(&self) -> &str {
        self.0
    }

    fn usage(&self) -> &str {
        "fake"
    }

    fn execute(&self, _session: &mut Session, _args: &[String]) -> Result<Reply, CommandError> {
        Ok(Reply::Silent)
    }
}

#[test]
fn test_registry_rejects_duplicates() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = build_archive(tmp.path(), &[Dir("d/")]);
    let session = Session::new(ZipFs::open(&archive).unwrap());

    let commands: Vec<Arc<dyn Command>> =
        vec![Arc::new(FakeCommand("ls")), Arc::new(FakeCommand("ls"))];
    let result = Shell::with_commands(session, commands);
    assert!(matches!(result, Err(ShellError::DuplicateCommand(name)) if name == "ls"));
}

#[test]
fn test_registry_rejects_bad_names() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = build_archive(tmp.path(), &[Dir("d/")]);

    for bad in ["", "two words"] {
        let session = Session::new(ZipFs::open(&archive).unwrap());
        let commands: Vec<Arc<dyn Command>> = vec![Arc::new(FakeCommand(bad))];
        let result = Shell::with_commands(session, commands);
        assert!(matches!(result, Err(ShellError::InvalidCommandName(_))));
    }

    let session = Session::new(ZipFs::open(&archive).unwrap());
    let commands: Vec<Arc<dyn Command>> = vec![Arc::new(FakeCommand("help"))];
    let result = Shell::with_commands(session, commands);
    assert!(matches!(result, Err(ShellError::DuplicateCommand(_))));
}

// ---------------------------------------------------------------------------
// pwd / cd
// ---------------------------------------------------------------------------

#[test]
fn test_pwd_starts_at_root() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("pwd"), output("/"));
}

#[test]
fn test_cd_valid_directory() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("cd dir1"), Outcome::Nothing);
    assert_eq!(shell.execute("pwd"), output("/dir1"));
    assert_eq!(shell.session().cwd().to_string(), "/dir1");
}

#[test]
fn test_cd_relative_and_parent() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    shell.execute("cd /dir2");
    assert_eq!(shell.execute("cd ../dir1/."), Outcome::Nothing);
    assert_eq!(shell.execute("pwd"), output("/dir1"));
    assert_eq!(shell.execute("cd .."), Outcome::Nothing);
    assert_eq!(shell.execute("pwd"), output("/"));
    assert_eq!(shell.execute("cd .."), Outcome::Nothing);
    assert_eq!(shell.execute("pwd"), output("/"));
}

#[test]
fn test_cd_invalid_directory_keeps_cwd() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    shell.execute("cd dir2");
    assert_eq!(
        shell.execute("cd /nonexistent"),
        failure("cd: /nonexistent: No such file or directory")
    );
    assert_eq!(shell.execute("pwd"), output("/dir2"));
}

#[test]
fn test_cd_reports_resolved_path() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    shell.execute("cd dir2");
    assert_eq!(
        shell.execute("cd missing"),
        failure("cd: /dir2/missing: No such file or directory")
    );
}

#[test]
fn test_cd_not_a_directory() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(
        shell.execute("cd file1.txt"),
        failure("cd: /file1.txt: Not a directory")
    );
    assert_eq!(shell.execute("pwd"), output("/"));
}

#[test]
fn test_cd_missing_operand() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("cd"), failure("cd: missing operand"));
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

#[test]
fn test_ls_default_lists_cwd_in_archive_order() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("ls"), output("dir1\nfile1.txt\ndir2\nempty"));
}

#[test]
fn test_ls_with_argument_keeps_insertion_order() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("ls /dir2"), output("b.txt\na.txt"));
}

#[test]
fn test_ls_empty_directory() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("ls empty"), output(""));
}

#[test]
fn test_ls_file_shows_its_name() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    shell.execute("cd dir2");
    assert_eq!(shell.execute("ls a.txt"), output("a.txt"));
    assert_eq!(shell.execute("ls /file1.txt"), output("file1.txt"));
}

#[test]
fn test_ls_no_such_directory() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(
        shell.execute("ls /nonexistent"),
        failure("ls: /nonexistent: No such file or directory")
    );
    assert_eq!(
        shell.execute("ls nope/../nope"),
        failure("ls: nope/../nope: No such file or directory")
    );
}

#[test]
fn test_ls_long_format() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    let Outcome::Output(text) = shell.execute("ls -l") else {
        panic!("ls -l should produce output");
    };
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2 + 4);
    assert!(lines[2].starts_with("dir1/"));
    assert!(lines[3].starts_with("file1.txt"));
    assert!(lines[3].ends_with("20 B"));
}

#[test]
fn test_ls_invalid_option() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("ls -z"), failure("ls: invalid option -- 'z'"));
}

#[test]
fn test_implied_directories_are_navigable() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = build_archive(
        tmp.path(),
        &[Leaf("top.txt", "t"), Leaf("src/lib/mod.rs", "m")],
    );
    let mut shell = open_shell(&archive);

    assert_eq!(shell.execute("ls"), output("top.txt\nsrc"));
    assert_eq!(shell.execute("cd src/lib"), Outcome::Nothing);
    assert_eq!(shell.execute("ls"), output("mod.rs"));
    assert_eq!(
        shell.execute("rmdir /src"),
        failure("rmdir: failed to remove '/src': Directory not empty")
    );
}

// ---------------------------------------------------------------------------
// rmdir
// ---------------------------------------------------------------------------

#[test]
fn test_rmdir_empty_directory() {
    let (_tmp, archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("rmdir empty"), Outcome::Nothing);
    assert_eq!(
        shell.execute("ls empty"),
        failure("ls: empty: No such file or directory")
    );
    assert_eq!(shell.execute("ls"), output("dir1\nfile1.txt\ndir2"));

    // The removal is written back to the archive file
    assert_eq!(shell.execute("exit"), Outcome::Exit);
    let mut reopened = open_shell(&archive);
    assert_eq!(reopened.execute("ls"), output("dir1\nfile1.txt\ndir2"));
    assert_eq!(reopened.execute("ls dir2"), output("b.txt\na.txt"));
}

#[test]
fn test_rmdir_directory_not_empty() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(
        shell.execute("rmdir dir2"),
        failure("rmdir: failed to remove 'dir2': Directory not empty")
    );
    assert_eq!(shell.execute("ls dir2"), output("b.txt\na.txt"));
}

#[test]
fn test_rmdir_no_such_directory() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(
        shell.execute("rmdir /nonexistent"),
        failure("rmdir: failed to remove '/nonexistent': No such file or directory")
    );
}

#[test]
fn test_rmdir_twice_is_an_error() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("rmdir /dir1"), Outcome::Nothing);
    assert_eq!(
        shell.execute("rmdir /dir1"),
        failure("rmdir: failed to remove '/dir1': No such file or directory")
    );
}

#[test]
fn test_rmdir_file() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(
        shell.execute("rmdir file1.txt"),
        failure("rmdir: failed to remove 'file1.txt': Not a directory")
    );
}

#[test]
fn test_rmdir_root_refused() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(
        shell.execute("rmdir /"),
        failure("rmdir: failed to remove '/': Device or resource busy")
    );
}

#[test]
fn test_rmdir_working_directory_refused() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("cd empty"), Outcome::Nothing);
    assert_eq!(
        shell.execute("rmdir /empty"),
        failure("rmdir: failed to remove '/empty': Device or resource busy")
    );
    assert_eq!(
        shell.execute("rmdir ."),
        failure("rmdir: failed to remove '.': Device or resource busy")
    );
    assert_eq!(shell.execute("ls"), output(""));

    assert_eq!(shell.execute("cd .."), Outcome::Nothing);
    assert_eq!(shell.execute("rmdir empty"), Outcome::Nothing);
}

#[test]
fn test_rmdir_leaves_file_with_same_name() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = build_archive(tmp.path(), &[Dir("x/"), Leaf("x", "data")]);
    let mut shell = open_shell(&archive);

    assert_eq!(shell.execute("rmdir x"), Outcome::Nothing);
    assert_eq!(shell.execute("cd x"), failure("cd: /x: Not a directory"));
    assert_eq!(shell.execute("exit"), Outcome::Exit);

    let mut reopened = open_shell(&archive);
    assert_eq!(reopened.execute("ls"), output("x"));
    assert_eq!(
        reopened.execute("rmdir x"),
        failure("rmdir: failed to remove 'x': Not a directory")
    );
}

#[test]
fn test_rmdir_missing_operand() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("rmdir"), failure("rmdir: missing operand"));
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

#[test]
fn test_exit_closes_archive_and_stops_processing() {
    let (_tmp, _archive, mut shell) = create_test_shell();
    assert_eq!(shell.execute("exit"), Outcome::Exit);
    assert!(shell.is_finished());
    assert!(shell.session().is_closed());
    assert!(!shell.session().fs().is_open());

    // Nothing runs after exit
    assert_eq!(shell.execute("rmdir empty"), Outcome::Exit);
    assert_eq!(shell.execute("pwd"), Outcome::Exit);
}

// ---------------------------------------------------------------------------
// Startup script
// ---------------------------------------------------------------------------

#[test]
fn test_startup_script_runs_in_order() {
    let (tmp, _archive, mut shell) = create_test_shell();
    let script = tmp.path().join("start.txt");
    std::fs::write(&script, "# setup\ncd dir2\n\npwd\nls\nbogus\n").unwrap();

    let mut seen = Vec::new();
    let exited = shell
        .run_script(&script, |outcome| seen.push(outcome.clone()))
        .unwrap();

    assert!(!exited);
    assert_eq!(
        seen,
        vec![
            Outcome::Nothing,
            Outcome::Nothing,
            output("/dir2"),
            output("b.txt\na.txt"),
            failure("emulator: bogus: command not found"),
        ]
    );
}

#[test]
fn test_startup_script_stops_at_exit() {
    let (tmp, _archive, mut shell) = create_test_shell();
    let script = tmp.path().join("start.txt");
    std::fs::write(&script, "pwd\nexit\nrmdir empty\n").unwrap();

    let mut seen = Vec::new();
    let exited = shell
        .run_script(&script, |outcome| seen.push(outcome.clone()))
        .unwrap();

    assert!(exited);
    assert_eq!(seen, vec![output("/"), Outcome::Exit]);
    assert!(shell.is_finished());
}

#[test]
fn test_missing_startup_script_is_reported() {
    let (tmp, _archive, mut shell) = create_test_shell();
    let err = shell
        .run_script(&tmp.path().join("absent.txt"), |_| {})
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

    // The session is unaffected
    assert_eq!(shell.execute("pwd"), output("/"));
}
