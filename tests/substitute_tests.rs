//! Integration tests for tree-wide `replace` / `reverse` runs.

use std::fs;
use std::path::Path;

use uusecret::substitute::{run, Direction, RunOptions};
use uusecret::vault::{SecretRecord, SecretStore};
use tempfile::TempDir;

fn store() -> SecretStore {
    let mut store = SecretStore::new();
    store.insert("id1", SecretRecord::bare("sk-ABC"));
    store.insert("id2", SecretRecord::bare("hunter2"));
    store
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

#[test]
fn replace_then_reverse_restores_tree() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, ".env", "API=sk-ABC\nPASS=hunter2\n");
    write(root, "config/app.yaml", "key: sk-ABC\nother: sk-ABC\n");
    write(root, "README.md", "nothing to see\n");

    let report = run(root, &store(), &RunOptions::new(Direction::Forward)).unwrap();
    assert_eq!(report.files_visited, 3);
    assert_eq!(report.changed.len(), 2);
    assert_eq!(report.total_replacements(), 4);
    assert_eq!(
        read(root, ".env"),
        "API=<!secret_id1!>\nPASS=<!secret_id2!>\n"
    );
    assert_eq!(
        read(root, "config/app.yaml"),
        "key: <!secret_id1!>\nother: <!secret_id1!>\n"
    );

    let report = run(root, &store(), &RunOptions::new(Direction::Reverse)).unwrap();
    assert_eq!(report.total_replacements(), 4);
    assert_eq!(read(root, ".env"), "API=sk-ABC\nPASS=hunter2\n");
    assert_eq!(read(root, "config/app.yaml"), "key: sk-ABC\nother: sk-ABC\n");
    assert_eq!(read(root, "README.md"), "nothing to see\n");
}

#[test]
fn replace_twice_is_a_no_op_even_when_secrets_occur_in_tokens() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let mut store = SecretStore::new();
    let long = store.add("my-long-value", None).unwrap();
    store.insert("db password", SecretRecord::bare("secret"));
    // A fragment of the generated id is itself a secret.
    store.insert("frag", SecretRecord::bare(&long[..8]));
    write(root, "app.env", "v=my-long-value w=secret\n");

    let first = run(root, &store, &RunOptions::new(Direction::Forward)).unwrap();
    assert_eq!(first.total_replacements(), 2);
    let replaced = read(root, "app.env");

    let second = run(root, &store, &RunOptions::new(Direction::Forward)).unwrap();
    assert!(second.changed.is_empty());
    assert_eq!(read(root, "app.env"), replaced);

    run(root, &store, &RunOptions::new(Direction::Reverse)).unwrap();
    assert_eq!(read(root, "app.env"), "v=my-long-value w=secret\n");
}

#[test]
fn changed_files_are_reported_in_walk_order() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "b.txt", "sk-ABC");
    write(root, "a/z.txt", "hunter2");

    let report = run(root, &store(), &RunOptions::new(Direction::Forward)).unwrap();
    let paths: Vec<_> = report
        .changed
        .iter()
        .map(|c| c.path.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(paths, vec![Path::new("a/z.txt"), Path::new("b.txt")]);
}

#[test]
fn empty_directory_is_a_successful_no_op() {
    let dir = TempDir::new().unwrap();
    let report = run(dir.path(), &store(), &RunOptions::new(Direction::Forward)).unwrap();
    assert_eq!(report.files_visited, 0);
    assert!(report.changed.is_empty());
}

#[test]
fn single_file_root() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "only.env", "X=sk-ABC");

    let file = dir.path().join("only.env");
    let report = run(&file, &store(), &RunOptions::new(Direction::Forward)).unwrap();
    assert_eq!(report.files_visited, 1);
    assert_eq!(read(dir.path(), "only.env"), "X=<!secret_id1!>");
}

#[test]
fn dry_run_leaves_files_untouched() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.env", "X=sk-ABC");

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::new(Direction::Forward)
    };
    let report = run(dir.path(), &store(), &options).unwrap();
    assert_eq!(report.total_replacements(), 1);
    assert_eq!(read(dir.path(), "a.env"), "X=sk-ABC");
}

#[test]
fn binary_files_are_skipped_by_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, b's', b'k']).unwrap();
    write(dir.path(), "text.env", "X=sk-ABC");

    let report = run(dir.path(), &store(), &RunOptions::new(Direction::Forward)).unwrap();
    assert_eq!(report.skipped, vec![dir.path().join("blob.bin")]);
    assert_eq!(report.changed.len(), 1);
    assert_eq!(
        fs::read(dir.path().join("blob.bin")).unwrap(),
        vec![0xff, 0xfe, b's', b'k']
    );
}

#[test]
fn binary_files_abort_when_skipping_disabled() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blob.bin"), [0xff, 0xfe]).unwrap();

    let options = RunOptions {
        skip_binary: false,
        ..RunOptions::new(Direction::Forward)
    };
    let err = run(dir.path(), &store(), &options).unwrap_err();
    assert!(matches!(err, uusecret::errors::SecretManagerError::Encoding(_)));
}

#[test]
fn excluded_files_are_not_touched() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "secrets.json", "sk-ABC");
    write(dir.path(), "app.env", "sk-ABC");

    let options = RunOptions {
        exclude: vec![dir.path().join("secrets.json")],
        ..RunOptions::new(Direction::Forward)
    };
    let report = run(dir.path(), &store(), &options).unwrap();
    assert_eq!(report.files_visited, 1);
    assert_eq!(read(dir.path(), "secrets.json"), "sk-ABC");
    assert_eq!(read(dir.path(), "app.env"), "<!secret_id1!>");
}

#[test]
fn unknown_placeholders_are_reported_and_kept() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.env", "X=<!secret_gone!> Y=<!secret_id2!>");

    let report = run(dir.path(), &store(), &RunOptions::new(Direction::Reverse)).unwrap();
    assert_eq!(
        report.unknown_placeholders,
        vec![(dir.path().join("a.env"), "gone".to_string())]
    );
    assert_eq!(read(dir.path(), "a.env"), "X=<!secret_gone!> Y=hunter2");
}

#[test]
fn missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(run(&missing, &store(), &RunOptions::new(Direction::Forward)).is_err());
}
