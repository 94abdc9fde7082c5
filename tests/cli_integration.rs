//! Integration tests for the uu-secret-manager CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`. When
//! stdin is not a terminal the password is read as one line from stdin,
//! so every test pipes it in.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "testpassword\n";

/// Helper: get a Command pointing at the binary, run inside `dir`.
fn cli(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("uu-secret-manager").expect("binary should exist");
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

/// Helper: add a secret to `secrets.json` in `dir`.
fn add_secret(dir: &TempDir, secret: &str) {
    cli(dir)
        .args(["add", secret])
        .write_stdin(PASSWORD)
        .assert()
        .success();
}

#[test]
fn help_flag_shows_usage() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage secrets in files and folders"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("replace"))
        .stdout(predicate::str::contains("reverse"))
        .stdout(predicate::str::contains("--secrets"));
}

#[test]
fn version_flag_shows_version() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn add_creates_vault_and_prints_placeholder() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["add", "sk-ABC", "--description", "stripe"])
        .write_stdin(PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("Secret added with placeholder: <!secret_"));

    dir.child("secrets.json")
        .assert(predicate::str::starts_with("$ANSIBLE_VAULT;1.1;AES256\n"))
        .assert(predicate::str::contains("sk-ABC").not());
}

#[test]
fn add_rejects_short_password_for_new_vault() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["add", "sk-ABC"])
        .write_stdin("short\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    dir.child("secrets.json").assert(predicate::path::missing());
}

#[test]
fn same_literal_added_twice_is_listed_twice() {
    let dir = TempDir::new().unwrap();

    let placeholders: Vec<String> = (0..2)
        .map(|_| {
            let out = cli(&dir)
                .args(["add", "first-secret"])
                .write_stdin(PASSWORD)
                .assert()
                .success()
                .get_output()
                .stdout
                .clone();
            let stdout = String::from_utf8(out).unwrap();
            let start = stdout.find("<!secret_").expect("placeholder printed");
            let end = start + stdout[start..].find("!>").expect("placeholder end") + 2;
            stdout[start..end].to_string()
        })
        .collect();
    assert_ne!(placeholders[0], placeholders[1]);

    let out = cli(&dir)
        .arg("list")
        .write_stdin(PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 secret(s)"))
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(out).unwrap();
    assert_eq!(stdout.matches("first-secret").count(), 2, "{stdout}");
    for token in &placeholders {
        let id = &token["<!secret_".len()..token.len() - 2];
        assert!(stdout.contains(id), "missing {id} in {stdout}");
    }
}

#[test]
fn custom_secrets_path_is_used() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["-s", "vaults/team.vault", "add", "team-token"])
        .write_stdin(PASSWORD)
        .assert()
        .success();

    dir.child("vaults/team.vault").assert(predicate::path::exists());
    dir.child("secrets.json").assert(predicate::path::missing());
}

#[test]
fn list_without_vault_fails() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("list")
        .write_stdin(PASSWORD)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault not found"));
}

#[test]
fn wrong_password_fails() {
    let dir = TempDir::new().unwrap();
    add_secret(&dir, "sk-ABC");

    cli(&dir)
        .arg("list")
        .write_stdin("wrongpassword\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong password"));
}

#[test]
fn replace_and_reverse_round_trip() {
    let dir = TempDir::new().unwrap();
    add_secret(&dir, "sk-ABC");

    let src = dir.child("src");
    src.create_dir_all().unwrap();
    src.child("app.env").write_str("KEY=sk-ABC\nKEY2=sk-ABC\n").unwrap();
    src.child("notes.txt").write_str("no secrets here\n").unwrap();

    cli(&dir)
        .args(["replace", "src"])
        .write_stdin(PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("app.env"))
        .stdout(predicate::str::contains("notes.txt").not());

    src.child("app.env")
        .assert(predicate::str::contains("<!secret_"))
        .assert(predicate::str::contains("sk-ABC").not());

    cli(&dir)
        .args(["reverse", "src"])
        .write_stdin(PASSWORD)
        .assert()
        .success();

    src.child("app.env").assert("KEY=sk-ABC\nKEY2=sk-ABC\n");
    src.child("notes.txt").assert("no secrets here\n");
}

#[test]
fn replace_over_project_root_skips_the_vault() {
    let dir = TempDir::new().unwrap();
    add_secret(&dir, "sk-ABC");
    let before = std::fs::read_to_string(dir.path().join("secrets.json")).unwrap();
    dir.child("app.env").write_str("KEY=sk-ABC\n").unwrap();

    cli(&dir)
        .args(["replace", "."])
        .write_stdin(PASSWORD)
        .assert()
        .success();

    dir.child("secrets.json").assert(before.as_str());
    dir.child("app.env").assert(predicate::str::contains("<!secret_"));
}

#[test]
fn replace_dry_run_does_not_write() {
    let dir = TempDir::new().unwrap();
    add_secret(&dir, "sk-ABC");
    dir.child("src").create_dir_all().unwrap();
    dir.child("src/app.env").write_str("KEY=sk-ABC\n").unwrap();

    cli(&dir)
        .args(["replace", "src", "--dry-run"])
        .write_stdin(PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would update"));

    dir.child("src/app.env").assert("KEY=sk-ABC\n");
}

#[test]
fn replace_with_nothing_to_do_succeeds() {
    let dir = TempDir::new().unwrap();
    add_secret(&dir, "sk-ABC");
    dir.child("src").create_dir_all().unwrap();
    dir.child("src/plain.txt").write_str("hello\n").unwrap();

    cli(&dir)
        .args(["replace", "src"])
        .write_stdin(PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("No secrets replaced."));

    cli(&dir)
        .args(["reverse", "src"])
        .write_stdin(PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("No placeholders reversed."));
}

#[test]
fn rotate_key_changes_password() {
    let dir = TempDir::new().unwrap();
    add_secret(&dir, "sk-ABC");

    cli(&dir)
        .arg("rotate-key")
        .write_stdin("testpassword\nnewpassword123\n")
        .assert()
        .success();

    cli(&dir)
        .arg("list")
        .write_stdin("newpassword123\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-ABC"));

    cli(&dir)
        .arg("list")
        .write_stdin(PASSWORD)
        .assert()
        .failure();
}

#[test]
fn install_hook_outside_git_repo_fails() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("install-hook")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn install_hook_writes_pre_commit() {
    let dir = TempDir::new().unwrap();
    dir.child(".git").create_dir_all().unwrap();

    cli(&dir).arg("install-hook").assert().success();

    dir.child(".git/hooks/pre-commit")
        .assert(predicate::str::contains("uu-secret-manager pre-commit hook"));
}

#[test]
fn completions_generate_script() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uu-secret-manager"));
}
