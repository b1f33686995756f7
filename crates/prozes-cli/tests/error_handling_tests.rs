//! Exit codes and error messages of the `prozes` binary.
//!
//! 2 = user error, 3 = not found, 4 = configuration, 1 = internal.

mod common;

use std::fs;

use predicates::prelude::*;

use common::Sandbox;

#[test]
fn no_arguments_prints_help_and_fails() {
    Sandbox::new()
        .cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    Sandbox::new()
        .cmd()
        .args(["template", "frobnicate"])
        .assert()
        .code(2);
}

#[test]
fn duplicate_save_is_a_conflict() {
    let sandbox = Sandbox::new();
    sandbox.project("proj");
    sandbox.save("proj", "t1");
    let before = fs::read(sandbox.store().join("t1/template.json")).unwrap();

    sandbox.write("proj/new.txt", "x");
    sandbox
        .cmd()
        .args(["template", "save", "proj", "t1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read(sandbox.store().join("t1/template.json")).unwrap(), before);
    assert!(!sandbox.store().join("t1/new.txt").exists());
}

#[test]
fn invalid_template_name_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.project("proj");

    for bad in ["bad/name", "1st", "has space"] {
        sandbox
            .cmd()
            .args(["template", "save", "proj", bad])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Invalid template name"));
    }
}

#[test]
fn missing_source_is_not_found() {
    Sandbox::new()
        .cmd()
        .args(["template", "save", "does-not-exist", "t1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Source directory not found"));
}

#[test]
fn missing_template_is_not_found() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["template", "use", "ghost", "out"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Template 'ghost' not found"));
    assert!(!sandbox.work().join("out").exists());

    sandbox
        .cmd()
        .args(["template", "show", "ghost"])
        .assert()
        .code(3);

    sandbox
        .cmd()
        .args(["template", "delete", "ghost", "--yes"])
        .assert()
        .code(3);
}

#[test]
fn non_empty_destination_is_left_untouched() {
    let sandbox = Sandbox::new();
    sandbox.project("proj");
    sandbox.save("proj", "t1");
    sandbox.write("taken/keep.txt", "mine");

    sandbox
        .cmd()
        .args(["template", "use", "t1", "taken"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not empty"));

    assert_eq!(sandbox.read("taken/keep.txt"), "mine");
    assert!(!sandbox.work().join("taken/app.py").exists());
}

#[test]
fn malformed_var_is_a_user_error() {
    let sandbox = Sandbox::new();
    sandbox.project("proj");
    sandbox.save("proj", "t1");

    sandbox
        .cmd()
        .args(["template", "use", "t1", "out", "--var", "novalue"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid variable assignment"));
    assert!(!sandbox.work().join("out").exists());
}

#[test]
fn install_deps_without_venv_is_rejected() {
    Sandbox::new()
        .cmd()
        .args(["template", "use", "t1", "out", "--install-deps"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--venv"));
}

#[test]
fn unknown_config_key_is_a_config_error() {
    Sandbox::new()
        .cmd()
        .args(["config", "get", "no.such.key"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.config(), "[defaults\nauthor = ").unwrap();

    sandbox
        .cmd()
        .args(["template", "list"])
        .assert()
        .code(4);
}

#[test]
fn quiet_and_verbose_conflict() {
    Sandbox::new()
        .cmd()
        .args(["--quiet", "--verbose", "template", "list"])
        .assert()
        .code(2);
}
