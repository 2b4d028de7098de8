//! End-to-end tests of the odl-builder binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn odl_builder() -> Command {
    let mut cmd = Command::cargo_bin("odl-builder").unwrap();
    cmd.env_remove("ODL_BUNDLER")
        .env_remove("ODL_BUNDLER_BIN")
        .env_remove("ODL_TIMEOUT");
    cmd
}

fn write_config(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn emit_script_prints_generated_init_script() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "odl.json",
        r#"{
            "outputFilename": "odl.js",
            "plugins": {
                "my-plugin/example": { "config": { "x": 1 }, "rule": true }
            }
        }"#,
    );

    odl_builder()
        .arg("--emit-script")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "var my_plugin_example = require(\"my-plugin/example\").default;",
        ))
        .stdout(predicate::str::contains("\"my-plugin/example\": my_plugin_example,"))
        .stdout(predicate::str::contains(
            "__$odl.initialize(__$ODL_DATA, __$ODL_RULES, __$ODL_CONFIG, {}, __$ODL_MAPPINGS);",
        ));
}

#[test]
fn emit_script_discovers_toml_config_in_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        "opendatalayer.config.toml",
        r#"
[plugins.tracking]
config = { id = "UA-1" }
rule = "window.optIn === true"
"#,
    );

    odl_builder()
        .arg("--emit-script")
        .arg("--base-dir")
        .arg(dir.path())
        .arg("--module-format")
        .arg("esm")
        .assert()
        .success()
        .stdout(predicate::str::contains("import tracking from \"tracking\";"))
        .stdout(predicate::str::contains("\"tracking\": window.optIn === true,"));
}

#[test]
fn unknown_option_is_reported_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "odl.json", r#"{ "kaboom": "foo" }"#);

    odl_builder()
        .arg("--emit-script")
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("option \"kaboom\" is unknown"));
}

#[test]
fn build_without_output_filename_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "odl.json", r#"{ "outputPath": "build" }"#);

    odl_builder()
        .arg("--config")
        .arg(&config)
        .arg("--base-dir")
        .arg(dir.path())
        .arg("--bundler")
        .arg("esbuild")
        .arg("--bundler-bin")
        .arg(dir.path().join("missing-esbuild"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("option \"outputFilename\" is required"));

    assert!(!dir.path().join("build").exists());
}

#[test]
fn bundler_bin_without_bundler_is_rejected() {
    odl_builder()
        .arg("--bundler-bin")
        .arg("/opt/esbuild")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bundler-bin requires --bundler"));
}

#[cfg(unix)]
#[test]
fn builds_with_scripted_bundler_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let bin = dir.path().join("fake-esbuild");
    std::fs::write(&bin, "#!/bin/sh\necho 'window.opendatalayer = {};'\n").unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

    let config = write_config(
        dir.path(),
        "odl.json",
        r#"{ "outputPath": "build", "outputFilename": "odl.js" }"#,
    );

    odl_builder()
        .arg("--config")
        .arg(&config)
        .arg("--base-dir")
        .arg(dir.path())
        .arg("--bundler")
        .arg("esbuild")
        .arg("--bundler-bin")
        .arg(&bin)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"))
        .stdout(predicate::str::contains("SHA256:"));

    let target = dir.path().join("build").join("odl.js");
    assert_eq!(
        std::fs::read_to_string(target).unwrap(),
        "window.opendatalayer = {};\n"
    );
    assert!(!dir.path().join("build").join("odl.js.__tmp.js").exists());
}
