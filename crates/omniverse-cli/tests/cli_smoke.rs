//! End-to-end tests driving the `omniverse` binary over a temp workspace.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "omniverse-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_omniverse<I, S>(workdir: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_omniverse");
    Command::new(bin)
        .current_dir(workdir)
        .args(args)
        .output()
        .expect("omniverse command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

const CONFIG: &str = r#"singularity:
  expression: '\{\{\s*([a-zA-Z0-9_]+)\s*\}\}'
  expression_template: '{{ {key} }}'
alterverses:
  production:
    url: example.com
    env: production
  integration:
    url: example-int.com
    env: integration
"#;

const TEMPLATE_README: &str =
    "This is the {{ env }} environment.\nThe API can be reached at `api.{{ url }}`.\n";

fn write(base: &Path, relative: &str, data: &str) {
    let path = base.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dirs should be created");
    }
    fs::write(path, data).expect("file should be written");
}

fn setup_workspace(prefix: &str) -> TempDirGuard {
    let dir = TempDirGuard::new(prefix);
    write(dir.path(), "omniverse.yaml", CONFIG);
    write(dir.path(), "singularity/readme.md", TEMPLATE_README);
    dir
}

#[test]
fn print_config_round_trips_the_yaml() {
    let dir = setup_workspace("print-config");
    let output = run_omniverse(dir.path(), ["print-config", "--json"]);
    assert_success(&output);
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON stdout");
    assert_eq!(
        value["alterverses"]["production"]["url"],
        serde_json::json!("example.com")
    );
}

#[test]
fn list_singularity_keys_reports_occurrences() {
    let dir = setup_workspace("list-keys");
    let output = run_omniverse(dir.path(), ["list-singularity-keys", "--json"]);
    assert_success(&output);
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON stdout");
    assert_eq!(value["env"]["readme.md"], serde_json::json!([1]));
    assert_eq!(value["url"]["readme.md"], serde_json::json!([2]));
}

#[test]
fn create_alterverse_renders_the_variant() {
    let dir = setup_workspace("create");
    let output = run_omniverse(
        dir.path(),
        [
            "--quiet",
            "create-alterverse",
            "-a",
            "production",
            "-d",
            "prod",
        ],
    );
    assert_success(&output);
    let rendered =
        fs::read_to_string(dir.path().join("prod/readme.md")).expect("rendered file exists");
    assert_eq!(
        rendered,
        "This is the production environment.\nThe API can be reached at `api.example.com`.\n"
    );
}

#[test]
fn create_alterverse_fails_on_undefined_key() {
    let dir = setup_workspace("undefined-key");
    write(
        dir.path(),
        "singularity/extra.md",
        "An undefined {{ mystery }} key.\n",
    );
    let output = run_omniverse(
        dir.path(),
        [
            "--quiet",
            "create-alterverse",
            "-a",
            "production",
            "-d",
            "prod",
        ],
    );
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mystery"), "stderr was: {stderr}");
    assert!(!dir.path().join("prod/extra.md").exists());
}

#[test]
fn deduce_singularity_restores_the_template() {
    let dir = setup_workspace("deduce-singularity");
    let created = run_omniverse(
        dir.path(),
        [
            "--quiet",
            "create-alterverse",
            "-a",
            "production",
            "-d",
            "prod",
        ],
    );
    assert_success(&created);

    let output = run_omniverse(
        dir.path(),
        [
            "--quiet",
            "--singularity",
            "restored",
            "deduce-singularity",
            "-a",
            "production",
            "-s",
            "prod",
        ],
    );
    assert_success(&output);
    let restored =
        fs::read_to_string(dir.path().join("restored/readme.md")).expect("restored file exists");
    assert_eq!(restored, TEMPLATE_README);
}

#[test]
fn deduce_alterverse_transforms_between_variants() {
    let dir = setup_workspace("deduce-alterverse");
    let created = run_omniverse(
        dir.path(),
        [
            "--quiet",
            "create-alterverse",
            "-a",
            "production",
            "-d",
            "prod",
        ],
    );
    assert_success(&created);

    let output = run_omniverse(
        dir.path(),
        [
            "--quiet",
            "deduce-alterverse",
            "-f",
            "production",
            "-s",
            "prod",
            "-t",
            "integration",
            "-d",
            "int",
        ],
    );
    assert_success(&output);
    let rendered =
        fs::read_to_string(dir.path().join("int/readme.md")).expect("rendered file exists");
    assert_eq!(
        rendered,
        "This is the integration environment.\nThe API can be reached at `api.example-int.com`.\n"
    );
}

#[test]
fn strict_deduce_refuses_contaminated_input() {
    let dir = setup_workspace("contaminated");
    write(
        dir.path(),
        "prod/readme.md",
        "This is the production environment (not `example-int.com`).\n",
    );
    let output = run_omniverse(
        dir.path(),
        [
            "--quiet",
            "deduce-alterverse",
            "-f",
            "production",
            "-s",
            "prod",
            "-t",
            "integration",
            "-d",
            "int",
        ],
    );
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("example-int.com"), "stderr was: {stderr}");
    assert!(!dir.path().join("int/readme.md").exists());
}

#[test]
fn dry_run_leaves_the_disk_untouched() {
    let dir = setup_workspace("dry-run");
    let output = run_omniverse(
        dir.path(),
        [
            "--quiet",
            "create-alterverse",
            "-a",
            "production",
            "-d",
            "prod",
            "--dry-run",
        ],
    );
    assert_success(&output);
    assert!(!dir.path().join("prod/readme.md").exists());
}
