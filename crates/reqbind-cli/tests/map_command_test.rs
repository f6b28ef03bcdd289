use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_reqbind") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("reqbind{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_reqbind is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after UNIX_EPOCH")
        .as_nanos();
    env::temp_dir().join(format!(
        "reqbind-cli-{name}-{}-{nanos}.{extension}",
        std::process::id()
    ))
}

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn create(name: &str, extension: &str, content: &str) -> Self {
        let path = unique_temp_path(name, extension);
        fs::write(&path, content).expect("temporary file should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

const PROFILE: &str = r#"
target:
  class: Profile
  properties:
    id: 7
    name: Bob
    age: null
    address:
      class: Address
      properties:
        city: Paris
  read_only: [id]
fields:
  - id
  - name
  - { name: age, transformer: integer }
  - { name: city, path: address.city }
constraints:
  Profile:
    name:
      - { type: not_blank }
      - { type: length, min: 2, max: 10 }
    address: [{ type: valid }]
  Address:
    city: [{ type: regex, pattern: "^[A-Z]", message: "Capitalize." }]
"#;

fn run_map(target: &Path, request: &Path, config: Option<&Path>) -> Output {
    let mut command = Command::new(cargo_bin());
    command.args([
        "map",
        "--target",
        target.to_string_lossy().as_ref(),
        "--request",
        request.to_string_lossy().as_ref(),
    ]);
    if let Some(config) = config {
        command.args(["--config", config.to_string_lossy().as_ref()]);
    }
    command.output().expect("reqbind map should execute")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout should be JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn test_map_success_prints_updated_target() {
    let target = TempFile::create("profile", "yaml", PROFILE);
    let request = TempFile::create(
        "request",
        "yaml",
        "method: POST\nparams:\n  name: Alice\n  age: \"42\"\n  city: Lyon\n",
    );

    let output = run_map(target.path(), request.path(), None);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json = stdout_json(&output);
    assert_eq!(json["status"], "mapped");
    assert_eq!(json["target"]["name"], "Alice");
    assert_eq!(json["target"]["age"], 42);
    assert_eq!(json["target"]["address"]["city"], "Lyon");
}

#[test]
fn test_map_rejection_prints_error_tree() {
    let target = TempFile::create("profile", "yaml", PROFILE);
    let request = TempFile::create(
        "request",
        "yaml",
        "method: PUT\nparams:\n  name: A\n  age: old\n  city: lyon\n  admin: true\n",
    );

    let output = run_map(target.path(), request.path(), None);

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["status"], "rejected");
    assert_eq!(json["message"], "Invalid data.");

    let errors = &json["errors"];
    assert_eq!(errors["name"], "");
    // `address` is not a declared field, so its violation lands on the root
    assert_eq!(
        errors["errors"],
        serde_json::json!(["Capitalize.", "The request should not contain extra fields."])
    );

    let children = errors["children"].as_array().expect("children array");
    let names: Vec<&str> = children
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, ["age", "name"]);
    assert_eq!(children[0]["errors"], serde_json::json!(["This value is not valid."]));
    assert_eq!(
        children[1]["errors"],
        serde_json::json!(["This value is too short. It should have 2 characters or more."])
    );

    assert_eq!(json["target"]["name"], "A");
}

#[test]
fn test_read_only_field_is_left_untouched() {
    let target = TempFile::create("profile", "yaml", PROFILE);
    let request = TempFile::create("request", "yaml", "method: PATCH\nparams:\n  id: 99\n");

    let output = run_map(target.path(), request.path(), None);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["target"]["id"], 7);
}

#[test]
fn test_safe_method_reads_query_and_ignores_extras() {
    let target = TempFile::create("profile", "yaml", PROFILE);
    let request = TempFile::create(
        "request",
        "yaml",
        "query:\n  name: Carol\n  page: 3\nparams:\n  name: ignored\n",
    );

    let output = run_map(target.path(), request.path(), None);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["target"]["name"], "Carol");
}

#[test]
fn test_config_overrides_messages_and_limits() {
    let target = TempFile::create("profile", "yaml", PROFILE);
    let config = TempFile::create(
        "config",
        "yaml",
        "post_max_size: 1K\nupload_size_message: Too big.\nextra_fields_message: No extras.\n",
    );

    let too_large = TempFile::create(
        "request",
        "yaml",
        "method: POST\nparams:\n  name: Alice\ncontent_length: 4096\n",
    );
    let output = run_map(target.path(), too_large.path(), Some(config.path()));
    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["errors"]["errors"], serde_json::json!(["Too big."]));
    assert_eq!(json["target"]["name"], "Bob");

    let extra = TempFile::create(
        "request",
        "yaml",
        "method: POST\nparams:\n  name: Alice\n  other: 1\n",
    );
    let output = run_map(target.path(), extra.path(), Some(config.path()));
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout_json(&output)["errors"]["errors"],
        serde_json::json!(["No extras."])
    );
}

#[test]
fn test_translations_apply_to_validation_messages() {
    let described = format!(
        "{PROFILE}translations:\n  validators:\n    \"This value should not be blank.\": \"Pflichtfeld.\"\n"
    );
    let target = TempFile::create("profile", "yaml", &described);
    let request = TempFile::create("request", "yaml", "method: POST\nparams:\n  name: \"\"\n");

    let output = run_map(target.path(), request.path(), None);

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["errors"]["children"][0]["name"], "name");
    assert_eq!(
        json["errors"]["children"][0]["errors"],
        serde_json::json!(["Pflichtfeld."])
    );
}

#[test]
fn test_missing_target_file_fails() {
    let request = TempFile::create("request", "yaml", "method: GET\n");
    let missing = unique_temp_path("missing", "yaml");

    let output = run_map(&missing, request.path(), None);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn test_invalid_target_description_fails() {
    let target = TempFile::create("broken", "yaml", "target: { class: Foo }\n");
    let request = TempFile::create("request", "yaml", "method: GET\n");

    let output = run_map(target.path(), request.path(), None);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid target description"));
}
