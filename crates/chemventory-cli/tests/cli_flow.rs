use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_chemventory"))
}

/// Isolated XDG homes so no run touches the real config or data.
struct Env {
    home: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("temp home"),
        }
    }

    fn config_home(&self) -> PathBuf {
        self.home.path().join("config")
    }

    fn data_home(&self) -> PathBuf {
        self.home.path().join("data")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env("HOME", self.home.path())
            .env_remove("SUPABASE_URL")
            .env_remove("SUPABASE_ANON_KEY")
            .env_remove("CHEMVENTORY_CONFIG")
            .env_remove("CHEMVENTORY_DATA_DIR")
            .env_remove("CHEMVENTORY_ADMIN_EMAILS")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("run chemventory")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn run_json(&self, args: &[&str]) -> serde_json::Value {
        serde_json::from_str(&self.run_ok(args)).expect("parse json output")
    }
}

fn add_acetone(env: &Env) -> String {
    let value = env.run_json(&[
        "add",
        "Acetone",
        "--batch",
        "A-1",
        "--initial",
        "500",
        "--state",
        "volume:mL",
        "--expires",
        "2099-01-01",
        "--location",
        "Cabinet 3",
        "--json",
    ]);
    value
        .get("id")
        .and_then(|v| v.as_str())
        .expect("record id")
        .to_string()
}

#[test]
fn test_cli_init_writes_default_config() {
    let env = Env::new();
    env.run_ok(&["init"]);

    let config_path = env.config_home().join("chemventory").join("config.toml");
    let contents = std::fs::read_to_string(&config_path).expect("read config");
    assert!(contents.contains("[storage]"));
    assert!(contents.contains("data_dir"));

    let again = env.run(&["init"]);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("--force"));

    env.run_ok(&["init", "--force"]);
}

#[test]
fn test_cli_add_list_show() {
    let env = Env::new();
    let id = add_acetone(&env);

    let list = env.run_json(&["list", "--json"]);
    let array = list.as_array().expect("list output array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["name"], "Acetone");
    assert_eq!(array[0]["currentQuantity"], 500.0);
    assert_eq!(array[0]["expired"], false);

    let show = env.run_ok(&["show", &id]);
    assert!(show.contains("name=Acetone"));
    assert!(show.contains("batch=A-1"));
    assert!(show.contains("location=Cabinet 3"));

    let plain = env.run_ok(&["list", "--format", "plain"]);
    assert!(plain.contains("Cabinet_3"));
    assert!(plain.contains("500/500_mL"));
}

#[test]
fn test_cli_list_search_filters() {
    let env = Env::new();
    add_acetone(&env);
    env.run_ok(&["add", "Toluene", "--batch", "T-9", "--initial", "1"]);

    let hits = env.run_json(&["list", "tolu", "--json"]);
    let array = hits.as_array().expect("list output array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["name"], "Toluene");

    let none = env.run_json(&["list", "--expired", "--json"]);
    assert!(none.as_array().expect("array").is_empty());
}

#[test]
fn test_cli_list_empty_message() {
    let env = Env::new();
    let output = env.run_ok(&["list"]);
    assert!(output.contains("No chemicals found"));
}

#[test]
fn test_cli_show_unknown_id_is_not_found() {
    let env = Env::new();
    let output = env.run(&["show", "does-not-exist"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Chemical not found"));
    assert!(stderr.contains("Hint"));
}

#[test]
fn test_cli_update_fields() {
    let env = Env::new();
    let id = add_acetone(&env);

    let updated = env.run_json(&["update", &id, "--current", "120", "--json"]);
    assert_eq!(updated["currentQuantity"], 120.0);
    assert_eq!(updated["initialQuantity"], 500.0);
    assert_eq!(updated["name"], "Acetone");

    let empty = env.run(&["update", &id]);
    assert_eq!(empty.status.code(), Some(4));

    let missing = env.run(&["update", "nope", "--current", "1"]);
    assert_eq!(missing.status.code(), Some(3));

    let bad_class = env.run(&["update", &id, "--safety-class", "purple"]);
    assert_eq!(bad_class.status.code(), Some(4));
}

#[test]
fn test_cli_add_rejects_negative_quantity() {
    let env = Env::new();
    let output = env.run(&["add", "Acetone", "--batch", "A-1", "--initial=-5"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_remove_with_yes() {
    let env = Env::new();
    let id = add_acetone(&env);

    env.run_ok(&["remove", &id, "--yes"]);
    let list = env.run_json(&["list", "--json"]);
    assert!(list.as_array().expect("array").is_empty());

    let again = env.run(&["remove", &id, "--yes"]);
    assert_eq!(again.status.code(), Some(3));
}

#[test]
fn test_cli_remove_without_tty_requires_yes() {
    let env = Env::new();
    let id = add_acetone(&env);

    let output = env.run(&["remove", &id]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--yes"));

    let list = env.run_json(&["list", "--json"]);
    assert_eq!(list.as_array().expect("array").len(), 1);
}

#[test]
fn test_cli_seed_and_dashboard() {
    let env = Env::new();
    env.run_ok(&["seed"]);
    let second = env.run_ok(&["seed"]);
    assert!(second.contains("nothing seeded"));

    let dashboard = env.run_json(&["dashboard", "--json"]);
    assert_eq!(dashboard["total"], 2);

    let expired = dashboard["expired"].as_array().expect("expired array");
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0]["name"], "Sodium Hydroxide");

    let near = dashboard["near_expiration"]
        .as_array()
        .expect("near expiration array");
    assert_eq!(near.len(), 1);
    assert_eq!(near[0]["name"], "Ethanol");
}

#[test]
fn test_cli_export_import_round_trip() {
    let env = Env::new();
    env.run_ok(&["seed"]);

    let csv_path = env.home.path().join("inventory.csv");
    let csv = csv_path.to_string_lossy().to_string();
    env.run_ok(&["export", "-o", &csv]);
    let text = std::fs::read_to_string(&csv_path).expect("read export");
    assert!(text.lines().next().expect("header").contains("batchNumber"));
    assert_eq!(text.lines().count(), 3);

    let other = Env::new();
    let imported = other.run_json(&["import", &csv, "--json"]);
    assert_eq!(imported.as_array().expect("array").len(), 2);

    let names: Vec<String> = other
        .run_json(&["list", "--json"])
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["name"].as_str().map(str::to_string))
        .collect();
    assert!(names.contains(&"Ethanol".to_string()));
    assert!(names.contains(&"Sodium Hydroxide".to_string()));
}

#[test]
fn test_cli_import_empty_file_is_invalid() {
    let env = Env::new();
    let path = env.home.path().join("empty.csv");
    std::fs::write(&path, "").expect("write csv");

    let output = env.run(&["import", path.to_str().expect("utf8 path")]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_export_columns_to_stdout() {
    let env = Env::new();
    add_acetone(&env);

    let output = env.run_ok(&["export", "--columns", "name,batchNumber"]);
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("name,batchNumber"));
    assert_eq!(lines.next(), Some("\"Acetone\",\"A-1\""));

    let bad = env.run(&["export", "--columns", "name,colour"]);
    assert_eq!(bad.status.code(), Some(4));
}

#[test]
fn test_cli_login_whoami_logout() {
    let env = Env::new();

    let before = env.run_json(&["whoami", "--json"]);
    assert_eq!(before["signedIn"], false);

    env.run_ok(&["login", "ada@example.com"]);
    let during = env.run_json(&["whoami", "--json"]);
    assert_eq!(during["signedIn"], true);
    assert_eq!(during["user"]["email"], "ada@example.com");
    assert_eq!(during["user"]["name"], "ada");
    assert_eq!(during["admin"], false);

    let logout = env.run_ok(&["logout"]);
    assert!(logout.contains("Signed out"));
    let after = env.run_json(&["whoami", "--json"]);
    assert_eq!(after["signedIn"], false);
}

#[test]
fn test_cli_users_require_admin() {
    let env = Env::new();

    let signed_out = env.run(&["users", "add", "bob@example.com"]);
    assert_eq!(signed_out.status.code(), Some(5));

    env.run_ok(&["login", "ada@example.com"]);
    let not_admin = env.run(&["users", "list"]);
    assert_eq!(not_admin.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&not_admin.stderr).contains("Admin access required"));
}

#[test]
fn test_cli_users_add_list_remove_as_admin() {
    let env = Env::new();
    env.run_ok(&["login", "ada@example.com"]);

    let admin = |args: &[&str]| -> Output {
        env.command()
            .env("CHEMVENTORY_ADMIN_EMAILS", "ada@example.com")
            .args(args)
            .output()
            .expect("run chemventory")
    };

    assert!(admin(&["users", "add", "bob@example.com"]).status.success());
    assert!(admin(&["users", "add", "cy@example.com"]).status.success());

    let list = admin(&["users", "list", "--json"]);
    assert!(list.status.success());
    let users: serde_json::Value = serde_json::from_slice(&list.stdout).expect("parse users");
    let users = users.as_array().expect("users array");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "bob@example.com");

    assert!(admin(&["users", "remove", "1"]).status.success());
    assert_eq!(admin(&["users", "remove", "5"]).status.code(), Some(3));
    assert_eq!(admin(&["users", "remove", "0"]).status.code(), Some(3));

    let list = admin(&["users", "list", "--json"]);
    let users: serde_json::Value = serde_json::from_slice(&list.stdout).expect("parse users");
    assert_eq!(users.as_array().expect("users array").len(), 1);
    assert_eq!(users[0]["email"], "cy@example.com");
}

#[test]
fn test_cli_data_dir_flag_isolates_cache() {
    let env = Env::new();
    let custom = env.home.path().join("custom-data");
    let custom_arg = custom.to_string_lossy().to_string();

    env.run_ok(&["--data-dir", &custom_arg, "add", "Acetone", "--batch", "A-1"]);
    assert!(slot_exists(&custom));

    let default_list = env.run_json(&["list", "--json"]);
    assert!(default_list.as_array().expect("array").is_empty());

    let custom_list = env.run_json(&["--data-dir", &custom_arg, "list", "--json"]);
    assert_eq!(custom_list.as_array().expect("array").len(), 1);
}

fn slot_exists(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|entries| entries.flatten().next().is_some())
        .unwrap_or(false)
}

#[test]
fn test_cli_quiet_add_prints_only_id() {
    let env = Env::new();
    let output = env.run_ok(&["--quiet", "add", "Acetone", "--batch", "A-1"]);
    let id = output.trim();
    assert!(!id.is_empty());
    assert!(!id.contains(' '));

    env.run_ok(&["show", id]);
}

#[test]
fn test_cli_no_args_prints_usage() {
    let env = Env::new();
    let output = env.run_ok(&[]);
    assert!(output.contains("--help"));
}

#[test]
fn test_cli_unknown_command_is_usage_error() {
    let env = Env::new();
    let output = env.run(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_completions_bash() {
    let env = Env::new();
    let output = env.run_ok(&["completions", "bash"]);
    assert!(output.contains("chemventory"));
}
