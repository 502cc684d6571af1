#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rattendance::db::initialize::init_db;
use rattendance::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const TOKENS_YAML: &str = r#"
tokens:
  - token: "tk-alice"
    email: "Alice@Example.org"
    display_name: "Alice"
  - token: "tk-bob"
    phone: "+39 333 1234567"
    display_name: "Bob"
  - token: "tk-carol"
    email: "carol@example.org"
    display_name: "Carol"
  - token: "tk-expired"
    email: "old@example.org"
    display_name: "Old"
    expires_at: "2001-01-01T00:00:00Z"
"#;

/// Dedicated config home so tests never read the user's real configuration.
pub fn test_home(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance_home", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create test home");
    path
}

pub fn rta() -> Command {
    let mut cmd = cargo_bin_cmd!("rattendance");
    cmd.env("RATTENDANCE_HOME", env::temp_dir().join("shared_rattendance_home"));
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Write the shared token registry next to the test DB.
pub fn write_tokens(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_tokens.yml", name));
    fs::write(&path, TOKENS_YAML).expect("write tokens");
    path.to_string_lossy().to_string()
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh, migrated database opened through the library API.
pub fn open_test_pool(name: &str) -> DbPool {
    let db_path = setup_test_db(name);
    let pool = DbPool::new(&db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// `init` + one club + alice (admin) and bob (member), all through the CLI.
pub fn init_club_via_cli(name: &str) -> (String, String) {
    let db_path = setup_test_db(name);
    let tokens = write_tokens(name);

    rta()
        .args(["--db", &db_path, "--tokens", &tokens, "--test", "init"])
        .assert()
        .success();

    rta()
        .args(["--db", &db_path, "club", "add", "chess"])
        .assert()
        .success();

    for token in ["tk-alice", "tk-bob"] {
        rta()
            .args([
                "--db", &db_path, "--tokens", &tokens, "member", "new", "--club", "chess",
                "--token", token,
            ])
            .assert()
            .success();
    }

    rta()
        .args([
            "--db",
            &db_path,
            "member",
            "admin",
            "--club",
            "chess",
            "--identity",
            "alice@example.org",
        ])
        .assert()
        .success();

    (db_path, tokens)
}
