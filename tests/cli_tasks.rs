//! End-to-end CLI tests over a temp-directory store.

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn taskdeck(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taskdeck").expect("binary");
    cmd.env("TASKDECK_STORE", store.path());
    cmd
}

fn add_task(store: &TempDir, title: &str, due: &str) -> String {
    let assert = taskdeck(store)
        .args(["add", title, "--due", due, "--json"])
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json output");
    assert_eq!(json["status"], "success");
    json["data"]["id"]
        .as_str()
        .expect("assigned id")
        .to_string()
}

#[test]
fn add_list_done_rm_round_trip() {
    let store = TempDir::new().unwrap();

    let id = add_task(&store, "Write report", "2024-01-10");
    assert!(!id.is_empty());

    taskdeck(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Write report"))
        .stdout(contains(&id));

    taskdeck(&store)
        .args(["done", &id])
        .assert()
        .success()
        .stdout(contains("completed"));

    taskdeck(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(contains(format!("[x] {id}")));

    taskdeck(&store)
        .args(["rm", &id])
        .assert()
        .success();

    taskdeck(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("0 task(s)"));
}

#[test]
fn list_orders_by_due_date() {
    let store = TempDir::new().unwrap();

    add_task(&store, "later", "2025-06-01");
    add_task(&store, "sooner", "2024-02-01");

    let assert = taskdeck(&store)
        .args(["list", "--json"])
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json output");
    let titles: Vec<&str> = json["data"]
        .as_array()
        .expect("task array")
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["sooner", "later"]);
}

#[test]
fn edit_changes_fields() {
    let store = TempDir::new().unwrap();
    let id = add_task(&store, "Draft", "2024-01-10");

    taskdeck(&store)
        .args(["edit", &id, "--title", "Final", "--due", "2024-03-01"])
        .assert()
        .success()
        .stdout(contains("Edited task"));

    taskdeck(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Final"))
        .stdout(contains("2024-03-01"));
}

#[test]
fn reopen_clears_completed() {
    let store = TempDir::new().unwrap();
    let id = add_task(&store, "Flip me", "2024-01-10");

    taskdeck(&store).args(["done", &id]).assert().success();
    taskdeck(&store).args(["reopen", &id]).assert().success();

    taskdeck(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(contains(format!("[ ] {id}")));
}

#[test]
fn malformed_id_exits_with_user_error() {
    let store = TempDir::new().unwrap();

    taskdeck(&store)
        .args(["done", "not-a-uuid"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid task id"));
}

#[test]
fn unknown_id_update_is_not_found() {
    let store = TempDir::new().unwrap();

    taskdeck(&store)
        .args(["done", "00000000-0000-4000-8000-000000000000"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("not found"));
}

#[test]
fn edit_without_changes_reports_no_change() {
    let store = TempDir::new().unwrap();
    let id = add_task(&store, "Same", "2024-01-10");

    taskdeck(&store)
        .args(["edit", &id, "--title", "Same", "--due", "2024-01-10"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("no changes"));
}

#[test]
fn bad_due_date_is_a_validation_error() {
    let store = TempDir::new().unwrap();

    taskdeck(&store)
        .args(["add", "Vague", "--due", "whenever"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("due date"));
}

#[test]
fn rm_of_missing_task_succeeds() {
    let store = TempDir::new().unwrap();

    taskdeck(&store)
        .args(["rm", "00000000-0000-4000-8000-000000000000"])
        .assert()
        .success();
}

#[test]
fn json_error_envelope_has_kind_and_code() {
    let store = TempDir::new().unwrap();

    let assert = taskdeck(&store)
        .args(["done", "not-a-uuid", "--json"])
        .assert()
        .failure()
        .code(2);
    let json: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json error output");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["kind"], "user_error");
    assert_eq!(json["error"]["code"], 2);
}
