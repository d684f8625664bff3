//! Integration tests for project commands.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_project_list_requires_login() {
    let env = TestEnv::new();

    env.tp()
        .args(["project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_leader_sees_all_fixture_projects() {
    let env = TestEnv::leader();

    let list = env.json(&["project", "list"]);
    assert_eq!(list["count"], 2);
    assert_eq!(list["role"], "leader");
}

#[test]
fn test_member_sees_only_their_projects() {
    let env = TestEnv::member();

    let list = env.json(&["project", "list"]);
    assert_eq!(list["count"], 1);
    assert_eq!(list["projects"][0]["id"], "proj-1");
}

#[test]
fn test_project_list_human() {
    let env = TestEnv::member();

    env.tp()
        .args(["project", "list", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 project(s):"))
        .stdout(predicate::str::contains("proj-1  Garden"))
        .stdout(predicate::str::contains("tp member quests --project proj-1"));
}

#[test]
fn test_created_project_is_not_listed() {
    let env = TestEnv::leader();

    let created = env.json(&["project", "create", "Kitchen", "-d", "Cook things"]);
    assert_eq!(created["created"], true);
    let id = created["project"]["id"].as_str().unwrap();
    assert!(id.starts_with("proj-"));
    assert_eq!(created["project"]["leader_id"], "user-1");
    assert_eq!(created["project"]["members"][0], "user-1");

    let list = env.json(&["project", "list"]);
    assert_eq!(list["count"], 2);
}

#[test]
fn test_member_cannot_create_project() {
    let env = TestEnv::member();

    env.tp()
        .args(["project", "create", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied"));
}

#[test]
fn test_delete_runtime_project() {
    let env = TestEnv::leader();
    let created = env.json(&["project", "create", "Temp"]);
    let id = created["project"]["id"].as_str().unwrap().to_string();

    env.tp()
        .args(["project", "delete", &id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\":true"));

    env.tp()
        .args(["project", "delete", &id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\":false"));
}

#[test]
fn test_delete_fixture_project_is_noop() {
    let env = TestEnv::leader();

    env.tp()
        .args(["project", "delete", "proj-1", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\":false"));

    let list = env.json(&["project", "list"]);
    assert_eq!(list["count"], 2);
}

#[test]
fn test_delete_declined_at_prompt() {
    let env = TestEnv::leader();
    let created = env.json(&["project", "create", "Keep me"]);
    let id = created["project"]["id"].as_str().unwrap().to_string();

    env.tp()
        .args(["project", "delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cancelled\":true"));
}

#[test]
fn test_delete_confirmed_at_prompt() {
    let env = TestEnv::leader();
    let created = env.json(&["project", "create", "Drop me"]);
    let id = created["project"]["id"].as_str().unwrap().to_string();

    env.tp()
        .args(["project", "delete", &id])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\":true"));
}

#[test]
fn test_open_routes_by_role() {
    let leader = TestEnv::leader();
    let opened = leader.json(&["project", "open", "proj-1"]);
    assert_eq!(opened["dashboard"], "leader");
    assert_eq!(opened["project_name"], "Garden");
    assert_eq!(opened["command"], "tp quest list --project proj-1");

    let member = TestEnv::member();
    let opened = member.json(&["project", "open", "proj-1"]);
    assert_eq!(opened["dashboard"], "member");
    assert_eq!(opened["command"], "tp member quests --project proj-1");
}
