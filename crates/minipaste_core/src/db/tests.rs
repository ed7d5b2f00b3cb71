//! Database tests.

use super::*;
use chrono::Duration;
use tempfile::TempDir;

fn setup_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().unwrap()).unwrap();
    (db, temp_dir)
}

#[test]
fn insert_then_get_with_metadata_returns_row() {
    let (db, _temp) = setup_test_db();
    let paste = StoredPaste::new("hello")
        .with_filename("hello.txt")
        .with_last_modified("2024-03-09T12:30:05Z");
    db.insert("abcd", &paste).expect("insert");

    let fetched = db
        .get_with_metadata("abcd")
        .expect("get")
        .expect("paste should exist");
    assert_eq!(fetched, paste);
    assert!(db.get_with_metadata("missing").expect("get").is_none());
}

#[test]
fn insert_replaces_existing_row() {
    let (db, _temp) = setup_test_db();
    db.insert("abcd", &StoredPaste::new("v1")).expect("insert v1");
    db.insert("abcd", &StoredPaste::new("v2")).expect("insert v2");

    let fetched = db.get_with_metadata("abcd").expect("get").expect("row");
    assert_eq!(fetched.content, b"v2");
}

#[test]
fn delete_reports_whether_row_existed() {
    let (db, _temp) = setup_test_db();
    db.insert("abcd", &StoredPaste::new("x")).expect("insert");
    assert!(db.delete("abcd").expect("delete"));
    assert!(!db.delete("abcd").expect("delete again"));
    assert!(db.get_with_metadata("abcd").expect("get").is_none());
}

#[test]
fn expired_rows_read_as_absent_and_are_hidden_from_list() {
    let (db, _temp) = setup_test_db();
    let past = Utc::now() - Duration::minutes(5);
    let future = Utc::now() + Duration::days(1);
    db.insert("old", &StoredPaste::new("x").with_expiration(past))
        .expect("insert old");
    db.insert("live", &StoredPaste::new("y").with_expiration(future))
        .expect("insert live");
    db.insert("forever", &StoredPaste::new("z")).expect("insert forever");

    assert!(db.get_with_metadata("old").expect("get").is_none());
    assert!(db.get_with_metadata("live").expect("get").is_some());

    let names: Vec<String> = db
        .list()
        .expect("list")
        .into_iter()
        .map(|row| row.name)
        .collect();
    assert_eq!(names, vec!["forever".to_string(), "live".to_string()]);
}

#[test]
fn list_carries_expiration() {
    let (db, _temp) = setup_test_db();
    let future = Utc::now() + Duration::days(1);
    db.insert("b", &StoredPaste::new("x").with_expiration(future))
        .expect("insert");
    db.insert("a", &StoredPaste::new("y")).expect("insert");

    let rows = db.list().expect("list");
    assert_eq!(
        rows,
        vec![
            PasteListing {
                name: "a".to_string(),
                expiration: None,
            },
            PasteListing {
                name: "b".to_string(),
                expiration: Some(future),
            },
        ]
    );
}

#[test]
fn purge_expired_removes_only_expired_rows() {
    let (db, _temp) = setup_test_db();
    let now = Utc::now();
    db.insert("old", &StoredPaste::new("x").with_expiration(now - Duration::seconds(1)))
        .expect("insert old");
    db.insert("live", &StoredPaste::new("y").with_expiration(now + Duration::hours(1)))
        .expect("insert live");

    assert_eq!(db.purge_expired(now).expect("purge"), 1);
    assert_eq!(db.purge_expired(now).expect("purge again"), 0);
    assert_eq!(db.list().expect("list").len(), 1);
}

#[test]
fn reopening_preserves_rows() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db");
    let path = db_path.to_str().unwrap();
    {
        let db = Database::new(path).expect("open");
        db.insert("keep", &StoredPaste::new("persisted")).expect("insert");
    }
    let db = Database::new(path).expect("reopen");
    let fetched = db.get_with_metadata("keep").expect("get").expect("row");
    assert_eq!(fetched.text(), "persisted");
}
