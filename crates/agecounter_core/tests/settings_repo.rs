use agecounter_core::db::open_db_in_memory;
use agecounter_core::{RepoError, SettingsRepository, SqliteSettingsRepository};
use serde_json::json;

#[test]
fn missing_key_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);

    assert!(repo.get_setting("userBirthday").unwrap().is_none());
}

#[test]
fn set_then_get_returns_the_same_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);

    repo.set_setting("userBirthday", &json!("1991-04-12")).unwrap();
    assert_eq!(
        repo.get_setting("userBirthday").unwrap(),
        Some(json!("1991-04-12"))
    );
}

#[test]
fn set_overwrites_existing_value_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);

    repo.set_setting("launchAtLogin", &json!(true)).unwrap();
    repo.set_setting("launchAtLogin", &json!(false)).unwrap();

    assert_eq!(repo.get_setting("launchAtLogin").unwrap(), Some(json!(false)));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM settings;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn corrupt_json_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO settings (key, value) VALUES ('userBirthday', '{not json');",
        [],
    )
    .unwrap();
    let repo = SqliteSettingsRepository::new(&conn);

    let err = repo.get_setting("userBirthday").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("userBirthday")));
}

#[test]
fn repository_references_are_repositories() {
    fn mark_launched(repo: impl SettingsRepository) {
        repo.set_setting("hasLaunchedBefore", &json!(true)).unwrap();
    }

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);

    mark_launched(&repo);
    assert_eq!(
        repo.get_setting("hasLaunchedBefore").unwrap(),
        Some(json!(true))
    );
}
