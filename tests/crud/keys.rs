//! Primary key semantics: malformed vs well-formed-but-absent

use burrowdb::{field_values, Error, Query, RecordId};

use crate::common;

#[tokio::test]
async fn malformed_id_fails_and_absent_id_is_none() {
    let posts = common::posts();

    let err = posts.find_by_id("a_bad_id").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid primary key for Find One: a_bad_id"
    );

    let absent = RecordId::generate().to_string();
    assert!(posts.find_by_id(&absent).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_distinguishes_bad_missing_and_present_keys() {
    let posts = common::posts();
    let mut record = posts
        .create(field_values([
            ("content", "Hello world"),
            ("title", "Test"),
        ]))
        .await
        .unwrap();
    let saved_key = record.key().unwrap().to_string();

    // Malformed key: hard error, nothing deleted.
    record.set_key("bad");
    let err = posts.delete(&mut record).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid primary key for Delete One: bad");

    // Reversed hex is well-formed but absent: silent no-op.
    let reversed: String = saved_key.chars().rev().collect();
    record.set_key(reversed);
    assert!(!posts.delete(&mut record).await.unwrap());

    // Original key: the record goes away.
    record.set_key(&saved_key);
    assert!(posts.delete(&mut record).await.unwrap());
    assert_eq!(posts.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn save_rejects_malformed_keys() {
    let posts = common::posts();
    let mut record = posts
        .create(field_values([("title", "Test")]))
        .await
        .unwrap();
    record.set("title", "Changed").unwrap();
    record.set_key("not-hex");
    let err = posts.save(&mut record).await.unwrap_err();
    assert!(matches!(err, Error::InvalidKey { .. }));
    assert!(err.to_string().contains("Save One"));
    assert!(err.to_string().contains("not-hex"));
}

#[tokio::test]
async fn save_on_absent_key_is_a_silent_noop() {
    let posts = common::posts();
    let mut record = posts
        .create(field_values([("title", "Test")]))
        .await
        .unwrap();
    let saved_key = record.key().unwrap().to_string();

    // Well-formed key matching nothing: save succeeds without writing.
    record.set("title", "Changed").unwrap();
    record.set_key(RecordId::generate().to_string());
    posts.save(&mut record).await.unwrap();
    assert!(!record.is_dirty());

    let stored = posts.find_by_id(&saved_key).await.unwrap().unwrap();
    assert_eq!(stored.get_str("title"), Some("Test"));
    assert_eq!(posts.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn where_id_translates_to_the_primary_key() {
    let posts = common::posts();
    let record = posts
        .create(field_values([
            ("content", "Hello world"),
            ("title", "Test"),
        ]))
        .await
        .unwrap();
    let id = record.key().unwrap().to_string();

    let found = posts
        .find_one(&Query::new().where_eq("id", id.clone()))
        .await
        .unwrap()
        .expect("id query should match");
    assert_eq!(found.key(), Some(id.as_str()));
    assert_eq!(found.get_str("title"), Some("Test"));
    assert_eq!(found.get_str("content"), Some("Hello world"));
}

#[tokio::test]
async fn upsert_creates_then_updates_in_place() {
    let posts = common::posts();

    let first = posts
        .upsert(
            None,
            field_values([("content", "Hello world"), ("title", "Test")]),
        )
        .await
        .unwrap();
    let key = first.key().unwrap().to_string();
    assert_eq!(first.get_str("content"), Some("Hello world"));
    assert_eq!(first.get_str("title"), Some("Test"));

    let second = posts
        .upsert(
            Some(&key),
            field_values([("content", "Hello world"), ("title", "Test 2")]),
        )
        .await
        .unwrap();
    assert_eq!(second.key(), Some(key.as_str()));
    assert_eq!(second.get_str("content"), Some("Hello world"));
    assert_eq!(second.get_str("title"), Some("Test 2"));
    assert_eq!(posts.count(None).await.unwrap(), 1);

    let err = posts
        .upsert(Some("junk"), field_values([("title", "x")]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid primary key for Upsert: junk");
}
