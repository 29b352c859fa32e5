//! findAndModify: the atomic locate-and-mutate quartet

use burrowdb::{field_values, FindAndModifyOptions, Query, UpdateSpec};

use crate::common;

#[tokio::test]
async fn no_match_without_upsert_returns_none() {
    let posts = common::posts();
    posts
        .create(field_values([
            ("title", "My Title"),
            ("content", "My name is George."),
        ]))
        .await
        .unwrap();

    let result = posts
        .find_and_modify(
            &Query::new().where_eq("title", "Your Title"),
            UpdateSpec::Set(field_values([("title", "Our Title")])),
            FindAndModifyOptions {
                upsert: false,
                new: false,
            },
        )
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn no_match_with_upsert_creates_a_record() {
    let posts = common::posts();
    let created = posts
        .create(field_values([
            ("title", "My Title"),
            ("content", "My name is George."),
        ]))
        .await
        .unwrap();

    posts
        .find_and_modify(
            &Query::new().where_eq("title", "Your Title"),
            UpdateSpec::Set(field_values([
                ("content", "Our Content"),
                ("title", "Our Title"),
            ])),
            FindAndModifyOptions {
                upsert: true,
                new: false,
            },
        )
        .await
        .unwrap();

    let result = posts
        .find_one(
            &Query::new()
                .where_eq("content", "Our Content")
                .where_eq("title", "Our Title"),
        )
        .await
        .unwrap()
        .expect("upserted record should be queryable");

    assert_ne!(result.key(), created.key());
    assert_eq!(result.get_str("title"), Some("Our Title"));
    assert_eq!(result.get_str("content"), Some("Our Content"));
}

#[tokio::test]
async fn match_returns_the_old_document_by_default() {
    let posts = common::posts();
    let created = posts
        .create(field_values([
            ("title", "My Title"),
            ("content", "My name is George."),
        ]))
        .await
        .unwrap();

    let result = posts
        .find_and_modify(
            &Query::new()
                .where_eq("title", "My Title")
                .order_by_dynamic("title", -1)
                .order_by_dynamic("content", 1),
            UpdateSpec::Set(field_values([("title", "Our Title")])),
            FindAndModifyOptions::default(),
        )
        .await
        .unwrap()
        .expect("should match the created record");

    assert_eq!(result.key(), created.key());
    assert_eq!(result.get_str("title"), Some("My Title"));
    assert_eq!(result.get_str("content"), Some("My name is George."));

    // The stored record did change.
    let stored = posts
        .find_by_id(created.key().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get_str("title"), Some("Our Title"));
}

#[tokio::test]
async fn set_update_with_new_returns_the_post_update_document() {
    let posts = common::posts();
    let created = posts
        .create(field_values([
            ("title", "My Title"),
            ("content", "My name is George."),
        ]))
        .await
        .unwrap();

    let result = posts
        .find_and_modify(
            &Query::new().where_eq("title", "My Title"),
            UpdateSpec::Set(field_values([("title", "Our Title")])),
            FindAndModifyOptions {
                upsert: false,
                new: true,
            },
        )
        .await
        .unwrap()
        .expect("should match the created record");

    assert_eq!(result.key(), created.key());
    assert_eq!(result.get_str("title"), Some("Our Title"));
    // $set merges; untouched fields survive.
    assert_eq!(result.get_str("content"), Some("My name is George."));
}

#[tokio::test]
async fn replace_update_drops_unmentioned_fields() {
    let posts = common::posts();
    posts
        .create(field_values([
            ("title", "My Title"),
            ("content", "Body"),
        ]))
        .await
        .unwrap();

    let result = posts
        .find_and_modify(
            &Query::new().where_eq("title", "My Title"),
            UpdateSpec::Replace(field_values([("title", "Only Title")])),
            FindAndModifyOptions {
                upsert: false,
                new: true,
            },
        )
        .await
        .unwrap()
        .expect("should match");

    assert_eq!(result.get_str("title"), Some("Only Title"));
    assert_eq!(result.get("content"), None);
}
