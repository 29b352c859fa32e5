//! distinct: unique values of one field, optionally filtered

use burrowdb::{field_values, Query};
use serde_json::json;

use crate::common;

#[tokio::test]
async fn distinct_dedupes_and_honors_where() {
    let posts = common::posts();
    posts
        .create(field_values([
            ("content", "Hello world"),
            ("title", "Test"),
        ]))
        .await
        .unwrap();
    posts
        .create(field_values([
            ("content", "Aloha world"),
            ("title", "Test"),
        ]))
        .await
        .unwrap();
    posts
        .create(field_values([
            ("content", "Aloha world"),
            ("title", "Test-2"),
        ]))
        .await
        .unwrap();

    let values = posts.distinct("title", &Query::new()).await.unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.contains(&json!("Test")));
    assert!(values.contains(&json!("Test-2")));

    let filtered = posts
        .distinct("title", &Query::new().where_eq("content", "Hello world"))
        .await
        .unwrap();
    assert_eq!(filtered, vec![json!("Test")]);
}

#[tokio::test]
async fn distinct_on_an_unknown_field_fails() {
    let posts = common::posts();
    let err = posts
        .distinct("subtitle", &Query::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("subtitle"));
}
