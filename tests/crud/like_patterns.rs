//! The like-pattern fixture table from the original connector suite
//!
//! Each case inserts one record and asserts its pattern finds it. Both
//! literal-percent spellings (`\%` and `%%`) must round-trip.

use burrowdb::{field_values, Query};

use crate::common;

const CASES: [(&str, &str); 8] = [
    ("Hello world", "Hello%"),
    ("Hello world", "%world"),
    ("Hello world", "%Hello%"),
    ("10% Off", "10%% %"),
    ("10% Off", "10\\% %"),
    ("Hello world", "Hello world"),
    ("Hello world", "He%ld"),
    ("We use _.js", "We % \\_._s"),
];

#[tokio::test]
async fn every_fixture_pattern_matches_its_insert() {
    for (insert, pattern) in CASES {
        let posts = common::posts();
        posts
            .create(field_values([("title", insert)]))
            .await
            .unwrap_or_else(|e| panic!("{pattern}: insert failed: {e}"));

        let coll = posts
            .query(&Query::new().where_like("title", pattern))
            .await
            .unwrap_or_else(|e| panic!("{pattern}: lookup failed: {e}"));
        assert!(
            !coll.is_empty(),
            "{pattern}: expected to match {insert:?}, found none"
        );
    }
}

#[tokio::test]
async fn non_matching_patterns_find_nothing() {
    let posts = common::posts();
    posts
        .create(field_values([("title", "10% Off")]))
        .await
        .unwrap();

    // Escaped percent is literal, so this requires a real percent sign.
    let coll = posts
        .query(&Query::new().where_like("title", "10\\% Discount"))
        .await
        .unwrap();
    assert!(coll.is_empty());

    // Underscore matches exactly one character.
    let coll = posts
        .query(&Query::new().where_like("title", "10% Of"))
        .await
        .unwrap();
    assert!(coll.is_empty());
}
