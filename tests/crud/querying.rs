//! Query execution: projections, ordering, pagination, counting

use burrowdb::{field_values, Direction, Query};
use serde_json::json;

use crate::common;

#[tokio::test]
async fn find_by_field_value() {
    let posts = common::posts();
    let created = posts
        .create(field_values([
            ("content", "Hello world 42"),
            ("title", "Test 42"),
        ]))
        .await
        .unwrap();

    let found = posts
        .find(&Query::new().where_eq("title", "Test 42"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].key(), created.key());
    assert_eq!(found[0].get_str("content"), Some("Hello world 42"));
}

#[tokio::test]
async fn select_and_unselect_yield_the_same_shape() {
    let posts = common::posts();
    posts
        .create(field_values([
            ("content", "Hello world"),
            ("title", "Test"),
        ]))
        .await
        .unwrap();

    let selected = posts
        .query(
            &Query::new()
                .where_like("content", "Hello%")
                .select("content")
                .order_by("content", Direction::Asc)
                .order_by("title", Direction::Desc)
                .limit(3),
        )
        .await
        .unwrap();
    assert!(!selected.is_empty());
    for record in &selected {
        assert!(record.key().is_some());
        assert!(record.get_str("content").is_some());
        // Projected out: absent, not empty and not null.
        assert_eq!(record.get("title"), None);
    }

    let unselected = posts
        .query(
            &Query::new()
                .where_like("content", "Hello%")
                .unselect("title")
                .order_by("content", Direction::Asc)
                .order_by("title", Direction::Desc)
                .limit(3),
        )
        .await
        .unwrap();
    assert_eq!(unselected.len(), selected.len());
    for record in &unselected {
        assert!(record.key().is_some());
        assert!(record.get_str("content").is_some());
        assert_eq!(record.get("title"), None);
    }
}

#[tokio::test]
async fn ordering_accepts_string_directions() {
    let cities = common::cities();
    common::seed_cities(&cities).await;

    let ordered = cities
        .query(&Query::new().order_by_dynamic("city", "-1"))
        .await
        .unwrap();
    assert_eq!(ordered.len(), common::CITY_NAMES.len());
    assert_eq!(ordered[0].get_str("city"), Some("Rome"));
    assert_eq!(
        ordered[common::CITY_NAMES.len() - 1].get_str("city"),
        Some("Chicago")
    );
}

#[tokio::test]
async fn page_per_page_equals_skip_limit() {
    let cities = common::cities();
    common::seed_cities(&cities).await;

    let paged = cities
        .query(
            &Query::new()
                .order_by("city", Direction::Asc)
                .page(2)
                .per_page(2),
        )
        .await
        .unwrap();
    let windowed = cities
        .query(
            &Query::new()
                .order_by("city", Direction::Asc)
                .skip(2)
                .limit(2),
        )
        .await
        .unwrap();

    assert_eq!(paged.len(), 2);
    let names =
        |records: &[burrowdb::Record]| -> Vec<String> {
            records
                .iter()
                .map(|r| r.get_str("city").unwrap().to_string())
                .collect()
        };
    assert_eq!(names(&paged), names(&windowed));
}

#[tokio::test]
async fn paged_like_query_finds_fresno() {
    let cities = common::cities();
    common::seed_cities(&cities).await;

    // Ends-with-o matches Palo Alto, Chicago, Fresno in insertion order;
    // the second page of two holds only Fresno.
    let coll = cities
        .query(&Query::new().where_like("city", "%o").page(2).per_page(2))
        .await
        .unwrap();
    assert_eq!(coll.len(), 1);
    assert_eq!(coll[0].get_str("city"), Some("Fresno"));
}

#[tokio::test]
async fn count_with_and_without_a_predicate() {
    let cities = common::cities();
    common::seed_cities(&cities).await;

    let total = cities.count(None).await.unwrap();
    assert_eq!(total, common::CITY_NAMES.len() as u64);

    let fresno = cities
        .count(Some(&Query::new().where_eq("city", "Fresno")))
        .await
        .unwrap();
    assert_eq!(fresno, 1);
}

#[tokio::test]
async fn unknown_field_in_where_is_an_error() {
    let cities = common::cities();
    let err = cities
        .query(&Query::new().where_eq("population", json!(1)))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("population"));
}

#[tokio::test]
async fn conflicting_pagination_is_an_error() {
    let cities = common::cities();
    let err = cities
        .query(&Query::new().page(1).per_page(2).skip(1))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("mutually exclusive"));
}
