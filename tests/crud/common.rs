//! Shared fixtures for the CRUD suite
//!
//! Every fixture builds its model on a fresh `MemoryBackend`, so tests are
//! isolated without any cleanup choreography.

use std::sync::Arc;

use burrowdb::{field_values, FieldType, MemoryBackend, Model, ModelSchema};

/// Opt-in test logging: `RUST_LOG=debug cargo test -- --nocapture`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The `post` model: title + content
pub fn posts() -> Model {
    init_tracing();
    let schema = ModelSchema::builder("post")
        .collection("Posts")
        .field("title", FieldType::String)
        .field("content", FieldType::String)
        .build()
        .expect("post schema is valid");
    Model::new(schema, Arc::new(MemoryBackend::new()))
}

/// The `city` model: a single string field
pub fn cities() -> Model {
    init_tracing();
    let schema = ModelSchema::builder("city")
        .field("city", FieldType::String)
        .build()
        .expect("city schema is valid");
    Model::new(schema, Arc::new(MemoryBackend::new()))
}

/// City names used across ordering/pagination/count scenarios
pub const CITY_NAMES: [&str; 8] = [
    "Palo Alto",
    "Lake Tahoe",
    "Half Moon Bay",
    "Chicago",
    "Houston",
    "Fresno",
    "Paris",
    "Rome",
];

/// Insert the full city fixture set
pub async fn seed_cities(model: &Model) {
    let items = CITY_NAMES
        .iter()
        .map(|name| field_values([("city", *name)]))
        .collect();
    model
        .create_many(items)
        .await
        .expect("city fixtures insert");
}
