//! Testing utilities for Gova workspace
//!
//! Shared test helpers and fixtures.

#![allow(missing_docs)]

use gova_core::AdminController;
use gova_resource::{FieldDef, Label, Properties, Resource, ResourceRegistry};
use gova_store::{GraphStore, MemoryStore, DEFAULT_FETCH_LIMIT};
use serde_json::json;
use std::sync::Arc;

pub fn user_label() -> Label {
    Label::new("User").unwrap()
}

pub fn post_label() -> Label {
    Label::new("Post").unwrap()
}

pub fn user_properties(name: &str, email: &str) -> Properties {
    Properties::from([
        ("name".to_string(), json!(name)),
        ("email".to_string(), json!(email)),
    ])
}

pub fn ada() -> Properties {
    user_properties("Ada", "a@x.com")
}

pub fn post_resource() -> Resource {
    Resource::new(
        post_label(),
        vec![
            FieldDef::text("Title", "title"),
            FieldDef::number("Likes", "likes"),
            FieldDef::select("Status", "status", ["draft", "published"]),
        ],
    )
    .unwrap()
}

/// `User` followed by `Post`
pub fn test_registry() -> ResourceRegistry {
    ResourceRegistry::from_resources([Resource::user(), post_resource()]).unwrap()
}

/// Memory store holding `count` users named `user-0`, `user-1`, ...
pub async fn seeded_store(count: usize) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .seed(
            &user_label(),
            (0..count).map(|i| user_properties(&format!("user-{i}"), &format!("u{i}@x.com"))),
        )
        .await;
    store
}

pub fn setup_controller(store: Arc<dyn GraphStore>) -> AdminController {
    AdminController::new(test_registry(), store, DEFAULT_FETCH_LIMIT).unwrap()
}

/// Controller over a fresh memory store, returned alongside the store
pub fn setup_memory_controller() -> (AdminController, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let controller = setup_controller(Arc::clone(&store) as Arc<dyn GraphStore>);
    (controller, store)
}
