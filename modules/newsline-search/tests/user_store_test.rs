//! Integration tests for `UserProfileStore` against a real Postgres instance.
//!
//! Requirements: Docker (for Postgres via testcontainers)
//!
//! Run with: cargo test -p newsline-search --features test-utils --test user_store_test

#![cfg(feature = "test-utils")]

use newsline_common::EMBEDDING_DIM;

async fn setup() -> (impl std::any::Any, newsline_search::UserProfileStore) {
    newsline_search::testutil::postgres_container().await
}

fn unit_vec(value: f32) -> Vec<f32> {
    let mut v = vec![0.0; EMBEDDING_DIM];
    v[0] = value;
    v
}

#[tokio::test]
async fn first_click_sets_interest_to_doc_vector() {
    let (_c, store) = setup().await;

    let doc_vec = unit_vec(1.0);
    let interest = store.record_click("user-1", &doc_vec).await.expect("record_click failed");

    assert_eq!(interest.cnt, 1);
    assert_eq!(interest.interest, doc_vec);
}

#[tokio::test]
async fn second_click_folds_into_running_mean() {
    let (_c, store) = setup().await;

    let first = unit_vec(1.0);
    let second = unit_vec(3.0);

    store.record_click("user-2", &first).await.expect("first click failed");
    let interest = store.record_click("user-2", &second).await.expect("second click failed");

    assert_eq!(interest.cnt, 2);
    // mean = 1.0 + (3.0 - 1.0) / 2 = 2.0
    assert!((interest.interest[0] - 2.0).abs() < 1e-6);
}

#[tokio::test]
async fn get_returns_none_for_unknown_user() {
    let (_c, store) = setup().await;

    let result = store.get("nobody").await.expect("get failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn record_click_rejects_wrong_dimension_vector() {
    let (_c, store) = setup().await;

    let bad_vec = vec![0.0; EMBEDDING_DIM - 1];
    let result = store.record_click("user-3", &bad_vec).await;
    assert!(result.is_err());
}
