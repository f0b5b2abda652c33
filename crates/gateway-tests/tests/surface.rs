//! Module filtering tests.

use gateway_client::Error;
use gateway_tests::{StubReply, create_test_client, spawn_proxy, spawn_upstream};
use serde_json::json;

#[tokio::test]
async fn test_excluded_module_routes_are_not_found() {
    let (upstream, log) = spawn_upstream(|_| StubReply::json(json!({}))).await;
    let proxy = spawn_proxy(&upstream, Some("Alerts,Scanner"), Some("Scanner")).await;
    let client = create_test_client(&proxy);

    let result = client.get_scanner_params().await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    client.get_mta_alert().await.expect("Alerts should be visible");
    assert_eq!(log.calls().await.len(), 1);
}

#[tokio::test]
async fn test_unknown_tags_expose_nothing() {
    let (upstream, log) = spawn_upstream(|_| StubReply::json(json!({}))).await;
    let proxy = spawn_proxy(&upstream, Some("Nonexistent"), None).await;
    let client = create_test_client(&proxy);

    assert!(matches!(client.get_mta_alert().await, Err(Error::NotFound(_))));
    assert!(matches!(
        client.get_scanner_params().await,
        Err(Error::NotFound(_))
    ));
    client.health_check().await.expect("Health is always exposed");
    assert_eq!(log.calls().await.len(), 0);
}

#[tokio::test]
async fn test_no_filters_expose_everything() {
    let (upstream, _log) = spawn_upstream(|_| StubReply::json(json!({"ok": true}))).await;
    let proxy = spawn_proxy(&upstream, None, None).await;
    let client = create_test_client(&proxy);

    client.get_mta_alert().await.expect("Alerts should be visible");
    client
        .get_scanner_params()
        .await
        .expect("Scanner should be visible");
}
