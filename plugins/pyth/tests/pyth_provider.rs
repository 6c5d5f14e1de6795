use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use onchain_actions_core::{ActionError, ActionProvider, ActionRegistry, ErrorKind, Network};
use onchain_actions_pyth::{PythActionProvider, PythConfig, DEFAULT_HERMES_URL};

fn pyth(base_url: Option<&str>) -> Arc<dyn ActionProvider> {
    let config = PythConfig {
        base_url: base_url.map(str::to_string),
    };
    Arc::new(PythActionProvider::new(&config).unwrap())
}

/// Serve exactly one HTTP response on a local port and return its base url.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}

fn registry_at(base_url: &str) -> ActionRegistry {
    ActionRegistry::new(
        Network::by_id("base-mainnet").unwrap(),
        vec![pyth(Some(base_url))],
    )
    .unwrap()
}

#[test]
fn available_on_every_network() {
    for id in ["base-mainnet", "arbitrum-sepolia", "solana-devnet"] {
        let registry = ActionRegistry::new(Network::by_id(id).unwrap(), vec![pyth(None)]).unwrap();
        let names: Vec<String> = registry.metadata().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["fetch_price_feed_id", "fetch_price"], "{id}");
    }
    let custom = ActionRegistry::new(Network::evm_chain("31337"), vec![pyth(None)]).unwrap();
    assert_eq!(custom.len(), 2);
}

#[test]
fn defaults_to_public_hermes() {
    let provider = PythActionProvider::new(&PythConfig::default()).unwrap();
    assert_eq!(provider.base_url().as_str().trim_end_matches('/'), DEFAULT_HERMES_URL);
}

#[test]
fn bad_base_url_is_a_configuration_error() {
    let err = PythActionProvider::new(&PythConfig {
        base_url: Some("hermes without scheme".into()),
    })
    .err()
    .unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("PYTH_HERMES_URL"));
}

#[test]
fn tool_definitions_describe_required_inputs() {
    let registry =
        ActionRegistry::new(Network::by_id("base-mainnet").unwrap(), vec![pyth(None)]).unwrap();
    let tools = registry.tool_definitions();
    assert_eq!(tools[0]["input_schema"]["required"], json!(["token_symbol"]));
    assert_eq!(tools[1]["input_schema"]["required"], json!(["price_feed_id"]));
}

#[tokio::test]
async fn missing_inputs_are_rejected_before_any_request() {
    // unroutable base url: a request would fail with a handler error instead
    let registry = ActionRegistry::new(
        Network::by_id("base-mainnet").unwrap(),
        vec![pyth(Some("http://127.0.0.1:9"))],
    )
    .unwrap();

    let err = registry.execute("fetch_price_feed_id", json!({})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("token_symbol"));

    let err = registry
        .execute("fetch_price", json!({ "price_feed_id": "abc", "extra": 1 }))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("extra"));
}

#[tokio::test]
async fn transport_failure_is_a_handler_error() {
    let registry = ActionRegistry::new(
        Network::by_id("base-mainnet").unwrap(),
        vec![pyth(Some("http://127.0.0.1:9"))],
    )
    .unwrap();

    match registry.execute("fetch_price", json!({ "price_feed_id": "abc" })).await {
        Err(ActionError::HandlerExecution { action, source }) => {
            assert_eq!(action, "fetch_price");
            assert!(source.downcast_ref::<reqwest::Error>().is_some());
        }
        other => panic!("expected HandlerExecution, got {other:?}"),
    }
}

#[tokio::test]
async fn error_status_is_a_handler_error() {
    let registry = registry_at(&serve_once("503 Service Unavailable", "{}").await);

    let err = registry
        .execute("fetch_price", json!({ "price_feed_id": "abc" }))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HandlerExecution);
    assert!(err.to_string().contains("503"), "{err}");
}

#[tokio::test]
async fn fetch_price_reads_latest_update() {
    let body = r#"{"parsed":[{"id":"abc","price":{"price":"6140993501999","conf":"1","expo":-8,"publish_time":1713971946}}]}"#;
    let registry = registry_at(&serve_once("200 OK", body).await);

    let out = registry
        .execute("fetch_price", json!({ "price_feed_id": "abc" }))
        .await
        .unwrap();
    let out: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(out["price"], "61409.93");
    assert_eq!(out["price_feed_id"], "abc");
}
