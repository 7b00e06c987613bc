#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! JSON-RPC client for EVM nodes.
//!
//! This crate owns exactly one concern: turning `eth_*` JSON-RPC calls into
//! [`raw`] structs and a three-way failure taxonomy ([`error::RpcError`]).
//! Retry policy lives in `indexer_retry`; hex/timestamp normalization and
//! chain-family dispatch live in `indexer_parsers`.

mod client;
mod error;
pub mod raw;

pub use client::{JsonRpcClient, RpcClient};
pub use error::RpcError;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, method},
        Mock, MockServer, ResponseTemplate,
    };

    async fn mock_server_with_block_number(hex: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_blockNumber"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 0,
                "result": hex,
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn block_number_decodes_hex_quantity() {
        let server = mock_server_with_block_number("0x2a").await;
        let client = JsonRpcClient::new("ethereum", &[server.uri().parse().unwrap()]).unwrap();
        assert_eq!(client.block_number().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn missing_block_decodes_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_getBlockByNumber"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 0,
                "result": null,
            })))
            .mount(&server)
            .await;
        let client = JsonRpcClient::new("ethereum", &[server.uri().parse().unwrap()]).unwrap();
        assert!(client.get_block_by_number(999_999).await.unwrap().is_none());
    }

    #[test]
    fn new_rejects_empty_endpoint_list() {
        assert!(JsonRpcClient::new("ethereum", &[]).is_err());
    }

    #[tokio::test]
    async fn shape_mismatch_is_structural_not_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_blockNumber"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                // `eth_blockNumber` must decode to a hex string; a bare
                // number is a shape mismatch, not a transport failure.
                "result": 42,
            })))
            .mount(&server)
            .await;
        let client = JsonRpcClient::new("ethereum", &[server.uri().parse().unwrap()]).unwrap();
        let err = client.block_number().await.unwrap_err();
        assert!(matches!(err, RpcError::Structural { .. }), "expected Structural, got {err:?}");
    }
}
