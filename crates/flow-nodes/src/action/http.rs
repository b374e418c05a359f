//! HTTP action node
//!
//! Performs a request against a configured URL and propagates
//! `{ "status": <code>, "data": <parsed JSON body> }`. For non-GET
//! methods without a configured body, the upstream input is sent as the
//! JSON body. Network errors and non-JSON responses fail the node; the
//! engine prunes the branch, no automatic retry.

use async_trait::async_trait;
use flow_engine::{
    node_types, ExecutionContext, FlowError, NodeBehavior, NodeCategory, NodeDefinition,
    NodeMetadata, Result,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

fn default_method() -> String {
    "GET".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpConfig {
    /// Target URL (required)
    url: String,
    /// HTTP method, default GET
    #[serde(default = "default_method")]
    method: String,
    /// Extra request headers
    #[serde(default)]
    headers: HashMap<String, String>,
    /// Static request body; falls back to the upstream input for non-GET
    #[serde(default)]
    body: Option<Value>,
}

impl HttpConfig {
    /// Body to send, if any: GET sends none, other methods prefer the
    /// configured body and fall back to the upstream input.
    fn resolve_body(&self, input: &Value) -> Option<Value> {
        if self.method.eq_ignore_ascii_case("GET") {
            None
        } else {
            Some(self.body.clone().unwrap_or_else(|| input.clone()))
        }
    }
}

/// HTTP action node
pub struct HttpActionNode {
    node_id: String,
    data: Value,
    client: reqwest::Client,
}

impl HttpActionNode {
    /// Registry metadata for this node type
    pub fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            node_types::ACTION_HTTP,
            NodeCategory::Action,
            "HTTP Request",
            "Performs an HTTP request and returns the response status and JSON body",
        )
    }

    /// Build an instance from a schema definition
    pub fn from_definition(definition: &NodeDefinition) -> Self {
        Self {
            node_id: definition.id.clone(),
            data: definition.data.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Parse the node configuration, failing on a missing/invalid URL or method
    fn config(&self) -> Result<(HttpConfig, reqwest::Method)> {
        let config: HttpConfig = serde_json::from_value(self.data.clone())
            .map_err(|e| FlowError::invalid_config(&self.node_id, e.to_string()))?;
        let method = reqwest::Method::from_bytes(config.method.to_uppercase().as_bytes())
            .map_err(|_| {
                FlowError::invalid_config(
                    &self.node_id,
                    format!("unsupported HTTP method '{}'", config.method),
                )
            })?;
        Ok((config, method))
    }
}

#[async_trait]
impl NodeBehavior for HttpActionNode {
    async fn execute(&self, input: &Value, _context: &ExecutionContext) -> Result<Value> {
        let (config, method) = self.config()?;

        log::info!(
            "[{}] HTTP {} request to {}",
            self.node_id,
            method,
            config.url
        );

        let mut request = self.client.request(method, &config.url);
        for (name, value) in &config.headers {
            request = request.header(name, value);
        }
        if let Some(body) = config.resolve_body(input) {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            FlowError::failed(format!(
                "HTTP request to {} failed: {}",
                config.url, e
            ))
        })?;
        let status = response.status().as_u16();

        let data: Value = response.json().await.map_err(|e| {
            FlowError::failed(format!(
                "Failed to parse response from {} as JSON: {}",
                config.url, e
            ))
        })?;

        Ok(json!({ "status": status, "data": data }))
    }
}
