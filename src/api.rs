//! Breed listing API client
//!
//! `BreedSource` is the seam between the catalog and the network: the
//! terminal front-end and the CLI use `HttpBreedSource`, tests plug in
//! canned pages.

use crate::error::{BreedViewError, Result};
use crate::AppConfig;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Default listing endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.thecatapi.com/v1/breeds";

/// Something that can return one page of raw breed items
pub trait BreedSource: Send + Sync {
    fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Value>>;
}

/// Blocking HTTP source for `GET <endpoint>?page={n}&limit={m}`
pub struct HttpBreedSource {
    client: Client,
    endpoint: String,
}

impl HttpBreedSource {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("breedview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl BreedSource for HttpBreedSource {
    fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("page", page), ("limit", limit)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(BreedViewError::UnexpectedStatus {
                page,
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        parse_page(page, &body)
    }
}

/// Decode a page body into its raw items.
///
/// The body must be a JSON array; its elements are passed through untouched
/// and normalized later, one by one.
pub fn parse_page(page: u32, body: &str) -> Result<Vec<Value>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| BreedViewError::decode(page, e))?;
    match value {
        Value::Array(items) => Ok(items),
        other => Err(BreedViewError::decode(
            page,
            format!("expected an array, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
