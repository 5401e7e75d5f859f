//! Token data client for the Moralis Solana gateway.
//!
//! Two read-only lookups back the whole bot: token metadata (name) and token
//! price in USD. The client is constructed once at startup with its API key
//! and request timeout; there is no lazy initialization and no retry logic,
//! only the configured timeout.
//!
//! Outcomes are classified once, here: HTTP 404 and well-formed bodies missing
//! the expected field are [`Lookup::NotFound`]; network failures and any other
//! non-2xx status propagate as transient errors.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Production base URL of the Moralis Solana gateway.
pub const DEFAULT_BASE_URL: &str = "https://solana-gateway.moralis.io";

/// A snapshot of a token's name and USD price.
///
/// Produced fresh on every fetch; never cached, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    /// Token name from the metadata endpoint.
    pub name: String,
    /// USD price, if the gateway knows one for this token.
    pub usd_price: Option<f64>,
    /// When this snapshot was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of a lookup that can legitimately find nothing.
///
/// Transient failures are not a variant here; they travel as `Err` so the two
/// kinds of "no data" stay distinguishable all the way to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The gateway returned the requested data.
    Found(T),
    /// The gateway answered authoritatively that there is no such token.
    NotFound,
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(rename = "usdPrice")]
    usd_price: Option<f64>,
}

/// Client for the Moralis Solana gateway.
#[derive(Debug, Clone)]
pub struct MoralisClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MoralisClient {
    /// Creates a new client.
    ///
    /// Addresses are treated as opaque strings; no validation beyond
    /// non-emptiness happens at this layer. The base URL is injectable so
    /// tests can point the client at a local mock server.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetches the token name from the metadata endpoint.
    ///
    /// # Errors
    /// Transient failures (network errors, unexpected gateway statuses)
    /// surface as `Err`; a missing token is `Ok(Lookup::NotFound)`.
    pub async fn token_name(&self, address: &str) -> Result<Lookup<String>> {
        let url = format!("{}/token/mainnet/{}/metadata", self.base_url, address);
        let response = match self.get_checked(&url).await? {
            Lookup::Found(response) => response,
            Lookup::NotFound => return Ok(Lookup::NotFound),
        };

        let metadata: MetadataResponse = response.json().await.inspect_err(|e| {
            warn!("Malformed metadata body for {}: {}", address, e);
        })?;

        Ok(match metadata.name.filter(|name| !name.is_empty()) {
            Some(name) => Lookup::Found(name),
            None => Lookup::NotFound,
        })
    }

    /// Fetches the token's USD price.
    ///
    /// # Errors
    /// Transient failures surface as `Err`; a missing token or a body
    /// without a `usdPrice` field is `Ok(Lookup::NotFound)`.
    pub async fn token_price(&self, address: &str) -> Result<Lookup<f64>> {
        let url = format!("{}/token/mainnet/{}/price", self.base_url, address);
        let response = match self.get_checked(&url).await? {
            Lookup::Found(response) => response,
            Lookup::NotFound => return Ok(Lookup::NotFound),
        };

        let price: PriceResponse = response.json().await.inspect_err(|e| {
            warn!("Malformed price body for {}: {}", address, e);
        })?;

        Ok(match price.usd_price {
            Some(usd_price) => Lookup::Found(usd_price),
            None => Lookup::NotFound,
        })
    }

    /// Fetches a full [`TokenInfo`] snapshot: name first, then price.
    ///
    /// A token without metadata is `NotFound`. A token with metadata but no
    /// price is still `Found`, with `usd_price: None`; the render layer is
    /// responsible for showing that as unavailable.
    ///
    /// # Errors
    /// Transient failures from either lookup surface as `Err`.
    pub async fn token_info(&self, address: &str) -> Result<Lookup<TokenInfo>> {
        let name = match self.token_name(address).await? {
            Lookup::Found(name) => name,
            Lookup::NotFound => return Ok(Lookup::NotFound),
        };

        let usd_price = match self.token_price(address).await? {
            Lookup::Found(price) => Some(price),
            Lookup::NotFound => None,
        };

        Ok(Lookup::Found(TokenInfo {
            name,
            usd_price,
            fetched_at: Utc::now(),
        }))
    }

    /// Performs a GET and classifies the status line.
    async fn get_checked(&self, url: &str) -> Result<Lookup<reqwest::Response>> {
        let response = self
            .http
            .get(url)
            .header("accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .inspect_err(|e| warn!("Request to {} failed: {}", url, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Lookup::NotFound);
        }
        if !status.is_success() {
            warn!("Gateway returned {} for {}", status, url);
            return Err(Error::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(Lookup::Found(response))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn client_for(server: &mockito::Server) -> MoralisClient {
        MoralisClient::new("test-api-key", &server.url(), TIMEOUT).unwrap()
    }

    #[tokio::test]
    async fn test_token_name_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/token/mainnet/ABC123/metadata")
            .match_header("X-API-Key", "test-api-key")
            .with_status(200)
            .with_body(r#"{"name": "FooCoin", "symbol": "FOO"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.token_name("ABC123").await.unwrap();

        assert_eq!(result, Lookup::Found("FooCoin".to_string()));
        mock.assert();
    }

    #[tokio::test]
    async fn test_token_name_404_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/MISSING/metadata")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.token_name("MISSING").await.unwrap();

        assert_eq!(result, Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_token_name_500_is_transient_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/ABC123/metadata")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.token_name("ABC123").await.unwrap_err();

        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_token_name_missing_field_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/ABC123/metadata")
            .with_status(200)
            .with_body(r#"{"symbol": "FOO"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.token_name("ABC123").await.unwrap();

        assert_eq!(result, Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_token_price_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/ABC123/price")
            .match_header("X-API-Key", "test-api-key")
            .with_status(200)
            .with_body(r#"{"usdPrice": 1.23}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.token_price("ABC123").await.unwrap();

        assert_eq!(result, Lookup::Found(1.23));
    }

    #[tokio::test]
    async fn test_token_price_missing_usd_price_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/ABC123/price")
            .with_status(200)
            .with_body(r#"{"exchangeName": "Raydium"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.token_price("ABC123").await.unwrap();

        assert_eq!(result, Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_token_info_combines_name_and_price() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/ABC123/metadata")
            .with_status(200)
            .with_body(r#"{"name": "FooCoin"}"#)
            .create_async()
            .await;
        let _price_mock = server
            .mock("GET", "/token/mainnet/ABC123/price")
            .with_status(200)
            .with_body(r#"{"usdPrice": 1.23}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let Lookup::Found(info) = client.token_info("ABC123").await.unwrap() else {
            panic!("expected a Found lookup");
        };

        assert_eq!(info.name, "FooCoin");
        assert_eq!(info.usd_price, Some(1.23));
    }

    #[tokio::test]
    async fn test_token_info_price_not_found_still_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/ABC123/metadata")
            .with_status(200)
            .with_body(r#"{"name": "FooCoin"}"#)
            .create_async()
            .await;
        let _price_mock = server
            .mock("GET", "/token/mainnet/ABC123/price")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let Lookup::Found(info) = client.token_info("ABC123").await.unwrap() else {
            panic!("expected a Found lookup");
        };

        assert_eq!(info.name, "FooCoin");
        assert_eq!(info.usd_price, None);
    }

    #[tokio::test]
    async fn test_token_info_no_metadata_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/MISSING/metadata")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.token_info("MISSING").await.unwrap();

        assert!(matches!(result, Lookup::NotFound));
    }

    #[tokio::test]
    async fn test_token_info_idempotent_for_fixed_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/token/mainnet/ABC123/metadata")
            .with_status(200)
            .with_body(r#"{"name": "FooCoin"}"#)
            .expect(2)
            .create_async()
            .await;
        let _price_mock = server
            .mock("GET", "/token/mainnet/ABC123/price")
            .with_status(200)
            .with_body(r#"{"usdPrice": 1.23}"#)
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server);
        let Lookup::Found(first) = client.token_info("ABC123").await.unwrap() else {
            panic!("expected a Found lookup");
        };
        let Lookup::Found(second) = client.token_info("ABC123").await.unwrap() else {
            panic!("expected a Found lookup");
        };

        assert_eq!(first.name, second.name);
        assert_eq!(first.usd_price, second.usd_price);
    }
}
