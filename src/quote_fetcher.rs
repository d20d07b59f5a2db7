use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::config::QuoteConfig;
use crate::core::PriceQuote;
use crate::error::SpyResult;

const USER_AGENT: &str = concat!("equilibrium-spy/", env!("CARGO_PKG_VERSION"));

/// Source of spot prices for a set of assets
#[async_trait]
pub trait PriceSource {
    /// Fetch one quote for all `assets`. A non-200 answer yields an empty quote.
    async fn fetch_prices(&self, assets: &[String], vs_currency: &str) -> SpyResult<PriceQuote>;
}

/// CoinGecko `simple/price` response: asset id -> { currency -> price }
type SimplePriceResponse = HashMap<String, HashMap<String, Value>>;

/// Client for the CoinGecko `simple/price` endpoint
pub struct CoinGeckoClient {
    client: Client,
    api_base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Create a new client from the quote section of the config
    pub fn new(config: &QuoteConfig) -> SpyResult<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            api_base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the request URL with the comma-joined ids and the currency
    pub fn price_url(&self, assets: &[String], vs_currency: &str) -> SpyResult<Url> {
        let mut url = Url::parse(&format!("{}/simple/price", self.api_base_url))?;
        url.query_pairs_mut()
            .append_pair("ids", &assets.join(","))
            .append_pair("vs_currencies", vs_currency);
        Ok(url)
    }

    /// Decode a 200 response body into a quote
    ///
    /// Assets without a numeric price in `vs_currency` are left out.
    pub fn parse_quote(body: &str, vs_currency: &str) -> SpyResult<PriceQuote> {
        let response: SimplePriceResponse = serde_json::from_str(body)?;

        let mut quote = PriceQuote::new(vs_currency);
        for (asset, prices) in response {
            match prices.get(vs_currency).and_then(Value::as_f64) {
                Some(price) => {
                    quote.prices.insert(asset, price);
                }
                None => log::warn!("No {} price for {}", vs_currency, asset),
            }
        }
        Ok(quote)
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_prices(&self, assets: &[String], vs_currency: &str) -> SpyResult<PriceQuote> {
        let url = self.price_url(assets, vs_currency)?;
        log::info!("Fetching {} prices from CoinGecko: {}", assets.len(), url);

        let mut request = self.client.get(url);
        if let Some(ref api_key) = self.api_key {
            request = request.header("x-cg-demo-api-key", api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            log::error!("Failed to fetch prices, status code: {}", status);
            log::error!("Error details: {}", body);
            return Ok(PriceQuote::new(vs_currency));
        }

        let quote = Self::parse_quote(&body, vs_currency)?;
        log::info!("Fetched {} prices in {}", quote.len(), vs_currency);
        Ok(quote)
    }
}
