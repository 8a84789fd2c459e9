use super::MarketMoodProvider;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct FearGreedResponse {
    data: Vec<FearGreedEntry>,
}

#[derive(Debug, Deserialize)]
struct FearGreedEntry {
    /// The API returns the index as a string.
    value: String,
}

/// alternative.me fear & greed index client.
#[derive(Clone)]
pub struct FearGreedClient {
    client: Client,
    url: String,
}

impl FearGreedClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Augur/0.1 (Crypto Signal Engine)")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.into(),
        }
    }

    fn parse(body: FearGreedResponse) -> Result<u8, FetchError> {
        let entry = body
            .data
            .first()
            .ok_or_else(|| FetchError::Malformed("empty fear & greed data".to_string()))?;
        let value: u8 = entry
            .value
            .trim()
            .parse()
            .map_err(|_| FetchError::Malformed(format!("bad index value '{}'", entry.value)))?;
        if value > 100 {
            return Err(FetchError::Malformed(format!("index {} out of range", value)));
        }
        Ok(value)
    }
}

#[async_trait]
impl MarketMoodProvider for FearGreedClient {
    async fn mood_index(&self) -> Result<u8, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body: FearGreedResponse = response.json().await?;
        let value = Self::parse(body)?;
        debug!("Fear & greed index: {}", value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> FearGreedResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_index() {
        let parsed = FearGreedClient::parse(body(
            r#"{"name":"Fear and Greed Index","data":[{"value":"27","value_classification":"Fear"}]}"#,
        ));
        assert_eq!(parsed.unwrap(), 27);
    }

    #[test]
    fn test_parse_empty_data() {
        let parsed = FearGreedClient::parse(body(r#"{"data":[]}"#));
        assert!(matches!(parsed, Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_parse_bad_value() {
        assert!(FearGreedClient::parse(body(r#"{"data":[{"value":"abc"}]}"#)).is_err());
        assert!(FearGreedClient::parse(body(r#"{"data":[{"value":"250"}]}"#)).is_err());
    }
}
