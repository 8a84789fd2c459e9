use super::SentimentProvider;
use crate::error::FetchError;
use async_trait::async_trait;

/// Sentiment source with no news feed behind it; always neutral.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralSentiment;

#[async_trait]
impl SentimentProvider for NeutralSentiment {
    async fn sentiment(&self, _coin: &str) -> Result<f64, FetchError> {
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_neutral_sentiment() {
        assert_eq!(NeutralSentiment.sentiment("bitcoin").await.unwrap(), 0.0);
    }
}
