//! @ai:module:intent Bounded exponential-backoff retry around one completion request
//! @ai:module:layer application
//! @ai:module:public_api RetryPolicy, Summary, SummaryStatus, Sleeper, TokioSleeper,
//!     FAILURE_SENTINEL
//! @ai:module:stateless true

use crate::config::RetryConfig;
use crate::prompt::SYSTEM_PROMPT;
use crate::runner::client::{CompletionClient, CompletionError};
use std::time::Duration;

/// Summary text recorded for an article whose request never succeeded
pub const FAILURE_SENTINEL: &str = "Summary generation failed.";

const LOG_PREVIEW_CHARS: usize = 50;

/// @ai:intent Trait for waiting between attempts
#[allow(async_fn_in_trait)]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// @ai:intent Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// @ai:intent How a summarization attempt sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStatus {
    Succeeded,
    /// Every allowed attempt hit a retryable error
    Exhausted,
    /// A non-retryable error stopped the loop
    Aborted,
}

/// @ai:intent Result of summarizing one article
/// @ai:invariant status != Succeeded => text == FAILURE_SENTINEL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub attempts: u32,
    pub status: SummaryStatus,
}

impl Summary {
    fn failed(attempts: u32, status: SummaryStatus) -> Self {
        Self {
            text: FAILURE_SENTINEL.to_string(),
            attempts,
            status,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == SummaryStatus::Succeeded
    }
}

/// @ai:intent Attempt cap and starting delay for the backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: config.initial_delay(),
        }
    }
}

impl RetryPolicy {
    /// @ai:intent Request a summary, retrying rate-limit and service errors with doubling delays
    /// @ai:pre prompt was rendered from article_text
    /// @ai:post result.attempts <= self.max_attempts
    /// @ai:effects network, time
    ///
    /// Never fails: exhaustion and unexpected errors both yield the sentinel.
    /// The delay is slept after every retryable failure, including the last.
    pub async fn summarize<C, S>(
        &self,
        client: &C,
        sleeper: &S,
        prompt: &str,
        article_text: &str,
    ) -> Summary
    where
        C: CompletionClient,
        S: Sleeper,
    {
        let mut delay = self.initial_delay;
        let mut attempts = 0;
        let mut status = SummaryStatus::Exhausted;

        while attempts < self.max_attempts {
            attempts += 1;

            match client.complete(SYSTEM_PROMPT, prompt).await {
                Ok(text) => {
                    return Summary {
                        text,
                        attempts,
                        status: SummaryStatus::Succeeded,
                    };
                }
                Err(err) if !err.is_retryable() => {
                    tracing::error!("An unexpected error occurred: {}", err);
                    status = SummaryStatus::Aborted;
                    break;
                }
                Err(CompletionError::RateLimited { .. }) => {
                    tracing::warn!(
                        "Rate limit hit. Retrying in {} seconds...",
                        delay.as_secs_f64()
                    );
                }
                Err(err) => {
                    tracing::warn!("API Error: {}. Retrying...", err);
                }
            }

            sleeper.sleep(delay).await;
            delay = delay.saturating_mul(2);
        }

        tracing::error!(
            "Failed to get LLM summary after {} retries for article: {}...",
            self.max_attempts,
            preview(article_text)
        );

        Summary::failed(attempts, status)
    }
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
