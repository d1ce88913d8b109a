//! @ai:module:intent Sequential batch driver over the article table
//! @ai:module:layer application
//! @ai:module:public_api BatchExecutor, ExecutionResult
//! @ai:module:stateless false

use crate::config::SummarizerConfig;
use crate::prompt::render_summary_prompt;
use crate::runner::client::CompletionClient;
use crate::runner::retry::{RetryPolicy, Sleeper, Summary, TokioSleeper};
use crate::table::{ArticleRow, SummaryRow};
use std::sync::Arc;
use std::time::Duration;

/// @ai:intent Result of summarizing a single article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub article_id: String,
    pub summary: Summary,
}

impl ExecutionResult {
    pub fn to_row(&self) -> SummaryRow {
        SummaryRow::new(self.article_id.clone(), self.summary.text.clone())
    }
}

/// @ai:intent Runs every article through render -> retrying call -> pause, in order
pub struct BatchExecutor<C: CompletionClient, S: Sleeper = TokioSleeper> {
    client: Arc<C>,
    sleeper: Arc<S>,
    policy: RetryPolicy,
    politeness_delay: Duration,
}

impl<C: CompletionClient> BatchExecutor<C> {
    /// @ai:intent Create an executor that sleeps on the tokio timer
    /// @ai:effects pure
    pub fn new(client: Arc<C>, config: &SummarizerConfig) -> Self {
        Self::with_sleeper(
            client,
            Arc::new(TokioSleeper),
            RetryPolicy::from(&config.retry),
            config.run.politeness_delay(),
        )
    }
}

impl<C: CompletionClient, S: Sleeper> BatchExecutor<C, S> {
    /// @ai:intent Create an executor with an explicit sleeper and policy
    /// @ai:effects pure
    pub fn with_sleeper(
        client: Arc<C>,
        sleeper: Arc<S>,
        policy: RetryPolicy,
        politeness_delay: Duration,
    ) -> Self {
        Self {
            client,
            sleeper,
            policy,
            politeness_delay,
        }
    }

    /// @ai:intent Summarize one article; failures come back as the sentinel
    /// @ai:effects network, time
    pub async fn summarize_article(&self, article: &ArticleRow) -> ExecutionResult {
        let prompt = render_summary_prompt(&article.text);
        let summary = self
            .policy
            .summarize(self.client.as_ref(), self.sleeper.as_ref(), &prompt, &article.text)
            .await;

        ExecutionResult {
            article_id: article.id.clone(),
            summary,
        }
    }

    /// @ai:intent Summarize all articles in table order
    /// @ai:post result.len() == articles.len() && ids match in order
    /// @ai:effects network, time
    pub async fn execute_all(&self, articles: &[ArticleRow]) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(articles.len());
        let total = articles.len();

        tracing::info!("--- Starting Summarization Process ---");

        for (i, article) in articles.iter().enumerate() {
            tracing::info!("[{}/{}] Processing article ID: {}", i + 1, total, article.id);

            let result = self.summarize_article(article).await;
            tracing::debug!(
                article_id = %result.article_id,
                attempts = result.summary.attempts,
                status = ?result.summary.status,
                "article finished"
            );
            results.push(result);

            self.sleeper.sleep(self.politeness_delay).await;
        }

        results
    }
}

/// @ai:intent Convert execution results into output table rows
/// @ai:effects pure
pub fn to_rows(results: &[ExecutionResult]) -> Vec<SummaryRow> {
    results.iter().map(ExecutionResult::to_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::client::{CompletionError, MockCompletionClient};
    use crate::runner::retry::tests::RecordingSleeper;
    use crate::runner::retry::{SummaryStatus, FAILURE_SENTINEL};
    use pretty_assertions::assert_eq;

    fn executor(
        client: MockCompletionClient,
    ) -> (
        BatchExecutor<MockCompletionClient, RecordingSleeper>,
        Arc<MockCompletionClient>,
        Arc<RecordingSleeper>,
    ) {
        let client = Arc::new(client);
        let sleeper = Arc::new(RecordingSleeper::default());
        let executor = BatchExecutor::with_sleeper(
            client.clone(),
            sleeper.clone(),
            RetryPolicy::default(),
            Duration::from_millis(500),
        );
        (executor, client, sleeper)
    }

    #[tokio::test]
    async fn test_single_article_always_succeeding() {
        let (executor, _, _) = executor(MockCompletionClient::new("Sum-A"));

        let results = executor.execute_all(&[ArticleRow::new("1", "A")]).await;

        assert_eq!(to_rows(&results), vec![SummaryRow::new("1", "Sum-A")]);
    }

    #[tokio::test]
    async fn test_one_row_per_article_in_order() {
        let (executor, client, _) = executor(MockCompletionClient::new("ok"));
        let articles: Vec<_> = ["10", "b", "3", "x-9"]
            .iter()
            .map(|id| ArticleRow::new(*id, format!("text {id}")))
            .collect();

        let rows = to_rows(&executor.execute_all(&articles).await);

        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "b", "3", "x-9"]);
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test]
    async fn test_failed_article_carries_sentinel_and_run_continues() {
        let (executor, client, sleeper) = executor(MockCompletionClient::new("fine").with_script([
            Err(CompletionError::Unexpected("socket closed".to_string())),
        ]));

        let results = executor
            .execute_all(&[ArticleRow::new("1", "A"), ArticleRow::new("2", "B")])
            .await;

        assert_eq!(results[0].summary.text, FAILURE_SENTINEL);
        assert_eq!(results[0].summary.status, SummaryStatus::Aborted);
        assert_eq!(results[1].summary.text, "fine");
        assert_eq!(client.calls(), 2);
        // politeness pause follows every article regardless of outcome
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_millis(500), Duration::from_millis(500)]
        );
    }

    #[tokio::test]
    async fn test_backoff_precedes_politeness_pause() {
        let (executor, _, sleeper) = executor(MockCompletionClient::new("late").with_script([Err(
            CompletionError::RateLimited {
                message: "slow down".to_string(),
            },
        )]));

        let results = executor.execute_all(&[ArticleRow::new("1", "A")]).await;

        assert_eq!(results[0].summary.attempts, 2);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_millis(500)]
        );
    }

    #[tokio::test]
    async fn test_prompt_is_rendered_from_article_text() {
        let (executor, client, _) = executor(MockCompletionClient::new("ok"));

        executor.summarize_article(&ArticleRow::new("1", "{{ raw }}")).await;

        assert_eq!(client.prompts().await, vec![render_summary_prompt("{{ raw }}")]);
    }

    #[tokio::test]
    async fn test_table_in_table_out() {
        use crate::table::TableStore;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let store = TableStore::new(
            temp.path().join("articles.csv"),
            temp.path().join("summaries.csv"),
        );
        std::fs::write(store.input_path(), "id,text\n1,A\n").unwrap();
        let (executor, _, _) = executor(MockCompletionClient::new("Sum-A"));

        let articles = store.load_or_create_articles().unwrap();
        let rows = to_rows(&executor.execute_all(&articles).await);
        store.write_summaries(&rows).unwrap();

        assert_eq!(
            std::fs::read_to_string(store.output_path()).unwrap(),
            "id,summary\n1,Sum-A\n"
        );
    }

    #[tokio::test]
    async fn test_empty_table() {
        let (executor, client, _) = executor(MockCompletionClient::new("ok"));

        assert!(executor.execute_all(&[]).await.is_empty());
        assert_eq!(client.calls(), 0);
    }
}
