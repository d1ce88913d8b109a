//! @ai:module:intent Article summarizer library
//! @ai:module:layer application
//! @ai:module:public_api config, error, prompt, table, runner, report

pub mod config;
pub mod error;
pub mod prompt;
pub mod report;
pub mod runner;
pub mod table;

pub use config::SummarizerConfig;
pub use error::{Result, SummarizerError};
pub use prompt::{render_summary_prompt, SYSTEM_PROMPT};
pub use report::{render_table, RunStats};
pub use runner::{
    BatchExecutor, CompletionClient, CompletionError, MockCompletionClient, OpenAiClient,
    RetryPolicy, Summary, SummaryStatus, TokioSleeper, FAILURE_SENTINEL,
};
pub use table::{ArticleRow, SummaryRow, TableStore};
