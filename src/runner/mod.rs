//! @ai:module:intent Article summarization: API client, retry policy and batch driver
//! @ai:module:layer infrastructure
//! @ai:module:public_api CompletionClient, OpenAiClient, RetryPolicy, BatchExecutor

pub mod client;
pub mod executor;
pub mod retry;

pub use client::{
    classify_error, CompletionClient, CompletionError, MockCompletionClient, OpenAiClient,
};
pub use executor::{to_rows, BatchExecutor, ExecutionResult};
pub use retry::{RetryPolicy, Sleeper, Summary, SummaryStatus, TokioSleeper, FAILURE_SENTINEL};
