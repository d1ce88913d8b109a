//! @ai:module:intent Render the summarization prompt for one article
//! @ai:module:layer domain
//! @ai:module:public_api render_summary_prompt, SYSTEM_PROMPT
//! @ai:module:stateless true

/// System message sent ahead of every summarization prompt
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const TEMPLATE_HEAD: &str = "\nYou are a professional summarizer.\n\
Summarize the following article into 3 concise bullet points.\n\
Focus on the main ideas and key facts.\n\
\n\
Article:\n\
\"\"\"\n";

const TEMPLATE_TAIL: &str = "\n\"\"\"\n\nSummary:\n";

/// @ai:intent Build the user prompt asking for a three-bullet summary
/// @ai:post result == TEMPLATE_HEAD + article_text + TEMPLATE_TAIL
/// @ai:effects pure
///
/// The article text is concatenated, never scanned, so anything in it that
/// looks like template syntax is kept as-is.
pub fn render_summary_prompt(article_text: &str) -> String {
    let mut prompt =
        String::with_capacity(TEMPLATE_HEAD.len() + article_text.len() + TEMPLATE_TAIL.len());
    prompt.push_str(TEMPLATE_HEAD);
    prompt.push_str(article_text);
    prompt.push_str(TEMPLATE_TAIL);
    prompt
}
