//! @ai:module:intent Row types for the article and summary tables
//! @ai:module:layer domain
//! @ai:module:public_api ArticleRow, SummaryRow, fallback_articles
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent One article read from the input table
/// @ai:invariant id is unique within its table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRow {
    /// Opaque identifier, kept as text so integer and string ids round-trip
    pub id: String,
    /// Empty when the row ends before the text column
    #[serde(default)]
    pub text: String,
}

/// @ai:intent One result row of the output table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub id: String,
    pub summary: String,
}

impl ArticleRow {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl SummaryRow {
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
        }
    }
}

/// @ai:intent Sample articles written when no input table exists yet
/// @ai:post result.len() == 3 && ids are "1", "2", "3"
/// @ai:effects pure
pub fn fallback_articles() -> Vec<ArticleRow> {
    vec![
        ArticleRow::new(
            "1",
            "The recent discovery of a new exoplanet, Kepler-186f, has excited astronomers. \
             It is the first Earth-size planet found in the habitable zone of another star, \
             suggesting it could potentially harbor liquid water and life. This finding opens \
             new avenues for the search for extraterrestrial life.",
        ),
        ArticleRow::new(
            "2",
            "Quantum computing is a rapidly emerging technology that harnesses the principles \
             of quantum mechanics to solve problems too complex for classical computers. Unlike \
             classical bits, which are either 0 or 1, quantum bits (qubits) can be both \
             simultaneously, enabling exponential processing power.",
        ),
        ArticleRow::new(
            "3",
            "Artificial intelligence (AI) is rapidly transforming various industries, from \
             healthcare to finance. Machine learning, a subset of AI, enables systems to learn \
             from data without explicit programming. Deep learning, a further subset, uses \
             neural networks with many layers to achieve state-of-the-art performance in tasks \
             like image recognition and natural language processing.",
        ),
    ]
}
