//! @ai:module:intent CSV storage for the article and summary tables
//! @ai:module:layer infrastructure
//! @ai:module:public_api TableStore, ArticleRow, SummaryRow
//! @ai:module:stateless true

pub mod rows;

pub use rows::{fallback_articles, ArticleRow, SummaryRow};

use crate::error::{Result, SummarizerError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// @ai:intent Reads the input table and writes the output table
pub struct TableStore {
    input: PathBuf,
    output: PathBuf,
}

impl TableStore {
    /// @ai:intent Create a store over the given table paths
    /// @ai:effects pure
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self { input, output }
    }

    pub fn input_path(&self) -> &Path {
        &self.input
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// @ai:intent Load articles, creating the fallback table first if none exists
    /// @ai:post input file exists after a successful call
    /// @ai:effects fs:read, fs:write
    pub fn load_or_create_articles(&self) -> Result<Vec<ArticleRow>> {
        if !self.input.exists() {
            tracing::info!("'{}' not found. Creating a dummy one.", self.input.display());
            let articles = fallback_articles();
            self.write_articles(&articles)?;
            tracing::info!("Dummy '{}' created.", self.input.display());
            return Ok(articles);
        }

        tracing::info!("Reading articles from existing '{}'.", self.input.display());
        self.read_articles()
    }

    /// @ai:intent Read every row of the input table
    /// @ai:pre input file has a header with id and text columns
    /// @ai:effects fs:read
    ///
    /// Short rows are accepted; a row without a text cell reads as empty text.
    pub fn read_articles(&self) -> Result<Vec<ArticleRow>> {
        let table_err = |source| SummarizerError::Table {
            path: self.input.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.input)
            .map_err(table_err)?;
        let mut articles = Vec::new();
        let mut seen = HashSet::new();

        for record in reader.deserialize::<ArticleRow>() {
            let article = record.map_err(table_err)?;

            if !seen.insert(article.id.clone()) {
                return Err(SummarizerError::DuplicateArticleId {
                    path: self.input.clone(),
                    id: article.id,
                });
            }
            articles.push(article);
        }

        Ok(articles)
    }

    /// @ai:intent Overwrite the input table with the given articles
    /// @ai:effects fs:write
    pub fn write_articles(&self, articles: &[ArticleRow]) -> Result<()> {
        write_table(
            &self.input,
            ["id", "text"],
            articles.iter().map(|a| [a.id.as_str(), a.text.as_str()]),
        )
    }

    /// @ai:intent Overwrite the output table with all summaries at once
    /// @ai:effects fs:write
    pub fn write_summaries(&self, summaries: &[SummaryRow]) -> Result<()> {
        write_table(
            &self.output,
            ["id", "summary"],
            summaries.iter().map(|s| [s.id.as_str(), s.summary.as_str()]),
        )?;

        tracing::info!("Generated summaries saved to '{}'.", self.output.display());
        Ok(())
    }

    /// @ai:intent Read the output table back (used to confirm what was written)
    /// @ai:effects fs:read
    pub fn read_summaries(&self) -> Result<Vec<SummaryRow>> {
        let table_err = |source| SummarizerError::Table {
            path: self.output.clone(),
            source,
        };

        let mut reader = csv::Reader::from_path(&self.output).map_err(table_err)?;
        reader
            .deserialize::<SummaryRow>()
            .map(|record| record.map_err(table_err))
            .collect()
    }
}

/// Header is written explicitly so an empty table still has one.
fn write_table<'a, I>(path: &Path, header: [&str; 2], rows: I) -> Result<()>
where
    I: IntoIterator<Item = [&'a str; 2]>,
{
    let table_err = |source| SummarizerError::Table {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(table_err)?;
    writer.write_record(header).map_err(table_err)?;

    for row in rows {
        writer.write_record(row).map_err(table_err)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> TableStore {
        TableStore::new(
            temp.path().join("articles.csv"),
            temp.path().join("summaries.csv"),
        )
    }

    #[test]
    fn test_missing_input_creates_fallback_table() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let articles = store.load_or_create_articles().unwrap();

        assert!(store.input_path().exists());
        let ids: Vec<_> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(store.read_articles().unwrap(), articles);
    }

    #[test]
    fn test_existing_input_is_not_recreated() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.load_or_create_articles().unwrap();
        std::fs::write(store.input_path(), "id,text\n7,Edited\n").unwrap();

        let articles = store.load_or_create_articles().unwrap();
        assert_eq!(articles, vec![ArticleRow::new("7", "Edited")]);
    }

    #[test]
    fn test_read_keeps_string_ids_and_ignores_extra_columns() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::write(
            store.input_path(),
            "source,id,text\nwire,a-17,First\nblog,0042,Second\n",
        )
        .unwrap();

        let articles = store.read_articles().unwrap();
        assert_eq!(
            articles,
            vec![
                ArticleRow::new("a-17", "First"),
                ArticleRow::new("0042", "Second"),
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::write(store.input_path(), "id,text\n1,A\n1,B\n").unwrap();

        let err = store.read_articles().unwrap_err();
        assert!(matches!(err, SummarizerError::DuplicateArticleId { ref id, .. } if id == "1"));
    }

    #[test]
    fn test_short_row_reads_as_empty_text() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::write(store.input_path(), "id,text\n1,A\n2\n3,C\n").unwrap();

        let articles = store.read_articles().unwrap();
        assert_eq!(
            articles,
            vec![
                ArticleRow::new("1", "A"),
                ArticleRow::new("2", ""),
                ArticleRow::new("3", "C"),
            ]
        );
    }

    #[test]
    fn test_missing_id_column_is_a_table_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::write(store.input_path(), "key,text\n1,A\n").unwrap();

        let err = store.read_articles().unwrap_err();
        assert!(matches!(err, SummarizerError::Table { .. }));
    }

    #[test]
    fn test_summaries_with_quotes_and_newlines_survive() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let summaries = vec![
            SummaryRow::new("1", "- First, with comma\n- \"Quoted\" point\n- Third"),
            SummaryRow::new("2", "Summary generation failed."),
        ];

        store.write_summaries(&summaries).unwrap();

        assert_eq!(store.read_summaries().unwrap(), summaries);
    }

    #[test]
    fn test_empty_summary_table_has_header() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.write_summaries(&[]).unwrap();

        let content = std::fs::read_to_string(store.output_path()).unwrap();
        assert_eq!(content, "id,summary\n");
    }
}
