//! Article record model matching the saved PubMed result files.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{YearMonth, YearOnly};

/// One PubMed article.
///
/// Field names follow the JSON result files written by `search_pubmed`, so
/// files produced by earlier versions of the tool load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// PubMed identifier, unique within a result set.
    #[serde(default, alias = "id")]
    pub pmid: String,

    /// Article title.
    #[serde(default)]
    pub title: String,

    /// Abstract text (labelled sections are joined).
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// MeSH descriptors followed by author keywords.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Raw PubMed publication date (e.g. "2024 Mar 15").
    #[serde(default)]
    pub publication_date: Option<String>,

    /// Author names, "LastName ForeName".
    #[serde(default)]
    pub authors: Vec<String>,

    /// Journal title.
    #[serde(default)]
    pub journal: Option<String>,

    /// DOI without the resolver prefix.
    #[serde(default)]
    pub doi: Option<String>,
}

impl ArticleRecord {
    /// Abstract text or an empty string.
    #[must_use]
    pub fn abstract_text(&self) -> &str {
        self.r#abstract.as_deref().unwrap_or("")
    }

    /// Publication month, if the raw date parses.
    #[must_use]
    pub fn published(&self, year_only_as_january: bool) -> Option<YearMonth> {
        let policy = if year_only_as_january { YearOnly::January } else { YearOnly::Reject };
        YearMonth::parse(self.publication_date.as_deref()?, policy)
    }

    /// Compact reference used in hotspot listings.
    #[must_use]
    pub fn to_ref(&self) -> ArticleRef {
        ArticleRef {
            pmid: self.pmid.clone(),
            title: self.title.clone(),
            journal: self.journal.clone().filter(|j| !j.is_empty()),
            publication_date: self.publication_date.clone().filter(|d| !d.is_empty()),
            doi: self.doi.clone().filter(|d| !d.is_empty()),
        }
    }

    /// Author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }
}

/// Minimal article reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    /// PubMed identifier.
    pub pmid: String,
    /// Article title.
    pub title: String,
    /// Journal title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    /// Raw publication date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    /// DOI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

/// The articles returned by one search, as persisted in a result file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// PubMed query that produced the set.
    #[serde(default)]
    pub query: Option<String>,

    /// RFC 3339 retrieval timestamp.
    #[serde(default)]
    pub retrieved_at: Option<String>,

    /// Articles in retrieval order.
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
}

impl ResultSet {
    /// Create a result set stamped with the current time.
    #[must_use]
    pub fn new(query: impl Into<String>, articles: Vec<ArticleRecord>) -> Self {
        Self {
            query: Some(query.into()),
            retrieved_at: Some(Utc::now().to_rfc3339()),
            articles,
        }
    }

    /// Number of articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// True when the set holds no articles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
