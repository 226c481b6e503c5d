//! Plain-text result files.
//!
//! One block per article:
//!
//! ```text
//! Article 1
//! --------------------------------------------------------------------------------
//! Title: ...
//! Authors: Smith John, Doe Jane
//! Journal: ...
//! Publication Date: 2024 Mar
//! Abstract:
//! ...
//! Keywords: Neoplasms; Lung Neoplasms, Non-Small-Cell
//! PMID: 12345
//! DOI: https://doi.org/10.1000/xyz
//! ================================================================================
//! ```

use crate::error::{StoreError, StoreResult};
use crate::models::ArticleRecord;

const DOI_PREFIX: &str = "https://doi.org/";
const KEYWORD_SEPARATOR: &str = "; ";

/// Render articles in the text layout.
#[must_use]
pub fn render(articles: &[ArticleRecord]) -> String {
    let mut out = String::new();
    for (i, article) in articles.iter().enumerate() {
        out.push_str(&format!("Article {}\n", i + 1));
        out.push_str(&"-".repeat(80));
        out.push('\n');
        out.push_str(&format!("Title: {}\n", article.title));
        out.push_str(&format!("Authors: {}\n", article.author_names()));
        out.push_str(&format!("Journal: {}\n", article.journal.as_deref().unwrap_or("")));
        out.push_str(&format!(
            "Publication Date: {}\n",
            article.publication_date.as_deref().unwrap_or("")
        ));
        out.push_str(&format!("Abstract:\n{}\n", article.abstract_text()));
        out.push_str(&format!("Keywords: {}\n", render_keywords(&article.keywords)));
        out.push_str(&format!("PMID: {}\n", article.pmid));
        match article.doi.as_deref().filter(|d| !d.is_empty()) {
            Some(doi) => out.push_str(&format!("DOI: {DOI_PREFIX}{doi}\n")),
            None => out.push_str("DOI: \n"),
        }
        out.push_str(&"=".repeat(80));
        out.push_str("\n\n");
    }
    out
}

/// A line without `;` is read as legacy comma-separated, so a lone term
/// containing a comma gets a trailing `;`.
fn render_keywords(keywords: &[String]) -> String {
    let mut line = keywords.join(KEYWORD_SEPARATOR);
    if keywords.len() == 1 && line.contains(',') {
        line.push(';');
    }
    line
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Abstract,
}

/// Parse a text result file.
///
/// Lines outside a known field are ignored; abstract lines are joined with
/// spaces. A non-empty file with no `Article N` header is rejected.
pub fn parse(name: &str, content: &str) -> StoreResult<Vec<ArticleRecord>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut articles = Vec::new();
    let mut current: Option<ArticleRecord> = None;
    let mut abstract_lines: Vec<&str> = Vec::new();
    let mut section = Section::None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        let next_is_rule = lines.get(i + 1).is_some_and(|l| l.trim_start().starts_with("----------"));

        if line.starts_with("Article ") && next_is_rule {
            if let Some(done) = current.take() {
                articles.push(finish(done, &mut abstract_lines));
            }
            current = Some(ArticleRecord::default());
            section = Section::None;
            i += 2;
            continue;
        }

        if let Some(article) = current.as_mut() {
            if let Some(rest) = line.strip_prefix("Title:") {
                article.title = rest.trim().to_string();
                section = Section::None;
            } else if let Some(rest) = line.strip_prefix("Authors:") {
                article.authors = split_list(rest, ",");
                section = Section::None;
            } else if let Some(rest) = line.strip_prefix("Journal:") {
                article.journal = non_empty(rest);
                section = Section::None;
            } else if let Some(rest) = line.strip_prefix("Publication Date:") {
                article.publication_date = non_empty(rest);
                section = Section::None;
            } else if line == "Abstract:" {
                section = Section::Abstract;
            } else if let Some(rest) = line.strip_prefix("Keywords:") {
                let separator = if rest.contains(';') { ";" } else { "," };
                article.keywords = split_list(rest, separator);
                section = Section::None;
            } else if let Some(rest) = line.strip_prefix("PMID:") {
                article.pmid = rest.trim().to_string();
                section = Section::None;
            } else if let Some(rest) = line.strip_prefix("DOI:") {
                let doi = rest.trim();
                article.doi = non_empty(doi.strip_prefix(DOI_PREFIX).unwrap_or(doi));
                section = Section::None;
            } else if line.starts_with("====================") {
                section = Section::None;
            } else if section == Section::Abstract && !line.is_empty() {
                abstract_lines.push(line);
            }
        }
        i += 1;
    }

    if let Some(done) = current.take() {
        articles.push(finish(done, &mut abstract_lines));
    }

    if articles.is_empty() && !content.trim().is_empty() {
        return Err(StoreError::Format {
            name: name.to_string(),
            message: "no 'Article N' blocks found".to_string(),
        });
    }
    Ok(articles)
}

fn finish(mut article: ArticleRecord, abstract_lines: &mut Vec<&str>) -> ArticleRecord {
    if !abstract_lines.is_empty() {
        article.r#abstract = Some(abstract_lines.join(" "));
        abstract_lines.clear();
    }
    article
}

fn split_list(raw: &str, separator: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "N/A" {
        return Vec::new();
    }
    raw.split(separator).map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

fn non_empty(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}
