//! Parser for efetch `PubmedArticleSet` XML.
//!
//! Elements are matched on their parent so nested lookalikes (PMIDs in
//! `CommentsCorrections`, DOIs in `ReferenceList`) are ignored.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ClientError, ClientResult};
use crate::models::ArticleRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pmid,
    Title,
    AbstractText,
    LastName,
    ForeName,
    Initials,
    CollectiveName,
    Journal,
    Year,
    Month,
    Day,
    MedlineDate,
    Descriptor,
    Keyword,
    Doi,
}

#[derive(Default)]
struct AuthorParts {
    last: String,
    fore: String,
    initials: String,
    collective: String,
}

impl AuthorParts {
    fn name(&self) -> Option<String> {
        let last = self.last.trim();
        let given = [self.fore.trim(), self.initials.trim()].into_iter().find(|g| !g.is_empty());
        match (last.is_empty(), given) {
            (false, Some(given)) => Some(format!("{last} {given}")),
            (false, None) => Some(last.to_string()),
            (true, _) => {
                let collective = collapse(&self.collective);
                (!collective.is_empty()).then_some(collective)
            }
        }
    }
}

#[derive(Default)]
struct Builder {
    record: ArticleRecord,
    abstract_parts: Vec<String>,
    author: AuthorParts,
    mesh: Vec<String>,
    keywords: Vec<String>,
    year: String,
    month: String,
    day: String,
    medline_date: String,
}

impl Builder {
    fn commit(&mut self, field: Field, label: Option<&str>, text: String) {
        let value = collapse(&text);
        match field {
            Field::Pmid => self.record.pmid = value,
            Field::Title => self.record.title = value,
            Field::AbstractText if !value.is_empty() => match label {
                Some(label) if !label.is_empty() => {
                    self.abstract_parts.push(format!("{label}: {value}"));
                }
                _ => self.abstract_parts.push(value),
            },
            Field::AbstractText => {}
            Field::LastName => self.author.last = value,
            Field::ForeName => self.author.fore = value,
            Field::Initials => self.author.initials = value,
            Field::CollectiveName => self.author.collective = value,
            Field::Journal => self.record.journal = Some(value).filter(|v| !v.is_empty()),
            Field::Year => self.year = value,
            Field::Month => self.month = value,
            Field::Day => self.day = value,
            Field::MedlineDate => self.medline_date = value,
            Field::Descriptor if !value.is_empty() => self.mesh.push(value),
            Field::Keyword if !value.is_empty() => self.keywords.push(value),
            Field::Descriptor | Field::Keyword => {}
            Field::Doi => self.record.doi = Some(value).filter(|v| !v.is_empty()),
        }
    }

    fn finish_author(&mut self) {
        if let Some(name) = std::mem::take(&mut self.author).name() {
            self.record.authors.push(name);
        }
    }

    fn build(mut self) -> ArticleRecord {
        if !self.abstract_parts.is_empty() {
            self.record.r#abstract = Some(self.abstract_parts.join(" "));
        }
        let date = [self.year.as_str(), self.month.as_str(), self.day.as_str()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let date = if self.year.is_empty() { self.medline_date } else { date };
        self.record.publication_date = Some(date).filter(|d| !d.is_empty());
        self.mesh.extend(self.keywords);
        self.record.keywords = self.mesh;
        self.record
    }
}

/// Which field, if any, an element opened under `stack` holds.
fn field_for(name: &str, stack: &[String], element: &BytesStart<'_>) -> Option<Field> {
    let parent = stack.last().map(String::as_str);
    let grandparent = stack.len().checked_sub(2).map(|i| stack[i].as_str());
    match (name, parent, grandparent) {
        ("PMID", Some("MedlineCitation"), _) => Some(Field::Pmid),
        ("ArticleTitle", Some("Article"), _) => Some(Field::Title),
        ("AbstractText", Some("Abstract"), _) => Some(Field::AbstractText),
        ("LastName", Some("Author"), _) => Some(Field::LastName),
        ("ForeName", Some("Author"), _) => Some(Field::ForeName),
        ("Initials", Some("Author"), _) => Some(Field::Initials),
        ("CollectiveName", Some("Author"), _) => Some(Field::CollectiveName),
        ("Title", Some("Journal"), _) => Some(Field::Journal),
        ("Year", Some("PubDate"), _) => Some(Field::Year),
        ("Month", Some("PubDate"), _) => Some(Field::Month),
        ("Day", Some("PubDate"), _) => Some(Field::Day),
        ("MedlineDate", Some("PubDate"), _) => Some(Field::MedlineDate),
        ("DescriptorName", Some("MeshHeading"), _) => Some(Field::Descriptor),
        ("Keyword", Some("KeywordList"), _) => Some(Field::Keyword),
        ("ArticleId", Some("ArticleIdList"), Some("PubmedData"))
            if attribute(element, "IdType").as_deref() == Some("doi") =>
        {
            Some(Field::Doi)
        }
        _ => None,
    }
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Option<String> {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an efetch response into article records, in document order.
///
/// # Errors
///
/// Returns `ClientError::Xml` on malformed XML.
pub fn parse_pubmed_xml(xml: &str) -> ClientResult<Vec<ArticleRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut articles = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<Builder> = None;
    // Field being captured, the stack depth it opened at, its label and text.
    let mut capture: Option<(Field, usize, Option<String>, String)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e);
                if name == "PubmedArticle" {
                    current = Some(Builder::default());
                } else if current.is_some() && capture.is_none() {
                    if let Some(field) = field_for(&name, &stack, e) {
                        let label = (field == Field::AbstractText).then(|| attribute(e, "Label")).flatten();
                        capture = Some((field, stack.len(), label, String::new()));
                    }
                }
                stack.push(name);
            }
            Ok(Event::Text(ref e)) => {
                if let Some((_, _, _, text)) = capture.as_mut() {
                    let decoded = e.unescape().map_err(|err| ClientError::Xml(err.to_string()))?;
                    text.push_str(&decoded);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some((_, _, _, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let name = stack.pop().unwrap_or_default();
                if capture.as_ref().is_some_and(|(_, depth, _, _)| *depth == stack.len()) {
                    if let (Some((field, _, label, text)), Some(builder)) = (capture.take(), current.as_mut()) {
                        builder.commit(field, label.as_deref(), text);
                    }
                }
                match name.as_str() {
                    "Author" => {
                        if let Some(builder) = current.as_mut() {
                            builder.finish_author();
                        }
                    }
                    "PubmedArticle" => {
                        if let Some(builder) = current.take() {
                            articles.push(builder.build());
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ClientError::Xml(format!(
                    "at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(articles)
}
