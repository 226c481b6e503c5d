//! Enumeration types for analysis and tool parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// Machine-readable JSON format.
    Json,
}

impl ResponseFormat {
    /// Check if this is markdown format.
    #[must_use]
    pub const fn is_markdown(self) -> bool {
        matches!(self, Self::Markdown)
    }

    /// Check if this is JSON format.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Time granularity for bucketed analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Calendar months.
    #[default]
    Month,
    /// Calendar quarters.
    Quarter,
    /// Calendar years.
    Year,
}

impl Granularity {
    /// Months covered by one period.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Month => 1,
            Self::Quarter => 3,
            Self::Year => 12,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Map a `months_per_period` value onto a granularity.
    pub fn from_months_per_period(months: i64) -> AnalysisResult<Self> {
        match months {
            1 => Ok(Self::Month),
            3 => Ok(Self::Quarter),
            12 => Ok(Self::Year),
            other => Err(AnalysisError::invalid(
                "months_per_period",
                format!("{other} is not supported (use 1, 3 or 12)"),
            )),
        }
    }

    /// Resolve the granularity from an optional name and an optional
    /// `months_per_period`, defaulting to months.
    pub fn resolve(name: Option<&str>, months_per_period: Option<i64>) -> AnalysisResult<Self> {
        let named = name.map(|n| n.parse::<Self>()).transpose()?;
        let by_months = months_per_period.map(Self::from_months_per_period).transpose()?;
        match (named, by_months) {
            (Some(g), Some(m)) if g != m => Err(AnalysisError::invalid(
                "months_per_period",
                format!("{} months does not match granularity '{g}'", m.months()),
            )),
            (Some(g), _) | (None, Some(g)) => Ok(g),
            (None, None) => Ok(Self::default()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" => Ok(Self::Month),
            "quarter" | "quarterly" => Ok(Self::Quarter),
            "year" | "yearly" => Ok(Self::Year),
            other => Err(AnalysisError::invalid(
                "granularity",
                format!("'{other}' is not one of month, quarter, year"),
            )),
        }
    }
}

/// Which sub-reports an analysis request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Keyword ranking over the whole set.
    Hotspots,
    /// Keyword rankings per time bucket.
    Trends,
    /// Publication counts per time bucket.
    PublicationCounts,
    /// All three from one snapshot.
    Comprehensive,
}

impl AnalysisKind {
    /// Whether the hotspot report is produced.
    #[must_use]
    pub const fn includes_hotspots(self) -> bool {
        matches!(self, Self::Hotspots | Self::Comprehensive)
    }

    /// Whether the trend report is produced.
    #[must_use]
    pub const fn includes_trends(self) -> bool {
        matches!(self, Self::Trends | Self::Comprehensive)
    }

    /// Whether the publication-count report is produced.
    #[must_use]
    pub const fn includes_publication_counts(self) -> bool {
        matches!(self, Self::PublicationCounts | Self::Comprehensive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_format_default() {
        assert_eq!(ResponseFormat::default(), ResponseFormat::Markdown);
        assert!(ResponseFormat::Markdown.is_markdown());
        assert!(!ResponseFormat::Markdown.is_json());
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("Month".parse::<Granularity>().unwrap(), Granularity::Month);
        assert_eq!(" quarterly ".parse::<Granularity>().unwrap(), Granularity::Quarter);
        assert_eq!("year".parse::<Granularity>().unwrap(), Granularity::Year);
        assert!("week".parse::<Granularity>().unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_granularity_resolve() {
        assert_eq!(Granularity::resolve(None, None).unwrap(), Granularity::Month);
        assert_eq!(Granularity::resolve(None, Some(3)).unwrap(), Granularity::Quarter);
        assert_eq!(Granularity::resolve(Some("year"), Some(12)).unwrap(), Granularity::Year);
        assert!(Granularity::resolve(Some("year"), Some(3)).is_err());
        assert!(Granularity::resolve(None, Some(2)).is_err());
    }

    #[test]
    fn test_analysis_kind_coverage() {
        assert!(AnalysisKind::Comprehensive.includes_hotspots());
        assert!(AnalysisKind::Comprehensive.includes_trends());
        assert!(AnalysisKind::Comprehensive.includes_publication_counts());
        assert!(!AnalysisKind::Trends.includes_hotspots());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Granularity::Quarter).unwrap();
        assert_eq!(json, r#""quarter""#);
        let parsed: ResponseFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(parsed, ResponseFormat::Json);
    }
}
