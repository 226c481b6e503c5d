//! Data models: article records, dates, reports and tool inputs.
//!
//! Record models use `#[serde(default)]` so result files written by older
//! versions (or by hand) load without every field present.

mod article;
mod date;
mod enums;
mod inputs;
mod report;

pub use article::{ArticleRecord, ArticleRef, ResultSet};
pub use date::{DateRange, YearMonth, YearOnly};
pub use enums::{AnalysisKind, Granularity, ResponseFormat};
pub use inputs::*;
pub use report::{
    AnalysisReport, HotspotReport, KeywordCount, KeywordSeries, PublicationCountReport,
    ReportParameters, TimeBucket, TrendReport,
};
