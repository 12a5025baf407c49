//! Statistics and insight generation over a loaded table.
//!
//! Every operation takes the table explicitly and only reads it.

pub mod charts;
pub mod correlation;
pub mod grouping;
pub mod insights;
pub mod io;
pub mod overview;
pub mod profiling;
pub mod report;
pub mod table;
pub mod types;

pub use correlation::{compute_correlation_matrix, pearson_correlation, rank_correlations};
pub use grouping::compute_category_group_statistics;
pub use insights::{
    Insight, InsightReport, InsightRule, InsightTopic, generate_insights, generate_insights_text,
};
pub use io::load_table;
pub use overview::{category_breakdown, describe_dataset};
pub use profiling::{compute_all_columns_statistics, compute_column_statistics};
pub use report::{AnalysisReport, run_full_analysis};
pub use types::{
    CategoryGroupStatistics, CategoryShare, ColumnKind, ColumnStatistics, CorrelationMatrix,
    CorrelationPair, CorrelationStrength, DatasetOverview, Statistic, UndefinedReason,
};

#[cfg(test)]
mod tests;
