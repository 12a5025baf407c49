use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a column participates in the analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Categorical => "Categorical",
        }
    }
}

/// Why a statistic has no value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndefinedReason {
    /// Every value is missing.
    NoValues,
    /// Fewer usable values than the statistic needs.
    TooFewValues { required: usize, actual: usize },
    /// The values do not vary, so the statistic divides by zero.
    ZeroVariance,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValues => write!(f, "no non-missing values"),
            Self::TooFewValues { required, actual } => {
                write!(f, "needs at least {required} values, found {actual}")
            }
            Self::ZeroVariance => write!(f, "zero variance"),
        }
    }
}

/// A statistic that is either a real number or explicitly undefined.
///
/// Undefined values never degrade to `0.0` or `NaN`; callers have to
/// match on the variant (or use [`Statistic::value`]) to get at a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Statistic<T> {
    Defined(T),
    Undefined(UndefinedReason),
}

impl<T: Copy> Statistic<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined(_) => None,
        }
    }
}

impl<T> Statistic<T> {
    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    pub fn undefined_reason(&self) -> Option<&UndefinedReason> {
        match self {
            Self::Defined(_) => None,
            Self::Undefined(r) => Some(r),
        }
    }
}

impl fmt::Display for Statistic<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Self::Undefined(_) => write!(f, "undefined"),
        }
    }
}

/// Descriptive statistics of one numeric column, over its non-missing values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (N-1 denominator).
    pub std_dev: Statistic<f64>,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    pub range: f64,
    /// Sample variance (N-1 denominator).
    pub variance: Statistic<f64>,
    /// Adjusted Fisher-Pearson skewness (G1).
    pub skewness: Statistic<f64>,
    /// Bias-corrected excess kurtosis (G2); a normal distribution scores 0.
    pub kurtosis: Statistic<f64>,
}

impl ColumnStatistics {
    /// Coefficient of variation (std dev / mean), if both are usable.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        let std_dev = self.std_dev.value()?;
        if self.mean == 0.0 {
            return None;
        }
        Some(std_dev / self.mean)
    }
}

/// Statistics of a numeric column split by the values of a categorical column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroupStatistics {
    pub numeric_column: String,
    pub category_column: String,
    /// One entry per distinct category value, ordered by category value.
    pub groups: BTreeMap<String, Statistic<ColumnStatistics>>,
}

impl CategoryGroupStatistics {
    pub fn get(&self, category: &str) -> Option<&Statistic<ColumnStatistics>> {
        self.groups.get(category)
    }
}

/// Pairwise Pearson correlations between the numeric columns of a table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` x `columns.len()`, symmetric.
    pub data: Vec<Vec<Statistic<f64>>>,
}

impl CorrelationMatrix {
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn get(&self, left: &str, right: &str) -> Option<&Statistic<f64>> {
        let i = self.index_of(left)?;
        let j = self.index_of(right)?;
        self.data.get(i)?.get(j)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Every distinct unordered pair `(i < j)` in column order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, &Statistic<f64>)> + '_ {
        self.columns.iter().enumerate().flat_map(move |(i, left)| {
            self.columns
                .iter()
                .enumerate()
                .skip(i + 1)
                .filter_map(move |(j, right)| {
                    self.data
                        .get(i)
                        .and_then(|row| row.get(j))
                        .map(|value| (left.as_str(), right.as_str(), value))
                })
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub left: String,
    pub right: String,
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

/// Per-column entry of a [`DatasetOverview`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnInfo>,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub estimated_size_bytes: usize,
}

impl DatasetOverview {
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub value: String,
    pub count: usize,
    /// Share of all rows, in percent.
    pub percentage: f64,
}
