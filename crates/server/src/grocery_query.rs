//! Date-range filters over the `grocery` table.
//!
//! Every shape is a fixed SQL string with `?` placeholders, which both the
//! MySQL and SQLite drivers accept. Caller input only ever reaches the store
//! as bound values.

const SELECT_ALL: &str = "SELECT * FROM grocery";

const SELECT_BETWEEN: &str = "SELECT * FROM grocery WHERE start_date >= ? AND end_date <= ?";

const SELECT_FROM: &str = "SELECT * FROM grocery WHERE start_date >= ?";

const SELECT_UNTIL: &str = "SELECT * FROM grocery WHERE end_date <= ?";

/// Optional bounds as they arrive on the query string.
#[derive(Debug, Default, Clone)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Both bounds mandatory.
#[derive(Debug, Clone)]
pub struct RequiredDateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    /// Repeated keys keep their first value; unknown keys are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            start_date: first_value(pairs, "start_date"),
            end_date: first_value(pairs, "end_date"),
        }
    }
}

impl RequiredDateRange {
    /// `None` when either bound is missing from the query string.
    pub fn from_pairs(pairs: &[(String, String)]) -> Option<Self> {
        Some(Self {
            start_date: first_value(pairs, "start_date")?,
            end_date: first_value(pairs, "end_date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroceryQuery {
    Between { start: String, end: String },
    From { start: String },
    Until { end: String },
    All,
}

impl GroceryQuery {
    pub fn from_range(range: DateRange) -> Self {
        match (present(range.start_date), present(range.end_date)) {
            (Some(start), Some(end)) => Self::Between { start, end },
            (Some(start), None) => Self::From { start },
            (None, Some(end)) => Self::Until { end },
            (None, None) => Self::All,
        }
    }

    /// The legacy route always filters on both bounds, even blank ones.
    pub fn legacy(range: RequiredDateRange) -> Self {
        Self::Between {
            start: range.start_date,
            end: range.end_date,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Self::Between { .. } => SELECT_BETWEEN,
            Self::From { .. } => SELECT_FROM,
            Self::Until { .. } => SELECT_UNTIL,
            Self::All => SELECT_ALL,
        }
    }

    /// Values for the placeholders of [`sql`](Self::sql), in order.
    pub fn binds(&self) -> Vec<&str> {
        match self {
            Self::Between { start, end } => vec![start.as_str(), end.as_str()],
            Self::From { start } => vec![start.as_str()],
            Self::Until { end } => vec![end.as_str()],
            Self::All => Vec::new(),
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Between { .. } => "between",
            Self::From { .. } => "from",
            Self::Until { .. } => "until",
            Self::All => "all",
        }
    }
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
