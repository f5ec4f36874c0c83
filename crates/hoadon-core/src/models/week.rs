//! User-defined billing weeks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named date range that invoices are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Week {
    pub fn new(id: i64, name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            start_date,
            end_date,
        }
    }

    /// Whether `date` falls within the week, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Range label in the `dd/mm-dd/mm` form.
    pub fn range_label(&self) -> String {
        format!(
            "{}-{}",
            self.start_date.format("%d/%m"),
            self.end_date.format("%d/%m")
        )
    }
}
