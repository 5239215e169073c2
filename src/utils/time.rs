use chrono::{NaiveDate, Utc};

/// Current calendar date in UTC; schedule due dates are date-only.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
