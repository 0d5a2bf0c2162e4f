//! Display formatters used by table columns and command output.

use crate::model::Amount;
use chrono::NaiveDate;
use std::fmt::Display;

/// Formats whole rupiah with dot grouping, e.g. `Rp 2.500.000`.
pub fn format_currency(amount: Amount) -> String {
    amount.to_string()
}

/// Formats a date as day/month/year without zero padding, e.g. `15/1/2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// Status badge text, e.g. `APPROVED`.
pub fn format_status(status: impl Display) -> String {
    status.to_string().to_uppercase()
}

/// Returns `value`, or `-` when it is empty.
pub fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeliveryStatus, ExpenseStatus};

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Amount::new(2_500_000)), "Rp 2.500.000");
        assert_eq!(format_currency(Amount::new(950)), "Rp 950");
        assert_eq!(format_currency(Amount::ZERO), "Rp 0");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(format_date(date), "15/1/2024");
        let date = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        assert_eq!(format_date(date), "5/12/2024");
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(ExpenseStatus::Pending), "PENDING");
        assert_eq!(format_status(DeliveryStatus::Delivered), "DELIVERED");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(""), "-");
        assert_eq!(or_dash("meter"), "meter");
    }
}
