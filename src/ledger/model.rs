use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A single financial event as stored in the `transactions` table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// Calendar day of the transaction. Rows carry either `YYYY-MM-DD` or a
    /// full RFC 3339 timestamp.
    #[serde(deserialize_with = "calendar_day")]
    pub date: NaiveDate,
    pub amount: Decimal,
    pub merchant: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl Transaction {
    /// The category label, or `None` when it is unset or blank.
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

fn calendar_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(&raw).map(|at| at.date_naive()))
        .map_err(|_| serde::de::Error::custom(format!("invalid transaction date: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_row_with_string_amount() {
        let row = r#"{
            "id": "tx-1",
            "date": "2024-03-01T12:00:00Z",
            "amount": "120.10",
            "merchant": "Cafe",
            "category": "meals"
        }"#;

        let tx: Transaction = serde_json::from_str(row).unwrap();
        assert_eq!(tx.amount, dec!(120.10));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(tx.category_label(), Some("meals"));
    }

    #[test]
    fn test_null_and_blank_category_have_no_label() {
        let row = r#"{
            "id": "tx-2",
            "date": "2024-03-01T12:00:00Z",
            "amount": "5.00",
            "merchant": "Kiosk",
            "category": null
        }"#;
        let mut tx: Transaction = serde_json::from_str(row).unwrap();
        assert_eq!(tx.category_label(), None);

        tx.category = Some("   ".to_string());
        assert_eq!(tx.category_label(), None);
    }

    #[test]
    fn test_deserialize_date_only_row() {
        let row = r#"{
            "id": "tx-3",
            "date": "2024-01-15",
            "amount": "80.50",
            "merchant": "Air",
            "category": "travel"
        }"#;

        let tx: Transaction = serde_json::from_str(row).unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        let row = r#"{"id":"tx-4","date":"15/01/2024","amount":"1","merchant":"X","category":null}"#;
        let err = serde_json::from_str::<Transaction>(row).unwrap_err();
        assert!(err.to_string().contains("invalid transaction date"));
    }
}
