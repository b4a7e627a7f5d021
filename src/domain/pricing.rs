use crate::domain::model::{collections, value_to_bool, Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::utils::error::{BackofficeError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceList {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub date_start_string: String,
    pub date_end_string: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceProduct {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub currency: String,
    pub amount: i64,
    pub description: Option<String>,
    pub price_list_id: Option<String>,
    pub active: bool,
}

/// Where a price list sits relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Scheduled,
    Effective,
    Expired,
}

impl Validity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Effective => "effective",
            Self::Expired => "expired",
        }
    }
}

fn non_empty(record: &Record, key: &str) -> Option<String> {
    let value = record.text(key);
    (!value.is_empty()).then_some(value)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Integers, floats (truncated) and numeric strings. Anything else is 0.
pub fn value_to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

impl PriceList {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.text("id"),
            name: record.text("name"),
            description: non_empty(record, "description"),
            date_start_string: record.text("date_start_string"),
            date_end_string: non_empty(record, "date_end_string"),
            active: record
                .get("active")
                .and_then(value_to_bool)
                .unwrap_or(false),
        }
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        if !self.id.is_empty() {
            record.insert("id".into(), Value::from(self.id.clone()));
        }
        record.insert("name".into(), Value::from(self.name.clone()));
        if let Some(description) = &self.description {
            record.insert("description".into(), Value::from(description.clone()));
        }
        record.insert(
            "date_start_string".into(),
            Value::from(self.date_start_string.clone()),
        );
        if let Some(end) = &self.date_end_string {
            record.insert("date_end_string".into(), Value::from(end.clone()));
        }
        record.insert("active".into(), Value::from(self.active));
        record
    }

    /// Unparseable start dates count as open, missing end dates as open-ended.
    pub fn validity_on(&self, day: NaiveDate) -> Validity {
        if let Some(start) = parse_date(&self.date_start_string) {
            if day < start {
                return Validity::Scheduled;
            }
        }
        if let Some(end) = self.date_end_string.as_deref().and_then(parse_date) {
            if day > end {
                return Validity::Expired;
            }
        }
        Validity::Effective
    }

    pub fn is_effective_on(&self, day: NaiveDate) -> bool {
        self.validity_on(day) == Validity::Effective
    }
}

impl PriceProduct {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.text("id"),
            product_id: record.text("product_id"),
            name: record.text("name"),
            currency: record.text("currency"),
            amount: record.get("amount").map(value_to_i64).unwrap_or(0),
            description: non_empty(record, "description"),
            price_list_id: non_empty(record, "price_list_id"),
            active: record
                .get("active")
                .and_then(value_to_bool)
                .unwrap_or(false),
        }
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        if !self.id.is_empty() {
            record.insert("id".into(), Value::from(self.id.clone()));
        }
        record.insert("product_id".into(), Value::from(self.product_id.clone()));
        record.insert("name".into(), Value::from(self.name.clone()));
        record.insert("currency".into(), Value::from(self.currency.clone()));
        record.insert("amount".into(), Value::from(self.amount));
        if let Some(description) = &self.description {
            record.insert("description".into(), Value::from(description.clone()));
        }
        if let Some(list_id) = &self.price_list_id {
            record.insert("price_list_id".into(), Value::from(list_id.clone()));
        }
        record.insert("active".into(), Value::from(self.active));
        record
    }
}

pub async fn list_price_lists(db: &dyn DataSource) -> Result<Vec<PriceList>> {
    let records = db.list_simple(collections::PRICE_LIST).await?;
    Ok(records.iter().map(PriceList::from_record).collect())
}

pub async fn read_price_list(db: &dyn DataSource, id: &str) -> Result<PriceList> {
    let record = db.read(collections::PRICE_LIST, id).await?;
    Ok(PriceList::from_record(&record))
}

pub async fn create_price_list(db: &dyn DataSource, list: &PriceList) -> Result<PriceList> {
    let record = db.create(collections::PRICE_LIST, list.to_record()).await?;
    Ok(PriceList::from_record(&record))
}

pub async fn update_price_list(db: &dyn DataSource, list: &PriceList) -> Result<PriceList> {
    if list.id.is_empty() {
        return Err(BackofficeError::FormError {
            message: "price list id is required".to_string(),
        });
    }
    let mut data = list.to_record();
    // updates merge, so a cleared end date has to be written explicitly
    data.entry("date_end_string")
        .or_insert_with(|| Value::from(""));
    let record = db.update(collections::PRICE_LIST, &list.id, data).await?;
    Ok(PriceList::from_record(&record))
}

pub async fn delete_price_list(db: &dyn DataSource, id: &str) -> Result<()> {
    db.delete(collections::PRICE_LIST, id).await
}

/// A storage failure yields an empty list; the collection may not exist yet.
pub async fn list_price_products(db: &dyn DataSource) -> Vec<PriceProduct> {
    match db.list_simple(collections::PRICE_PRODUCT).await {
        Ok(records) => records.iter().map(PriceProduct::from_record).collect(),
        Err(e) => {
            tracing::debug!("price_product listing unavailable: {}", e);
            Vec::new()
        }
    }
}

pub async fn create_price_product(
    db: &dyn DataSource,
    product: &PriceProduct,
) -> Result<PriceProduct> {
    let record = db
        .create(collections::PRICE_PRODUCT, product.to_record())
        .await?;
    Ok(PriceProduct::from_record(&record))
}

pub async fn delete_price_product(db: &dyn DataSource, id: &str) -> Result<()> {
    db.delete(collections::PRICE_PRODUCT, id).await
}

/// Display helper shared by list and detail pages.
pub fn display_amount(product: &PriceProduct) -> String {
    if product.currency.is_empty() {
        product.amount.to_string()
    } else {
        format!("{} {}", product.currency, product.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn test_price_list_from_record() {
        let rec = record! {
            "id" => "pl-1",
            "name" => "Holiday",
            "description" => "",
            "date_start_string" => "2026-12-01",
            "active" => "t",
        };
        let list = PriceList::from_record(&rec);
        assert_eq!(list.id, "pl-1");
        assert_eq!(list.description, None);
        assert_eq!(list.date_end_string, None);
        assert!(list.active);

        let back = list.to_record();
        assert!(!back.contains_key("description"));
        assert!(!back.contains_key("date_end_string"));
        assert_eq!(back["active"], Value::Bool(true));
    }

    #[test]
    fn test_price_product_amount_parsing() {
        let from_string = PriceProduct::from_record(&record! { "amount" => "1500" });
        assert_eq!(from_string.amount, 1500);
        let from_float = PriceProduct::from_record(&record! { "amount" => 99.9 });
        assert_eq!(from_float.amount, 99);
        let garbage = PriceProduct::from_record(&record! { "amount" => "abc" });
        assert_eq!(garbage.amount, 0);
    }

    #[test]
    fn test_validity_window() {
        let list = PriceList {
            date_start_string: "2026-01-01".into(),
            date_end_string: Some("2026-03-31".into()),
            ..Default::default()
        };
        let day = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert_eq!(list.validity_on(day("2025-12-31")), Validity::Scheduled);
        assert!(list.is_effective_on(day("2026-01-01")));
        assert!(list.is_effective_on(day("2026-03-31")));
        assert_eq!(list.validity_on(day("2026-04-01")), Validity::Expired);

        let open_ended = PriceList {
            date_start_string: "2026-01-01T00:00:00Z".into(),
            ..Default::default()
        };
        assert!(open_ended.is_effective_on(day("2030-01-01")));
    }
}
