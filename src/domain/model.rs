use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A schemaless row as persisted by a `DataSource`.
pub type Record = Map<String, Value>;

/// Collection names shared by every view module.
pub mod collections {
    pub const INVENTORY_ITEM: &str = "inventory_item";
    pub const INVENTORY_SERIAL: &str = "inventory_serial";
    pub const INVENTORY_SERIAL_HISTORY: &str = "inventory_serial_history";
    pub const INVENTORY_TRANSACTION: &str = "inventory_transaction";
    pub const INVENTORY_DEPRECIATION: &str = "inventory_depreciation";
    pub const INVENTORY_ATTRIBUTE: &str = "inventory_attribute";
    pub const ATTRIBUTE: &str = "attribute";
    pub const PRODUCT: &str = "product";
    pub const PRODUCT_VARIANT: &str = "product_variant";
    pub const PRODUCT_ATTRIBUTE: &str = "product_attribute";
    pub const PRICE_LIST: &str = "price_list";
    pub const PRICE_PRODUCT: &str = "price_product";
    pub const REVENUE: &str = "revenue";
    pub const REVENUE_LINE_ITEM: &str = "revenue_line_item";
    pub const REVENUE_PAYMENT: &str = "revenue_payment";
    pub const COLLECTION_METHOD: &str = "collection_method";
    pub const LOCATION: &str = "location";
    pub const PAYMENT_COLLECTION: &str = "payment_collection";
    pub const PLAN: &str = "plan";
    pub const SUBSCRIPTION: &str = "subscription";
}

/// Defensive field access. Missing or mistyped fields read as zero values.
pub trait RecordExt {
    /// String field, `""` when missing or not a string.
    fn str_field(&self, key: &str) -> &str;
    /// Any scalar rendered as text, `""` for missing or null.
    fn text(&self, key: &str) -> String;
    /// Numbers and numeric strings, `0.0` otherwise.
    fn num(&self, key: &str) -> f64;
    fn flag(&self, key: &str) -> Option<bool>;

    fn id(&self) -> &str {
        self.str_field("id")
    }
}

impl RecordExt for Record {
    fn str_field(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    fn text(&self, key: &str) -> String {
        self.get(key).map(value_to_string).unwrap_or_default()
    }

    fn num(&self, key: &str) -> f64 {
        self.get(key).map(value_to_f64).unwrap_or(0.0)
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(value_to_bool)
    }
}

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

pub fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" | "t" => Some(true),
            "false" | "f" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Shortest decimal form: `7` for whole values, `2.5` otherwise.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Builds a `Record` from `key => value` pairs.
#[macro_export]
macro_rules! record {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::domain::model::Record::new();
        $( map.insert($key.to_string(), ::serde_json::json!($value)); )*
        map
    }};
}

#[derive(Debug)]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseStatusError {}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseStatusError { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// Lifecycle of a sale (`revenue.status`).
    SaleStatus, "sale status" {
        Ongoing => "ongoing",
        Complete => "complete",
        Cancelled => "cancelled",
    }
);

impl SaleStatus {
    /// Maps a sales list URL segment onto the stored status.
    pub fn from_list_slug(slug: &str) -> Option<Self> {
        match slug {
            "active" | "ongoing" => Some(Self::Ongoing),
            "completed" | "complete" => Some(Self::Complete),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

string_enum!(ActiveStatus, "status" {
    Active => "active",
    Inactive => "inactive",
});

impl ActiveStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// `inactive` only when the record explicitly says `active == false`.
    pub fn of_record(record: &Record) -> Self {
        match record.flag("active") {
            Some(false) => Self::Inactive,
            _ => Self::Active,
        }
    }
}

string_enum!(SerialStatus, "serial status" {
    Available => "available",
    Sold => "sold",
    Reserved => "reserved",
    Defective => "defective",
    Returned => "returned",
});

string_enum!(TransactionType, "transaction type" {
    Received => "received",
    Sold => "sold",
    Adjusted => "adjusted",
    Transferred => "transferred",
    Returned => "returned",
    WriteOff => "write_off",
});

impl TransactionType {
    /// Direction of the stock movement: `1` adds, `-1` removes, `0` leaves stock untouched.
    pub fn stock_sign(&self) -> i8 {
        match self {
            Self::Received | Self::Returned => 1,
            Self::Sold | Self::Transferred | Self::WriteOff => -1,
            Self::Adjusted => 0,
        }
    }
}

string_enum!(DepreciationMethod, "depreciation method" {
    StraightLine => "straight_line",
    DecliningBalance => "declining_balance",
    SumOfYears => "sum_of_years",
});

string_enum!(ItemType, "item type" {
    NonSerialized => "non_serialized",
    Serialized => "serialized",
    Consumable => "consumable",
});

impl ItemType {
    pub fn of_record(record: &Record) -> Self {
        record
            .str_field("item_type")
            .parse()
            .unwrap_or(Self::NonSerialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defensive_reads() {
        let rec = record! {
            "name" => "Widget",
            "qty" => "12.5",
            "price" => 10,
            "active" => "t",
            "nothing" => Value::Null,
        };
        assert_eq!(rec.str_field("name"), "Widget");
        assert_eq!(rec.str_field("price"), "");
        assert_eq!(rec.text("price"), "10");
        assert_eq!(rec.text("nothing"), "");
        assert_eq!(rec.text("missing"), "");
        assert_eq!(rec.num("qty"), 12.5);
        assert_eq!(rec.num("name"), 0.0);
        assert_eq!(rec.flag("active"), Some(true));
        assert_eq!(rec.flag("name"), None);
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(7.0), "7");
        assert_eq!(format_quantity(-3.0), "-3");
        assert_eq!(format_quantity(2.5), "2.5");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("complete".parse::<SaleStatus>().unwrap(), SaleStatus::Complete);
        assert!("done".parse::<SaleStatus>().is_err());
        assert_eq!(SaleStatus::from_list_slug("active"), Some(SaleStatus::Ongoing));
        assert_eq!(SaleStatus::from_list_slug("completed"), Some(SaleStatus::Complete));
        assert_eq!(TransactionType::WriteOff.as_str(), "write_off");
        assert_eq!(TransactionType::Transferred.stock_sign(), -1);
    }

    #[test]
    fn test_active_status_of_record() {
        let mut rec = Record::new();
        assert_eq!(ActiveStatus::of_record(&rec), ActiveStatus::Active);
        rec.insert("active".into(), json!(false));
        assert_eq!(ActiveStatus::of_record(&rec), ActiveStatus::Inactive);
    }
}
