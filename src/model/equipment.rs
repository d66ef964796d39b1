use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of an equipment record.
///
/// Servers hand out either numeric or string ids; both are kept as text
/// since the client only ever echoes them back in a URL path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EquipmentId(String);

impl EquipmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for EquipmentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EquipmentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// A persisted piece of equipment, as returned by the server.
///
/// Records without an id never exist on the client: unsaved data lives in
/// [`FormState`](super::FormState) until the server assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    pub id: EquipmentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub part_code: String,
    /// `None` when the server holds `null`, which is what an unparseable
    /// price submission turns into.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub last_serviced: Option<String>,
}

impl EquipmentRecord {
    /// Price with a dollar sign, or `$N/A` for missing, zero, or NaN prices.
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) if price != 0.0 && !price.is_nan() => format!("${price}"),
            _ => "$N/A".to_string(),
        }
    }

    pub fn in_stock_label(&self) -> &'static str {
        if self.in_stock { "Yes" } else { "No" }
    }

    /// Last-serviced date as `YYYY-MM-DD` (UTC), `N/A` when empty.
    ///
    /// Text that is neither an RFC 3339 timestamp nor a plain date is shown
    /// verbatim.
    pub fn last_serviced_label(&self) -> String {
        match self.last_serviced.as_deref().map(str::trim) {
            None | Some("") => "N/A".to_string(),
            Some(text) => service_date(text)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| text.to_string()),
        }
    }
}

fn service_date(text: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
