//! Link detection for string-valued properties.

use serde::{Deserialize, Serialize};

use crate::models::{DataValue, PropertyValue};

/// A clickable link attached to a display field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLink {
    pub title: String,
    pub url: String,
    pub target_blank: bool,
}

/// True when `value` is string-valued and looks like a URL.
pub fn is_url_value(value: &DataValue) -> bool {
    value.as_str().is_some_and(|s| s.contains("://"))
}

/// Link that opens the field's own text in a new tab.
pub fn url_data_link() -> DataLink {
    DataLink {
        title: "Link".to_string(),
        url: "${__value.text}".to_string(),
        target_blank: true,
    }
}

/// Link configuration for a value column, decided by its first value.
pub fn link_for_values(values: &[PropertyValue]) -> Option<DataLink> {
    values
        .first()
        .filter(|v| is_url_value(&v.value))
        .map(|_| url_data_link())
}
