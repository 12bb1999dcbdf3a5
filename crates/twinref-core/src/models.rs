//! Shared typed models for the history, catalog, and resolution layers.
//!
//! Wire names are camelCase so recorded service responses and JSON fixtures
//! deserialize directly into these types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identifiers::derive_composite_key;

// ---------------------------------------------------------------------------
// 1. Query
// ---------------------------------------------------------------------------

/// Sort direction for history requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A single filter clause for catalog searches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListEntitiesFilter {
    ExternalId(String),
    ComponentTypeId(String),
    ParentEntityId(String),
}

/// Equality filter applied to property values in history requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    pub property_name: String,
    pub operator: String,
    pub value: DataValue,
}

/// Input parameters for a directory or history lookup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Query {
    pub workspace_id: String,
    pub entity_id: String,
    pub component_name: String,
    pub component_type_id: String,
    pub properties: Vec<String>,
    pub property_filters: Vec<PropertyFilter>,
    pub list_entities_filter: Vec<ListEntitiesFilter>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub order: Option<SortOrder>,
    pub max_results: Option<i64>,
}

// ---------------------------------------------------------------------------
// 2. Values
// ---------------------------------------------------------------------------

/// Target of a relationship-typed property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipValue {
    pub target_entity_id: String,
    pub target_component_name: Option<String>,
}

/// A scalar or composite property value as reported by the services.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "integerValue")]
    Integer(i32),
    #[serde(rename = "longValue")]
    Long(i64),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    #[serde(rename = "expression")]
    Expression(String),
    #[serde(rename = "listValue")]
    List(Vec<DataValue>),
    #[serde(rename = "mapValue")]
    Map(IndexMap<String, DataValue>),
    #[serde(rename = "relationshipValue")]
    Relationship(RelationshipValue),
}

impl DataValue {
    /// The text of a `String` value. Expressions are formula text, not
    /// string data, and return `None` like every other variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render scalars as text; composite values render as compact JSON.
    pub fn to_display_string(&self) -> String {
        match self {
            DataValue::String(s) | DataValue::Expression(s) => s.clone(),
            DataValue::Double(v) => v.to_string(),
            DataValue::Integer(v) => v.to_string(),
            DataValue::Long(v) => v.to_string(),
            DataValue::Boolean(v) => v.to_string(),
            DataValue::Relationship(r) => match &r.target_component_name {
                Some(component) => format!("{}/{}", r.target_entity_id, component),
                None => r.target_entity_id.clone(),
            },
            DataValue::List(items) => serde_json::to_string(items).unwrap_or_default(),
            DataValue::Map(entries) => serde_json::to_string(entries).unwrap_or_default(),
        }
    }
}

/// One time-stamped observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    pub timestamp: String,
    pub value: DataValue,
}

// ---------------------------------------------------------------------------
// 3. References
// ---------------------------------------------------------------------------

/// Identifies a property on a component of an entity.
///
/// Every field is optional because the history service may not know the
/// owning entity; `external_id_property` keeps the service's iteration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityPropertyReference {
    pub entity_id: Option<String>,
    pub component_name: Option<String>,
    pub external_id_property: IndexMap<String, String>,
    pub property_name: Option<String>,
}

/// A named value sequence tagged with the reference the history service saw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValueBatch {
    pub entity_property_reference: EntityPropertyReference,
    pub values: Vec<PropertyValue>,
}

// ---------------------------------------------------------------------------
// 4. Catalog records
// ---------------------------------------------------------------------------

/// A catalog search hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub entity_id: String,
    pub entity_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(default)]
    pub is_external_id: bool,
    #[serde(default)]
    pub value: Option<DataValue>,
}

/// Full detail for one component of an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub component_name: String,
    pub component_type_id: String,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl ComponentDefinition {
    /// Whether any property flagged as an external id carries exactly
    /// `external_id` as a string value.
    pub fn has_external_id(&self, external_id: &str) -> bool {
        self.properties
            .iter()
            .filter(|p| p.is_external_id)
            .any(|p| p.value.as_ref().and_then(DataValue::as_str) == Some(external_id))
    }
}

// ---------------------------------------------------------------------------
// 5. Resolution output
// ---------------------------------------------------------------------------

/// A history batch whose reference has been re-anchored in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReference {
    pub values: Vec<PropertyValue>,
    pub entity_property_reference: EntityPropertyReference,
    pub entity_name: String,
}

impl ResolvedReference {
    pub fn composite_key(&self) -> String {
        derive_composite_key(&self.entity_property_reference)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Info,
    Warning,
}

/// A non-fatal, user-facing message about one failed resolution step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl Notice {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Warning,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            text: text.into(),
        }
    }
}
