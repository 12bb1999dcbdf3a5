//! Composite keys and external-id extraction for entity property references.

use crate::models::EntityPropertyReference;

/// Separator placed after each key segment.
pub const KEY_SEPARATOR: &str = "_";

/// Return the first external identifier in the reference's mapping, or `""`.
///
/// The mapping holds one meaningful entry in practice; extra entries are
/// ignored and the first in iteration order wins.
pub fn extract_external_id(reference: &EntityPropertyReference) -> String {
    reference
        .external_id_property
        .values()
        .next()
        .cloned()
        .unwrap_or_default()
}

/// Build the `entityId_componentName_externalId_propertyName` key.
///
/// Absent entity id or component name contribute nothing (not even the
/// separator); the external-id segment is always followed by a separator.
/// Keys are only unambiguous when callers supply every segment.
pub fn derive_composite_key(reference: &EntityPropertyReference) -> String {
    let external_id = extract_external_id(reference);
    let mut key = String::new();
    if let Some(entity_id) = &reference.entity_id {
        key.push_str(entity_id);
        key.push_str(KEY_SEPARATOR);
    }
    if let Some(component_name) = &reference.component_name {
        key.push_str(component_name);
        key.push_str(KEY_SEPARATOR);
    }
    key.push_str(&external_id);
    key.push_str(KEY_SEPARATOR);
    if let Some(property_name) = &reference.property_name {
        key.push_str(property_name);
    }
    key
}
