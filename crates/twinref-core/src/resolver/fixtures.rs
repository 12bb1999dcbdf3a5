//! Shared builders for resolver tests.

use indexmap::IndexMap;

pub use crate::client::MemoryTwinService;
use crate::models::{
    ComponentDefinition, DataValue, EntityPropertyReference, EntitySummary, PropertyDefinition,
    PropertyValue, PropertyValueBatch, Query,
};

pub const ALARM_TYPE: &str = "com.example.alarm";

pub fn alarm_query() -> Query {
    Query {
        workspace_id: "factory".into(),
        entity_id: "site".into(),
        component_type_id: ALARM_TYPE.into(),
        properties: vec!["alarm_status".into()],
        start_time: Some("2024-01-01T00:00:00Z".into()),
        end_time: Some("2024-01-02T00:00:00Z".into()),
        ..Query::default()
    }
}

pub fn batch(external_id: &str, property_name: &str) -> PropertyValueBatch {
    let mut external_id_property = IndexMap::new();
    external_id_property.insert("alarm_key".to_string(), external_id.to_string());
    PropertyValueBatch {
        entity_property_reference: EntityPropertyReference {
            entity_id: None,
            component_name: None,
            external_id_property,
            property_name: Some(property_name.to_string()),
        },
        values: vec![
            PropertyValue {
                timestamp: "2024-01-01T00:00:00Z".into(),
                value: DataValue::Double(20.5),
            },
            PropertyValue {
                timestamp: "2024-01-01T00:01:00Z".into(),
                value: DataValue::Double(21.0),
            },
        ],
    }
}

pub fn summary(entity_id: &str, entity_name: &str) -> EntitySummary {
    EntitySummary {
        entity_id: entity_id.into(),
        entity_name: entity_name.into(),
    }
}

pub fn component(name: &str, component_type_id: &str, external_id: &str) -> ComponentDefinition {
    ComponentDefinition {
        component_name: name.into(),
        component_type_id: component_type_id.into(),
        properties: vec![
            PropertyDefinition {
                name: "alarm_status".into(),
                is_external_id: false,
                value: Some(DataValue::String("NORMAL".into())),
            },
            PropertyDefinition {
                name: "alarm_key".into(),
                is_external_id: true,
                value: Some(DataValue::String(external_id.into())),
            },
        ],
    }
}

/// Three batches `ext-1..3`, each owned by entity `e1..3` through a
/// matching alarm component.
pub fn three_batch_service() -> MemoryTwinService {
    let service = MemoryTwinService::new();
    service.set_history((1..=3).map(|i| batch(&format!("ext-{i}"), "alarm_status")).collect());
    for i in 1..=3 {
        let external_id = format!("ext-{i}");
        let entity_id = format!("e{i}");
        service.add_entity(&external_id, summary(&entity_id, &format!("Pump {i}")));
        service.set_components(
            &entity_id,
            vec![component(&format!("alarm{i}"), ALARM_TYPE, &external_id)],
        );
    }
    service
}
