//! Request builders for the three resolution stages.
//!
//! Each stage gets a fresh `Query` derived from the caller's template, so no
//! request value is mutated after it has been sent.

use crate::models::{ListEntitiesFilter, Query};

/// Stage 1: the caller's query, sent as-is to the history service.
pub fn history_request(template: &Query) -> Query {
    template.clone()
}

/// Stage 2: a catalog search for entities carrying `external_id`.
///
/// Entity id, property list, and component type are cleared so the search is
/// constrained by the external-id filter alone.
pub fn search_request(template: &Query, external_id: &str) -> Query {
    Query {
        entity_id: String::new(),
        properties: Vec::new(),
        component_type_id: String::new(),
        list_entities_filter: vec![ListEntitiesFilter::ExternalId(external_id.to_string())],
        ..template.clone()
    }
}

/// Stage 3: a detail fetch for the entity found by `search`.
pub fn detail_request(search: &Query, entity_id: &str) -> Query {
    Query {
        entity_id: entity_id.to_string(),
        ..search.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Query {
        Query {
            workspace_id: "ws".into(),
            entity_id: "e0".into(),
            component_type_id: "com.example.alarm".into(),
            properties: vec!["alarm_status".into()],
            start_time: Some("2024-01-01T00:00:00Z".into()),
            ..Query::default()
        }
    }

    #[test]
    fn test_search_request_clears_entity_scope() {
        let t = template();
        let search = search_request(&t, "ext-9");
        assert_eq!(search.entity_id, "");
        assert!(search.properties.is_empty());
        assert_eq!(search.component_type_id, "");
        assert_eq!(
            search.list_entities_filter,
            vec![ListEntitiesFilter::ExternalId("ext-9".into())]
        );
        assert_eq!(search.workspace_id, "ws");
        // Template is untouched.
        assert_eq!(t.entity_id, "e0");
        assert_eq!(t.component_type_id, "com.example.alarm");
    }

    #[test]
    fn test_detail_request_sets_entity() {
        let search = search_request(&template(), "ext-9");
        let detail = detail_request(&search, "e1");
        assert_eq!(detail.entity_id, "e1");
        assert_eq!(detail.list_entities_filter, search.list_entities_filter);
    }

    #[test]
    fn test_history_request_is_template() {
        assert_eq!(history_request(&template()), template());
    }
}
