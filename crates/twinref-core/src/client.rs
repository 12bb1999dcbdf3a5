//! Remote service seam consumed by the resolver.
//!
//! `TwinService` covers the three remote operations the resolver chains
//! together. Transport, authentication, and pagination live in implementors.
//! `MemoryTwinService` is an in-process implementation backed by fixed
//! responses, used for replaying recorded data, tests, and benchmarks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::errors::{TwinRefError, TwinRefResult};
use crate::models::{
    ComponentDefinition, EntitySummary, ListEntitiesFilter, PropertyValueBatch, Query,
};

// ---------------------------------------------------------------------------
// Request context
// ---------------------------------------------------------------------------

/// Cancellation and deadline carried through every remote call.
///
/// Clones share one cancellation flag, so cancelling any clone cancels all
/// in-flight work started from it.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail fast if the caller has given up on this request.
    pub fn check(&self) -> TwinRefResult<()> {
        if self.is_cancelled() {
            return Err(TwinRefError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(TwinRefError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// The remote history and catalog operations the resolver depends on.
pub trait TwinService: Send + Sync {
    /// Historical property values for `query`, one batch per property
    /// reference the history service knows about.
    fn get_property_value_history(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Vec<PropertyValueBatch>>;

    /// Catalog entities matching `query.list_entities_filter`.
    fn list_entities(&self, ctx: &RequestContext, query: &Query)
        -> TwinRefResult<Vec<EntitySummary>>;

    /// Component definitions of the entity named by `query.entity_id`.
    fn get_entity(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Vec<ComponentDefinition>>;
}

impl<T: TwinService + ?Sized> TwinService for Arc<T> {
    fn get_property_value_history(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Vec<PropertyValueBatch>> {
        (**self).get_property_value_history(ctx, query)
    }

    fn list_entities(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Vec<EntitySummary>> {
        (**self).list_entities(ctx, query)
    }

    fn get_entity(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Vec<ComponentDefinition>> {
        (**self).get_entity(ctx, query)
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// One recorded call against a `MemoryTwinService`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceCall {
    History,
    ListEntities { external_id: Option<String> },
    GetEntity { entity_id: String },
}

#[derive(Default)]
struct MemoryState {
    history: Vec<PropertyValueBatch>,
    history_error: Option<String>,
    entities_by_external_id: IndexMap<String, Vec<EntitySummary>>,
    components_by_entity: IndexMap<String, Vec<ComponentDefinition>>,
    search_failures: IndexMap<String, String>,
    detail_failures: IndexMap<String, String>,
    calls: Vec<ServiceCall>,
}

/// `TwinService` answering from fixed in-memory responses.
#[derive(Default)]
pub struct MemoryTwinService {
    state: Mutex<MemoryState>,
}

impl MemoryTwinService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_history(&self, batches: Vec<PropertyValueBatch>) {
        self.state.lock().history = batches;
    }

    pub fn fail_history(&self, message: &str) {
        self.state.lock().history_error = Some(message.to_string());
    }

    /// Register a catalog entity as carrying `external_id`.
    pub fn add_entity(&self, external_id: &str, summary: EntitySummary) {
        self.state
            .lock()
            .entities_by_external_id
            .entry(external_id.to_string())
            .or_default()
            .push(summary);
    }

    pub fn set_components(&self, entity_id: &str, components: Vec<ComponentDefinition>) {
        self.state
            .lock()
            .components_by_entity
            .insert(entity_id.to_string(), components);
    }

    /// Make catalog searches for `external_id` fail with `message`.
    pub fn fail_search(&self, external_id: &str, message: &str) {
        self.state
            .lock()
            .search_failures
            .insert(external_id.to_string(), message.to_string());
    }

    /// Make detail fetches for `entity_id` fail with `message`.
    pub fn fail_detail(&self, entity_id: &str, message: &str) {
        self.state
            .lock()
            .detail_failures
            .insert(entity_id.to_string(), message.to_string());
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.state.lock().calls.clone()
    }
}

fn external_id_filter(query: &Query) -> Option<&str> {
    query.list_entities_filter.iter().find_map(|f| match f {
        ListEntitiesFilter::ExternalId(id) => Some(id.as_str()),
        _ => None,
    })
}

impl TwinService for MemoryTwinService {
    fn get_property_value_history(
        &self,
        ctx: &RequestContext,
        _query: &Query,
    ) -> TwinRefResult<Vec<PropertyValueBatch>> {
        ctx.check()?;
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::History);
        match &state.history_error {
            Some(message) => Err(TwinRefError::Service(message.clone())),
            None => Ok(state.history.clone()),
        }
    }

    fn list_entities(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Vec<EntitySummary>> {
        ctx.check()?;
        let external_id = external_id_filter(query);
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::ListEntities {
            external_id: external_id.map(str::to_string),
        });
        match external_id {
            Some(id) => {
                if let Some(message) = state.search_failures.get(id) {
                    return Err(TwinRefError::Service(message.clone()));
                }
                Ok(state
                    .entities_by_external_id
                    .get(id)
                    .cloned()
                    .unwrap_or_default())
            }
            None => Ok(state
                .entities_by_external_id
                .values()
                .flatten()
                .cloned()
                .collect()),
        }
    }

    fn get_entity(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Vec<ComponentDefinition>> {
        ctx.check()?;
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::GetEntity {
            entity_id: query.entity_id.clone(),
        });
        if let Some(message) = state.detail_failures.get(&query.entity_id) {
            return Err(TwinRefError::Service(message.clone()));
        }
        state
            .components_by_entity
            .get(&query.entity_id)
            .cloned()
            .ok_or_else(|| {
                TwinRefError::Service(format!("entity {} not found", query.entity_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_cancel_is_shared() {
        let ctx = RequestContext::new();
        let clone = ctx.clone();
        assert!(ctx.check().is_ok());
        clone.cancel();
        assert!(matches!(ctx.check(), Err(TwinRefError::Cancelled)));
    }

    #[test]
    fn test_context_deadline() {
        let ctx = RequestContext::new().with_deadline(Instant::now());
        assert!(matches!(ctx.check(), Err(TwinRefError::DeadlineExceeded)));
        let later = RequestContext::new().with_timeout(Duration::from_secs(60));
        assert!(later.check().is_ok());
    }

    #[test]
    fn test_memory_service_search_by_external_id() {
        let service = MemoryTwinService::new();
        service.add_entity(
            "ext-1",
            EntitySummary {
                entity_id: "e1".into(),
                entity_name: "Pump".into(),
            },
        );
        let query = Query {
            list_entities_filter: vec![ListEntitiesFilter::ExternalId("ext-1".into())],
            ..Query::default()
        };
        let ctx = RequestContext::new();
        let hits = service.list_entities(&ctx, &query).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity_id, "e1");

        let miss = Query {
            list_entities_filter: vec![ListEntitiesFilter::ExternalId("ext-2".into())],
            ..Query::default()
        };
        assert!(service.list_entities(&ctx, &miss).unwrap().is_empty());
        assert_eq!(service.calls().len(), 2);
    }

    #[test]
    fn test_memory_service_unknown_entity_errors() {
        let service = MemoryTwinService::new();
        let query = Query {
            entity_id: "missing".into(),
            ..Query::default()
        };
        let err = service
            .get_entity(&RequestContext::new(), &query)
            .unwrap_err();
        assert_eq!(err.to_string(), "Service error: entity missing not found");
    }

    #[test]
    fn test_memory_service_respects_cancellation() {
        let service = MemoryTwinService::new();
        let ctx = RequestContext::new();
        ctx.cancel();
        assert!(service
            .get_property_value_history(&ctx, &Query::default())
            .is_err());
        assert!(service.calls().is_empty());
    }
}
