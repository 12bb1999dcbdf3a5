//! Three-call resolution of history batches into catalog references.
//!
//! 1. Fetch property history for the caller's query. Failure here is fatal.
//! 2. For each batch, search the catalog for entities carrying the batch's
//!    external id.
//! 3. For the first hit, fetch its components and find the one of the target
//!    type whose external-id property equals that id.
//!
//! Steps 2 and 3 fail per batch: the error becomes a warning `Notice` and the
//! remaining batches are still resolved.

use tracing::{debug, info, warn};

use crate::client::{RequestContext, TwinService};
use crate::config::ResolverOptions;
use crate::errors::TwinRefResult;
use crate::identifiers::extract_external_id;
use crate::models::{
    ComponentDefinition, EntityPropertyReference, Notice, PropertyValueBatch, Query,
    ResolvedReference,
};
use crate::resolver::requests::{detail_request, history_request, search_request};

/// Best-effort output of one `resolve_batch` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub references: Vec<ResolvedReference>,
    pub notices: Vec<Notice>,
}

/// What happened to a single history batch.
#[derive(Debug, Default)]
pub(crate) struct BatchOutcome {
    pub reference: Option<ResolvedReference>,
    pub notice: Option<Notice>,
}

impl BatchOutcome {
    fn failed(notice: Notice) -> Self {
        Self {
            reference: None,
            notice: Some(notice),
        }
    }
}

impl Resolution {
    pub(crate) fn from_outcomes(outcomes: impl IntoIterator<Item = BatchOutcome>) -> Self {
        let mut resolution = Resolution::default();
        for outcome in outcomes {
            if let Some(reference) = outcome.reference {
                resolution.references.push(reference);
            }
            if let Some(notice) = outcome.notice {
                resolution.notices.push(notice);
            }
        }
        resolution
    }
}

/// Resolves history batches against the catalog through a `TwinService`.
pub struct ReferenceResolver<S> {
    pub(crate) service: S,
    pub(crate) options: ResolverOptions,
}

impl<S: TwinService> ReferenceResolver<S> {
    pub fn new(service: S) -> Self {
        Self::with_options(service, ResolverOptions::default())
    }

    pub fn with_options(service: S, options: ResolverOptions) -> Self {
        Self { service, options }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve every batch returned by the history service, in input order.
    ///
    /// Returns `Err` only when the history fetch itself fails; per-batch
    /// failures are reported through `Resolution::notices`.
    pub fn resolve_batch(&self, ctx: &RequestContext, query: &Query) -> TwinRefResult<Resolution> {
        let batches = self.fetch_history(ctx, query)?;
        let resolution = Resolution::from_outcomes(
            batches
                .iter()
                .map(|batch| self.resolve_one(ctx, query, batch)),
        );
        log_summary(batches.len(), &resolution);
        Ok(resolution)
    }

    pub(crate) fn fetch_history(
        &self,
        ctx: &RequestContext,
        query: &Query,
    ) -> TwinRefResult<Vec<PropertyValueBatch>> {
        ctx.check()?;
        self.service
            .get_property_value_history(ctx, &history_request(query))
    }

    /// Steps 2 and 3 for one batch.
    pub(crate) fn resolve_one(
        &self,
        ctx: &RequestContext,
        template: &Query,
        batch: &PropertyValueBatch,
    ) -> BatchOutcome {
        let external_id = extract_external_id(&batch.entity_property_reference);
        if external_id.is_empty() {
            debug!("History batch carries no external id; searching with an empty filter");
        }

        let search = search_request(template, &external_id);
        let summaries = match ctx
            .check()
            .and_then(|_| self.service.list_entities(ctx, &search))
        {
            Ok(summaries) => summaries,
            Err(e) => {
                if e.is_interrupt() {
                    debug!("Catalog search for external_id={} abandoned: {}", external_id, e);
                } else {
                    warn!("Catalog search failed for external_id={}: {}", external_id, e);
                }
                return BatchOutcome::failed(Notice::warning(e.to_string()));
            }
        };

        // First hit wins; the service's ordering is authoritative.
        let Some(summary) = summaries.into_iter().next() else {
            debug!("No catalog entity carries external_id={}; skipping batch", external_id);
            return BatchOutcome {
                reference: None,
                notice: self.verbose(|| {
                    format!("No entity found for external id {external_id:?}")
                }),
            };
        };

        let detail = detail_request(&search, &summary.entity_id);
        let components = match ctx
            .check()
            .and_then(|_| self.service.get_entity(ctx, &detail))
        {
            Ok(components) => components,
            Err(e) => {
                if e.is_interrupt() {
                    debug!(
                        "Entity detail fetch for entity_id={} abandoned: {}",
                        summary.entity_id, e
                    );
                } else {
                    warn!(
                        "Entity detail fetch failed for entity_id={}: {}",
                        summary.entity_id, e
                    );
                }
                return BatchOutcome::failed(Notice::warning(e.to_string()));
            }
        };

        let component_name =
            match_component(&components, &template.component_type_id, &external_id);
        let notice = if component_name.is_empty() {
            debug!(
                "No {} component of entity_id={} carries external_id={}",
                template.component_type_id, summary.entity_id, external_id
            );
            self.verbose(|| {
                format!(
                    "No {} component of entity {} matches external id {:?}",
                    template.component_type_id, summary.entity_name, external_id
                )
            })
        } else {
            None
        };

        let source = &batch.entity_property_reference;
        BatchOutcome {
            reference: Some(ResolvedReference {
                values: batch.values.clone(),
                entity_property_reference: EntityPropertyReference {
                    entity_id: Some(summary.entity_id),
                    component_name: Some(component_name),
                    external_id_property: source.external_id_property.clone(),
                    property_name: source.property_name.clone(),
                },
                entity_name: summary.entity_name,
            }),
            notice,
        }
    }

    fn verbose<F: FnOnce() -> String>(&self, text: F) -> Option<Notice> {
        self.options.verbose_notices.then(|| Notice::info(text()))
    }
}

/// Name of the component that owns `external_id`, or `""`.
///
/// Only the first component of `component_type_id` is inspected.
pub fn match_component(
    components: &[ComponentDefinition],
    component_type_id: &str,
    external_id: &str,
) -> String {
    components
        .iter()
        .find(|c| c.component_type_id == component_type_id)
        .filter(|c| c.has_external_id(external_id))
        .map(|c| c.component_name.clone())
        .unwrap_or_default()
}

pub(crate) fn log_summary(batches: usize, resolution: &Resolution) {
    info!(
        "Resolved {} of {} history batches with {} notices",
        resolution.references.len(),
        batches,
        resolution.notices.len(),
    );
}
