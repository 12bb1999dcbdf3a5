//! twinref core library: resolves time-series property observations keyed by
//! external identifiers into entity/component references in a twin catalog.
//!
//! The history and catalog services are reached through the [`TwinService`]
//! trait. [`ReferenceResolver`] chains the history fetch, catalog search, and
//! entity detail calls, reporting per-batch failures as [`Notice`]s instead
//! of aborting.

pub mod client;
pub mod config;
pub mod errors;
pub mod identifiers;
pub mod links;
pub mod models;
pub mod policy;
pub mod resolver;

pub use client::{MemoryTwinService, RequestContext, ServiceCall, TwinService};
pub use config::ResolverOptions;
pub use errors::{TwinRefError, TwinRefResult};
pub use identifiers::{derive_composite_key, extract_external_id};
pub use links::{is_url_value, link_for_values, url_data_link, DataLink};
pub use models::{
    ComponentDefinition, DataValue, EntityPropertyReference, EntitySummary, ListEntitiesFilter,
    Notice, NoticeSeverity, PropertyDefinition, PropertyValue, PropertyValueBatch, Query,
    ResolvedReference,
};
pub use policy::{load_policy, WorkspaceDescriptor};
pub use resolver::{ReferenceResolver, Resolution};
