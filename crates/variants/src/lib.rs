//! Variant matrix engine.
//!
//! Derives every purchasable variant of a product from its configurable
//! attributes and carries per-variant data (SKU, price, stock, activation)
//! across edits to those attributes. Pure, synchronous domain logic: no IO, no
//! storage, no shared state.
//!
//! The flow is editor → generator → reconciler:
//! [`AttributeSet`] commands produce a new snapshot, [`generate_combinations`]
//! expands it, [`reconcile`] maps the result onto the previous variant list.

pub mod attribute;
pub mod combination;
pub mod config;
pub mod engine;
pub mod reconcile;
pub mod sku;
pub mod variant;

pub use attribute::{AttributeCommand, AttributeDefinition, AttributeSet};
pub use combination::{
    Combination, Combinations, OptionValue, combination_count, combinations,
    generate_combinations, generate_combinations_bounded,
};
pub use config::EngineConfig;
pub use engine::VariantEngine;
pub use reconcile::{
    FreshIds, IdentityKey, KeyPolicy, ReconcileOptions, ReconcileReport, Reconciler,
    Reconciliation, SequentialIds, VariantIdSource, reconcile,
};
pub use sku::SkuTemplate;
pub use variant::{VariantEdit, VariantRecord, VariantSummary, apply_edit, apply_price_to_all};
