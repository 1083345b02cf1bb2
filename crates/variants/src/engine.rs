use skuforge_core::DomainResult;

use crate::attribute::AttributeSet;
use crate::combination::generate_combinations_bounded;
use crate::config::EngineConfig;
use crate::reconcile::{FreshIds, Reconciler, Reconciliation, VariantIdSource};
use crate::variant::VariantRecord;

/// Generator + reconciler behind one call, configured once.
///
/// This is what the product form calls after every attribute edit.
#[derive(Debug, Clone)]
pub struct VariantEngine<I = FreshIds> {
    config: EngineConfig,
    reconciler: Reconciler<I>,
}

impl VariantEngine<FreshIds> {
    pub fn new(config: EngineConfig) -> Self {
        let reconciler = Reconciler::new(config.reconcile_options());
        Self { config, reconciler }
    }

    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }
}

impl Default for VariantEngine<FreshIds> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<I: VariantIdSource> VariantEngine<I> {
    pub fn with_id_source(config: EngineConfig, ids: I) -> Self {
        let reconciler = Reconciler::with_id_source(config.reconcile_options(), ids);
        Self { config, reconciler }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recompute the variant list for `attributes`.
    ///
    /// Fails only when the attribute set expands past `max_combinations`; the
    /// prior list is untouched in that case.
    pub fn regenerate(
        &mut self,
        attributes: &AttributeSet,
        prior: &[VariantRecord],
        base_price: f64,
    ) -> DomainResult<Reconciliation> {
        let combinations =
            generate_combinations_bounded(attributes.definitions(), self.config.max_combinations)?;
        Ok(self
            .reconciler
            .reconcile_with_report(&combinations, prior, base_price))
    }
}
