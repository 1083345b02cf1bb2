//! Variant reconciliation: carry prior records forward onto freshly generated
//! combinations, synthesize defaults for the rest, drop orphans.

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use skuforge_core::{AttributeId, DomainError, VariantId};

use crate::combination::{Combination, OptionValue};
use crate::sku::SkuTemplate;
use crate::variant::VariantRecord;

/// How a combination is matched against a prior variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPolicy {
    /// Ordered value tuple, compared positionally. Reordering attributes breaks
    /// every match.
    #[default]
    Positional,
    /// `(attribute id, value)` pairs sorted by attribute id. Survives attribute
    /// reordering and renames.
    ByAttribute,
}

impl KeyPolicy {
    pub fn key_of(self, options: &[OptionValue]) -> IdentityKey {
        match self {
            KeyPolicy::Positional => {
                IdentityKey::Positional(options.iter().map(|o| o.value.clone()).collect())
            }
            KeyPolicy::ByAttribute => {
                let mut pairs: Vec<(AttributeId, String)> = options
                    .iter()
                    .map(|o| (o.attribute_id, o.value.clone()))
                    .collect();
                pairs.sort();
                IdentityKey::ByAttribute(pairs)
            }
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(KeyPolicy::Positional),
            "by-attribute" | "by_attribute" => Ok(KeyPolicy::ByAttribute),
            other => Err(DomainError::validation(format!("unknown key policy: {other}"))),
        }
    }
}

/// Join key deciding whether a combination "is" a previously seen variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Positional(Vec<String>),
    ByAttribute(Vec<(AttributeId, String)>),
}

/// Source of ids for newly materialized variants.
pub trait VariantIdSource {
    fn next_id(&mut self) -> VariantId;
}

/// Fresh UUIDv7 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshIds;

impl VariantIdSource for FreshIds {
    fn next_id(&mut self) -> VariantId {
        VariantId::new()
    }
}

/// Counter-based ids; deterministic, for tests and fixtures.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    pub fn starting_at(next: u128) -> Self {
        Self { next }
    }
}

impl VariantIdSource for SequentialIds {
    fn next_id(&mut self) -> VariantId {
        let id = VariantId::from_u128(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReconcileOptions {
    pub key_policy: KeyPolicy,
    pub sku: SkuTemplate,
}

/// What a reconciliation did to the prior list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub kept: usize,
    pub created: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub variants: Vec<VariantRecord>,
    pub report: ReconcileReport,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler<I = FreshIds> {
    options: ReconcileOptions,
    ids: I,
}

impl Reconciler<FreshIds> {
    pub fn new(options: ReconcileOptions) -> Self {
        Self {
            options,
            ids: FreshIds,
        }
    }
}

impl<I: VariantIdSource> Reconciler<I> {
    pub fn with_id_source(options: ReconcileOptions, ids: I) -> Self {
        Self { options, ids }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn reconcile(
        &mut self,
        combinations: &[Combination],
        prior: &[VariantRecord],
        base_price: f64,
    ) -> Vec<VariantRecord> {
        self.reconcile_with_report(combinations, prior, base_price).variants
    }

    /// Produce the next variant list, in combination order.
    ///
    /// Each prior record is claimed at most once; among prior records sharing a
    /// key, earlier ones are claimed first.
    pub fn reconcile_with_report(
        &mut self,
        combinations: &[Combination],
        prior: &[VariantRecord],
        base_price: f64,
    ) -> Reconciliation {
        let policy = self.options.key_policy;

        let mut index: HashMap<IdentityKey, VecDeque<&VariantRecord>> = HashMap::new();
        for record in prior {
            index
                .entry(policy.key_of(&record.options))
                .or_default()
                .push_back(record);
        }

        let mut report = ReconcileReport::default();
        let variants: Vec<VariantRecord> = combinations
            .iter()
            .map(|combination| {
                let key = policy.key_of(combination.options());
                match index.get_mut(&key).and_then(VecDeque::pop_front) {
                    Some(existing) => {
                        report.kept += 1;
                        VariantRecord {
                            options: combination.options().to_vec(),
                            ..existing.clone()
                        }
                    }
                    None => {
                        report.created += 1;
                        let sku = self.options.sku.render(combination.values());
                        VariantRecord::new(self.ids.next_id(), combination.clone(), sku, base_price)
                    }
                }
            })
            .collect();
        report.dropped = prior.len() - report.kept;

        tracing::debug!(
            kept = report.kept,
            created = report.created,
            dropped = report.dropped,
            key_policy = ?policy,
            "variants reconciled"
        );

        Reconciliation { variants, report }
    }
}

/// Reconcile with the default options and fresh ids.
pub fn reconcile(
    combinations: &[Combination],
    prior: &[VariantRecord],
    base_price: f64,
) -> Vec<VariantRecord> {
    Reconciler::new(ReconcileOptions::default()).reconcile(combinations, prior, base_price)
}
