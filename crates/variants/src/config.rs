//! Engine configuration.
//!
//! Every field has a working default; the environment only overrides.

use serde::{Deserialize, Serialize};

use skuforge_core::{DomainError, DomainResult};

use crate::reconcile::{KeyPolicy, ReconcileOptions};
use crate::sku::SkuTemplate;

pub const MAX_COMBINATIONS_ENV: &str = "SKUFORGE_MAX_COMBINATIONS";
pub const KEY_POLICY_ENV: &str = "SKUFORGE_KEY_POLICY";
pub const SKU_SEPARATOR_ENV: &str = "SKUFORGE_SKU_SEPARATOR";

pub const DEFAULT_MAX_COMBINATIONS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Upper bound on the combinations a single regeneration may produce.
    pub max_combinations: usize,
    pub key_policy: KeyPolicy,
    pub sku: SkuTemplate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_combinations: DEFAULT_MAX_COMBINATIONS,
            key_policy: KeyPolicy::default(),
            sku: SkuTemplate::default(),
        }
    }
}

impl EngineConfig {
    /// Read overrides from the process environment, keeping defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lenient variant of [`EngineConfig::try_from_lookup`]: bad values are
    /// logged and replaced by their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match parse_max_combinations(lookup(MAX_COMBINATIONS_ENV)) {
            Ok(Some(max)) => config.max_combinations = max,
            Ok(None) => {}
            Err(e) => tracing::warn!(
                key = MAX_COMBINATIONS_ENV,
                error = %e,
                fallback = config.max_combinations,
                "ignoring invalid config value"
            ),
        }

        match parse_key_policy(lookup(KEY_POLICY_ENV)) {
            Ok(Some(policy)) => config.key_policy = policy,
            Ok(None) => {}
            Err(e) => tracing::warn!(
                key = KEY_POLICY_ENV,
                error = %e,
                fallback = ?config.key_policy,
                "ignoring invalid config value"
            ),
        }

        if let Some(separator) = lookup(SKU_SEPARATOR_ENV) {
            config.sku.separator = separator;
        }

        config
    }

    /// Strict variant: the first unparsable value is an error.
    pub fn try_from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(max) = parse_max_combinations(lookup(MAX_COMBINATIONS_ENV))? {
            config.max_combinations = max;
        }
        if let Some(policy) = parse_key_policy(lookup(KEY_POLICY_ENV))? {
            config.key_policy = policy;
        }
        if let Some(separator) = lookup(SKU_SEPARATOR_ENV) {
            config.sku.separator = separator;
        }
        Ok(config)
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            key_policy: self.key_policy,
            sku: self.sku.clone(),
        }
    }
}

fn parse_max_combinations(raw: Option<String>) -> DomainResult<Option<usize>> {
    raw.map(|value| {
        value.trim().parse::<usize>().map_err(|e| {
            DomainError::validation(format!("{MAX_COMBINATIONS_ENV}={value:?}: {e}"))
        })
    })
    .transpose()
}

fn parse_key_policy(raw: Option<String>) -> DomainResult<Option<KeyPolicy>> {
    raw.map(|value| value.parse::<KeyPolicy>()).transpose()
}
