//! Cartesian product over attribute values.
//!
//! Attributes are processed outer-to-inner in definition order, values in list
//! order. Empty-string slots are unfilled inputs and never become options; an
//! attribute with only empty slots does not take part. An attribute whose
//! value list is literally empty collapses the whole product to nothing.

use core::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use skuforge_core::{AttributeId, DomainError, DomainResult, ValueObject};

use crate::attribute::AttributeDefinition;

/// One selected value for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValue {
    pub attribute_id: AttributeId,
    pub name: String,
    pub value: String,
}

/// A full assignment of one value to every participating attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Combination {
    options: Vec<OptionValue>,
}

impl ValueObject for Combination {}

impl Combination {
    pub fn new(options: Vec<OptionValue>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[OptionValue] {
        &self.options
    }

    pub fn into_options(self) -> Vec<OptionValue> {
        self.options
    }

    /// Selected values in attribute order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.value.as_str())
    }

    /// Value selected for the first attribute with this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Axis<'a> {
    attribute: &'a AttributeDefinition,
    values: Vec<&'a str>,
}

/// Participating axes, or an empty list when the product is empty.
fn axes(attributes: &[AttributeDefinition]) -> Vec<Axis<'_>> {
    if attributes.iter().any(|a| a.values.is_empty()) {
        return Vec::new();
    }
    attributes
        .iter()
        .map(|attribute| Axis {
            attribute,
            values: attribute.filled_values().collect(),
        })
        .filter(|axis| !axis.values.is_empty())
        .collect()
}

fn product_size(axes: &[Axis<'_>]) -> Option<u128> {
    if axes.is_empty() {
        return Some(0);
    }
    axes.iter()
        .try_fold(1u128, |acc, axis| acc.checked_mul(axis.values.len() as u128))
}

/// Number of combinations `attributes` expand to; `None` if it overflows `u128`.
pub fn combination_count(attributes: &[AttributeDefinition]) -> Option<u128> {
    product_size(&axes(attributes))
}

/// Lazy, restartable enumeration of combinations.
///
/// Works as an odometer over the participating value lists; nothing is
/// materialized until `next` is called. Cloning yields an independent cursor.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    axes: Vec<Axis<'a>>,
    cursor: Option<Vec<usize>>,
    total: Option<u128>,
    emitted: u128,
}

/// Start a lazy enumeration over `attributes`.
pub fn combinations(attributes: &[AttributeDefinition]) -> Combinations<'_> {
    let axes = axes(attributes);
    let total = product_size(&axes);
    let mut iter = Combinations {
        axes,
        cursor: None,
        total,
        emitted: 0,
    };
    iter.restart();
    iter
}

impl Combinations<'_> {
    /// Rewind to the first combination.
    pub fn restart(&mut self) {
        self.emitted = 0;
        self.cursor = if self.axes.is_empty() {
            None
        } else {
            Some(vec![0; self.axes.len()])
        };
    }

    /// Total number of combinations in a full pass; `None` on overflow.
    pub fn total(&self) -> Option<u128> {
        self.total
    }

    fn remaining(&self) -> Option<u128> {
        if self.cursor.is_none() {
            return Some(0);
        }
        self.total.map(|t| t - self.emitted)
    }
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;

        let options = self
            .axes
            .iter()
            .zip(cursor.iter())
            .map(|(axis, &i)| OptionValue {
                attribute_id: axis.attribute.id,
                name: axis.attribute.name.clone(),
                value: axis.values[i].to_string(),
            })
            .collect();

        // Advance the innermost axis, carrying outward.
        let mut exhausted = true;
        for (slot, axis) in cursor.iter_mut().zip(self.axes.iter()).rev() {
            *slot += 1;
            if *slot < axis.values.len() {
                exhausted = false;
                break;
            }
            *slot = 0;
        }
        if exhausted {
            self.cursor = None;
        }
        self.emitted += 1;

        Some(Combination::new(options))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining().map(usize::try_from) {
            Some(Ok(n)) => (n, Some(n)),
            _ => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Combinations<'_> {}

/// `len()` is only meaningful while [`Combinations::total`] fits in `usize`;
/// past that the size hint is not exact and `len()` panics.
impl ExactSizeIterator for Combinations<'_> {}

/// Eagerly generate every combination. No size guard: see
/// [`generate_combinations_bounded`] for inputs that are not trusted to be small.
pub fn generate_combinations(attributes: &[AttributeDefinition]) -> Vec<Combination> {
    let combinations: Vec<Combination> = combinations(attributes).collect();
    tracing::debug!(
        attributes = attributes.len(),
        combinations = combinations.len(),
        "generated combinations"
    );
    combinations
}

/// Generate every combination, refusing when there would be more than `limit`.
///
/// The size is computed up front, so an oversized product is rejected without
/// allocating any of it.
pub fn generate_combinations_bounded(
    attributes: &[AttributeDefinition],
    limit: usize,
) -> DomainResult<Vec<Combination>> {
    let count = combination_count(attributes);
    match count {
        Some(n) if n <= limit as u128 => Ok(generate_combinations(attributes)),
        _ => {
            tracing::warn!(?count, limit, "combination limit exceeded");
            Err(DomainError::combination_limit(count, limit))
        }
    }
}
