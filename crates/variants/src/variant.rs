use serde::{Deserialize, Serialize};

use skuforge_core::{AttributeId, DomainError, DomainResult, Entity, VariantId};

use crate::combination::{Combination, OptionValue};

/// A purchasable variant: one combination plus its independently edited fields.
///
/// Serialized for the form layer with the value tuple under `attributeValues`
/// next to the full `options`. A record that only carries `attributeValues`
/// deserializes with unattributed options; it still matches by positional key
/// and picks up attribute ids on its next reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "VariantRecordWire", try_from = "VariantRecordWire")]
pub struct VariantRecord {
    pub id: VariantId,
    pub options: Vec<OptionValue>,
    pub sku: String,
    /// Price in major currency units.
    pub price: f64,
    pub quantity: i64,
    pub is_active: bool,
}

impl VariantRecord {
    /// A newly materialized variant: zero stock, active.
    pub fn new(id: VariantId, combination: Combination, sku: String, price: f64) -> Self {
        Self {
            id,
            options: combination.into_options(),
            sku,
            price,
            quantity: 0,
            is_active: true,
        }
    }

    /// The ordered value tuple identifying which combination this is.
    pub fn attribute_values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    pub fn edit(&mut self, edit: &VariantEdit) -> DomainResult<()> {
        match edit {
            VariantEdit::SetSku(sku) => self.sku = sku.clone(),
            VariantEdit::SetPrice(price) => self.price = validate_price(*price)?,
            VariantEdit::SetQuantity(quantity) => self.quantity = validate_quantity(*quantity)?,
            VariantEdit::SetActive(active) => self.is_active = *active,
        }
        Ok(())
    }
}

/// Attribute id given to options that arrive without one.
pub const UNATTRIBUTED: AttributeId = AttributeId::NIL;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantRecordWire {
    id: VariantId,
    #[serde(default)]
    attribute_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<OptionValue>>,
    #[serde(default)]
    sku: String,
    price: f64,
    #[serde(default, alias = "stock")]
    quantity: i64,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<VariantRecord> for VariantRecordWire {
    fn from(record: VariantRecord) -> Self {
        Self {
            id: record.id,
            attribute_values: record.options.iter().map(|o| o.value.clone()).collect(),
            options: Some(record.options),
            sku: record.sku,
            price: record.price,
            quantity: record.quantity,
            is_active: record.is_active,
        }
    }
}

impl TryFrom<VariantRecordWire> for VariantRecord {
    type Error = DomainError;

    fn try_from(wire: VariantRecordWire) -> Result<Self, Self::Error> {
        let options = match wire.options {
            Some(options) => {
                let matches = wire.attribute_values.is_empty()
                    || options
                        .iter()
                        .map(|o| o.value.as_str())
                        .eq(wire.attribute_values.iter().map(String::as_str));
                if !matches {
                    return Err(DomainError::validation(
                        "attributeValues disagree with options",
                    ));
                }
                options
            }
            None => wire
                .attribute_values
                .into_iter()
                .map(|value| OptionValue {
                    attribute_id: UNATTRIBUTED,
                    name: String::new(),
                    value,
                })
                .collect(),
        };

        Ok(Self {
            id: wire.id,
            options,
            sku: wire.sku,
            price: wire.price,
            quantity: wire.quantity,
            is_active: wire.is_active,
        })
    }
}

impl Entity for VariantRecord {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A single field edit coming back from the variant table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum VariantEdit {
    SetSku(String),
    SetPrice(f64),
    SetQuantity(i64),
    SetActive(bool),
}

fn validate_price(price: f64) -> DomainResult<f64> {
    if !price.is_finite() {
        return Err(DomainError::validation("price must be a finite number"));
    }
    if price < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(price)
}

fn validate_quantity(quantity: i64) -> DomainResult<i64> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity cannot be negative"));
    }
    Ok(quantity)
}

/// Apply one edit to the variant with `id`.
pub fn apply_edit(variants: &mut [VariantRecord], id: VariantId, edit: &VariantEdit) -> DomainResult<()> {
    let variant = skuforge_core::entity::find_by_id_mut(variants, &id).ok_or(DomainError::NotFound)?;
    variant.edit(edit)?;
    tracing::debug!(variant_id = %id, ?edit, "variant edited");
    Ok(())
}

/// Overwrite every variant's price, e.g. after the product's list price changed.
pub fn apply_price_to_all(variants: &mut [VariantRecord], price: f64) -> DomainResult<()> {
    let price = validate_price(price)?;
    for variant in variants.iter_mut() {
        variant.price = price;
    }
    Ok(())
}

/// Aggregate figures over a variant list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub count: usize,
    pub active: usize,
    pub total_quantity: i64,
    /// Price range over active variants only.
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl VariantSummary {
    pub fn of(variants: &[VariantRecord]) -> Self {
        variants.iter().fold(
            Self {
                count: variants.len(),
                ..Self::default()
            },
            |mut summary, v| {
                summary.total_quantity = summary.total_quantity.saturating_add(v.quantity);
                if v.is_active {
                    summary.active += 1;
                    summary.min_price = Some(summary.min_price.map_or(v.price, |p| p.min(v.price)));
                    summary.max_price = Some(summary.max_price.map_or(v.price, |p| p.max(v.price)));
                }
                summary
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: u128, values: &[&str], price: f64) -> VariantRecord {
        let options = values
            .iter()
            .enumerate()
            .map(|(i, v)| OptionValue {
                attribute_id: AttributeId::from_u128(i as u128),
                name: format!("A{i}"),
                value: v.to_string(),
            })
            .collect();
        VariantRecord::new(
            VariantId::from_u128(n),
            Combination::new(options),
            String::new(),
            price,
        )
    }

    #[test]
    fn new_record_defaults_stock_and_activation() {
        let v = record(1, &["S", "Red"], 20.0);
        assert_eq!(v.quantity, 0);
        assert!(v.is_active);
        assert_eq!(v.price, 20.0);
        assert_eq!(v.attribute_values(), vec!["S", "Red"]);
    }

    #[test]
    fn edits_update_single_fields() {
        let mut v = record(1, &["S"], 20.0);
        v.edit(&VariantEdit::SetSku("TEE-S".into())).unwrap();
        v.edit(&VariantEdit::SetPrice(9.99)).unwrap();
        v.edit(&VariantEdit::SetQuantity(12)).unwrap();
        v.edit(&VariantEdit::SetActive(false)).unwrap();

        assert_eq!(v.sku, "TEE-S");
        assert_eq!(v.price, 9.99);
        assert_eq!(v.quantity, 12);
        assert!(!v.is_active);
    }

    #[test]
    fn edits_enforce_basic_bounds() {
        let mut v = record(1, &["S"], 20.0);
        let before = v.clone();

        for edit in [
            VariantEdit::SetPrice(-1.0),
            VariantEdit::SetPrice(f64::NAN),
            VariantEdit::SetPrice(f64::INFINITY),
            VariantEdit::SetQuantity(-3),
        ] {
            match v.edit(&edit).unwrap_err() {
                DomainError::Validation(_) => {}
                other => panic!("expected Validation error, got {other:?}"),
            }
        }
        assert_eq!(v, before);
    }

    #[test]
    fn apply_edit_targets_by_id() {
        let mut variants = vec![record(1, &["S"], 20.0), record(2, &["M"], 20.0)];
        apply_edit(&mut variants, VariantId::from_u128(2), &VariantEdit::SetQuantity(5)).unwrap();
        assert_eq!(variants[0].quantity, 0);
        assert_eq!(variants[1].quantity, 5);
    }

    #[test]
    fn apply_edit_unknown_id_is_not_found() {
        let mut variants = vec![record(1, &["S"], 20.0)];
        let err = apply_edit(&mut variants, VariantId::from_u128(9), &VariantEdit::SetActive(false))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn apply_price_to_all_validates_first() {
        let mut variants = vec![record(1, &["S"], 20.0), record(2, &["M"], 25.0)];
        assert!(apply_price_to_all(&mut variants, -5.0).is_err());
        assert_eq!(variants[1].price, 25.0);

        apply_price_to_all(&mut variants, 30.0).unwrap();
        assert!(variants.iter().all(|v| v.price == 30.0));
    }

    #[test]
    fn summary_counts_active_price_range() {
        let mut variants = vec![
            record(1, &["S"], 10.0),
            record(2, &["M"], 12.5),
            record(3, &["L"], 99.0),
        ];
        variants[0].quantity = 4;
        variants[1].quantity = 6;
        variants[2].is_active = false;

        let summary = VariantSummary::of(&variants);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.total_quantity, 10);
        assert_eq!(summary.min_price, Some(10.0));
        assert_eq!(summary.max_price, Some(12.5));
    }

    #[test]
    fn summary_of_empty_list() {
        assert_eq!(VariantSummary::of(&[]), VariantSummary::default());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(record(1, &["S", "Red"], 20.0)).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["attributeValues"], serde_json::json!(["S", "Red"]));
        assert_eq!(json["options"][0]["attributeId"], AttributeId::from_u128(0).to_string());
        assert_eq!(json["options"][1]["value"], "Red");

        let back: VariantRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record(1, &["S", "Red"], 20.0));

        let edit: VariantEdit = serde_json::from_str(r#"{"field":"set_price","value":4.5}"#).unwrap();
        assert_eq!(edit, VariantEdit::SetPrice(4.5));
    }

    #[test]
    fn deserializes_records_keyed_by_attribute_values() {
        let json = serde_json::json!({
            "id": VariantId::from_u128(4).to_string(),
            "attributeValues": ["S", "Red"],
            "sku": "TEE-S-RED",
            "price": 20.0,
            "stock": 3,
        });

        let v: VariantRecord = serde_json::from_value(json).unwrap();
        assert_eq!(v.attribute_values(), vec!["S", "Red"]);
        assert!(v.options.iter().all(|o| o.attribute_id == UNATTRIBUTED));
        assert_eq!(v.quantity, 3);
        assert!(v.is_active);
    }

    #[test]
    fn rejects_attribute_values_that_disagree_with_options() {
        let mut json = serde_json::to_value(record(1, &["S", "Red"], 20.0)).unwrap();
        json["attributeValues"] = serde_json::json!(["M", "Red"]);
        assert!(serde_json::from_value::<VariantRecord>(json).is_err());
    }
}
