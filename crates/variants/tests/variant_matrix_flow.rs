use skuforge_core::{AttributeId, Snapshot};
use skuforge_variants::{
    AttributeCommand, AttributeSet, EngineConfig, KeyPolicy, ReconcileReport, SequentialIds,
    VariantEdit, VariantEngine, VariantRecord, VariantSummary, apply_edit,
};

fn size() -> AttributeId {
    AttributeId::from_u128(1)
}

fn color() -> AttributeId {
    AttributeId::from_u128(2)
}

fn engine(policy: KeyPolicy) -> VariantEngine<SequentialIds> {
    skuforge_observability::init();
    let config = EngineConfig {
        key_policy: policy,
        ..EngineConfig::default()
    };
    VariantEngine::with_id_source(config, SequentialIds::starting_at(100))
}

/// Size [S, M] and Color [Red], entered the way the product form does it.
fn sized_and_colored() -> AttributeSet {
    AttributeSet::new().apply_all(&[
        AttributeCommand::AddAttribute { id: size() },
        AttributeCommand::RenameAttribute { id: size(), name: "Size".into() },
        AttributeCommand::SetValue { id: size(), index: 0, value: "S".into() },
        AttributeCommand::AddValue { id: size() },
        AttributeCommand::SetValue { id: size(), index: 1, value: "M".into() },
        AttributeCommand::AddAttribute { id: color() },
        AttributeCommand::RenameAttribute { id: color(), name: "Color".into() },
        AttributeCommand::SetValue { id: color(), index: 0, value: "Red".into() },
    ])
}

fn by_values<'a>(variants: &'a [VariantRecord], values: &[&str]) -> &'a VariantRecord {
    variants
        .iter()
        .find(|v| v.attribute_values() == values)
        .unwrap_or_else(|| panic!("no variant for {values:?}"))
}

fn tuples(variants: &[VariantRecord]) -> Vec<Vec<&str>> {
    variants.iter().map(|v| v.attribute_values()).collect()
}

#[test]
fn form_session_preserves_edits_across_regenerations() {
    let mut engine = engine(KeyPolicy::Positional);
    let attributes = sized_and_colored();
    assert_eq!(attributes.version(), 8);

    // Initial generation.
    let mut variants = engine.regenerate(&attributes, &[], 20.0).unwrap().variants;
    assert_eq!(tuples(&variants), vec![vec!["S", "Red"], vec!["M", "Red"]]);
    assert!(variants.iter().all(|v| v.price == 20.0 && v.quantity == 0 && v.is_active));

    // The user prices one variant by hand.
    let s_red = by_values(&variants, &["S", "Red"]).id;
    apply_edit(&mut variants, s_red, &VariantEdit::SetPrice(9.99)).unwrap();
    apply_edit(&mut variants, s_red, &VariantEdit::SetQuantity(3)).unwrap();

    // Adding Blue keeps the edited variant and defaults the new ones.
    let attributes = attributes.add_value(color()).set_value(color(), 1, "Blue");
    let result = engine.regenerate(&attributes, &variants, 20.0).unwrap();
    assert_eq!(result.report, ReconcileReport { kept: 2, created: 2, dropped: 0 });
    let variants = result.variants;
    assert_eq!(
        tuples(&variants),
        vec![
            vec!["S", "Red"],
            vec!["S", "Blue"],
            vec!["M", "Red"],
            vec!["M", "Blue"],
        ]
    );
    let kept = by_values(&variants, &["S", "Red"]);
    assert_eq!((kept.id, kept.price, kept.quantity), (s_red, 9.99, 3));
    for values in [["S", "Blue"], ["M", "Blue"]] {
        let fresh = by_values(&variants, &values);
        assert_eq!(fresh.price, 20.0);
        assert_eq!(fresh.quantity, 0);
        assert!(fresh.is_active);
    }

    // Removing Red drops its variants and leaves the Blue ones untouched.
    let blue_before: Vec<_> = variants
        .iter()
        .filter(|v| v.attribute_values()[1] == "Blue")
        .cloned()
        .collect();
    let attributes = attributes.remove_value(color(), 0);
    let result = engine.regenerate(&attributes, &variants, 20.0).unwrap();
    assert_eq!(result.report, ReconcileReport { kept: 2, created: 0, dropped: 2 });
    assert_eq!(result.variants, blue_before);
}

#[test]
fn blank_attribute_does_not_disturb_variants_until_emptied() {
    let mut engine = engine(KeyPolicy::Positional);
    let attributes = sized_and_colored();
    let variants = engine.regenerate(&attributes, &[], 10.0).unwrap().variants;

    // A freshly added attribute has a single blank slot and takes no part.
    let with_blank = attributes.add_attribute();
    let material = with_blank.definitions()[2].id;
    let result = engine.regenerate(&with_blank, &variants, 10.0).unwrap();
    assert_eq!(result.variants, variants);

    // Deleting its last slot leaves a zero-value dimension: nothing is derivable.
    let emptied = with_blank.remove_value(material, 0);
    assert!(emptied.get(material).unwrap().values.is_empty());
    let result = engine.regenerate(&emptied, &variants, 10.0).unwrap();
    assert!(result.variants.is_empty());
    assert_eq!(result.report.dropped, 2);
}

#[test]
fn regenerating_twice_is_idempotent() {
    let mut engine = engine(KeyPolicy::Positional);
    let attributes = sized_and_colored();
    let first = engine.regenerate(&attributes, &[], 20.0).unwrap().variants;
    let second = engine.regenerate(&attributes, &first, 20.0).unwrap().variants;
    assert_eq!(first, second);
}

#[test]
fn attribute_reorder_depends_on_key_policy() {
    let attributes = sized_and_colored();
    let reordered = attributes.move_attribute(color(), 0);

    let mut positional = engine(KeyPolicy::Positional);
    let before = positional.regenerate(&attributes, &[], 20.0).unwrap().variants;
    let after = positional.regenerate(&reordered, &before, 20.0).unwrap();
    assert_eq!(after.report, ReconcileReport { kept: 0, created: 2, dropped: 2 });

    let mut keyed = engine(KeyPolicy::ByAttribute);
    let before = keyed.regenerate(&attributes, &[], 20.0).unwrap().variants;
    let after = keyed.regenerate(&reordered, &before, 20.0).unwrap();
    assert_eq!(after.report, ReconcileReport { kept: 2, created: 0, dropped: 0 });
    assert_eq!(tuples(&after.variants), vec![vec!["Red", "S"], vec!["Red", "M"]]);
    assert_eq!(by_values(&after.variants, &["Red", "S"]).id, by_values(&before, &["S", "Red"]).id);
}

#[test]
fn oversized_matrix_is_rejected_and_prior_list_survives() {
    skuforge_observability::init();
    let config = EngineConfig {
        max_combinations: 3,
        ..EngineConfig::default()
    };
    let mut engine = VariantEngine::with_id_source(config, SequentialIds::default());
    let attributes = sized_and_colored();
    let variants = engine.regenerate(&attributes, &[], 5.0).unwrap().variants;

    let wider = attributes.add_value(color()).set_value(color(), 1, "Blue");
    assert!(engine.regenerate(&wider, &variants, 5.0).is_err());
    assert_eq!(variants.len(), 2);
}

#[test]
fn summary_reflects_table_edits() {
    let mut engine = engine(KeyPolicy::Positional);
    let mut variants = engine.regenerate(&sized_and_colored(), &[], 20.0).unwrap().variants;
    let m_red = by_values(&variants, &["M", "Red"]).id;
    let s_red = by_values(&variants, &["S", "Red"]).id;

    apply_edit(&mut variants, m_red, &VariantEdit::SetActive(false)).unwrap();
    apply_edit(&mut variants, s_red, &VariantEdit::SetQuantity(8)).unwrap();

    let summary = VariantSummary::of(&variants);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.active, 1);
    assert_eq!(summary.total_quantity, 8);
    assert_eq!(summary.min_price, Some(20.0));
}

#[test]
fn variant_list_round_trips_through_json() {
    let mut engine = engine(KeyPolicy::Positional);
    let variants = engine.regenerate(&sized_and_colored(), &[], 20.0).unwrap().variants;

    let json = serde_json::to_string(&variants).unwrap();
    let restored: Vec<VariantRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, variants);

    let again = engine.regenerate(&sized_and_colored(), &restored, 20.0).unwrap();
    assert_eq!(again.report.kept, 2);
}

#[test]
fn form_records_keyed_by_attribute_values_are_matched() {
    let mut engine = engine(KeyPolicy::Positional);
    let stored = serde_json::json!([{
        "id": skuforge_core::VariantId::from_u128(7).to_string(),
        "attributeValues": ["M", "Red"],
        "sku": "TEE-M-RED",
        "price": 18.5,
        "quantity": 4,
        "isActive": false,
    }]);
    let prior: Vec<VariantRecord> = serde_json::from_value(stored).unwrap();
    assert_eq!(prior[0].options[0].attribute_id, skuforge_variants::variant::UNATTRIBUTED);

    let result = engine.regenerate(&sized_and_colored(), &prior, 20.0).unwrap();
    assert_eq!(result.report, ReconcileReport { kept: 1, created: 1, dropped: 0 });

    let m_red = by_values(&result.variants, &["M", "Red"]);
    assert_eq!(m_red.id, prior[0].id);
    assert_eq!((m_red.price, m_red.quantity, m_red.is_active), (18.5, 4, false));
    assert_eq!(m_red.options[0].attribute_id, size());
    assert_eq!(m_red.options[1].name, "Color");

    let json = serde_json::to_value(&result.variants).unwrap();
    assert_eq!(json[1]["attributeValues"], serde_json::json!(["M", "Red"]));
}
