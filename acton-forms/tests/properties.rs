//! Property tests for defaults, layout order and the email rule

use acton_forms::forms::{
    initial_values, FieldConfig, FormRenderer, FormRendererProps, FormValues, ResolvedField,
    Rules, Schema,
};
use proptest::prelude::*;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
enum Kind {
    Text,
    Textarea,
    Checkbox,
    Hidden,
}

#[derive(Debug, Clone)]
struct FieldSpec {
    kind: Kind,
    own_default: Option<String>,
    caller_default: Option<String>,
}

fn arb_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Text),
        Just(Kind::Textarea),
        Just(Kind::Checkbox),
        Just(Kind::Hidden),
    ]
}

fn arb_field() -> impl Strategy<Value = FieldSpec> {
    (
        arb_kind(),
        proptest::option::of("[a-z]{0,6}"),
        proptest::option::of("[a-z]{0,6}"),
    )
        .prop_map(|(kind, own_default, caller_default)| FieldSpec {
            kind,
            own_default,
            caller_default,
        })
}

fn name(index: usize) -> String {
    format!("f{index}")
}

fn build(specs: &[FieldSpec]) -> (Schema, FormValues) {
    let mut defaults = FormValues::new();
    let schema = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let name = name(index);
            if let Some(value) = &spec.caller_default {
                defaults.insert(name.clone(), json!(value));
            }
            let field = match spec.kind {
                Kind::Text => FieldConfig::text(&name, ""),
                Kind::Textarea => FieldConfig::textarea(&name, ""),
                Kind::Checkbox => FieldConfig::checkbox(&name, "ok"),
                Kind::Hidden => FieldConfig::hidden(&name, format!("fixed-{index}")),
            };
            match (&spec.kind, &spec.own_default) {
                (Kind::Checkbox, Some(value)) => field.with_default(value.is_empty()),
                (_, Some(value)) => field.with_default(value.as_str()),
                (_, None) => field,
            }
        })
        .collect();
    (schema, defaults)
}

fn expected_default(index: usize, spec: &FieldSpec) -> Option<Value> {
    match spec.kind {
        Kind::Hidden => Some(json!(format!("fixed-{index}"))),
        _ => spec
            .caller_default
            .as_ref()
            .map(|v| json!(v))
            .or_else(|| match (&spec.kind, &spec.own_default) {
                (Kind::Checkbox, Some(v)) => Some(json!(v.is_empty())),
                (_, Some(v)) => Some(json!(v)),
                (_, None) => None,
            }),
    }
}

proptest! {
    #[test]
    fn defaults_follow_priority(specs in proptest::collection::vec(arb_field(), 0..12)) {
        let (schema, defaults) = build(&specs);
        let values = initial_values(&schema, &defaults);

        for (index, spec) in specs.iter().enumerate() {
            prop_assert_eq!(values.get(&name(index)).cloned(), expected_default(index, spec));
        }
    }

    #[test]
    fn layout_preserves_order(kinds in proptest::collection::vec(arb_kind(), 0..12)) {
        let specs: Vec<_> = kinds
            .into_iter()
            .map(|kind| FieldSpec { kind, own_default: None, caller_default: None })
            .collect();
        let (schema, _) = build(&specs);
        let form = FormRenderer::mount(&schema, FormRendererProps::new(), |_| {});

        let expected_grid: Vec<String> = specs
            .iter()
            .enumerate()
            .filter(|(_, s)| !matches!(s.kind, Kind::Textarea))
            .map(|(i, _)| name(i))
            .collect();
        let expected_areas: Vec<String> = specs
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s.kind, Kind::Textarea))
            .map(|(i, _)| name(i))
            .collect();

        let grid: Vec<&str> = form.grid_fields().iter().map(ResolvedField::name).collect();
        let areas: Vec<&str> = form.textarea_fields().iter().map(ResolvedField::name).collect();
        prop_assert_eq!(&grid, &expected_grid);
        prop_assert_eq!(&areas, &expected_areas);

        let html = form.render().unwrap();
        let below_grid = html.find(r#"<div class="mt-6">"#).unwrap_or(html.len());
        let position = |n: &str| html.find(&format!(r#"name="{n}""#)).unwrap();

        let grid_positions: Vec<usize> = grid.iter().map(|n| position(n)).collect();
        let area_positions: Vec<usize> = areas.iter().map(|n| position(n)).collect();
        prop_assert!(grid_positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(area_positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(grid_positions.iter().all(|p| *p < below_grid));
        prop_assert!(area_positions.iter().all(|p| *p > below_grid));
    }

    #[test]
    fn well_formed_emails_pass(email in "[a-z0-9._%+-]{1,10}@[a-z0-9-]{1,10}\\.[a-z]{2,5}") {
        let rules = Rules::new().with_email_pattern();
        prop_assert!(rules.evaluate(Some(&json!(email))).is_none());
        prop_assert!(rules.evaluate(Some(&json!(email.to_uppercase()))).is_none());
    }

    #[test]
    fn strings_without_at_sign_fail(text in "[a-zA-Z0-9.]{1,20}") {
        let rules = Rules::new().with_email_pattern();
        let error = rules.evaluate(Some(&json!(text)));
        prop_assert_eq!(error.map(|e| e.message), Some("Ingresa un email válido".to_string()));
    }
}

#[test]
fn test_email_examples() {
    let rules = Rules::new().with_email_pattern();

    assert!(rules.evaluate(Some(&json!("a@b.co"))).is_none());
    assert!(rules.evaluate(Some(&json!("A@B.CO"))).is_none());
    assert!(rules.evaluate(Some(&json!("a@b"))).is_some());
    assert!(rules.evaluate(Some(&json!("abc"))).is_some());
}
