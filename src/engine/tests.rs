use crate::{
    Layout, Options, Substitution, check_injective, check_round_trip, invert, rewrite, scan, suggest, suggest_scored,
};
use proptest::prelude::*;
use serde_json::{Value, json};

fn layout(modules: Value) -> Layout {
    Layout::from_value(json!([{"columns": [{"modules": modules}]}])).unwrap()
}

fn ids(layout: &Layout) -> Vec<String> {
    scan(layout).into_iter().map(|r| r.identifier).collect()
}

fn lights(names: &[String]) -> Layout {
    let modules: Vec<Value> = names.iter().map(|n| json!({"type": "light", "entity": n})).collect();
    layout(Value::Array(modules))
}

#[test]
fn scan_is_deterministic() {
    let input = layout(json!([
        {"type": "vertical-stack", "cards": [
            {"type": "glance", "entities": ["light.a", {"entity": "light.b", "name": "B"}]},
            {"type": "conditional", "conditions": [{"entity": "sun.sun", "state": "below_horizon"}],
             "card": {"type": "light", "entity": "light.porch"}}
        ]}
    ]));
    assert_eq!(scan(&input), scan(&input));
    assert_eq!(ids(&input), vec!["light.a", "light.b", "sun.sun", "light.porch"]);
}

#[test]
fn leaf_under_three_composites_has_depth_four() {
    let input = layout(json!([
        {"type": "vertical-stack", "cards": [
            {"type": "horizontal-stack", "cards": [
                {"type": "grid", "cards": [
                    {"type": "sensor", "entity": "sensor.deep"}
                ]}
            ]}
        ]}
    ]));
    let refs = scan(&input);
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].location.modules, vec![0, 0, 0, 0]);
    assert_eq!(refs[0].location.depth(), 4);
    assert_eq!(refs[0].kind, "sensor");
}

#[test]
fn rewrite_leaves_input_untouched() {
    let input = lights(&["light.a".into(), "light.b".into()]);
    let before = input.clone();
    let out = rewrite(&input, &[Substitution::new("light.a", "light.x")]);
    assert_eq!(input, before);
    assert_ne!(out, input);
}

#[test]
fn empty_substitutions_change_nothing() {
    let input = lights(&["light.a".into()]);
    assert_eq!(rewrite(&input, &[]), input);
}

#[test]
fn injective_round_trip_restores_layout() {
    let input = layout(json!([
        {"type": "light", "entity": "light.a"},
        {"type": "entities", "entities": [{"entity": "sensor.b", "name": "B"}]}
    ]));
    let subs = vec![Substitution::new("light.a", "light.x"), Substitution::new("sensor.b", "sensor.y")];
    assert_eq!(check_injective(&subs), Ok(()));

    let ported = rewrite(&input, &subs);
    assert_eq!(ids(&ported), vec!["light.x", "sensor.y"]);
    assert_eq!(rewrite(&ported, &invert(&subs)), input);
}

#[test]
fn shared_replacement_breaks_round_trip() {
    let input = lights(&["light.a".into(), "light.b".into()]);
    let subs = vec![Substitution::new("light.a", "light.x"), Substitution::new("light.b", "light.x")];
    assert!(check_injective(&subs).is_err());

    let ported = rewrite(&input, &subs);
    assert_eq!(ids(&ported), vec!["light.x", "light.x"]);
    // [x -> a, x -> b]: the later entry wins for every `x`.
    let back = rewrite(&ported, &invert(&subs));
    assert_eq!(ids(&back), vec!["light.b", "light.b"]);
    assert_ne!(back, input);
}

#[test]
fn blank_replacement_is_not_applied_and_round_trips() {
    let input = lights(&["light.a".into()]);
    let subs = vec![Substitution::new("light.a", "")];
    assert_eq!(check_injective(&subs), Ok(()));

    let ported = rewrite(&input, &subs);
    assert_eq!(ported, input);
    assert_eq!(rewrite(&ported, &invert(&subs)), input);
}

#[test]
fn absent_originals_leave_layout_alone() {
    let input = lights(&["light.a".into(), "light.b".into()]);
    assert_eq!(rewrite(&input, &[Substitution::new("light.absent", "light.x")]), input);

    let mixed = vec![Substitution::new("light.absent", "light.x"), Substitution::new("light.b", "light.y")];
    assert_eq!(ids(&rewrite(&input, &mixed)), vec!["light.a", "light.y"]);
}

#[test]
fn chained_list_round_trips_in_one_pass() {
    let input = lights(&["light.a".into(), "light.b".into()]);
    let subs = vec![Substitution::new("light.a", "light.b"), Substitution::new("light.b", "light.c")];
    assert_eq!(check_round_trip(&input, &subs, &Options::default()), Ok(()));

    let ported = rewrite(&input, &subs);
    assert_eq!(ids(&ported), vec!["light.b", "light.c"]);
    assert_eq!(rewrite(&ported, &invert(&subs)), input);
}

#[test]
fn repeated_original_last_entry_wins() {
    let input = lights(&["light.a".into(), "light.a".into()]);
    let subs = vec![Substitution::new("light.a", "light.x"), Substitution::new("light.a", "light.z")];
    assert_eq!(ids(&rewrite(&input, &subs)), vec!["light.z", "light.z"]);
}

#[test]
fn suggest_gates_domain_and_puts_exact_first() {
    let pool = ["switch.kitchen", "light.kitchen_2", "light.kitchen", "light.hall"];
    assert_eq!(suggest("light.kitchen", &pool), vec!["light.kitchen", "light.kitchen_2", "light.hall"]);
}

#[test]
fn suggest_caps_large_pools() {
    let pool: Vec<String> = (0..50).map(|i| format!("sensor.temp_{i:02}")).collect();
    assert_eq!(suggest("sensor.temp", &pool).len(), 10);
}

#[test]
fn scan_then_suggest_for_each_reference() {
    let input = layout(json!([
        {"type": "light", "entity": "light.old_lamp"},
        {"type": "sensor", "entity": "sensor.gone"}
    ]));
    let pool = ["light.new_lamp", "sensor.outside"];
    let picks: Vec<Vec<String>> = scan(&input).iter().map(|r| suggest(&r.identifier, &pool)).collect();
    assert_eq!(picks, vec![vec!["light.new_lamp".to_string()], vec!["sensor.outside".to_string()]]);
}

proptest! {
    #[test]
    fn round_trip_with_fresh_replacements(
        picks in prop::collection::vec(0usize..6, 0..12),
        renamed in prop::collection::btree_set(0usize..6, 0..6),
    ) {
        let names: Vec<String> = picks.iter().map(|i| format!("light.n{i}")).collect();
        let input = lights(&names);
        let subs: Vec<Substitution> = renamed
            .iter()
            .map(|i| Substitution::new(format!("light.n{i}"), format!("light.fresh{i}")))
            .collect();

        prop_assert_eq!(check_injective(&subs), Ok(()));
        let ported = rewrite(&input, &subs);
        prop_assert_eq!(ids(&ported).len(), names.len());
        prop_assert_eq!(rewrite(&ported, &invert(&subs)), input);
    }

    #[test]
    fn suggestions_are_bounded_gated_and_sorted(
        original in "[a-c]{1,2}\\.[a-z_]{0,6}",
        pool in prop::collection::vec("[a-c]{1,2}\\.[a-z_]{0,6}", 0..40),
    ) {
        let out = suggest_scored(&original, &pool, &Options::default());
        let domain = original.split('.').next().unwrap_or_default();

        prop_assert!(out.len() <= 10);
        prop_assert!(out.iter().all(|s| s.identifier.split('.').next() == Some(domain)));
        prop_assert!(out.iter().all(|s| (80.0..=100.0).contains(&s.score)));
        prop_assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
        if pool.contains(&original) {
            prop_assert_eq!(out[0].score, 100.0);
        }
    }
}
