//! Layout traversal shared by the scanner and the rewriter.
//!
//! The walker visits rows, columns and cards in document order, depth-first,
//! and hands every populated identifier field to a [`Visit`] implementation
//! together with its [`Location`]. A visitor may answer with a replacement
//! value; the walker then rebuilds only the values on the path from the root
//! to that field and clones everything else.
//!
//! ```text
//! rows[r] ── columns[c] ── modules[i] ── fields (kind table order)
//!                                    └── children ── cards[j] ── ...
//! ```
//!
//! A visitor that never replaces anything (the scanner) causes no
//! allocation beyond the locations it is handed.
//!
//! ## Tolerance
//!
//! Nothing here fails. Rows, columns and cards that are not objects are
//! counted as skipped and left alone; missing or mistyped lists and fields
//! simply produce no occurrences.

use super::kinds::{ChildSlot, FALLBACK, FieldRule, FieldShape, KindRule, rule_for};
use super::metrics::ScanMetrics;
use crate::tree::{COLUMNS_KEY, MODULES_KEY};
use crate::{FieldRoles, Location, NodeKind};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// One populated identifier field.
#[derive(Debug)]
pub(crate) struct Occurrence<'a> {
    pub value: &'a str,
    pub location: Location,
    pub kind: &'a NodeKind,
    pub context: Option<&'a str>,
    pub role: FieldRoles,
}

pub(crate) trait Visit {
    /// Called once per populated identifier field, in traversal order.
    ///
    /// Returning `Some` replaces the field's value in the rebuilt layout.
    fn occurrence(&mut self, occurrence: Occurrence<'_>) -> Option<String>;
}

pub(crate) struct Walker<'v, V> {
    visitor: &'v mut V,
    roles: FieldRoles,
    row: usize,
    column: usize,
    /// Index chain from the column's module list to the current card.
    chain: Vec<usize>,
    metrics: ScanMetrics,
}

impl<'v, V: Visit> Walker<'v, V> {
    pub fn new(visitor: &'v mut V, roles: FieldRoles) -> Self {
        Self { visitor, roles, row: 0, column: 0, chain: Vec::new(), metrics: ScanMetrics::default() }
    }

    pub fn into_metrics(self) -> ScanMetrics {
        self.metrics
    }

    /// Walk every row. Returns the rebuilt rows when any field was replaced.
    pub fn walk_layout(&mut self, rows: &[Value]) -> Option<Vec<Value>> {
        rebuild_list(rows, |idx, row| {
            self.row = idx;
            self.walk_row(row)
        })
    }

    fn walk_row(&mut self, row: &Value) -> Option<Value> {
        let Some(map) = row.as_object() else {
            self.skip("row");
            return None;
        };
        let columns = map.get(COLUMNS_KEY)?.as_array()?;
        let rebuilt = rebuild_list(columns, |idx, column| {
            self.column = idx;
            self.walk_column(column)
        })?;
        Some(with_entry(map, COLUMNS_KEY, Value::Array(rebuilt)))
    }

    fn walk_column(&mut self, column: &Value) -> Option<Value> {
        let Some(map) = column.as_object() else {
            self.skip("column");
            return None;
        };
        let modules = map.get(MODULES_KEY)?.as_array()?;
        self.chain.clear();
        let rebuilt = self.walk_cards(modules)?;
        Some(with_entry(map, MODULES_KEY, Value::Array(rebuilt)))
    }

    fn walk_cards(&mut self, cards: &[Value]) -> Option<Vec<Value>> {
        rebuild_list(cards, |idx, card| self.walk_child(idx, card))
    }

    fn walk_child(&mut self, idx: usize, card: &Value) -> Option<Value> {
        self.chain.push(idx);
        let rebuilt = self.walk_card(card);
        self.chain.pop();
        rebuilt
    }

    fn walk_card(&mut self, card: &Value) -> Option<Value> {
        let Some(map) = card.as_object() else {
            self.skip("card");
            return None;
        };
        self.metrics.nodes_visited += 1;

        let kind = NodeKind::of(map);
        let rule: &KindRule = match rule_for(&kind) {
            Some(rule) => rule,
            None => {
                trace!(kind = kind.as_str(), path = ?self.chain, "no rule for card kind, using fallback");
                self.metrics.fallback_nodes += 1;
                &FALLBACK
            }
        };

        // Cloned on first change only.
        let mut patched: Option<Map<String, Value>> = None;

        for field in rule.fields {
            if !self.roles.intersects(field.role) {
                continue;
            }
            let source = patched.as_ref().unwrap_or(map);
            if let Some((key, updated)) = self.walk_field(source, &kind, field) {
                patched.get_or_insert_with(|| map.clone()).insert(key.to_string(), updated);
            }
        }

        if let Some(slot) = rule.children {
            let source = patched.as_ref().unwrap_or(map);
            if let Some(updated) = self.walk_children(source, slot) {
                patched.get_or_insert_with(|| map.clone()).insert(slot.key().to_string(), updated);
            }
        }

        patched.map(Value::Object)
    }

    fn walk_children(&mut self, card: &Map<String, Value>, slot: ChildSlot) -> Option<Value> {
        match slot {
            ChildSlot::List(key) => {
                let cards = card.get(key)?.as_array()?;
                self.walk_cards(cards).map(Value::Array)
            }
            ChildSlot::Single(key) => {
                let child = card.get(key)?;
                self.walk_child(0, child)
            }
        }
    }

    /// Visit one field rule on `card`. Returns the top-level key to replace
    /// and its rebuilt value.
    fn walk_field(
        &mut self,
        card: &Map<String, Value>,
        kind: &NodeKind,
        field: &FieldRule,
    ) -> Option<(&'static str, Value)> {
        let (&head, rest) = field.path.split_first()?;
        let top = card.get(head)?;
        let updated = update_at(top, rest, |leaf| match field.shape {
            FieldShape::Single => {
                let value = leaf.as_str()?;
                self.emit(value, kind, field, None, None).map(Value::String)
            }
            FieldShape::List { item_key, labels } => self.walk_list(leaf, kind, field, item_key, labels),
        })?;
        Some((head, updated))
    }

    fn walk_list(
        &mut self,
        list: &Value,
        kind: &NodeKind,
        field: &FieldRule,
        item_key: &str,
        labels: &[&str],
    ) -> Option<Value> {
        let items = list.as_array()?;
        let rebuilt = rebuild_list(items, |idx, item| match item {
            Value::String(value) => self.emit(value, kind, field, Some(idx), None).map(Value::String),
            Value::Object(entry) => {
                let value = entry.get(item_key)?.as_str()?;
                let context = labels
                    .iter()
                    .find_map(|key| entry.get(*key).and_then(Value::as_str).filter(|label| !label.trim().is_empty()));
                let replacement = self.emit(value, kind, field, Some(idx), context)?;
                Some(with_entry(entry, item_key, Value::String(replacement)))
            }
            _ => None,
        })?;
        Some(Value::Array(rebuilt))
    }

    /// Report one populated field to the visitor. Blank values are not
    /// identifiers and are never reported.
    fn emit(
        &mut self,
        value: &str,
        kind: &NodeKind,
        field: &FieldRule,
        index: Option<usize>,
        context: Option<&str>,
    ) -> Option<String> {
        if value.trim().is_empty() {
            return None;
        }
        self.metrics.identifiers += 1;

        let location =
            Location { row: self.row, column: self.column, modules: self.chain.clone(), field: field.name(), index };
        let replacement = self.visitor.occurrence(Occurrence { value, location, kind, context, role: field.role })?;
        (replacement != value).then_some(replacement)
    }

    fn skip(&mut self, what: &'static str) {
        debug!(row = self.row, column = self.column, path = ?self.chain, "skipping {what} that is not an object");
        self.metrics.skipped += 1;
    }
}

/// Apply `f` to every item. When at least one item changed, return the whole
/// list with changed items swapped in and the others cloned.
fn rebuild_list<F>(items: &[Value], mut f: F) -> Option<Vec<Value>>
where
    F: FnMut(usize, &Value) -> Option<Value>,
{
    let mut rebuilt: Option<Vec<Value>> = None;
    for (idx, item) in items.iter().enumerate() {
        match (f(idx, item), rebuilt.as_mut()) {
            (Some(updated), Some(list)) => list.push(updated),
            (Some(updated), None) => {
                let mut list = Vec::with_capacity(items.len());
                list.extend_from_slice(&items[..idx]);
                list.push(updated);
                rebuilt = Some(list);
            }
            (None, Some(list)) => list.push(item.clone()),
            (None, None) => {}
        }
    }
    rebuilt
}

/// Follow `path` through nested objects and apply `f` at the end, rebuilding
/// the objects on the way back up when `f` produced a value.
fn update_at<F>(value: &Value, path: &[&str], f: F) -> Option<Value>
where
    F: FnOnce(&Value) -> Option<Value>,
{
    match path.split_first() {
        None => f(value),
        Some((&key, rest)) => {
            let map = value.as_object()?;
            let updated = update_at(map.get(key)?, rest, f)?;
            Some(with_entry(map, key, updated))
        }
    }
}

fn with_entry(map: &Map<String, Value>, key: &str, value: Value) -> Value {
    let mut map = map.clone();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Records every occurrence and upper-cases identifiers in `light`.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<(String, Location)>,
    }

    impl Visit for Recorder {
        fn occurrence(&mut self, occurrence: Occurrence<'_>) -> Option<String> {
            self.seen.push((occurrence.value.to_string(), occurrence.location));
            occurrence.value.starts_with("light.").then(|| occurrence.value.to_uppercase())
        }
    }

    fn walk(rows: &Value) -> (Recorder, Option<Vec<Value>>, ScanMetrics) {
        let mut recorder = Recorder::default();
        let mut walker = Walker::new(&mut recorder, FieldRoles::all());
        let rebuilt = walker.walk_layout(rows.as_array().unwrap());
        let metrics = walker.into_metrics();
        (recorder, rebuilt, metrics)
    }

    #[test]
    fn rebuild_list_only_allocates_on_change() {
        let items = vec![json!(1), json!(2), json!(3)];
        assert!(rebuild_list(&items, |_, _| None).is_none());
        let out = rebuild_list(&items, |idx, _| (idx == 1).then(|| json!(20))).unwrap();
        assert_eq!(out, vec![json!(1), json!(20), json!(3)]);
    }

    #[test]
    fn update_at_rebuilds_nested_objects() {
        let value = json!({"entity": "light.a", "name": "x"});
        let out = update_at(&value, &["entity"], |_| Some(json!("light.b"))).unwrap();
        assert_eq!(out, json!({"entity": "light.b", "name": "x"}));
        assert!(update_at(&value, &["missing"], |_| Some(json!(1))).is_none());
    }

    #[test]
    fn untouched_layout_is_not_rebuilt() {
        let rows = json!([{"columns": [{"modules": [{"type": "sensor", "entity": "sensor.t"}]}]}]);
        let (recorder, rebuilt, metrics) = walk(&rows);
        assert!(rebuilt.is_none());
        assert_eq!(recorder.seen.len(), 1);
        assert_eq!(metrics.nodes_visited, 1);
    }

    #[test]
    fn replacement_keeps_siblings_and_extra_keys() {
        let rows = json!([{
            "title": "home",
            "columns": [{"modules": [
                {"type": "sensor", "entity": "sensor.t", "name": "Temp"},
                {"type": "light", "entity": "light.a", "icon": "mdi:bulb"}
            ]}]
        }]);
        let (_, rebuilt, _) = walk(&rows);
        let expected = json!([{
            "title": "home",
            "columns": [{"modules": [
                {"type": "sensor", "entity": "sensor.t", "name": "Temp"},
                {"type": "light", "entity": "LIGHT.A", "icon": "mdi:bulb"}
            ]}]
        }]);
        assert_eq!(Value::Array(rebuilt.unwrap()), expected);
    }

    #[test]
    fn non_objects_are_skipped_and_counted() {
        let rows = json!([
            42,
            {"columns": ["x", {"modules": [null, {"type": "light", "entity": "light.a"}]}]}
        ]);
        let (recorder, _, metrics) = walk(&rows);
        assert_eq!(metrics.skipped, 3);
        assert_eq!(recorder.seen.len(), 1);
        let (_, loc) = &recorder.seen[0];
        assert_eq!((loc.row, loc.column, loc.modules.clone()), (1, 1, vec![1]));
    }

    #[test]
    fn conditional_child_takes_index_zero() {
        let rows = json!([{"columns": [{"modules": [{
            "type": "conditional",
            "conditions": [{"entity": "sun.sun", "state": "below_horizon"}],
            "card": {"type": "light", "entity": "light.porch"}
        }]}]}]);
        let (recorder, _, _) = walk(&rows);
        let locations: Vec<_> = recorder.seen.iter().map(|(v, l)| (v.as_str(), l.modules.clone())).collect();
        assert_eq!(locations, vec![("sun.sun", vec![0]), ("light.porch", vec![0, 0])]);
    }
}
