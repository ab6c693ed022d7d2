//! Per-kind extraction rules.
//!
//! Every card kind maps to a [`KindRule`]: the identifier-bearing fields in
//! the order they are visited, and where the card keeps its children. The
//! scanner and the rewriter both read this table, so one entry here is all a
//! new kind needs.
//!
//! Field shapes:
//!
//! - [`FieldShape::Single`]: a string at `path` (`["entity"]`, or a nested
//!   path such as `["tap_action", "entity"]`).
//! - [`FieldShape::List`]: a list at `path` whose items are either plain
//!   identifier strings or objects carrying `item_key`. `labels` names the
//!   keys tried, in order, for a human label of the item.
//!
//! Kinds without an entry use [`FALLBACK`]: a top-level `entity` field and a
//! `cards` child list, which covers most custom cards.

use crate::NodeKind;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

bitflags::bitflags! {
    /// What an identifier field is used for.
    ///
    /// Each field rule carries exactly one role; [`crate::Options::roles`]
    /// selects which roles are scanned and rewritten.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct FieldRoles: u8 {
        /// The card's main entity.
        const PRIMARY   = 1 << 0;
        /// A legacy spelling of the main entity field.
        const ALIAS     = 1 << 1;
        /// Secondary single fields such as a camera feed.
        const AUXILIARY = 1 << 2;
        /// Targets of tap/hold actions.
        const ACTION    = 1 << 3;
        /// Entries of entity lists, markers and presets.
        const LISTED    = 1 << 4;
        /// Entities referenced by visibility conditions.
        const CONDITION = 1 << 5;
    }
}

impl Default for FieldRoles {
    fn default() -> Self {
        FieldRoles::all()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldShape {
    Single,
    List { item_key: &'static str, labels: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldRule {
    pub path: &'static [&'static str],
    pub shape: FieldShape,
    pub role: FieldRoles,
}

impl FieldRule {
    const fn single(path: &'static [&'static str], role: FieldRoles) -> Self {
        Self { path, shape: FieldShape::Single, role }
    }

    const fn list(
        path: &'static [&'static str],
        item_key: &'static str,
        labels: &'static [&'static str],
        role: FieldRoles,
    ) -> Self {
        Self { path, shape: FieldShape::List { item_key, labels }, role }
    }

    /// Dotted name used in locations, e.g. `tap_action.entity`.
    pub fn name(&self) -> String {
        self.path.join(".")
    }
}

/// Where a card keeps its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildSlot {
    /// An ordered list of cards under this key.
    List(&'static str),
    /// Exactly one card under this key; it takes child index 0.
    Single(&'static str),
}

impl ChildSlot {
    pub fn key(self) -> &'static str {
        match self {
            ChildSlot::List(key) | ChildSlot::Single(key) => key,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct KindRule {
    pub fields: &'static [FieldRule],
    pub children: Option<ChildSlot>,
}

// --- Field rules -------------------------------------------------------------

const ENTITY: FieldRule = FieldRule::single(&["entity"], FieldRoles::PRIMARY);
const ENTITY_ID_ALIAS: FieldRule = FieldRule::single(&["entity_id"], FieldRoles::ALIAS);
const CAMERA_IMAGE: FieldRule = FieldRule::single(&["camera_image"], FieldRoles::AUXILIARY);
const TAP_TARGET: FieldRule = FieldRule::single(&["tap_action", "entity"], FieldRoles::ACTION);
const HOLD_TARGET: FieldRule = FieldRule::single(&["hold_action", "entity"], FieldRoles::ACTION);
const ENTITY_LIST: FieldRule = FieldRule::list(&["entities"], "entity", &["name"], FieldRoles::LISTED);
const PRESET_LIST: FieldRule = FieldRule::list(&["presets"], "entity", &["preset", "name"], FieldRoles::LISTED);
const CONDITION_LIST: FieldRule = FieldRule::list(&["conditions"], "entity", &["state"], FieldRoles::CONDITION);

// --- Kind rules --------------------------------------------------------------

const PRIMARY_ONLY: KindRule = KindRule { fields: &[ENTITY], children: None };
const PRIMARY_WITH_ALIAS: KindRule = KindRule { fields: &[ENTITY, ENTITY_ID_ALIAS], children: None };
const ACTIONABLE: KindRule = KindRule { fields: &[ENTITY, TAP_TARGET, HOLD_TARGET], children: None };
const PICTURE: KindRule = KindRule { fields: &[ENTITY, CAMERA_IMAGE], children: None };
const PICTURE_LIST: KindRule = KindRule { fields: &[ENTITY, CAMERA_IMAGE, ENTITY_LIST], children: None };
const LISTING: KindRule = KindRule { fields: &[ENTITY_LIST], children: None };
const PRESETS: KindRule = KindRule { fields: &[PRESET_LIST], children: None };
const CONDITIONAL: KindRule = KindRule { fields: &[CONDITION_LIST], children: Some(ChildSlot::Single("card")) };
const STACK: KindRule = KindRule { fields: &[], children: Some(ChildSlot::List("cards")) };

/// Rule for kinds without a table entry.
pub(crate) const FALLBACK: KindRule = KindRule { fields: &[ENTITY], children: Some(ChildSlot::List("cards")) };

static KIND_RULES: Lazy<HashMap<NodeKind, KindRule>> = Lazy::new(|| {
    HashMap::from([
        (NodeKind::Entity, PRIMARY_ONLY),
        (NodeKind::Gauge, PRIMARY_ONLY),
        (NodeKind::Sensor, PRIMARY_ONLY),
        (NodeKind::Light, PRIMARY_ONLY),
        (NodeKind::Tile, PRIMARY_ONLY),
        (NodeKind::MediaControl, PRIMARY_ONLY),
        (NodeKind::Humidifier, PRIMARY_ONLY),
        (NodeKind::PlantStatus, PRIMARY_ONLY),
        (NodeKind::WeatherForecast, PRIMARY_ONLY),
        (NodeKind::Thermostat, PRIMARY_WITH_ALIAS),
        (NodeKind::AlarmPanel, PRIMARY_WITH_ALIAS),
        (NodeKind::Button, ACTIONABLE),
        (NodeKind::PictureEntity, PICTURE),
        (NodeKind::PictureGlance, PICTURE_LIST),
        (NodeKind::Entities, LISTING),
        (NodeKind::Glance, LISTING),
        (NodeKind::HistoryGraph, LISTING),
        (NodeKind::Logbook, LISTING),
        (NodeKind::StatisticsGraph, LISTING),
        (NodeKind::Map, LISTING),
        (NodeKind::ThermostatPresets, PRESETS),
        (NodeKind::Conditional, CONDITIONAL),
        (NodeKind::HorizontalStack, STACK),
        (NodeKind::VerticalStack, STACK),
        (NodeKind::Grid, STACK),
    ])
});

/// Extraction rule for `kind`, or `None` when the fallback applies.
pub(crate) fn rule_for(kind: &NodeKind) -> Option<&'static KindRule> {
    KIND_RULES.get(kind)
}
