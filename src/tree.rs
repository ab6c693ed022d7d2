//! Composition tree model.
//!
//! A layout document is plain JSON:
//!
//! ```text
//! [                                   <- rows
//!   { "columns": [                    <- columns of row 0
//!       { "modules": [                <- cards of column 0
//!           { "type": "light", "entity": "light.kitchen" },
//!           { "type": "vertical-stack", "cards": [ ...nested cards... ] }
//!       ] }
//!   ] }
//! ]
//! ```
//!
//! Cards are tagged by their `type` field. The tag selects a [`NodeKind`],
//! and the engine's kind table (see `engine/kinds.rs`) says which fields of
//! that kind carry identifiers and where its child cards live.
//!
//! The document is kept as JSON values rather than decoded into one struct
//! per kind. Cards from newer schema versions, extra keys and malformed
//! entries all survive a rewrite untouched.

use crate::error::{PortError, json_type_name};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub(crate) const COLUMNS_KEY: &str = "columns";
pub(crate) const MODULES_KEY: &str = "modules";
pub(crate) const TYPE_KEY: &str = "type";

/// A validated layout document: the root list of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    rows: Vec<Value>,
}

impl Layout {
    /// Wrap a JSON value, failing when the root is not a list.
    pub fn from_value(value: Value) -> Result<Self, PortError> {
        match value {
            Value::Array(rows) => Ok(Self { rows }),
            other => Err(PortError::RootNotList { found: json_type_name(&other) }),
        }
    }

    /// Parse layout JSON text.
    pub fn from_json(text: &str) -> Result<Self, PortError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub(crate) fn from_rows(rows: Vec<Value>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn into_value(self) -> Value {
        Value::Array(self.rows)
    }

    pub fn to_json_pretty(&self) -> Result<String, PortError> {
        Ok(serde_json::to_string_pretty(&self.rows)?)
    }
}

impl TryFrom<Value> for Layout {
    type Error = PortError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Card kinds with a dedicated extraction rule.
///
/// Anything else lands in [`NodeKind::Other`] and is handled by the
/// fallback rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Entity,
    Gauge,
    Sensor,
    Light,
    Tile,
    MediaControl,
    Humidifier,
    PlantStatus,
    WeatherForecast,
    Thermostat,
    AlarmPanel,
    Button,
    PictureEntity,
    PictureGlance,
    Entities,
    Glance,
    HistoryGraph,
    Logbook,
    StatisticsGraph,
    Map,
    ThermostatPresets,
    Conditional,
    HorizontalStack,
    VerticalStack,
    Grid,
    Other(String),
}

impl NodeKind {
    pub fn from_type(tag: &str) -> Self {
        match tag {
            "entity" => NodeKind::Entity,
            "gauge" => NodeKind::Gauge,
            "sensor" => NodeKind::Sensor,
            "light" => NodeKind::Light,
            "tile" => NodeKind::Tile,
            "media-control" => NodeKind::MediaControl,
            "humidifier" => NodeKind::Humidifier,
            "plant-status" => NodeKind::PlantStatus,
            "weather-forecast" => NodeKind::WeatherForecast,
            "thermostat" => NodeKind::Thermostat,
            "alarm-panel" => NodeKind::AlarmPanel,
            "button" => NodeKind::Button,
            "picture-entity" => NodeKind::PictureEntity,
            "picture-glance" => NodeKind::PictureGlance,
            "entities" => NodeKind::Entities,
            "glance" => NodeKind::Glance,
            "history-graph" => NodeKind::HistoryGraph,
            "logbook" => NodeKind::Logbook,
            "statistics-graph" => NodeKind::StatisticsGraph,
            "map" => NodeKind::Map,
            "thermostat-presets" => NodeKind::ThermostatPresets,
            "conditional" => NodeKind::Conditional,
            "horizontal-stack" => NodeKind::HorizontalStack,
            "vertical-stack" => NodeKind::VerticalStack,
            "grid" => NodeKind::Grid,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// Kind of a card object; a missing or non-string tag is `Other("")`.
    pub(crate) fn of(card: &Map<String, Value>) -> Self {
        match card.get(TYPE_KEY) {
            Some(Value::String(tag)) => Self::from_type(tag),
            _ => NodeKind::Other(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Entity => "entity",
            NodeKind::Gauge => "gauge",
            NodeKind::Sensor => "sensor",
            NodeKind::Light => "light",
            NodeKind::Tile => "tile",
            NodeKind::MediaControl => "media-control",
            NodeKind::Humidifier => "humidifier",
            NodeKind::PlantStatus => "plant-status",
            NodeKind::WeatherForecast => "weather-forecast",
            NodeKind::Thermostat => "thermostat",
            NodeKind::AlarmPanel => "alarm-panel",
            NodeKind::Button => "button",
            NodeKind::PictureEntity => "picture-entity",
            NodeKind::PictureGlance => "picture-glance",
            NodeKind::Entities => "entities",
            NodeKind::Glance => "glance",
            NodeKind::HistoryGraph => "history-graph",
            NodeKind::Logbook => "logbook",
            NodeKind::StatisticsGraph => "statistics-graph",
            NodeKind::Map => "map",
            NodeKind::ThermostatPresets => "thermostat-presets",
            NodeKind::Conditional => "conditional",
            NodeKind::HorizontalStack => "horizontal-stack",
            NodeKind::VerticalStack => "vertical-stack",
            NodeKind::Grid => "grid",
            NodeKind::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, NodeKind::Other(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_must_be_a_list() {
        let err = Layout::from_value(json!({"columns": []})).unwrap_err();
        assert!(matches!(err, PortError::RootNotList { found: "an object" }));
        assert_eq!(err.to_string(), "layout root must be a list of rows, found an object");
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = Layout::from_json("[{").unwrap_err();
        assert!(matches!(err, PortError::Json(_)));
    }

    #[test]
    fn empty_list_is_a_valid_layout() {
        let layout = Layout::from_json("[]").unwrap();
        assert!(layout.rows().is_empty());
    }

    #[test]
    fn deserialize_checks_root() {
        let ok: Layout = serde_json::from_value(json!([{"columns": []}])).unwrap();
        assert_eq!(ok.rows().len(), 1);
        assert!(serde_json::from_value::<Layout>(json!("nope")).is_err());
    }

    #[test]
    fn kind_tags_round_trip() {
        for tag in ["entity", "map", "conditional", "vertical-stack", "thermostat-presets", "custom:thing"] {
            assert_eq!(NodeKind::from_type(tag).as_str(), tag);
        }
        assert!(!NodeKind::from_type("custom:thing").is_known());
        assert!(NodeKind::from_type("grid").is_known());
    }

    #[test]
    fn missing_tag_is_other() {
        let card = json!({"entity": "light.a"});
        assert_eq!(NodeKind::of(card.as_object().unwrap()), NodeKind::Other(String::new()));
    }
}
