//! AQHI OData response DTOs.
//!
//! The feed is treated as untyped input: every field is optional and
//! anything we don't recognise is ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level OData envelope. Only `value` is read.
#[derive(Debug, Clone, Deserialize)]
pub struct ODataResponse {
    /// The station readings.
    pub value: Vec<StationReading>,
}

/// One monitoring station's current reading.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StationReading {
    /// Display name of the station.
    #[serde(default, deserialize_with = "lenient_string")]
    pub site: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,

    /// Air Quality Health Index. No range is enforced.
    #[serde(rename = "AQHI", default, deserialize_with = "lenient_aqhi")]
    pub aqhi: Aqhi,
}

/// A station's index as reported by the feed.
///
/// An explicit `null` and an absent field are kept apart: stations that
/// are offline report `null`, which is drawn differently from a reading
/// with no index field at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Aqhi {
    /// A numeric index (or a numeric string).
    Value(f64),
    /// `"AQHI": null`.
    Null,
    /// Field absent, or present but not numeric.
    #[default]
    Missing,
}

impl Aqhi {
    /// The numeric index, if there is one.
    pub fn value(self) -> Option<f64> {
        match self {
            Aqhi::Value(v) => Some(v),
            Aqhi::Null | Aqhi::Missing => None,
        }
    }
}

impl StationReading {
    /// Create a reading with the given site name and no data.
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            ..Self::default()
        }
    }

    /// Set both coordinates.
    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Set the index value.
    pub fn with_aqhi(mut self, aqhi: f64) -> Self {
        self.aqhi = Aqhi::Value(aqhi);
        self
    }

    /// Both coordinates, if both are present.
    ///
    /// A coordinate of exactly zero counts as present.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Whether the reading can be placed on the map.
    pub fn has_coordinates(&self) -> bool {
        self.position().is_some()
    }
}

/// Parse a JSON number or a numeric string; everything else is `None`.
fn parse_number(value: Option<Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_number(Option::<Value>::deserialize(deserializer)?))
}

/// Only called when the field is present; an absent field takes the
/// `Missing` default.
fn lenient_aqhi<'de, D>(deserializer: D) -> Result<Aqhi, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Aqhi::Null,
        other => parse_number(other).map_or(Aqhi::Missing, Aqhi::Value),
    })
}

/// Accept any scalar as the site name; null and missing become empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}
