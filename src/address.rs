//! Address suggestions and their derived fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::ops::Deref;

use crate::record::Record;

/// Whether a settlement is the administrative center of its area and/or region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapitalMarker {
    /// Neither (Московская обл, г Балашиха)
    None = 0,
    /// Area center (Московская обл, Одинцовский р-н, г Одинцово)
    AreaCenter = 1,
    /// Region center (Новосибирская обл, г Новосибирск)
    RegionCenter = 2,
    /// Both (Костромская обл, Костромской р-н, г Кострома)
    AreaAndRegionCenter = 3,
}

impl CapitalMarker {
    /// Reads the marker from a field value. The service sends it either as a
    /// number or as a numeric string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let code = match value {
            Value::Number(n) => n.as_i64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        Self::try_from(code).ok()
    }
}

impl TryFrom<i64> for CapitalMarker {
    type Error = anyhow::Error;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CapitalMarker::None),
            1 => Ok(CapitalMarker::AreaCenter),
            2 => Ok(CapitalMarker::RegionCenter),
            3 => Ok(CapitalMarker::AreaAndRegionCenter),
            other => anyhow::bail!("Unknown capital marker: {}", other),
        }
    }
}

/// An address suggestion.
///
/// All fields live in the underlying [`Record`]; the accessors here only read
/// and combine them. Missing text fields read as an empty string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressRecord(Record);

impl AddressRecord {
    pub fn into_record(self) -> Record {
        self.0
    }

    pub fn postal_code(&self) -> Cow<'_, str> {
        self.text("postal_code")
    }

    pub fn region_fias_id(&self) -> Cow<'_, str> {
        self.text("region_fias_id")
    }

    pub fn region_with_type(&self) -> Cow<'_, str> {
        self.text("region_with_type")
    }

    pub fn area_fias_id(&self) -> Cow<'_, str> {
        self.text("area_fias_id")
    }

    pub fn area_with_type(&self) -> Cow<'_, str> {
        self.text("area_with_type")
    }

    pub fn city_fias_id(&self) -> Cow<'_, str> {
        self.text("city_fias_id")
    }

    pub fn city_with_type(&self) -> Cow<'_, str> {
        self.text("city_with_type")
    }

    pub fn settlement_fias_id(&self) -> Cow<'_, str> {
        self.text("settlement_fias_id")
    }

    pub fn settlement_with_type(&self) -> Cow<'_, str> {
        self.text("settlement_with_type")
    }

    pub fn street_with_type(&self) -> Cow<'_, str> {
        self.text("street_with_type")
    }

    /// Abbreviated house type, e.g. "д".
    pub fn house_type(&self) -> Cow<'_, str> {
        self.text("house_type")
    }

    pub fn house(&self) -> Cow<'_, str> {
        self.text("house")
    }

    /// Abbreviated block/building type, e.g. "корп".
    pub fn block_type(&self) -> Cow<'_, str> {
        self.text("block_type")
    }

    pub fn block(&self) -> Cow<'_, str> {
        self.text("block")
    }

    pub fn capital_marker(&self) -> Option<CapitalMarker> {
        self.get("capital_marker").and_then(CapitalMarker::from_value)
    }

    pub fn geo_lat(&self) -> Option<f64> {
        self.get("geo_lat").and_then(coordinate)
    }

    pub fn geo_lon(&self) -> Option<f64> {
        self.get("geo_lon").and_then(coordinate)
    }

    /// Settlement FIAS id, falling back to the city's.
    pub fn settlement_or_city_fias_id(&self) -> Cow<'_, str> {
        first_non_empty(self.settlement_fias_id(), || self.city_fias_id())
    }

    /// Settlement with type, falling back to the city's.
    pub fn settlement_or_city_with_type(&self) -> Cow<'_, str> {
        first_non_empty(self.settlement_with_type(), || self.city_with_type())
    }

    /// House type and number, e.g. "д 5".
    pub fn house_with_type(&self) -> String {
        join_non_empty(&[self.house_type(), self.house()])
    }

    /// Block type and number, e.g. "корп 2".
    pub fn block_with_type(&self) -> String {
        join_non_empty(&[self.block_type(), self.block()])
    }

    /// House with type, or the block with type when there is no house.
    pub fn house_or_block_with_type(&self) -> String {
        let house = self.house_with_type();
        if house.is_empty() {
            self.block_with_type()
        } else {
            house
        }
    }

    pub fn is_area_center(&self) -> bool {
        self.capital_marker() == Some(CapitalMarker::AreaCenter)
    }

    pub fn is_region_center(&self) -> bool {
        self.capital_marker() == Some(CapitalMarker::RegionCenter)
    }

    pub fn is_area_and_region_center(&self) -> bool {
        self.capital_marker() == Some(CapitalMarker::AreaAndRegionCenter)
    }

    /// An address without a marker counts as no center.
    pub fn is_no_center(&self) -> bool {
        match self.get("capital_marker") {
            None | Some(Value::Null) => true,
            Some(_) => self.capital_marker() == Some(CapitalMarker::None),
        }
    }
}

impl Deref for AddressRecord {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl From<Record> for AddressRecord {
    fn from(record: Record) -> Self {
        Self(record)
    }
}

impl From<Value> for AddressRecord {
    fn from(value: Value) -> Self {
        Self(Record::from(value))
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn first_non_empty<'a, F>(primary: Cow<'a, str>, fallback: F) -> Cow<'a, str>
where
    F: FnOnce() -> Cow<'a, str>,
{
    if primary.is_empty() {
        fallback()
    } else {
        primary
    }
}

fn join_non_empty(parts: &[Cow<'_, str>]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address(value: Value) -> AddressRecord {
        AddressRecord::from(value)
    }

    #[test]
    fn test_plain_accessors() {
        let a = address(json!({
            "value": "г Москва, ул Сухонская, д 11",
            "data": {
                "postal_code": "127642",
                "region_fias_id": "0c5b2444-70a0-4932-980c-b4dc0d3f02b5",
                "region_with_type": "г Москва",
                "city_fias_id": "0c5b2444-70a0-4932-980c-b4dc0d3f02b5",
                "city_with_type": "г Москва",
                "street_with_type": "ул Сухонская",
                "house_type": "д",
                "house": "11",
                "geo_lat": "55.878315",
                "geo_lon": "37.65372"
            }
        }));

        assert_eq!(a.value(), "г Москва, ул Сухонская, д 11");
        assert_eq!(a.postal_code(), "127642");
        assert_eq!(a.region_with_type(), "г Москва");
        assert_eq!(a.street_with_type(), "ул Сухонская");
        assert_eq!(a.area_fias_id(), "");
        assert_eq!(a.area_with_type(), "");
        assert_eq!(a.geo_lat(), Some(55.878315));
        assert_eq!(a.geo_lon(), Some(37.65372));
    }

    #[test]
    fn test_numeric_coordinates() {
        let a = address(json!({"geo_lat": 54.98, "geo_lon": null}));
        assert_eq!(a.geo_lat(), Some(54.98));
        assert_eq!(a.geo_lon(), None);
    }

    #[test]
    fn test_settlement_or_city() {
        let a = address(json!({
            "settlement_fias_id": "s-id",
            "settlement_with_type": "п Внуково",
            "city_fias_id": "c-id",
            "city_with_type": "г Москва"
        }));
        assert_eq!(a.settlement_or_city_fias_id(), "s-id");
        assert_eq!(a.settlement_or_city_with_type(), "п Внуково");

        let a = address(json!({
            "settlement_fias_id": "",
            "settlement_with_type": null,
            "city_fias_id": "c-id",
            "city_with_type": "г Москва"
        }));
        assert_eq!(a.settlement_or_city_fias_id(), "c-id");
        assert_eq!(a.settlement_or_city_with_type(), "г Москва");

        let a = address(json!({}));
        assert_eq!(a.settlement_or_city_fias_id(), "");
    }

    #[test]
    fn test_house_with_type() {
        assert_eq!(
            address(json!({"house_type": "д", "house": "5"})).house_with_type(),
            "д 5"
        );
        assert_eq!(address(json!({"house": "5"})).house_with_type(), "5");
        assert_eq!(address(json!({"house_type": "д"})).house_with_type(), "д");
        assert_eq!(address(json!({})).house_with_type(), "");
    }

    #[test]
    fn test_block_with_type() {
        assert_eq!(
            address(json!({"block_type": "корп", "block": "2"})).block_with_type(),
            "корп 2"
        );
        assert_eq!(address(json!({"block": "2"})).block_with_type(), "2");
        assert_eq!(address(json!({})).block_with_type(), "");
    }

    #[test]
    fn test_house_or_block_with_type() {
        let a = address(json!({"block_type": "корп", "block": "2"}));
        assert_eq!(a.house_or_block_with_type(), "корп 2");

        let a = address(json!({
            "house_type": "д",
            "house": "7",
            "block_type": "стр",
            "block": "1"
        }));
        assert_eq!(a.house_or_block_with_type(), "д 7");

        let a = address(json!({"house": "", "house_type": null}));
        assert_eq!(a.house_or_block_with_type(), "");
    }

    #[test]
    fn test_capital_marker_from_value() {
        assert_eq!(
            CapitalMarker::from_value(&json!(0)),
            Some(CapitalMarker::None)
        );
        assert_eq!(
            CapitalMarker::from_value(&json!("2")),
            Some(CapitalMarker::RegionCenter)
        );
        assert_eq!(CapitalMarker::from_value(&json!(7)), None);
        assert_eq!(CapitalMarker::from_value(&json!("x")), None);
        assert_eq!(CapitalMarker::from_value(&Value::Null), None);
    }

    #[test]
    fn test_capital_marker_predicates_are_exclusive() {
        for code in 0..=3 {
            let a = address(json!({"data": {"capital_marker": code.to_string()}}));
            let flags = [
                a.is_no_center(),
                a.is_area_center(),
                a.is_region_center(),
                a.is_area_and_region_center(),
            ];

            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "code {}", code);
            assert!(flags[code as usize], "code {}", code);
        }
    }

    #[test]
    fn test_is_area_center() {
        assert!(address(json!({"capital_marker": 1})).is_area_center());
        assert!(!address(json!({"capital_marker": 2})).is_area_center());
        assert!(!address(json!({"capital_marker": 3})).is_area_center());
    }

    #[test]
    fn test_missing_capital_marker_is_no_center() {
        for a in [
            address(json!({})),
            address(json!({"data": {"capital_marker": null}})),
        ] {
            assert_eq!(a.capital_marker(), None);
            assert!(a.is_no_center());
            assert!(!a.is_area_center());
            assert!(!a.is_region_center());
            assert!(!a.is_area_and_region_center());
        }
    }

    #[test]
    fn test_unknown_capital_marker_matches_nothing() {
        let a = address(json!({"capital_marker": "9"}));
        assert_eq!(a.capital_marker(), None);
        assert!(!a.is_no_center());
        assert!(!a.is_area_center());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let a = address(json!({"value": "x", "data": {"house": "1"}}));
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json, json!({"value": "x", "house": "1"}));
        assert_eq!(a.into_record().len(), 2);
    }
}
