use std::{cmp::Ordering, collections::BTreeMap};

use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serialize,
};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use serde_yaml::{Number as YamlNumber, Value as YamlValue};

use crate::Error;

/// We use [`std::collections::BTreeMap`] as our default map structure.
pub type Map<K, V> = BTreeMap<K, V>;

/// Describes the kind of a [`Value`], mostly for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    Null,
    Bool,
    Signed,
    Unsigned,
    Float,
    String,
    Array,
    Map,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Null => "Null",
                Self::Bool => "Bool",
                Self::Signed => "Int",
                Self::Unsigned => "Uint",
                Self::Float => "Float",
                Self::String => "String",
                Self::Array => "Array",
                Self::Map => "Map",
            }
        )
    }
}

/// An intermediate dynamic type for the attribute values of resources returned
/// by cloud service APIs.
///
/// Response bodies are loosely typed (and vary across API versions), so we
/// keep whatever structure the server gave us and only decide how to present
/// it at render time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(Map<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl Value {
    /// Returns the kind of this value.
    pub fn get_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Bool(_) => ValueType::Bool,
            Self::Signed(_) => ValueType::Signed,
            Self::Unsigned(_) => ValueType::Unsigned,
            Self::Float(_) => ValueType::Float,
            Self::String(_) => ValueType::String,
            Self::Array(_) => ValueType::Array,
            Self::Map(_) => ValueType::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Compact JSON rendering of this value.
    pub fn to_json_string(&self) -> String {
        // Serializing a tree of strings, numbers and string-keyed maps cannot
        // fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// A total ordering over values, used to sort rows of resources.
    ///
    /// Values are ordered by kind first: null, booleans, numbers, strings,
    /// arrays and then maps. Numbers compare numerically regardless of whether
    /// they were parsed as integers or floats, with NaN sorting after every
    /// other number. Arrays and maps compare by their JSON rendering.
    pub fn compare(a: &Value, b: &Value) -> Ordering {
        a.sort_rank().cmp(&b.sort_rank()).then_with(|| match (a, b) {
            (Self::Bool(x), Self::Bool(y)) => x.cmp(y),
            (Self::String(x), Self::String(y)) => x.cmp(y),
            (Self::Array(_), Self::Array(_)) | (Self::Map(_), Self::Map(_)) => {
                a.to_json_string().cmp(&b.to_json_string())
            }
            _ => match (a.numeric_key(), b.numeric_key()) {
                (Some((x, xi)), Some((y, yi))) => x
                    .is_nan()
                    .cmp(&y.is_nan())
                    .then_with(|| x.total_cmp(&y))
                    .then(xi.cmp(&yi)),
                _ => Ordering::Equal,
            },
        })
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Signed(_) | Self::Unsigned(_) | Self::Float(_) => 2,
            Self::String(_) => 3,
            Self::Array(_) => 4,
            Self::Map(_) => 5,
        }
    }

    // Integers keep their exact value as a tie-breaker, since large ones lose
    // precision as f64.
    fn numeric_key(&self) -> Option<(f64, Option<i128>)> {
        match self {
            Self::Signed(i) => Some((*i as f64, Some(i128::from(*i)))),
            Self::Unsigned(u) => Some((*u as f64, Some(i128::from(*u)))),
            Self::Float(x) => Some((*x, None)),
            _ => None,
        }
    }
}

/// Human-readable rendering, as used in tables.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Signed(i) => write!(f, "{}", i),
            Self::Unsigned(u) => write!(f, "{}", u),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => write!(f, "{}", s),
            Self::Array(_) | Self::Map(_) => write!(f, "{}", self.to_json_string()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Signed(i) => serializer.serialize_i64(*i),
            Value::Unsigned(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for el in arr {
                    seq.serialize_element(el)?;
                }
                seq.end()
            }
            Value::Map(m) => {
                let mut sm = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    sm.serialize_entry(k, v)?;
                }
                sm.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Signed(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Unsigned(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::from(n),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(arr) => Self::Array(arr.into_iter().map(Into::into).collect()),
            JsonValue::Object(obj) => {
                Self::Map(Map::from_iter(obj.into_iter().map(|(k, v)| (k, v.into()))))
            }
        }
    }
}

impl From<JsonNumber> for Value {
    fn from(value: JsonNumber) -> Self {
        if let Some(u) = value.as_u64() {
            Self::Unsigned(u)
        } else if let Some(i) = value.as_i64() {
            Self::Signed(i)
        } else {
            Self::Float(value.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<Value> for JsonValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Signed(i) => i.into(),
            Value::Unsigned(u) => u.into(),
            Value::Float(f) => JsonNumber::from_f64(f).map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s),
            Value::Array(arr) => Self::Array(arr.into_iter().map(Into::into).collect()),
            Value::Map(m) => {
                Self::Object(JsonMap::from_iter(m.into_iter().map(|(k, v)| (k, v.into()))))
            }
        }
    }
}

impl TryFrom<YamlValue> for Value {
    type Error = Error;

    fn try_from(value: YamlValue) -> Result<Self, Self::Error> {
        Ok(match value {
            YamlValue::Null => Self::Null,
            YamlValue::Bool(b) => Self::Bool(b),
            YamlValue::Number(n) => Self::from(n),
            YamlValue::String(s) => Self::String(s),
            YamlValue::Sequence(seq) => Self::Array(
                seq.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<Self>, Error>>()?,
            ),
            YamlValue::Mapping(m) => Self::Map(
                m.into_iter()
                    .map(|(k, v)| match k {
                        YamlValue::String(k) => Ok((k, v.try_into()?)),
                        _ => Err(Error::ObjectKeysMustBeStrings),
                    })
                    .collect::<Result<Map<String, Self>, Error>>()?,
            ),
        })
    }
}

impl From<YamlNumber> for Value {
    fn from(value: YamlNumber) -> Self {
        if let Some(u) = value.as_u64() {
            Self::Unsigned(u)
        } else if let Some(i) = value.as_i64() {
            Self::Signed(i)
        } else {
            Self::Float(value.as_f64().unwrap_or(f64::NAN))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_json_documents() {
        let v = Value::from(json!({
            "id": "x1",
            "size": 10,
            "offset": -3,
            "ratio": 0.5,
            "bootable": false,
            "attachments": [],
            "description": null,
        }));
        let m = v.as_map().unwrap();
        assert_eq!(m["id"], Value::String("x1".to_string()));
        assert_eq!(m["size"], Value::Unsigned(10));
        assert_eq!(m["offset"], Value::Signed(-3));
        assert_eq!(m["ratio"], Value::Float(0.5));
        assert_eq!(m["bootable"], Value::Bool(false));
        assert_eq!(m["attachments"], Value::Array(vec![]));
        assert!(m["description"].is_null());
    }

    #[test]
    fn yaml_mapping_keys_must_be_strings() {
        let yaml: YamlValue = serde_yaml::from_str("1: one\n2: two\n").unwrap();
        assert!(matches!(
            Value::try_from(yaml),
            Err(Error::ObjectKeysMustBeStrings)
        ));

        let yaml: YamlValue = serde_yaml::from_str("name: vol1\nsize: 2\n").unwrap();
        let v = Value::try_from(yaml).unwrap();
        assert_eq!(v.as_map().unwrap()["size"], Value::Unsigned(2));
    }

    #[test]
    fn human_rendering() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("active").to_string(), "active");
        assert_eq!(
            Value::from(json!({"b": [1, 2], "a": "x"})).to_string(),
            r#"{"a":"x","b":[1,2]}"#
        );
    }

    #[test]
    fn comparison_across_kinds() {
        assert_eq!(Value::compare(&Value::Null, &Value::from("a")), Ordering::Less);
        assert_eq!(
            Value::compare(&Value::Signed(-1), &Value::Unsigned(1)),
            Ordering::Less
        );
        assert_eq!(
            Value::compare(&Value::Float(2.5), &Value::Unsigned(2)),
            Ordering::Greater
        );
        assert_eq!(
            Value::compare(&Value::from("b"), &Value::from("a")),
            Ordering::Greater
        );
        assert_eq!(
            Value::compare(&Value::Unsigned(10), &Value::from("9")),
            Ordering::Less
        );
        assert_eq!(
            Value::compare(&Value::Float(f64::NAN), &Value::Float(f64::INFINITY)),
            Ordering::Greater
        );
        assert_eq!(
            Value::compare(&Value::Float(f64::NAN), &Value::Float(f64::NAN)),
            Ordering::Equal
        );
    }

    #[test]
    fn sorting_mixed_values() {
        let mut values = vec![
            Value::from("9"),
            Value::Float(f64::NAN),
            Value::Unsigned(10),
            Value::Null,
            Value::from(json!({"a": 1})),
            Value::Float(-f64::NAN),
            Value::Signed(-3),
            Value::from(json!([1])),
            Value::Bool(true),
            Value::Float(9.5),
            Value::from("10"),
            Value::Unsigned(9),
        ];
        for _ in 0..20 {
            values.extend(values.clone());
            if values.len() > 400 {
                break;
            }
        }
        values.sort_by(Value::compare);
        for pair in values.windows(2) {
            assert_ne!(Value::compare(&pair[0], &pair[1]), Ordering::Greater);
        }
        let mut rendered = values.iter().map(|v| v.to_string()).collect::<Vec<String>>();
        rendered.dedup();
        assert_eq!(
            rendered,
            vec!["", "true", "-3", "9", "9.5", "10", "NaN", "10", "9", "[1]", "{\"a\":1}"]
        );
    }
}
