//! Deserialization helpers for NX-API response quirks.
//!
//! The device renders a `TABLE_*`/`ROW_*` level as a bare object when
//! it holds a single entry and as an array otherwise, and frequently
//! renders numbers and booleans as quoted strings.

use serde::{Deserialize, Deserializer};

/// Accept either one `T` or a list of `T`.
pub fn one_or_many<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match OneOrMany::deserialize(de)? {
        OneOrMany::Many(v) => v,
        OneOrMany::One(x) => vec![x],
    })
}

/// Accept an integer given as a JSON number or a quoted string.
pub fn flex_i64<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Num {
        Int(i64),
        Float(f64),
        Str(String),
    }

    match Num::deserialize(de)? {
        Num::Int(v) => Ok(v),
        Num::Float(v) => Ok(v as i64),
        Num::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Accept an unsigned integer given as a JSON number or a quoted string.
pub fn flex_u64<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = flex_i64(de)?;
    u64::try_from(v).map_err(serde::de::Error::custom)
}

/// Accept a boolean given as a JSON bool or one of the strings the
/// device emits ("true"/"false").
pub fn flex_bool<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum B {
        Bool(bool),
        Str(String),
    }

    match B::deserialize(de)? {
        B::Bool(v) => Ok(v),
        B::Str(s) => match s.trim() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("not a boolean: {:?}", other))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::flex_i64")]
        n: i64,
        #[serde(default, deserialize_with = "super::flex_bool")]
        b: bool,
    }

    #[derive(Debug, Deserialize)]
    struct Table {
        #[serde(default, deserialize_with = "super::one_or_many")]
        rows: Vec<Row>,
    }

    #[test]
    fn single_object_becomes_one_element_list() {
        let t: Table = serde_json::from_str(r#"{"rows": {"n": 1, "b": true}}"#).unwrap();
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0].n, 1);
    }

    #[test]
    fn array_stays_an_array() {
        let t: Table = serde_json::from_str(r#"{"rows": [{"n": 1, "b": false}, {"n": 2, "b": true}]}"#).unwrap();
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1].n, 2);
    }

    #[test]
    fn missing_table_defaults_to_empty() {
        let t: Table = serde_json::from_str("{}").unwrap();
        assert!(t.rows.is_empty());
    }

    #[test]
    fn quoted_numbers_and_booleans() {
        let r: Row = serde_json::from_str(r#"{"n": "42", "b": "true"}"#).unwrap();
        assert_eq!(r.n, 42);
        assert!(r.b);
        let r: Row = serde_json::from_str(r#"{"n": -3, "b": false}"#).unwrap();
        assert_eq!(r.n, -3);
        assert!(!r.b);
    }
}
