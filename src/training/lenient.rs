//! Field deserializers that accept both the plain JSON form of a value and the
//! stringified form older clients send (`"2"` for `2`, `"\"Squat\""` for `"Squat"`,
//! `"[60,70]"` for `[60,70]`).

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerOrText {
    Integer(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FloatOrText {
    Float(f64),
    Text(String),
}

#[derive(Deserialize)]
struct LenientInteger(#[serde(deserialize_with = "integer")] i64);

#[derive(Deserialize)]
struct LenientFloat(#[serde(deserialize_with = "float")] f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText<T> {
    List(Vec<T>),
    Text(String),
}

/// Strips one level of JSON string encoding, if present.
fn decode_text(text: String) -> String {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        if let Ok(decoded) = serde_json::from_str::<String>(&text) {
            return decoded;
        }
    }
    text
}

pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match IntegerOrText::deserialize(deserializer)? {
        IntegerOrText::Integer(value) => Ok(value),
        IntegerOrText::Text(text) => decode_text(text.trim().to_string())
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid integer: {:?}", text))),
    }
}

pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match FloatOrText::deserialize(deserializer)? {
        FloatOrText::Float(value) => Ok(value),
        FloatOrText::Text(text) => decode_text(text.trim().to_string())
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid number: {:?}", text))),
    }
}

pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(decode_text(String::deserialize(deserializer)?))
}

pub fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(decode_text))
}

pub fn integer_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
    let items: Vec<LenientInteger> = match ListOrText::deserialize(deserializer)? {
        ListOrText::List(items) => items,
        ListOrText::Text(text) => serde_json::from_str(&text).map_err(D::Error::custom)?,
    };
    Ok(items.into_iter().map(|item| item.0).collect())
}

pub fn float_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let items: Vec<LenientFloat> = match ListOrText::deserialize(deserializer)? {
        ListOrText::List(items) => items,
        ListOrText::Text(text) => serde_json::from_str(&text).map_err(D::Error::custom)?,
    };
    Ok(items.into_iter().map(|item| item.0).collect())
}
