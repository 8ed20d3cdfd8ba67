//! Decoding of write request bodies into their typed requests.

use super::api_error::ApiError;
use crate::training::InsertRecordRequest;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Key under which older clients wrap the `insertRecord` payload.
const RECORD_WRAPPER_KEY: &str = "record";

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("Request body is empty".to_string()));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ApiError::BadRequest("Request body must be a JSON object".to_string())),
        Err(err) => Err(ApiError::BadRequest(format!("Invalid JSON body: {}", err))),
    }
}

fn from_object<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(object))
        .map_err(|err| ApiError::BadRequest(format!("Invalid request body: {}", err)))
}

/// Decodes a flat JSON object body into `T`.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    from_object(parse_object(body)?)
}

/// Decodes an `insertRecord` body, unwrapping the `record` envelope when present.
/// The envelope may hold the payload either as an object or as a JSON string.
pub fn decode_insert_record(body: &[u8]) -> Result<InsertRecordRequest, ApiError> {
    let mut object = parse_object(body)?;
    let payload = match object.remove(RECORD_WRAPPER_KEY) {
        None => object,
        Some(Value::Object(inner)) => inner,
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(&encoded) {
            Ok(Value::Object(inner)) => inner,
            Ok(_) => {
                return Err(ApiError::BadRequest("record must encode a JSON object".to_string()))
            }
            Err(err) => {
                return Err(ApiError::BadRequest(format!("record is not valid JSON: {}", err)))
            }
        },
        Some(_) => {
            return Err(ApiError::BadRequest(
                "record must be a JSON object or a JSON-encoded string".to_string(),
            ))
        }
    };
    from_object(payload)
}
