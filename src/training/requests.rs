use super::lenient;
use serde::Deserialize;

/// A workout record to be logged, with one weight/reps pair per set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRecordRequest {
    #[serde(deserialize_with = "lenient::integer")]
    pub part_id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub menu_name: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub set_count: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub create_date: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub note: Option<String>,
    #[serde(deserialize_with = "lenient::float_list")]
    pub weight: Vec<f64>,
    #[serde(deserialize_with = "lenient::integer_list")]
    pub reps: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMenuRequest {
    #[serde(deserialize_with = "lenient::integer")]
    pub part_id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub menu_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordRequest {
    #[serde(deserialize_with = "lenient::integer")]
    pub record_id: i64,
}
