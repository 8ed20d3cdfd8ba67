//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per route. When route names or request
//! formats change, update only this file.
#![allow(dead_code)]

use super::constants::*;
use reqwest::{Method, Response};
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, route: &str) -> String {
        format!("{}/functions/v1/training_record/{}", self.base_url, route)
    }

    /// GET on any route, used by the read endpoints.
    pub async fn fetch(&self, route: &str) -> Response {
        self.client
            .get(self.url(route))
            .send()
            .await
            .expect("Request failed")
    }

    /// GET on a route and decode the JSON array it returns.
    pub async fn fetch_json(&self, route: &str) -> Value {
        let response = self.fetch(route).await;
        assert!(
            response.status().is_success(),
            "{} failed with {}",
            route,
            response.status()
        );
        response.json().await.expect("Invalid JSON response")
    }

    pub async fn post_json(&self, route: &str, body: &Value) -> Response {
        self.client
            .post(self.url(route))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// POST an arbitrary, possibly malformed, body.
    pub async fn post_raw(&self, route: &str, body: &str) -> Response {
        self.client
            .post(self.url(route))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn preflight(&self, route: &str) -> Response {
        self.client
            .request(Method::OPTIONS, self.url(route))
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Write endpoints
    // ========================================================================

    pub async fn insert_record(
        &self,
        part_id: i64,
        menu_name: &str,
        create_date: &str,
        weight: &[f64],
        reps: &[i64],
    ) -> Response {
        let body = json!({
            "partId": part_id,
            "menuName": menu_name,
            "setCount": weight.len(),
            "createDate": create_date,
            "note": null,
            "weight": weight,
            "reps": reps,
        });
        self.post_json("insertRecord", &body).await
    }

    pub async fn insert_menu(&self, part_id: i64, menu_name: &str) -> Response {
        self.post_json("insertMenu", &json!({ "partId": part_id, "menuName": menu_name }))
            .await
    }

    pub async fn delete_record(&self, record_id: i64) -> Response {
        self.post_json("deleteRecord", &json!({ "recordId": record_id }))
            .await
    }
}
