// In-memory CMS for tests.
// Serves paginated collections, accepts creations, and records every request.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_RANGE, HeaderMap, HeaderName, HeaderValue, LOCATION};
use serde_json::{Map, Value, json};

use crate::error::Result;

use super::client::{ApiResponse, RestClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A request received by the fake.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Recorded {
    pub fn param(&self, name: &str) -> Option<String> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<Value>>,
    records: HashMap<String, Value>,
    scripted: VecDeque<(Method, String, ApiResponse)>,
    log: Vec<Recorded>,
    next_id: u64,
    post_delay: Option<Duration>,
}

#[derive(Default)]
pub struct FakeCms {
    state: Mutex<State>,
}

/// Build a response with a JSON body and headers.
pub fn reply(status: u16, body: Value, headers: &[(HeaderName, &str)]) -> ApiResponse {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(name.clone(), HeaderValue::from_str(value).unwrap());
    }
    ApiResponse::new(StatusCode::from_u16(status).unwrap(), map, body.to_string())
}

impl FakeCms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(self, path: &str, items: Vec<Value>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(items.len() as u64);
            state.collections.insert(path.to_string(), items);
        }
        self
    }

    /// Serve `value` when `location` is fetched.
    pub fn with_record(self, location: &str, value: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(location.to_string(), value);
        self
    }

    /// Hold every POST for `delay` before answering it.
    pub fn with_post_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().post_delay = Some(delay);
        self
    }

    /// Answer the next matching request with `response` instead of the default behavior.
    pub fn respond_once(&self, method: Method, path: &str, response: ApiResponse) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .push_back((method, path.to_string(), response));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    fn record(&self, method: Method, path: &str, params: &[(&str, String)]) -> Option<ApiResponse> {
        let mut state = self.state.lock().unwrap();
        state.log.push(Recorded {
            method,
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });

        let position = state
            .scripted
            .iter()
            .position(|(m, p, _)| *m == method && p == path)?;
        state.scripted.remove(position).map(|(_, _, response)| response)
    }
}

#[async_trait]
impl RestClient for FakeCms {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        if let Some(response) = self.record(Method::Get, path, query) {
            return Ok(response);
        }

        let state = self.state.lock().unwrap();
        if let Some(items) = state.collections.get(path) {
            let param = |name: &str, default: usize| {
                query
                    .iter()
                    .find(|(k, _)| *k == name)
                    .and_then(|(_, v)| v.parse().ok())
                    .unwrap_or(default)
            };
            let offset = param("_offset", 0);
            let limit = param("_limit", items.len().max(1));
            let total = items.len();

            if offset == 0 && total <= limit {
                return Ok(reply(200, Value::Array(items.clone()), &[]));
            }

            let page: Vec<Value> = items.iter().skip(offset).take(limit).cloned().collect();
            let end = (offset + page.len()).saturating_sub(1);
            let range = format!("{}-{}/{}", offset, end, total);
            return Ok(reply(206, Value::Array(page), &[(CONTENT_RANGE, &range)]));
        }

        match state.records.get(path) {
            Some(record) => Ok(reply(200, record.clone(), &[])),
            None => Ok(reply(404, json!({"error": "not found"}), &[])),
        }
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<ApiResponse> {
        let delay = self.state.lock().unwrap().post_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(response) = self.record(Method::Post, path, form) {
            return Ok(response);
        }

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;

        let mut record = Map::new();
        record.insert("id".to_string(), json!(id));
        for (key, value) in form {
            record.insert(key.to_string(), json!(value));
        }
        let record = Value::Object(record);

        let location = format!("/{}/{}", path, id);
        state
            .collections
            .entry(path.to_string())
            .or_default()
            .push(record.clone());
        state.records.entry(location.clone()).or_insert(record);

        Ok(reply(201, Value::Null, &[(LOCATION, &location)]))
    }
}
