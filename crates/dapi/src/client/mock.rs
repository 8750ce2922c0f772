//! In-memory transport for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};

use serde_json::{Value, json};

use super::Transport;
use crate::error::{Error, Result};

/// Transport answering from canned responses keyed by URL
#[derive(Default)]
pub struct MockTransport {
    json: HashMap<String, Value>,
    downloads: HashMap<String, Vec<u8>>,
    /// (url, api key) per request; downloads carry no key
    requests: RefCell<Vec<(String, Option<String>)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a raw body
    pub fn with_body(mut self, url: &str, body: Value) -> Self {
        self.json.insert(url.to_string(), body);
        self
    }

    /// Answer `url` with a successful envelope around `response`
    pub fn with_response(self, url: &str, response: Value) -> Self {
        self.with_body(
            url,
            json!({"ErrorStatus": "Success", "Message": "Ok", "Response": response}),
        )
    }

    pub fn with_download(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.downloads.insert(url.to_string(), bytes);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// API keys sent with the JSON requests, in order
    pub fn api_keys(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|(_, key)| key.clone())
            .collect()
    }

    fn record(&self, url: &str, api_key: Option<&str>) {
        self.requests
            .borrow_mut()
            .push((url.to_string(), api_key.map(str::to_string)));
    }

    fn unreachable(url: &str) -> Error {
        Error::transport(
            url,
            io::Error::new(io::ErrorKind::ConnectionRefused, "no canned response"),
        )
    }
}

impl Transport for MockTransport {
    fn get_json(&self, url: &str, api_key: &str) -> Result<Value> {
        self.record(url, Some(api_key));
        self.json.get(url).cloned().ok_or_else(|| Self::unreachable(url))
    }

    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        self.record(url, None);
        let bytes = self
            .downloads
            .get(url)
            .ok_or_else(|| Self::unreachable(url))?;
        dest.write_all(bytes)?;
        Ok(bytes.len() as u64)
    }
}
