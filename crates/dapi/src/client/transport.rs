use std::io::{self, Write};
use std::time::Duration;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Header carrying the application key on every platform call
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Blocking HTTP operations the client needs
pub trait Transport {
    /// GET `url` with the API key header and decode the body as JSON
    fn get_json(&self, url: &str, api_key: &str) -> Result<Value>;

    /// GET `url` and stream the body into `dest`, returning the byte count
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// `ureq` backed transport
pub struct UreqTransport {
    agent: ureq::Agent,
    download_agent: ureq::Agent,
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    // Platform errors arrive as JSON envelopes on 4xx/5xx responses
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build();
    config.into()
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            agent: build_agent(config.timeout),
            download_agent: build_agent(config.download_timeout),
        }
    }
}

impl Transport for UreqTransport {
    fn get_json(&self, url: &str, api_key: &str) -> Result<Value> {
        let mut resp = self
            .agent
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .call()
            .map_err(|e| Error::transport(url, e))?;

        resp.body_mut()
            .read_json::<Value>()
            .map_err(|e| Error::transport(url, e))
    }

    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let resp = self
            .download_agent
            .get(url)
            .call()
            .map_err(|e| Error::transport(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::transport(
                url,
                io::Error::other(format!("unexpected HTTP status {}", status)),
            ));
        }

        let mut reader = resp.into_body().into_reader();
        let written = io::copy(&mut reader, dest).map_err(|e| Error::transport(url, e))?;
        Ok(written)
    }
}
