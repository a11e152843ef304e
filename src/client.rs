//! HTTP client for the remote oven-state store.
//!
//! Three endpoints, plain JSON over HTTP. Every call returns an explicit
//! `Result` so the caller decides what a failure means; there is no
//! retry, no timeout, and no interpretation of the POST acks beyond a
//! debug log of the status.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::LogEvent;
use crate::model::OvenStateDoc;

/// Client for the store that persists oven states and activity logs.
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

/// Body of `POST /update_oven_state`.
#[derive(Serialize)]
struct UpdateOvenState<'a> {
    oven: u32,
    state: &'a OvenStateDoc,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `GET /oven_states`: the full board keyed by oven number. An oven
    /// with no record is simply absent from the map.
    pub async fn fetch_states(&self) -> Result<BTreeMap<u32, OvenStateDoc>> {
        let url = format!("{}/oven_states", self.base_url);
        let resp = check(self.http.get(&url).send().await?)?;
        Ok(resp.json().await?)
    }

    /// `POST /update_oven_state`: upsert one oven's full state, the empty
    /// doc to clear it.
    pub async fn push_state(&self, oven: u32, state: &OvenStateDoc) -> Result<()> {
        let url = format!("{}/update_oven_state", self.base_url);
        let body = UpdateOvenState { oven, state };
        let resp = check(self.http.post(&url).json(&body).send().await?)?;
        debug!(oven, status = resp.status().as_u16(), "oven state pushed");
        Ok(())
    }

    /// `POST /log`: append one structured log event.
    pub async fn send_log(&self, event: &LogEvent) -> Result<()> {
        let url = format!("{}/log", self.base_url);
        let resp = check(self.http.post(&url).json(event).send().await?)?;
        debug!(
            action = event.action(),
            status = resp.status().as_u16(),
            "log event sent"
        );
        Ok(())
    }
}

fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Store {
            status: status.as_u16(),
        });
    }
    Ok(resp)
}
