#![cfg_attr(feature = "mock", allow(dead_code, unused_imports))]

use crate::{
    config::DatabaseConfig,
    http_client::{database_client, ensure_success, handle_http_response},
    sse::{FrameDecoder, StreamEvent},
};
use anyhow::{Context, Result};
use futures_util::{Stream, StreamExt, stream};
use log::debug;
#[cfg(feature = "mock")]
use mockall::automock;
use reqwest::{
    Client, Url,
    header::{ACCEPT, CONTENT_TYPE},
};
use std::pin::Pin;
use trait_variant::make;

/// Decoded events of one observed path, in arrival order
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait RealtimeDatabase {
    /// Current JSON value of `path`, `None` when the node does not exist
    async fn read(&self, path: String) -> Result<Option<String>>;
    /// Replace the value of `path` with the given JSON
    async fn write(&self, path: String, value: String) -> Result<()>;
    /// Open an event stream on `path`
    async fn listen(&self, path: String) -> Result<EventStream>;
}

/// Firebase Realtime Database over its REST API
#[derive(Clone)]
pub struct FirebaseClient {
    client: Client,
    base_url: String,
    auth: Option<String>,
}

impl FirebaseClient {
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self {
            client: database_client()?,
            base_url: config.url.clone(),
            auth: config.auth.clone(),
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}.json",
            self.base_url,
            path.trim_matches('/')
        ))
        .with_context(|| format!("failed to build URL for {path}"))?;

        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }

        Ok(url)
    }
}

impl RealtimeDatabase for FirebaseClient {
    async fn read(&self, path: String) -> Result<Option<String>> {
        let res = self
            .client
            .get(self.url(&path)?)
            .send()
            .await
            .context("failed to send read request")?;

        let body = handle_http_response(res, &format!("read {path}")).await?;

        Ok(match body.trim() {
            "" | "null" => None,
            data => Some(data.to_string()),
        })
    }

    async fn write(&self, path: String, value: String) -> Result<()> {
        let res = self
            .client
            .put(self.url(&path)?)
            .header(CONTENT_TYPE, "application/json")
            .body(value)
            .send()
            .await
            .context("failed to send write request")?;

        handle_http_response(res, &format!("write {path}")).await?;

        Ok(())
    }

    async fn listen(&self, path: String) -> Result<EventStream> {
        let res = self
            .client
            .get(self.url(&path)?)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .context("failed to open event stream")?;

        let res = ensure_success(res, &format!("listen {path}")).await?;
        debug!("listening to {path}");

        let mut decoder = FrameDecoder::default();
        let events = res
            .bytes_stream()
            .map(move |chunk| -> Vec<Result<StreamEvent>> {
                match chunk {
                    Ok(bytes) => decoder
                        .push(&bytes)
                        .into_iter()
                        .map(StreamEvent::try_from)
                        .collect(),
                    Err(e) => vec![Err(
                        anyhow::Error::new(e).context("failed to read event stream")
                    )],
                }
            })
            .flat_map(stream::iter);

        Ok(Box::pin(events))
    }
}
