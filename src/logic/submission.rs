// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Submission gateway: validates a segment draft, projects it into the wire
//! payload and posts it to the configured collector.
//!
//! Responsibilities:
//! - Short-circuit validation (name first, then schema list).
//! - Build `{"segment_name": ..., "schema": [{key: label}, ...]}` in row order.
//! - Perform exactly one POST per save through a [`Transport`].

use std::time::Duration;

use anyhow::Context;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::models::catalog::SchemaCatalog;
use crate::models::segment::SegmentDraft;

/// Reasons a draft is refused before anything is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a segment name")]
    EmptyName,
    #[error("Please add at least one schema")]
    NoSchema,
}

/// The outbound call failed; the draft is still intact.
#[derive(Debug, Error)]
pub enum TransmissionError {
    #[error("Failed to encode segment payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },
    #[error("Collector at {endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
}

/// One `{key: label}` entry of the payload's `schema` array.
///
/// A key missing from the catalog is emitted with a `null` label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaEntry {
    pub key: String,
    pub label: Option<String>,
}

impl Serialize for SchemaEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.label)?;
        map.end()
    }
}

/// Read-only snapshot of a validated draft, ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub segment_name: String,
    pub schema: Vec<SchemaEntry>,
}

/// Validate `draft` and project it into a payload.
pub fn prepare(
    draft: &SegmentDraft,
    catalog: &SchemaCatalog,
) -> Result<SubmissionPayload, ValidationError> {
    if draft.name().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if draft.added_fields().is_empty() {
        return Err(ValidationError::NoSchema);
    }

    let schema = draft
        .added_fields()
        .iter()
        .map(|key| SchemaEntry {
            key: key.clone(),
            label: catalog.label_of(key).map(str::to_string),
        })
        .collect();

    Ok(SubmissionPayload {
        segment_name: draft.name().to_string(),
        schema,
    })
}

/// Capability to deliver a JSON document and hand back the response body.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        endpoint: &Url,
        body: &serde_json::Value,
    ) -> Result<String, TransmissionError>;
}

/// Blocking HTTP transport; runs on the command worker thread, never on the UI thread.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &self,
        endpoint: &Url,
        body: &serde_json::Value,
    ) -> Result<String, TransmissionError> {
        let request_failed = |err: reqwest::Error| TransmissionError::Request {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        };

        let response = self
            .client
            .post(endpoint.clone())
            .json(body)
            .send()
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransmissionError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(request_failed)
    }
}

/// Sends payloads to a fixed, injected endpoint.
pub struct SubmissionGateway<T> {
    endpoint: Url,
    transport: T,
}

impl<T: Transport> SubmissionGateway<T> {
    pub fn new(endpoint: Url, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Post an already validated payload once. Returns the raw response body.
    pub fn transmit(&self, payload: &SubmissionPayload) -> Result<String, TransmissionError> {
        let body = serde_json::to_value(payload)?;
        tracing::debug!(endpoint = %self.endpoint, payload = %body, "data to send");

        match self.transport.post_json(&self.endpoint, &body) {
            Ok(response) => {
                tracing::info!(
                    segment = %payload.segment_name,
                    response = %response,
                    "collector response"
                );
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(segment = %payload.segment_name, error = %err, "failed to send segment");
                Err(err)
            }
        }
    }
}
