//! Completion round-trip: selection → `POST /complete` → updated snapshot.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::QueueSnapshot,
    protocol::{CompletionForm, CompletionResponse},
};
use tracing::info;
use url::Url;

use crate::{error::CompletionError, selection::SelectionState};

#[async_trait]
pub trait CompletionEndpoint: Send + Sync {
    async fn complete(&self, form: CompletionForm) -> Result<QueueSnapshot, CompletionError>;
}

/// Used when no server is configured; every request fails.
pub struct MissingCompletionEndpoint;

#[async_trait]
impl CompletionEndpoint for MissingCompletionEndpoint {
    async fn complete(&self, _form: CompletionForm) -> Result<QueueSnapshot, CompletionError> {
        Err(CompletionError::Unavailable(
            "no completion endpoint configured".to_string(),
        ))
    }
}

/// Upper bound for one completion round-trip. A request that runs past it
/// fails with [`CompletionError::Request`] so the board can submit again.
pub const DEFAULT_COMPLETE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpCompletionEndpoint {
    http: Client,
    url: Url,
}

impl HttpCompletionEndpoint {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, CompletionError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    /// `http://host:8000` + `/complete` becomes `http://host:8000/complete`.
    pub fn endpoint_url(server_url: &str, complete_path: &str) -> Result<Url, url::ParseError> {
        Url::parse(server_url)?.join(complete_path)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl CompletionEndpoint for HttpCompletionEndpoint {
    async fn complete(&self, form: CompletionForm) -> Result<QueueSnapshot, CompletionError> {
        let body = self
            .http
            .post(self.url.clone())
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(CompletionResponse::decode(&body)?)
    }
}

/// Validates the selection and builds the request body. An empty selection
/// never reaches the network.
pub fn prepare(selection: &SelectionState) -> Result<CompletionForm, CompletionError> {
    let form = selection
        .completion_form()
        .ok_or(CompletionError::NothingSelected)?;
    info!(
        selected_entry = ?selection.selected_entry(),
        selected_drinks = selection.selected_drinks().len(),
        "completion: submitting selection"
    );
    Ok(form)
}

#[cfg(test)]
#[path = "tests/completion_tests.rs"]
mod tests;
