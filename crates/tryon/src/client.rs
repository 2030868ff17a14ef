//! HTTP client for the hosted try-on model.
//!
//! The model runs as a Gradio app. One prediction takes three requests:
//! upload the two source images, queue a call to the `/tryon` endpoint, then
//! read the call's event stream until it completes.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use vline_core::tryon::GenerationParams;

use crate::config::TryOnConfig;
use crate::sse::{self, StreamOutcome};

/// Name of the Gradio endpoint that runs the try-on model.
pub const TRYON_ENDPOINT: &str = "tryon";

/// An image sent to the model.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Errors from the inference provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("Try-on API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The model reported a failure for this prediction.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The prediction finished but its output was not an image reference.
    #[error("Invalid output shape: {0}")]
    InvalidOutput(String),
}

/// Something that can dress a person image in a garment image.
#[async_trait]
pub trait TryOnProvider: Send + Sync {
    /// Run one prediction and return the URL of the generated image.
    ///
    /// `token` authenticates the call against a specific account; `None`
    /// runs it unauthenticated.
    async fn generate(
        &self,
        garment: ImageInput,
        person: ImageInput,
        params: &GenerationParams,
        token: Option<&str>,
    ) -> Result<String, ProviderError>;
}

/// Response of `POST {prefix}/call/{endpoint}`.
#[derive(Debug, Deserialize)]
struct CallResponse {
    event_id: String,
}

/// [`TryOnProvider`] backed by a Gradio HTTP API.
pub struct GradioTryOnClient {
    client: reqwest::Client,
    base_url: String,
    api_prefix: String,
}

impl GradioTryOnClient {
    /// Create a client with the configured endpoint and per-request timeout.
    pub fn new(config: &TryOnConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(
            client,
            config.endpoint_url.clone(),
            config.api_prefix.clone(),
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, api_prefix: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: api_prefix.trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, self.api_prefix, path)
    }

    fn authorize(builder: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Upload images to the app's temporary file area, returning server paths
    /// in the same order.
    async fn upload(
        &self,
        images: Vec<ImageInput>,
        token: Option<&str>,
    ) -> Result<Vec<String>, ProviderError> {
        let expected = images.len();
        let mut form = reqwest::multipart::Form::new();
        for image in images {
            let part = reqwest::multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("files", part);
        }

        let request = self.client.post(self.api_url("upload")).multipart(form);
        let response = Self::authorize(request, token).send().await?;
        let paths: Vec<String> = Self::parse_response(response).await?;

        if paths.len() != expected {
            return Err(ProviderError::InvalidOutput(format!(
                "upload returned {} paths for {expected} files",
                paths.len()
            )));
        }
        Ok(paths)
    }

    /// Queue a prediction and return its event id.
    async fn call(&self, data: Value, token: Option<&str>) -> Result<String, ProviderError> {
        let request = self
            .client
            .post(self.api_url(&format!("call/{TRYON_ENDPOINT}")))
            .json(&json!({ "data": data }));
        let response = Self::authorize(request, token).send().await?;
        let call: CallResponse = Self::parse_response(response).await?;
        Ok(call.event_id)
    }

    /// Read a prediction's event stream to its end.
    async fn await_result(&self, event_id: &str, token: Option<&str>) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(self.api_url(&format!("call/{TRYON_ENDPOINT}/{event_id}")));
        let response = Self::authorize(request, token).send().await?;
        let body = Self::ensure_success(response).await?.text().await?;

        match sse::final_outcome(&sse::parse_events(&body)) {
            StreamOutcome::Complete(output) => Ok(output),
            StreamOutcome::Error(message) => Err(ProviderError::Inference(
                message.unwrap_or_else(|| "the model reported an error".to_string()),
            )),
            StreamOutcome::Incomplete => Err(ProviderError::Inference(
                "event stream closed before the prediction completed".to_string(),
            )),
        }
    }

    /// Resolve the first output of a prediction to a downloadable URL.
    fn result_url(&self, output: &Value) -> Result<String, ProviderError> {
        let first = output
            .as_array()
            .and_then(|items| items.first())
            .ok_or_else(|| ProviderError::InvalidOutput(format!("expected an output list, got {output}")))?;

        if let Some(url) = first.get("url").and_then(Value::as_str) {
            return Ok(url.to_string());
        }
        if let Some(path) = first.get("path").and_then(Value::as_str) {
            return Ok(self.api_url(&format!("file={path}")));
        }
        Err(ProviderError::InvalidOutput(format!(
            "first output is not a file reference: {first}"
        )))
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Reference to an uploaded file in a Gradio payload.
fn file_data(path: &str) -> Value {
    json!({ "path": path, "meta": { "_type": "gradio.FileData" } })
}

/// Positional inputs of the `/tryon` endpoint.
pub fn prediction_payload(garment_path: &str, person_path: &str, params: &GenerationParams) -> Value {
    json!([
        {
            "background": file_data(person_path),
            "layers": [],
            "composite": null,
        },
        file_data(garment_path),
        params.garment_description,
        params.auto_mask,
        params.auto_crop,
        params.denoise_steps,
        params.seed,
    ])
}

#[async_trait]
impl TryOnProvider for GradioTryOnClient {
    async fn generate(
        &self,
        garment: ImageInput,
        person: ImageInput,
        params: &GenerationParams,
        token: Option<&str>,
    ) -> Result<String, ProviderError> {
        let paths = self.upload(vec![garment, person], token).await?;
        let data = prediction_payload(&paths[0], &paths[1], params);

        let event_id = self.call(data, token).await?;
        tracing::debug!(event_id = %event_id, "Try-on prediction queued");

        let output = self.await_result(&event_id, token).await?;
        self.result_url(&output)
    }
}
