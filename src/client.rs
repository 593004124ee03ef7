use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use url::Url;

use crate::client_logger::ClientLogger;
use crate::config::{ApiKey, ApiSettings};
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_MALFORMED_RESPONSES, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{ChatCompletion, ChatCompletionParams, ErrorResponse, Message};

/// The seam between a chat session and whatever produces replies.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends the conversation and returns the assistant's reply text.
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        temperature: f64,
        timeout: Duration,
    ) -> Result<String>;
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ChatClient {
    api_key: ApiKey,
    client: ReqwestClient,
    endpoint: Url,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl ChatClient {
    /// Create a new client for the endpoint described by `settings`.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = ReqwestClient::builder().build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            api_key: settings.api_key().clone(),
            client,
            endpoint: settings.endpoint().clone(),
            logger: None,
        })
    }

    /// Attaches a logger that observes every exchange.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose())).map_err(|_| {
                Error::configuration("API key contains characters not allowed in a header")
            })?;
        authorization.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, authorization);
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::network(
                    format!("Failed to read error response: {}", describe_cause(&e)),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|parsed| parsed.message().map(String::from))
            .unwrap_or(error_body);

        Error::api(status_code, message)
    }

    /// Send a chat completion request, giving up after `timeout`.
    pub async fn send_with_timeout(
        &self,
        params: &ChatCompletionParams,
        timeout: Duration,
    ) -> Result<ChatCompletion> {
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_request(params);
        }

        let start = Instant::now();
        let result = self.execute(params, timeout).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(completion) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(completion);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if err.is_malformed_response() {
                    CLIENT_MALFORMED_RESPONSES.click();
                }
                if let Some(logger) = &self.logger {
                    logger.log_error(err);
                }
            }
        }
        result
    }

    async fn execute(
        &self,
        params: &ChatCompletionParams,
        timeout: Duration,
    ) -> Result<ChatCompletion> {
        let body = encode_body(params)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.default_headers()?)
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        parse_completion(&body)
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_key", &self.api_key)
            .field("endpoint", &self.endpoint.as_str())
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl ChatBackend for ChatClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        temperature: f64,
        timeout: Duration,
    ) -> Result<String> {
        let params = ChatCompletionParams::new(model, messages.to_vec(), temperature);
        let completion = self.send_with_timeout(&params, timeout).await?;
        match completion.first_content() {
            Some(content) => Ok(content.to_string()),
            None => Err(Error::malformed_response(
                "Unexpected API response shape",
                pretty(&serde_json::to_value(&completion).unwrap_or_default()),
            )),
        }
    }
}

/// Encodes a request body. Failures surface as [`Error::Serialization`].
fn encode_body<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Parses a success body, keeping the payload for diagnosis when the expected
/// shape is absent.
fn parse_completion(body: &str) -> Result<ChatCompletion> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|_| {
        Error::malformed_response("Response body is not valid JSON", body.to_string())
    })?;
    let completion: ChatCompletion = serde_json::from_value(value.clone())
        .map_err(|_| Error::malformed_response("Unexpected API response shape", pretty(&value)))?;
    if completion.choices.is_empty() {
        return Err(Error::malformed_response(
            "Unexpected API response shape",
            pretty(&value),
        ));
    }
    Ok(completion)
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        Error::timeout(
            format!(
                "request timed out after {}s: {}",
                timeout.as_secs_f64(),
                describe_cause(&e)
            ),
            Some(Box::new(e)),
        )
    } else {
        Error::network(describe_cause(&e), Some(Box::new(e)))
    }
}

/// Joins an error with its chain of causes.
fn describe_cause(e: &(dyn StdError + 'static)) -> String {
    let mut description = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}
