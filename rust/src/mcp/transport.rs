use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;

use crate::mcp::error::TransportError;

pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SSE_ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);
const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Replies still owed by the SSE stream, keyed by [`reply_key`].
type Pending = Arc<Mutex<HashMap<String, oneshot::Sender<Value>>>>;

/// Wire flavour used to reach the tool server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// `GET` an event stream, then `POST` messages to the endpoint it announces.
    #[default]
    Sse,
    /// `POST` every message to one URL and read the JSON reply.
    StreamableHttp,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sse => "sse",
            Self::StreamableHttp => "streamable-http",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TransportOptions {
    pub(crate) endpoint: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) connect_timeout: Duration,
    pub(crate) request_timeout: Option<Duration>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            headers: HashMap::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

pub(crate) enum TransportClient {
    Http(HttpTransport),
    Sse(SseTransport),
}

impl TransportClient {
    pub(crate) fn new(transport: Transport, options: TransportOptions) -> Result<Self, TransportError> {
        let endpoint = Url::parse(&options.endpoint)
            .map_err(|err| TransportError::InvalidEndpoint(format!("{}: {err}", options.endpoint)))?;
        Ok(match transport {
            Transport::StreamableHttp => Self::Http(HttpTransport::new(endpoint, options)?),
            Transport::Sse => Self::Sse(SseTransport::new(endpoint, options)?),
        })
    }

    /// Send a JSON-RPC request and wait for the reply carrying the same id.
    pub(crate) async fn send_request(&mut self, request: &Value) -> Result<Value, TransportError> {
        match self {
            Self::Http(inner) => inner.post(request).await?.ok_or_else(|| {
                TransportError::Protocol("Expected a JSON-RPC reply but the body was empty".to_string())
            }),
            Self::Sse(inner) => inner.request(request).await,
        }
    }

    pub(crate) async fn send_notification(&mut self, notification: &Value) -> Result<(), TransportError> {
        match self {
            Self::Http(inner) => inner.post(notification).await.map(|_| ()),
            Self::Sse(inner) => inner.notify(notification).await,
        }
    }

    /// An SSE link is dead once its event stream has ended.
    pub(crate) fn is_open(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Sse(inner) => inner.stream_running(),
        }
    }
}

pub(crate) struct HttpTransport {
    endpoint: Url,
    headers: HashMap<String, String>,
    client: reqwest::Client,
    session_id: Option<String>,
}

impl HttpTransport {
    fn new(endpoint: Url, options: TransportOptions) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().connect_timeout(options.connect_timeout);
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::Transport(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            endpoint,
            headers: options.headers,
            client,
            session_id: None,
        })
    }

    async fn post(&mut self, payload: &Value) -> Result<Option<Value>, TransportError> {
        let mut req = with_headers(
            self.client
                .post(self.endpoint.clone())
                .header(ACCEPT, "application/json, text/event-stream")
                .json(payload),
            &self.headers,
        );
        if let Some(session_id) = &self.session_id {
            req = req.header(SESSION_HEADER, session_id);
        }

        let response = req
            .send()
            .await
            .map_err(|err| TransportError::Transport(err.to_string()))?;
        if let Some(session_id) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            self.session_id = Some(session_id.to_string());
        }
        if response.status().is_success() && has_content_type(&response, "text/event-stream") {
            return read_event_reply(response, payload).await;
        }
        read_json_body(response).await
    }
}

pub(crate) struct SseTransport {
    stream_url: Url,
    headers: HashMap<String, String>,
    client: reqwest::Client,
    request_timeout: Duration,
    pending: Pending,
    reader: Option<(JoinHandle<()>, watch::Receiver<Option<Url>>)>,
}

impl SseTransport {
    fn new(stream_url: Url, options: TransportOptions) -> Result<Self, TransportError> {
        // No overall timeout here: it would cut the long-lived event stream.
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|err| TransportError::Transport(format!("Failed to build SSE client: {err}")))?;
        Ok(Self {
            stream_url,
            headers: options.headers,
            client,
            request_timeout: options.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            pending: Arc::new(Mutex::new(HashMap::new())),
            reader: None,
        })
    }

    async fn request(&mut self, request: &Value) -> Result<Value, TransportError> {
        let key = reply_key(request)
            .ok_or_else(|| TransportError::Protocol("JSON-RPC request is missing an id".to_string()))?;
        let message_url = self.message_url().await?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(key.clone(), tx);

        // Some servers answer inline instead of on the stream.
        match self.post(message_url, request).await {
            Ok(None) => {}
            Ok(Some(inline)) => {
                self.pending.lock().await.remove(&key);
                return Ok(inline);
            }
            Err(err) => {
                self.pending.lock().await.remove(&key);
                return Err(err);
            }
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(TransportError::Transport(
                "SSE stream closed before the reply arrived".to_string(),
            )),
            Err(_) => {
                self.pending.lock().await.remove(&key);
                Err(TransportError::Transport(format!(
                    "No reply on the SSE stream within {}ms",
                    self.request_timeout.as_millis()
                )))
            }
        }
    }

    async fn notify(&mut self, notification: &Value) -> Result<(), TransportError> {
        let message_url = self.message_url().await?;
        self.post(message_url, notification).await.map(|_| ())
    }

    fn stream_running(&self) -> bool {
        self.reader
            .as_ref()
            .is_some_and(|(task, _)| !task.is_finished())
    }

    /// Open the stream on first use and wait for its `endpoint` event.
    ///
    /// A stream that has ended is not reopened: the server dropped the session
    /// along with it, so the caller has to initialize a new one.
    async fn message_url(&mut self) -> Result<Url, TransportError> {
        if self.reader.is_none() {
            self.open_stream().await?;
        } else if !self.stream_running() {
            return Err(TransportError::Transport("SSE stream closed".to_string()));
        }
        let Some((_, announced)) = self.reader.as_mut() else {
            return Err(TransportError::Transport("SSE stream is not open".to_string()));
        };

        let wait = announced.wait_for(Option::is_some);
        match tokio::time::timeout(SSE_ENDPOINT_TIMEOUT, wait).await {
            Ok(Ok(url)) => url
                .clone()
                .ok_or_else(|| TransportError::Protocol("SSE endpoint event was empty".to_string())),
            Ok(Err(_)) => Err(TransportError::Transport(
                "SSE stream closed before announcing a message endpoint".to_string(),
            )),
            Err(_) => Err(TransportError::Transport(format!(
                "No endpoint event on the SSE stream within {}ms",
                SSE_ENDPOINT_TIMEOUT.as_millis()
            ))),
        }
    }

    async fn open_stream(&mut self) -> Result<(), TransportError> {
        let response = with_headers(
            self.client
                .get(self.stream_url.clone())
                .header(ACCEPT, "text/event-stream"),
            &self.headers,
        )
        .send()
        .await
        .map_err(|err| TransportError::Transport(format!("Failed to open SSE stream: {err}")))?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        tracing::debug!(target: "securelend", "SSE stream open at {}", self.stream_url);

        let (announce, announced) = watch::channel(None);
        let task = tokio::spawn(pump_events(
            response,
            self.stream_url.clone(),
            announce,
            self.pending.clone(),
        ));
        if let Some((previous, _)) = self.reader.replace((task, announced)) {
            previous.abort();
        }
        Ok(())
    }

    async fn post(&self, url: Url, payload: &Value) -> Result<Option<Value>, TransportError> {
        let response = with_headers(
            self.client.post(url).timeout(self.request_timeout).json(payload),
            &self.headers,
        )
        .send()
        .await
        .map_err(|err| TransportError::Transport(err.to_string()))?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        // The reply will arrive on the stream; the body is only an acknowledgement.
        if response.status() == StatusCode::ACCEPTED
            || !has_content_type(&response, "application/json")
        {
            return Ok(None);
        }
        read_json_body(response).await
    }
}

impl Drop for SseTransport {
    fn drop(&mut self) {
        if let Some((task, _)) = self.reader.take() {
            task.abort();
        }
    }
}

/// Route stream events: `endpoint` announces where to post, anything else is a
/// JSON-RPC message matched to a waiting request by id.
async fn pump_events(
    response: Response,
    base: Url,
    announce: watch::Sender<Option<Url>>,
    pending: Pending,
) {
    let mut events = response.bytes_stream().eventsource();
    while let Some(Ok(event)) = events.next().await {
        if event.event == "endpoint" {
            match base.join(event.data.trim()) {
                Ok(url) => {
                    announce.send_replace(Some(url));
                }
                Err(err) => tracing::debug!(target: "securelend", "Ignoring bad SSE endpoint: {err}"),
            }
            continue;
        }

        let Ok(message) = serde_json::from_str::<Value>(event.data.trim()) else {
            continue;
        };
        let Some(key) = reply_key(&message) else {
            continue;
        };
        if let Some(waiter) = pending.lock().await.remove(&key) {
            let _ = waiter.send(message);
        }
    }

    // Dropped senders wake every request still waiting on this stream.
    pending.lock().await.clear();
    tracing::debug!(target: "securelend", "SSE stream closed");
}

/// Correlation key for a JSON-RPC envelope: its `id` in canonical JSON form.
pub(crate) fn reply_key(message: &Value) -> Option<String> {
    message.get("id").map(Value::to_string)
}

/// Read a `text/event-stream` reply to a single POST and pick out the message
/// answering `request`. Notifications have no answer to wait for.
async fn read_event_reply(response: Response, request: &Value) -> Result<Option<Value>, TransportError> {
    let Some(key) = reply_key(request) else {
        return Ok(None);
    };

    let mut events = response.bytes_stream().eventsource();
    while let Some(event) = events.next().await {
        let event = event.map_err(|err| TransportError::Transport(err.to_string()))?;
        let Ok(message) = serde_json::from_str::<Value>(event.data.trim()) else {
            continue;
        };
        if reply_key(&message).as_deref() == Some(key.as_str()) {
            return Ok(Some(message));
        }
    }
    Err(TransportError::Protocol(
        "Event stream ended without a JSON-RPC reply".to_string(),
    ))
}

/// Compare the MIME essence of `Content-Type`, ignoring parameters and case.
fn has_content_type(response: &Response, essence: &str) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(essence))
}

fn with_headers(req: RequestBuilder, headers: &HashMap<String, String>) -> RequestBuilder {
    headers
        .iter()
        .fold(req, |req, (name, value)| req.header(name, value))
}

async fn read_json_body(response: Response) -> Result<Option<Value>, TransportError> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| TransportError::Transport(err.to_string()))?;
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|err| TransportError::Protocol(format!("Response was not JSON: {err}")))
}

async fn status_error(response: Response) -> TransportError {
    let status = response.status().as_u16();
    let retry_after = retry_after_secs(response.headers());
    let body = response.text().await.unwrap_or_default();
    TransportError::Http {
        status,
        body: body.trim().to_string(),
        retry_after,
    }
}

/// `Retry-After` in delta-seconds form; HTTP dates are ignored.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
