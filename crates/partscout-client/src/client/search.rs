//! Streaming search: `GET /search/stream?article=<term>` as server-sent events.

use partscout_core::{ErrorEvent, StreamEvent};
use partscout_engine::{Envelope, Generation, SearchSource, SourceError, StreamHandle};
use reqwest::Response;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::{check_status, PartsClient};
use crate::error::ClientError;
use crate::rate_limit::retry_with_backoff;
use crate::sse::{SseDecoder, SseFrame};

impl PartsClient {
    /// Opens the event stream for `query` and returns the response with its
    /// body unread.
    ///
    /// Opening is retried on network errors, 429 and 5xx responses; nothing is
    /// retried once the body is being read.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after all retries or the
    /// server answers with a non-retriable status.
    pub async fn open_search_stream(&self, query: &str) -> Result<Response, ClientError> {
        let url = self.endpoint("/search/stream", &[("article", query)])?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let mut request = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "text/event-stream")
                    .header(reqwest::header::CACHE_CONTROL, "no-cache");
                if let Some(token) = &self.auth_token {
                    request = request.header(reqwest::header::AUTHORIZATION, token);
                }

                let response = request.send().await?;
                check_status(response, &url).await
            }
        })
        .await
    }

    /// Runs a whole search for `query`, forwarding every decoded event to
    /// `events` tagged with `generation`.
    ///
    /// The last event sent is always [`StreamEvent::End`]: the server's own,
    /// or a synthetic one when the body closes without it. A failure to open
    /// or read the stream is sent as an [`StreamEvent::Error`] first. Returns
    /// early if the receiver is dropped.
    pub async fn stream_search(
        &self,
        query: &str,
        generation: Generation,
        events: &UnboundedSender<Envelope>,
    ) {
        let emit = |event: StreamEvent| events.send(Envelope::new(generation, event)).is_ok();

        let mut response = match self.open_search_stream(query).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%generation, query, error = %err, "failed to open search stream");
                let _ = emit(failure_event(&err)) && emit(StreamEvent::End);
                return;
            }
        };
        tracing::debug!(%generation, query, "search stream opened");

        let mut decoder = SseDecoder::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    for frame in decoder.feed(&chunk) {
                        if !forward_frame(frame, generation, &emit) {
                            return;
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    let err = ClientError::from(err);
                    tracing::warn!(%generation, error = %err, "search stream interrupted");
                    let _ = emit(failure_event(&err)) && emit(StreamEvent::End);
                    return;
                }
            }
        }

        if let Some(frame) = decoder.finish() {
            if !forward_frame(frame, generation, &emit) {
                return;
            }
        }
        tracing::debug!(%generation, "search stream closed without end event");
        emit(StreamEvent::End);
    }
}

/// Decodes and sends one frame. Returns `false` once nothing more should be
/// sent: after `end`, or when the receiver is gone.
fn forward_frame(
    frame: SseFrame,
    generation: Generation,
    emit: &impl Fn(StreamEvent) -> bool,
) -> bool {
    let kind = frame.event.clone();
    match frame.into_event() {
        Ok(Some(event)) => {
            let is_end = matches!(event, StreamEvent::End);
            emit(event) && !is_end
        }
        Ok(None) => {
            tracing::debug!(%generation, event = ?kind, "ignoring unknown stream event");
            true
        }
        Err(err) => {
            tracing::warn!(%generation, event = ?kind, error = %err, "skipping undecodable stream event");
            true
        }
    }
}

/// The server's body text is the user-facing message when there is one.
fn failure_event(err: &ClientError) -> StreamEvent {
    let error = match err {
        ClientError::UnexpectedStatus { message, .. } => message.clone(),
        other => other.to_string(),
    };
    StreamEvent::Error(ErrorEvent { error })
}

/// [`SearchSource`] backed by the HTTP stream.
///
/// Each search runs on its own tokio task and sends [`Envelope`]s into one
/// shared channel; the driver reads the receiver and passes every envelope to
/// `StreamSession::apply`.
pub struct HttpSearchSource {
    client: PartsClient,
    events: UnboundedSender<Envelope>,
}

impl HttpSearchSource {
    #[must_use]
    pub fn new(client: PartsClient, events: UnboundedSender<Envelope>) -> Self {
        Self { client, events }
    }

    /// Builds a source together with the receiving end of its channel.
    #[must_use]
    pub fn channel(client: PartsClient) -> (Self, UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(client, tx), rx)
    }

    #[must_use]
    pub fn client(&self) -> &PartsClient {
        &self.client
    }
}

impl SearchSource for HttpSearchSource {
    /// Spawns the stream task on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails when called outside a tokio runtime.
    fn open(
        &mut self,
        query: &str,
        generation: Generation,
    ) -> Result<Box<dyn StreamHandle>, SourceError> {
        let runtime = tokio::runtime::Handle::try_current()?;
        let client = self.client.clone();
        let events = self.events.clone();
        let query = query.to_owned();

        let task = runtime.spawn(async move {
            client.stream_search(&query, generation, &events).await;
        });
        tracing::debug!(%generation, "spawned search stream task");
        Ok(Box::new(TaskHandle { task }))
    }
}

/// Aborting drops the in-flight request along with the task.
struct TaskHandle {
    task: JoinHandle<()>,
}

impl StreamHandle for TaskHandle {
    fn abort(&mut self) {
        self.task.abort();
    }
}
