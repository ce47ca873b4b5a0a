// Outbound request channel and its chunked NDJSON stream
use crate::application::router::{RequestSink, SendError};
use crate::domain::event::Request;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::broadcast::{self, error::RecvError};

/// Outbound requests buffered for slow listeners. Lagging listeners skip
/// old requests; the next tick re-requests anyway.
pub const CHANNEL_CAPACITY: usize = 64;

/// Request sink that fans every request out to all current listeners.
#[derive(Debug, Clone)]
pub struct BroadcastRequestSink {
    tx: broadcast::Sender<Request>,
}

impl BroadcastRequestSink {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Request> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastRequestSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSink for BroadcastRequestSink {
    fn send(&self, request: Request) -> Result<(), SendError> {
        self.tx
            .send(request)
            .map(|_| ())
            .map_err(|_| SendError::NoListeners)
    }
}

/// Serialize a single request to a newline-terminated JSON chunk
fn serialize_chunk(request: &Request) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(request)?;
    let mut chunk = BytesMut::with_capacity(json.len() + 1);
    chunk.put_slice(&json);
    chunk.put_u8(b'\n');
    Ok(chunk.freeze())
}

/// Requests from `rx` as a stream of NDJSON chunks.
pub fn request_stream(
    mut rx: broadcast::Receiver<Request>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
    let requests = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(request) => yield request,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Request listener lagged, skipped {}", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };
    requests.map(|request| serialize_chunk(&request))
}

/// Create a chunked streaming response of outbound requests
pub fn stream_from_receiver(rx: broadcast::Receiver<Request>) -> impl IntoResponse {
    let body = Body::from_stream(request_stream(rx));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_listeners_fails_softly() {
        let sink = BroadcastRequestSink::new();
        assert!(matches!(sink.send(Request::FlowCount), Err(SendError::NoListeners)));
    }

    #[test]
    fn test_chunk_is_ndjson() {
        let chunk = serialize_chunk(&Request::RttHisto).unwrap();
        assert_eq!(&chunk[..], b"{\"type\":\"requestRttHisto\"}\n");
    }

    #[tokio::test]
    async fn test_stream_yields_requests_in_order() {
        let sink = BroadcastRequestSink::new();
        let stream = request_stream(sink.subscribe());
        sink.send(Request::Throughput).unwrap();
        sink.send(Request::Top10Downloaders).unwrap();
        drop(sink);

        let chunks: Vec<Bytes> = stream.map(|c| c.unwrap()).collect().await;
        assert_eq!(
            chunks,
            vec![
                Bytes::from_static(b"{\"type\":\"requestThroughput\"}\n"),
                Bytes::from_static(b"{\"type\":\"requestTop10Downloaders\"}\n"),
            ]
        );
    }
}
