//! Diagnostic capture of relayed response bodies.
//!
//! [`CaptureBody`] forwards every frame of the wrapped body untouched and keeps
//! a copy of at most `limit` leading bytes. The retained prefix is handed to a
//! callback exactly once: at end of stream, on a body error, or when the body
//! is dropped early (for example because the client went away).

use std::borrow::Cow;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use http_body::{Body, Frame, SizeHint};

/// Boxed error type produced by the wrapper.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How the wrapped body ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Inner body reached end of stream.
    Complete,
    /// Inner body yielded an error.
    Failed,
    /// Dropped before the end of stream.
    Abandoned,
}

impl CaptureOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureOutcome::Complete => "complete",
            CaptureOutcome::Failed => "failed",
            CaptureOutcome::Abandoned => "abandoned",
        }
    }
}

/// The retained head of a relayed body.
#[derive(Debug, Clone)]
pub struct BodyPrefix {
    /// At most `limit` leading bytes.
    pub bytes: Bytes,
    /// Bytes relayed in total.
    pub total_len: u64,
    pub outcome: CaptureOutcome,
}

impl BodyPrefix {
    /// True if more was relayed than retained.
    pub fn truncated(&self) -> bool {
        self.total_len > self.bytes.len() as u64
    }

    pub fn lossy_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

type OnFinish = Box<dyn FnOnce(BodyPrefix) + Send>;

/// Body wrapper that tees a bounded prefix off the data path.
pub struct CaptureBody<B: Body> {
    inner: B,
    limit: usize,
    captured: BytesMut,
    total_len: u64,
    on_finish: Option<OnFinish>,
}

impl<B: Body> CaptureBody<B> {
    /// Wrap `inner`, retaining at most `limit` bytes for `on_finish`.
    pub fn new<F>(inner: B, limit: usize, on_finish: F) -> Self
    where
        F: FnOnce(BodyPrefix) + Send + 'static,
    {
        Self {
            inner,
            limit,
            captured: BytesMut::with_capacity(limit.min(4096)),
            total_len: 0,
            on_finish: Some(Box::new(on_finish)),
        }
    }

    fn observe(&mut self, data: &[u8]) {
        self.total_len += data.len() as u64;
        let room = self.limit.saturating_sub(self.captured.len());
        if room > 0 {
            let take = room.min(data.len());
            self.captured.extend_from_slice(&data[..take]);
        }
    }

    fn finish(&mut self, outcome: CaptureOutcome) {
        if let Some(on_finish) = self.on_finish.take() {
            on_finish(BodyPrefix {
                bytes: std::mem::take(&mut self.captured).freeze(),
                total_len: self.total_len,
                outcome,
            });
        }
    }
}

impl<B> Body for CaptureBody<B>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;

        match Pin::new(&mut this.inner).poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.observe(data);
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finish(CaptureOutcome::Failed);
                Poll::Ready(Some(Err(e.into())))
            }
            Poll::Ready(None) => {
                this.finish(CaptureOutcome::Complete);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B: Body> Drop for CaptureBody<B> {
    fn drop(&mut self) {
        // An empty body may never be polled at all.
        let outcome = if self.inner.is_end_stream() {
            CaptureOutcome::Complete
        } else {
            CaptureOutcome::Abandoned
        };
        self.finish(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use http_body_util::{BodyExt, Empty, Full, StreamBody};
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<BodyPrefix>>>, impl FnOnce(BodyPrefix) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |prefix: BodyPrefix| sink.lock().unwrap().push(prefix))
    }

    #[tokio::test]
    async fn forwards_everything_but_keeps_only_limit() {
        let chunks: Vec<Result<Frame<Bytes>, std::io::Error>> = vec![
            Ok(Frame::data(Bytes::from_static(b"hello "))),
            Ok(Frame::data(Bytes::from_static(b"wide "))),
            Ok(Frame::data(Bytes::from_static(b"world"))),
        ];
        let inner = StreamBody::new(stream::iter(chunks));
        let (seen, sink) = recorder();

        let body = CaptureBody::new(inner, 8, sink);
        let forwarded = body.collect().await.unwrap().to_bytes();

        assert_eq!(&forwarded[..], b"hello wide world");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(&seen[0].bytes[..], b"hello wi");
        assert_eq!(seen[0].total_len, 16);
        assert!(seen[0].truncated());
        assert_eq!(seen[0].outcome, CaptureOutcome::Complete);
    }

    #[tokio::test]
    async fn short_body_is_not_truncated() {
        let (seen, sink) = recorder();
        let body = CaptureBody::new(Full::new(Bytes::from_static(b"{\"ok\":true}")), 200, sink);
        let forwarded = body.collect().await.unwrap().to_bytes();

        assert_eq!(&forwarded[..], b"{\"ok\":true}");
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].lossy_text(), "{\"ok\":true}");
        assert!(!seen[0].truncated());
    }

    #[test]
    fn empty_body_reports_on_drop() {
        let (seen, sink) = recorder();
        let body = CaptureBody::new(Empty::<Bytes>::new(), 200, sink);
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
        drop(body);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].total_len, 0);
        assert_eq!(seen[0].outcome, CaptureOutcome::Complete);
    }

    #[tokio::test]
    async fn dropped_mid_stream_is_abandoned() {
        let (seen, sink) = recorder();
        let (tx, mut rx) = tokio::sync::mpsc::channel::<Result<Frame<Bytes>, std::io::Error>>(4);
        tx.send(Ok(Frame::data(Bytes::from_static(b"partial")))).await.unwrap();

        let inner = StreamBody::new(stream::poll_fn(move |cx| rx.poll_recv(cx)));
        let mut body = CaptureBody::new(inner, 200, sink);
        let first = body.frame().await.unwrap().unwrap();
        assert_eq!(first.into_data().unwrap(), Bytes::from_static(b"partial"));
        drop(body);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(&seen[0].bytes[..], b"partial");
        assert_eq!(seen[0].outcome, CaptureOutcome::Abandoned);
        drop(tx);
    }

    #[tokio::test]
    async fn inner_error_is_reported_once() {
        let chunks: Vec<Result<Frame<Bytes>, std::io::Error>> = vec![
            Ok(Frame::data(Bytes::from_static(b"abc"))),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let (seen, sink) = recorder();
        let body = CaptureBody::new(StreamBody::new(stream::iter(chunks)), 200, sink);

        assert!(body.collect().await.is_err());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].outcome, CaptureOutcome::Failed);
        assert_eq!(seen[0].total_len, 3);
    }
}

