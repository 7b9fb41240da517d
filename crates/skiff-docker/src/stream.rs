use std::{
    future::Future,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use futures::{Stream, stream::BoxStream};
use skiff_core::BackendError;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

/// Byte stream that ends with a [`BackendError::Cancelled`] once `cancel` fires.
///
/// The error is wrapped as `ErrorKind::Other`; std readers retry `Interrupted` silently.
pub(crate) struct UntilCancelled {
    inner: BoxStream<'static, io::Result<Bytes>>,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
    done: bool,
}

impl UntilCancelled {
    pub(crate) fn new(inner: BoxStream<'static, io::Result<Bytes>>, cancel: CancellationToken) -> Self {
        Self {
            inner,
            cancelled: Box::pin(cancel.cancelled_owned()),
            done: false,
        }
    }
}

impl Stream for UntilCancelled {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }
        if self.cancelled.as_mut().poll(cx).is_ready() {
            self.done = true;
            return Poll::Ready(Some(Err(io::Error::other(BackendError::Cancelled))));
        }
        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                self.done = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::{StreamExt, stream};
    use skiff_core::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn passes_frames_through() {
        let inner = stream::iter(vec![Ok(Bytes::from_static(b"a")), Ok(Bytes::from_static(b"b"))]);
        let out: Vec<_> = UntilCancelled::new(inner.boxed(), CancellationToken::new())
            .collect()
            .await;
        assert_eq!(out.len(), 2);
    }

    #[tokio::test]
    async fn cancellation_ends_a_pending_stream() {
        let cancel = CancellationToken::new();
        let mut s = UntilCancelled::new(stream::pending().boxed(), cancel.clone());
        cancel.cancel();

        let err = s.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        let inner = BackendError::from_io(&err).expect("backend error as source");
        assert_eq!(inner.kind(), ErrorKind::Cancelled);
        assert!(s.next().await.is_none());
    }
}
