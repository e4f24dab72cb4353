//! Running blocking system lookups off the caller's thread.

use std::thread;
use futures::{Async, Future, Poll};
use futures::sync::oneshot;
use super::super::error::{Error, Result};


//------------ Blocking ------------------------------------------------------

/// A future resolving into the result of a lookup on a worker thread.
///
/// The system resolver only offers blocking calls, so each lookup gets a
/// thread of its own that sends the result back through a oneshot channel.
pub struct Blocking<T>(oneshot::Receiver<Result<T>>);

impl<T: Send + 'static> Blocking<T> {
    pub fn spawn<F>(name: &str, op: F) -> Result<Self>
    where F: FnOnce() -> Result<T> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        thread::Builder::new()
            .name(format!("netdb-{}", name))
            .spawn(move || {
                // The receiver may be gone already, nobody cares then.
                let _ = tx.send(op());
            })?;
        Ok(Blocking(rx))
    }
}

impl<T> Future for Blocking<T> {
    type Item = T;
    type Error = Error;

    fn poll(&mut self) -> Poll<Self::Item, Self::Error> {
        match self.0.poll() {
            Ok(Async::Ready(res)) => res.map(Async::Ready),
            Ok(Async::NotReady) => Ok(Async::NotReady),
            Err(err) => Err(err.into()),
        }
    }
}


//============ Testing =======================================================
