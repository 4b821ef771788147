//! The event loop.
//!
//! One task owns the [`Hub`] and the listener. Each turn it waits for either
//! a pending accept or the next ready connection, then runs the matching
//! handler to completion before waiting again. Handlers never suspend, so
//! every table mutation happens here, in order.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{instrument, trace};

use super::readiness::{Armed, Readiness, ReadinessEvent, wait_ready};
use crate::error::ServerError;
use crate::state::{ConnectionId, Hub};

/// What woke the loop.
enum Wake {
    Accept(io::Result<(TcpStream, SocketAddr)>),
    Ready(ReadinessEvent),
}

/// Readiness multiplexer over every live connection plus the listener.
pub struct EventLoop {
    listener: TcpListener,
    hub: Hub<TcpStream>,
    /// Exactly one armed future per live connection.
    armed: FuturesUnordered<BoxFuture<'static, ReadinessEvent>>,
}

impl EventLoop {
    pub fn new(listener: TcpListener, hub: Hub<TcpStream>) -> Self {
        Self {
            listener,
            hub,
            armed: FuturesUnordered::new(),
        }
    }

    /// Run until a policy-fatal error. There is no other way out.
    #[instrument(skip_all, name = "event_loop")]
    pub async fn run(mut self) -> Result<(), ServerError> {
        loop {
            let wake = tokio::select! {
                accepted = self.listener.accept() => Wake::Accept(accepted),
                Some(event) = self.armed.next(), if !self.armed.is_empty() => Wake::Ready(event),
            };

            match wake {
                Wake::Accept(accepted) => {
                    if let Some(admitted) = self.hub.handle_accept(accepted)? {
                        self.arm(admitted.id);
                    }
                }
                Wake::Ready(event) => self.dispatch(event)?,
            }
        }
    }

    fn dispatch(&mut self, event: ReadinessEvent) -> Result<(), ServerError> {
        let ReadinessEvent { id, visitor, armed } = event;

        if !self.hub.is_current(id, visitor) {
            trace!(%id, visitor, "Dropping stale readiness");
            return Ok(());
        }

        match armed {
            Armed::Ready(Ok(ready)) => {
                let ready = Readiness::from(ready);
                trace!(%id, visitor, ?ready, "Ready");
                self.hub.handle_client(id, ready)?;
            }
            Armed::Ready(Err(e)) => self.hub.handle_io_error(id, e)?,
            Armed::Released => {}
        }

        if self.hub.is_current(id, visitor) {
            self.arm(id);
        }
        Ok(())
    }

    /// Register `id` in the readiness set with its current interest.
    fn arm(&mut self, id: ConnectionId) {
        let Some(conn) = self.hub.table().get(id) else {
            return;
        };
        let future = wait_ready(
            id,
            conn.visitor(),
            Arc::clone(conn.transport()),
            Arc::clone(conn.interest()),
        );
        self.armed.push(future.boxed());
    }
}
