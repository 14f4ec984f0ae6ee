//! Inbound dispatch.
//!
//! One background task consumes the connection's frames and demultiplexes
//! them to subscriptions by id.

mod dispatcher;

pub(crate) use dispatcher::DispatchLoop;
