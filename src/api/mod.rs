//! HTTP API: route table, reply bodies, and the listener.

mod reply;
mod routes;
mod server;

pub use reply::Reply;
pub use routes::{Handler, Resolution, Route, RouteError, RouteTable};
pub use server::{respond, ApiServer, REQUEST_ID_HEADER};
