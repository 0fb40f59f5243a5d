//! API listener.
//!
//! Accepts connections on the API port and answers requests from the
//! profile's route table.

use crate::api::Resolution;
use crate::state::AppState;
use crate::util::RequestId;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// API listener that accepts and serves connections.
pub struct ApiServer {
    /// Shared application state.
    state: AppState,
    /// TCP listener.
    listener: TcpListener,
}

impl ApiServer {
    /// Bind the API listener. Failing to bind is fatal for the caller.
    pub async fn bind(address: SocketAddr, state: AppState) -> std::io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        let local_addr = listener.local_addr()?;

        info!(
            listen = %local_addr,
            service = %state.service(),
            routes = state.routes().len(),
            "api listener bound"
        );

        Ok(Self { state, listener })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the listener, accepting connections until shutdown.
    #[instrument(skip_all, fields(service = %self.state.service()))]
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!("api listener starting");

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, addr)) => {
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                _ = shutdown.recv() => {
                    info!("api listener shutting down");
                    break;
                }
            }
        }
    }

    /// Serve one client connection on its own task.
    fn handle_connection(&self, stream: TcpStream, client_addr: SocketAddr) {
        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "failed to set TCP_NODELAY on client connection");
        }

        let state = self.state.clone();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { handle_request(req, &state).await }
            });

            if let Err(e) = http1::Builder::new()
                .keep_alive(true)
                .serve_connection(io, service)
                .await
            {
                debug!(client = %client_addr, error = %e, "api connection error");
            }
        });
    }
}

/// Handle an incoming API request.
async fn handle_request<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(RequestId::from_string)
        .unwrap_or_default();

    Ok(respond(state, req.method(), req.uri().path(), &request_id))
}

/// Resolve a request against the route table and build the response.
///
/// Matched routes run their handler, which performs the metric mutations.
pub fn respond(
    state: &AppState,
    method: &Method,
    path: &str,
    request_id: &RequestId,
) -> Response<Full<Bytes>> {
    let mut response = match state.routes().resolve(method, path) {
        Resolution::Matched(route) => {
            let reply = route.call(state.random());
            match reply.to_json() {
                Ok(body) => {
                    let mut response = Response::new(Full::new(Bytes::from(body)));
                    response
                        .headers_mut()
                        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                    response
                }
                Err(e) => {
                    error!(request_id = %request_id, error = %e, "failed to encode response");
                    text_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode response\n")
                }
            }
        }
        Resolution::MethodNotAllowed(allowed) => {
            let mut response = text_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed\n");
            let allowed = allowed
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allowed) {
                response.headers_mut().insert(ALLOW, value);
            }
            response
        }
        Resolution::NotFound => text_response(StatusCode::NOT_FOUND, "Not found\n"),
    };

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "api request"
    );

    response
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceKind;
    use crate::random::ScriptedRandom;
    use http_body_util::BodyExt;
    use std::sync::Arc;

    fn agri_store() -> AppState {
        AppState::new(ServiceKind::AgriStore, Arc::new(ScriptedRandom::new(vec![2]))).unwrap()
    }

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_matched_route_returns_json() {
        let state = agri_store();
        let id = RequestId::from_string("req-1");

        let response = respond(&state, &Method::GET, "/update-product", &id);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[&REQUEST_ID_HEADER], "req-1");
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"status": "updated"})
        );
        assert_eq!(state.metrics().value("agri_product_updates_total"), Some(1));
    }

    #[test]
    fn test_unknown_path_is_404_without_mutation() {
        let state = agri_store();
        let response = respond(&state, &Method::GET, "/sync-prices", &RequestId::new());

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.metrics().value("agri_orders_total"), Some(0));
    }

    #[test]
    fn test_wrong_method_is_405_without_mutation() {
        let state = agri_store();
        let response = respond(&state, &Method::POST, "/order", &RequestId::new());

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");
        assert_eq!(state.metrics().value("agri_orders_total"), Some(0));
        assert_eq!(state.metrics().value("agri_stock_level_kg"), Some(0));
    }

    #[tokio::test]
    async fn test_inbound_request_id_echoed() {
        let state = agri_store();
        let req = Request::builder()
            .uri("/order")
            .header("x-request-id", "abc-123")
            .body(())
            .unwrap();

        let response = handle_request(req, &state).await.unwrap();
        assert_eq!(response.headers()[&REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_generated_request_id_when_absent() {
        let state = agri_store();
        let req = Request::builder().uri("/order").body(()).unwrap();

        let response = handle_request(req, &state).await.unwrap();
        let id = response.headers()[&REQUEST_ID_HEADER].to_str().unwrap();
        assert_eq!(id.len(), 36);
    }
}
