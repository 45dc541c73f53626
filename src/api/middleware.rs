use axum::{body::Body, extract::ConnectInfo, http::Request, middleware::Next, response::Response};
use std::net::SocketAddr;
use std::time::Instant;

/// Log every request once it has been answered.
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let remote = remote_addr(&request)
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(request).await;

    tracing::info!(
        %remote,
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Peer address, present when served with `into_make_service_with_connect_info`.
pub fn remote_addr<B>(request: &Request<B>) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}
