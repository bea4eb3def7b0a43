use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware::Next,
    response::Response,
};

/// Treat every POST/PUT body as JSON so clients that omit the header
/// (plain `curl -d`) still reach the `Json` extractor.
pub async fn normalize_content_type(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST || request.method() == Method::PUT {
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    next.run(request).await
}
