use axum::{
    extract::Request,
    http::header::{CONTENT_TYPE, HeaderValue},
    middleware::Next,
    response::Response,
};

// Serves every successful response for a `.html` path as `text/html`.
pub(crate) async fn html_content_type(req: Request, next: Next) -> Response {
    let is_html = req.uri().path().ends_with(".html");
    let mut res = next.run(req).await;
    if is_html && res.status().is_success() {
        res.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
    }
    res
}
