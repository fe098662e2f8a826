use crate::middleware;
use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    extract::{DefaultBodyLimit, rejection::LengthLimitError},
    http::{
        HeaderName, HeaderValue, StatusCode,
        header::{X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION},
    },
    middleware::from_fn,
    response::{IntoResponse, Response},
};
use kmt_core::{LazyLock, application::Application, extension::TomlTableExt};
use std::{any::Any, borrow::Cow, net::SocketAddr, time::Duration};
use tokio::{net::TcpListener, runtime::Builder, signal};
use tower::{
    ServiceBuilder,
    timeout::{TimeoutLayer, error::Elapsed},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::{CompressionLayer, predicate::DefaultPredicate},
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
};

/// Security headers added to every response.
const SECURITY_HEADERS: [(HeaderName, &str); 3] = [
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (X_FRAME_OPTIONS, "DENY"),
    (X_XSS_PROTECTION, "1; mode=block"),
];

/// An HTTP server cluster.
#[derive(Default)]
pub struct Cluster {
    /// Default routes.
    default_routes: Vec<Router>,
}

impl Cluster {
    /// Builds the app serving the routes and the public directory.
    ///
    /// Files under the public directory are served for unmatched paths,
    /// with `404.html` as the not-found page.
    pub fn router(routes: Vec<Router>) -> Router {
        let app_state = Self::shared_state();
        let mut public_dir = "public";
        let mut body_limit = 1024 * 1024; // 1MB
        let mut request_timeout = Duration::from_secs(30);
        if let Some(config) = app_state.get_config("server") {
            if let Some(dir) = config.get_str("public-dir") {
                public_dir = dir;
            }
            if let Some(limit) = config.get_usize("body-limit") {
                body_limit = limit;
            }
            if let Some(timeout) = config.get_duration("request-timeout") {
                request_timeout = timeout;
            }
        }

        let mut app = Router::new();
        for route in routes {
            app = app.merge(route);
        }

        let public_dir = Self::parse_path(public_dir);
        let not_found_file = public_dir.join("404.html");
        if public_dir.exists() {
            let serve_dir = ServeDir::new(&public_dir)
                .append_index_html_on_directories(false)
                .not_found_service(ServeFile::new(&not_found_file));
            app = app.fallback_service(serve_dir);
            tracing::info!(public_dir = %public_dir.display(), "static files are registered");
        } else {
            tracing::warn!(public_dir = %public_dir.display(), "public directory does not exist");
            app = app.fallback(|| async { StatusCode::NOT_FOUND });
        }

        app = app.layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(
                    CompressionLayer::new()
                        .gzip(true)
                        .compress_when(DefaultPredicate::new()),
                )
                .layer(LazyLock::force(&middleware::TRACING_MIDDLEWARE))
                .layer(from_fn(middleware::html_content_type))
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    if err.is::<Elapsed>() {
                        StatusCode::REQUEST_TIMEOUT
                    } else if err.is::<LengthLimitError>() {
                        StatusCode::PAYLOAD_TOO_LARGE
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                }))
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TimeoutLayer::new(request_timeout)),
        );
        for (name, value) in SECURITY_HEADERS {
            app = app.layer(SetResponseHeaderLayer::overriding(
                name,
                HeaderValue::from_static(value),
            ));
        }
        app
    }
}

impl Application for Cluster {
    type Routes = Vec<Router>;

    #[inline]
    fn register(mut self, routes: Self::Routes) -> Self {
        self.default_routes = routes;
        self
    }

    fn run(self) {
        let runtime = match Builder::new_multi_thread()
            .thread_keep_alive(Duration::from_secs(60))
            .thread_stack_size(2 * 1024 * 1024)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("fail to build the Tokio runtime: {err}");
                return;
            }
        };
        let app_env = Self::env();
        let app_name = Self::name();
        let app_version = Self::version();
        let addr = Self::shared_state().listener();
        runtime.block_on(async move {
            let app = Self::router(self.default_routes);
            tracing::warn!(
                app_env = app_env.as_str(),
                app_name,
                app_version,
                "listen on `{addr}`",
            );

            let tcp_listener = match TcpListener::bind(&addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("fail to listen on `{addr}`: {err}");
                    return;
                }
            };
            let server = axum::serve(
                tcp_listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(Self::shutdown());
            if let Err(err) = server.await {
                tracing::error!("axum server error: {err}");
            }
        });
    }

    async fn shutdown() {
        let ctrl_c = async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::error!("fail to install the `Ctrl+C` handler: {err}");
            }
        };
        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(err) => {
                    tracing::error!("fail to install the terminate signal handler: {err}");
                    std::future::pending::<()>().await;
                }
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();
        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        };
        tracing::warn!("signal received, starting graceful shutdown");
    }
}

/// Converts a panic in a handler into a `500` response.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        Cow::Owned(s.to_owned())
    } else if let Some(s) = err.downcast_ref::<&str>() {
        Cow::Borrowed(*s)
    } else {
        Cow::Borrowed("Unknown panic message")
    };
    tracing::error!("request handler panicked: {details}");
    let reason = StatusCode::INTERNAL_SERVER_ERROR
        .canonical_reason()
        .unwrap_or_default();
    (StatusCode::INTERNAL_SERVER_ERROR, reason).into_response()
}

#[cfg(test)]
mod tests {
    use super::Cluster;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        let routes = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/panic", get(broken));
        Cluster::router(vec![routes])
    }

    async fn broken() -> &'static str {
        panic!("route is broken")
    }

    #[tokio::test]
    async fn it_adds_security_headers() {
        for (uri, status) in [("/", StatusCode::OK), ("/missing", StatusCode::NOT_FOUND)] {
            let request = Request::get(uri).body(Body::empty()).unwrap();
            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), status);

            let headers = response.headers();
            assert_eq!(headers["x-content-type-options"], "nosniff");
            assert_eq!(headers["x-frame-options"], "DENY");
            assert_eq!(headers["x-xss-protection"], "1; mode=block");
        }
    }

    #[tokio::test]
    async fn it_converts_panics_into_server_errors() {
        let request = Request::get("/panic").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["x-frame-options"], "DENY");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Internal Server Error");
        assert!(!String::from_utf8_lossy(&body).contains("route is broken"));
    }
}
