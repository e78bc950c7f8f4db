use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body as AxumBody;
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use tower::{Layer, Service};
use vantage_core::{Resolver, ResolverConfig};

use crate::context::AxumRequestContext;
use crate::request::{signals_from_request, SignalSource};
use crate::response::ContextRejection;

/// Tower layer that resolves a [`RequestContext`](vantage_core::RequestContext)
/// for every request before handing it to the wrapped service.
#[derive(Clone, Debug, Default)]
pub struct ContextLayer {
    config: Arc<ResolverConfig>,
    source: Arc<SignalSource>,
}

impl ContextLayer {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config: Arc::new(config),
            source: Arc::new(SignalSource::default()),
        }
    }

    /// Layer backed by the process-wide configuration, if one was installed.
    pub fn from_global() -> Self {
        Self::new(ResolverConfig::global_or_default())
    }

    #[must_use]
    pub fn with_source(mut self, source: SignalSource) -> Self {
        self.source = Arc::new(source);
        self
    }
}

impl<S> Layer<S> for ContextLayer {
    type Service = ContextService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ContextService {
            inner,
            config: Arc::clone(&self.config),
            source: Arc::clone(&self.source),
        }
    }
}

/// Service produced by [`ContextLayer`].
///
/// Requests whose host cannot be resolved are answered directly with a JSON
/// error and never reach the inner service.
#[derive(Clone, Debug)]
pub struct ContextService<S> {
    inner: S,
    config: Arc<ResolverConfig>,
    source: Arc<SignalSource>,
}

impl<S> Service<Request<AxumBody>> for ContextService<S>
where
    S: Service<Request<AxumBody>, Response = Response<AxumBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<AxumBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<AxumBody>) -> Self::Future {
        // The clone may not be ready; keep the instance `poll_ready` was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let signals = signals_from_request(&request, &self.source);
        let resolved = Resolver::new(&signals, &self.config).capture_current_context();

        Box::pin(async move {
            let context = match resolved {
                Ok(context) => context,
                Err(err) => {
                    let elapsed = start.elapsed().as_secs_f64() * 1000.0;
                    tracing::error!(
                        "request method={} path={} status={} error={} elapsed_ms={:.2}",
                        method,
                        path,
                        err.status().as_u16(),
                        err.message(),
                        elapsed
                    );
                    return Ok(ContextRejection(err).into_response());
                }
            };

            let route = context.route().to_string();
            let host = context.host().to_string();
            AxumRequestContext::insert(&mut request, context);

            let response = inner.call(request).await?;
            let elapsed = start.elapsed().as_secs_f64() * 1000.0;
            tracing::info!(
                "request method={} host={} route={} status={} elapsed_ms={:.2}",
                method,
                host,
                route,
                response.status().as_u16(),
                elapsed
            );
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use crate::extract::Resolved;

    async fn describe(Resolved(ctx): Resolved) -> String {
        format!("{} {} {} {}", ctx.method(), ctx.host(), ctx.route(), ctx.dir())
    }

    fn app(layer: ContextLayer) -> Router {
        Router::new().fallback(describe).layer(layer)
    }

    async fn body_text(response: Response<AxumBody>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[tokio::test]
    async fn resolves_context_for_handler() {
        let layer = ContextLayer::new(ResolverConfig::new())
            .with_source(SignalSource::default().with_script_name("/blog/index.php"));
        let request = Request::builder()
            .uri("/blog/posts/7?draft=1")
            .header("host", "example.com")
            .body(AxumBody::empty())
            .unwrap();

        let response = app(layer).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "GET example.com /posts/7 /blog");
    }

    #[tokio::test]
    async fn unresolved_host_short_circuits_with_json_error() {
        let request = Request::builder().uri("/").body(AxumBody::empty()).unwrap();

        let response = app(ContextLayer::new(ResolverConfig::new()))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["status"], 400);
    }

    #[tokio::test]
    async fn override_supplies_missing_host() {
        let config = ResolverConfig::new().with_override("ciencia.com", false).unwrap();
        let request = Request::builder()
            .method("DELETE")
            .uri("/items/3")
            .body(AxumBody::empty())
            .unwrap();

        let response = app(ContextLayer::new(config)).oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "DELETE ciencia.com /items/3 /");
    }

    #[tokio::test]
    async fn forwarded_headers_shape_the_context() {
        async fn url(Resolved(ctx): Resolved) -> String {
            format!("{} {}", ctx.url(), ctx.port())
        }
        let router = Router::new()
            .route("/ciencia", get(url))
            .layer(ContextLayer::new(ResolverConfig::new()));
        let request = Request::builder()
            .uri("/ciencia")
            .header("host", "internal.local:8080")
            .header("x-forwarded-host", "example.com")
            .header("x-forwarded-proto", "https")
            .body(AxumBody::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "https://example.com/ciencia 443");
    }
}
