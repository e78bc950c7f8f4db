use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vantage_core::{RequestContext, Resolver, ResolverConfig};

use crate::request::{signals_from_parts, SignalSource};
use crate::response::ContextRejection;

/// Extractor for the current [`RequestContext`].
///
/// Uses the snapshot stored by [`ContextLayer`](crate::ContextLayer) when the
/// layer is installed. Otherwise the context is resolved on the spot against
/// the process-wide configuration.
#[derive(Clone, Debug)]
pub struct Resolved(pub RequestContext);

impl Resolved {
    pub fn into_inner(self) -> RequestContext {
        self.0
    }
}

impl Deref for Resolved {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Resolved
where
    S: Send + Sync,
{
    type Rejection = ContextRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<RequestContext>() {
            return Ok(Self(context.clone()));
        }

        let signals = signals_from_parts(parts, &SignalSource::default());
        let config = ResolverConfig::global_or_default();
        let context = Resolver::new(&signals, &config).capture_current_context()?;
        Ok(Self(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body as AxumBody;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;
    use vantage_core::Scheme;

    #[tokio::test]
    async fn resolves_without_layer() {
        async fn handler(ctx: Resolved) -> String {
            assert_eq!(ctx.scheme(), Scheme::Http);
            let url = ctx.url().to_string();
            format!("{}|{}", url, ctx.into_inner().uri())
        }

        let request = Request::builder()
            .uri("/x//y?z=1")
            .header("host", "example.com")
            .body(AxumBody::empty())
            .unwrap();
        let response = Router::new()
            .fallback(handler)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"http://example.com/x/y|/x//y?z=1");
    }

    #[tokio::test]
    async fn rejects_when_host_is_missing() {
        async fn handler(_ctx: Resolved) -> &'static str {
            "unreachable"
        }

        let request = Request::builder().uri("/").body(AxumBody::empty()).unwrap();
        let response = Router::new()
            .fallback(handler)
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
