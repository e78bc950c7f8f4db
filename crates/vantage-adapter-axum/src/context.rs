use axum::http::Request;
use vantage_core::context::RequestContext;

/// Access to the resolved [`RequestContext`] stored in request extensions.
pub struct AxumRequestContext;

impl AxumRequestContext {
    pub fn insert<B>(request: &mut Request<B>, context: RequestContext) {
        request.extensions_mut().insert(context);
    }

    pub fn get<B>(request: &Request<B>) -> Option<&RequestContext> {
        request.extensions().get::<RequestContext>()
    }
}
