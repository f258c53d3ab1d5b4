//! Cache-Control injection for static assets
//!
//! Mounted on the `/assets` scope only. Handlers that already set the header
//! keep their own value.

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{CACHE_CONTROL, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;

/// One year.
pub const STATIC_ASSET_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Cache-Control middleware factory
#[derive(Clone)]
pub struct CacheControl {
    value: HeaderValue,
}

impl CacheControl {
    pub fn static_assets() -> Self {
        Self {
            value: HeaderValue::from_static(STATIC_ASSET_CACHE_CONTROL),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CacheControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CacheControlService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CacheControlService {
            service: Rc::new(service),
            value: self.value.clone(),
        }))
    }
}

pub struct CacheControlService<S> {
    service: Rc<S>,
    value: HeaderValue,
}

impl<S, B> Service<ServiceRequest> for CacheControlService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let value = self.value.clone();

        Box::pin(async move {
            let mut response = srv.call(req).await?;
            if !response.headers().contains_key(CACHE_CONTROL) {
                response.headers_mut().insert(CACHE_CONTROL, value);
            }
            Ok(response)
        })
    }
}
