//! Panic recovery middleware
//!
//! 捕获 handler 中的 panic，记录日志并返回 500，单个请求的故障不会终止 worker。
//! The 500 is returned as an `Error`: the server renders it and `AccessLog`
//! records its status.
//! Requires `panic = "unwind"`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    error::InternalError,
    http::StatusCode,
};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::errors::GENERIC_INTERNAL_ERROR;

/// Recovery middleware factory
#[derive(Clone, Default)]
pub struct Recovery;

impl<S, B> Transform<S, ServiceRequest> for Recovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RecoveryService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoveryService {
            service: Rc::new(service),
        }))
    }
}

pub struct RecoveryService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RecoveryService<S>
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
        // 只保留 method/path；持有 HttpRequest 的克隆会让路由匹配失败
        let method = req.method().clone();
        let path = req.path().to_string();

        Box::pin(async move {
            match AssertUnwindSafe(async move { srv.call(req).await })
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(payload) => {
                    error!(
                        method = %method,
                        path = %path,
                        "handler panicked: {}",
                        panic_message(payload.as_ref())
                    );
                    Err(InternalError::new(
                        GENERIC_INTERNAL_ERROR,
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into())
                }
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
