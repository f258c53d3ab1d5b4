//! Access log middleware
//!
//! 每个请求一条日志：method、path、status、耗时（毫秒）。
//! 请求在一个带 UUID 的 span 里执行，handler 内的日志可以按 request_id 关联。

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Access log middleware factory
#[derive(Clone, Default)]
pub struct AccessLog;

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessLogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogService {
            service: Rc::new(service),
        }))
    }
}

pub struct AccessLogService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessLogService<S>
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
        let start = Instant::now();

        let method = req.method().to_string();
        let path = req.path().to_string();
        let span = info_span!("request", request_id = %Uuid::new_v4());

        Box::pin(
            async move {
                let result = srv.call(req).await;
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

                let status = match &result {
                    Ok(response) => response.status(),
                    Err(e) => e.as_response_error().status_code(),
                };
                log_request(&method, &path, status, latency_ms);

                result
            }
            .instrument(span),
        )
    }
}

fn log_request(method: &str, path: &str, status: StatusCode, latency_ms: f64) {
    if status.is_server_error() {
        warn!(
            method,
            path,
            status = status.as_u16(),
            latency_ms,
            "request failed"
        );
    } else {
        info!(
            method,
            path,
            status = status.as_u16(),
            latency_ms,
            "request completed"
        );
    }
}
