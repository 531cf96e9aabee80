//! Tower middleware that turns a Lambda handler into a Powertools style `log_metrics` handler
//!
//! Around every invocation [MetricsService]:
//! * emits the cold start metric once per process, when [Builder::lambda_cold_start_metric](super::Builder::lambda_cold_start_metric) is set
//! * records the request id and X-Ray trace id as metadata, when configured
//! * flushes the batch once the handler completes, whether it succeeded or not
//!
//! Only available with the `lambda` feature (enabled by default)
//!
//! ```ignore
//! use lambda_runtime::{service_fn, Error, LambdaEvent};
//! use powertools_metrics_emf::{lambda::MetricsService, MetricUnit};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let metrics = powertools_metrics_emf::Builder::from_env()
//!         .cloudwatch_namespace("ServerlessAirline")
//!         .service("booking")
//!         .lambda_cold_start_metric("ColdStart")
//!         .with_lambda_request_id("RequestId")
//!         .init()?;
//!
//!     let handler = service_fn(move |_event: LambdaEvent<Value>| async move {
//!         metrics.add_metric("SuccessfulBooking", MetricUnit::Count, 1)?;
//!         Ok::<_, Error>(())
//!     });
//!
//!     lambda_runtime::run(MetricsService::new(metrics, handler)).await
//! }
//! ```
//!
//! The first invocation then logs:
//!
//! ```plaintext
//! {"_aws":{"Timestamp":1687947426188,"CloudWatchMetrics":[{"Namespace":"ServerlessAirline","Dimensions":[["function_name","service"]],"Metrics":[{"Name":"ColdStart","Unit":"Count"}]}]},"function_name":"booking-handler","service":"booking","ColdStart":1.0}
//! {"_aws":{"Timestamp":1687947426188,"CloudWatchMetrics":[{"Namespace":"ServerlessAirline","Dimensions":[["service"]],"Metrics":[{"Name":"SuccessfulBooking","Unit":"Count"}]}]},"service":"booking","RequestId":"4bd2d365-3792-46c8-9b6c-6132f9630fbb","SuccessfulBooking":1.0}
//! ```

use super::collector::Collector;
use super::error::MetricsError;
use lambda_runtime::{Context as LambdaContext, LambdaEvent};
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tracing::error;

/// Wraps a Lambda [tower::Service] so every invocation is followed by a flush
pub struct MetricsService<S> {
    metrics: &'static Collector,
    inner: S,
}

impl<S> MetricsService<S> {
    pub fn new(metrics: &'static Collector, inner: S) -> Self {
        Self { metrics, inner }
    }

    /// Cold start and per request metadata, applied before the handler runs
    fn begin_invocation(&self, context: &LambdaContext) {
        let config = &self.metrics.config;

        if let Some(name) = config.lambda_cold_start {
            if self.metrics.take_cold_start() {
                if let Err(e) = self.metrics.emit_cold_start(name) {
                    error!("Failed to publish cold start metric: {e}");
                }
            }
        }

        if let Some(key) = config.lambda_request_id {
            self.metrics.add_metadata(key, context.request_id.as_str());
        }
        if let (Some(key), Some(trace_id)) = (config.lambda_xray_trace_id, &context.xray_trace_id) {
            self.metrics.add_metadata(key, trace_id.as_str());
        }
    }
}

impl<S, Payload> tower::Service<LambdaEvent<Payload>> for MetricsService<S>
where
    S: tower::Service<LambdaEvent<Payload>>,
    S::Error: From<MetricsError>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = FlushOnCompletion<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, event: LambdaEvent<Payload>) -> Self::Future {
        self.begin_invocation(&event.context);
        FlushOnCompletion {
            metrics: self.metrics,
            handler: self.inner.call(event),
        }
    }
}

/// Handler future that flushes the collector once it resolves
#[pin_project]
pub struct FlushOnCompletion<F> {
    metrics: &'static Collector,
    #[pin]
    handler: F,
}

impl<F, T, E> Future for FlushOnCompletion<F>
where
    F: Future<Output = Result<T, E>>,
    E: From<MetricsError>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let projected = self.project();
        let outcome = ready!(projected.handler.poll(cx));
        let flushed = projected.metrics.flush_invocation();

        // a handler failure takes precedence over a failed flush
        Poll::Ready(match (outcome, flushed) {
            (Ok(response), Ok(())) => Ok(response),
            (Ok(_), Err(flush_error)) => Err(flush_error.into()),
            (Err(handler_error), Ok(())) => Err(handler_error),
            (Err(handler_error), Err(flush_error)) => {
                error!("Failed to flush metrics after handler error: {flush_error}");
                Err(handler_error)
            }
        })
    }
}

/// [tower::Layer] wrapping services in a [MetricsService]
#[derive(Clone, Copy)]
pub struct MetricsLayer {
    metrics: &'static Collector,
}

impl MetricsLayer {
    pub fn new(metrics: &'static Collector) -> Self {
        Self { metrics }
    }
}

impl<S> tower::Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService::new(self.metrics, inner)
    }
}
