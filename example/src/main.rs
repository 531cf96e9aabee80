use lambda_runtime::{service_fn, Error, LambdaEvent};
use powertools_metrics_emf::{lambda::MetricsLayer, Collector, MetricUnit, PowertoolsEnv};
use serde::{Deserialize, Serialize};
use tower::Layer;
use tracing::info;

#[derive(Deserialize)]
struct Request {
    booking_id: String,
    #[serde(default)]
    refund: bool,
}

#[derive(Serialize)]
struct Response {
    req_id: String,
}

async fn function_handler(metrics: &Collector, event: LambdaEvent<Request>) -> Result<Response, Error> {
    info!("Confirming booking {}", event.payload.booking_id);

    metrics.add_dimension("operation", "confirm_booking");
    metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1)?;
    metrics.add_metadata("booking_id", event.payload.booking_id.as_str());

    if event.payload.refund {
        // refunds are tracked without the operation dimension
        let mut refund = metrics.single_metric("Refund", MetricUnit::Count, 1)?;
        refund.add_dimension("payment", "card");
        refund.close()?;
    }

    // recorded through the metrics facade
    metrics::histogram!("ConfirmationLatency").record(12.5);

    Ok(Response {
        req_id: event.context.request_id,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let env = PowertoolsEnv::from_env();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::try_new(env.log_level.as_deref().unwrap_or("info"))
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_current_span(false)
        .without_time()
        .init();

    let metrics = powertools_metrics_emf::Builder::from_powertools_env(&env)
        .lambda_cold_start_metric("ColdStart")
        .with_lambda_request_id("RequestId")
        .with_lambda_xray_trace_id("TraceId")
        .init()?;

    metrics::describe_histogram!("ConfirmationLatency", metrics::Unit::Milliseconds, "");

    info!("Hello from main");

    let handler = service_fn(move |event| function_handler(metrics, event));
    lambda_runtime::run(MetricsLayer::new(metrics).layer(handler)).await
}
