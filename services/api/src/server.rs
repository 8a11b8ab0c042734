use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryStatementRepository};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_pipeline::config::AppConfig;
use loan_pipeline::error::AppError;
use loan_pipeline::telemetry;
use loan_pipeline::workflows::statement::{DealService, GuardedScorer, LocalScorer};
use loan_pipeline::workflows::underwriting::CalculatorService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let pipeline = &config.pipeline;
    let calculator = Arc::new(CalculatorService::new(pipeline.policy()));
    let scorer = GuardedScorer::new(
        LocalScorer::new(calculator.clone()),
        pipeline.upstream_timeout,
        pipeline.upstream_retries,
    );
    let deal_service = Arc::new(DealService::new(
        Arc::new(InMemoryStatementRepository::default()),
        Arc::new(scorer),
        pipeline.completion,
    ));

    let app = with_pipeline_routes(calculator, deal_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        base_rate = %pipeline.base_rate,
        completion = ?pipeline.completion,
        "loan pipeline ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
