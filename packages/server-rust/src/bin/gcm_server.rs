use std::sync::Arc;

use clap::Parser;
use gcm_core::{InvocationSink, LoggingLayer, StubGcmService, TracingSink};
use gcm_server::{init_tracing, wait_for_termination, Cli, NetworkModule, Supervisor};
use tower::ServiceBuilder;
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    let sink: Arc<dyn InvocationSink> = Arc::new(TracingSink);
    let service = ServiceBuilder::new()
        .layer(LoggingLayer::new(sink))
        .service(StubGcmService);

    let mut network = NetworkModule::new(cli.network_config(), Arc::new(service));
    let lifecycle = network.lifecycle();
    let listener = async move {
        network.start().await?;
        network.serve().await
    };

    let trigger = Supervisor::new(lifecycle)
        .run(listener, wait_for_termination())
        .await;
    error!(fatal = %trigger, "exiting");
    Ok(())
}
