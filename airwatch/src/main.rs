use std::process::ExitCode;

use airwatch::{
    atmosphere::JsonFileSampler, config::Config, context::Context, monitor::Monitor,
};
use aqi::AqiEngine;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    airwatch::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ctx = Context::new();
    {
        let ctx = ctx.clone();
        let handler = ctrlc::set_handler(move || {
            tracing::info!("got SIGINT, closing context");
            ctx.cancel();
        });
        if let Err(e) = handler {
            tracing::error!("could not set SIGINT handler: {}", e);
            return ExitCode::FAILURE;
        }
    }

    tracing::info!(
        source = %config.source.display(),
        interval_secs = config.interval.as_secs(),
        out_of_range = ?config.out_of_range,
        "starting monitor"
    );
    let sampler = JsonFileSampler::new(&config.source);
    let mut monitor = Monitor::new(
        sampler,
        AqiEngine::new(config.engine_settings()),
        config.interval,
    );
    let refreshes = monitor.run(&ctx);

    tracing::info!(refreshes, "shut down");
    ExitCode::SUCCESS
}
