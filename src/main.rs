use log::error;
use std::process::ExitCode;
use vendor_admin::config::load_config;
use vendor_admin::server::{build_state, run};

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let state = match build_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    match run(config, state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        },
    }
}
