use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set
fn default_filter(config: &AppConfig) -> String {
    if config.verbose_http {
        config.log_level.clone()
    } else {
        format!("{},hyper=warn,hyper_util=warn,reqwest=warn", config.log_level)
    }
}

pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(verbose_http: bool) -> AppConfig {
        let mut config = AppConfig::from_yaml_str(
            r#"
log_level: "debug"
log_dir: "./logs"
log_file: "banklink.log"
use_json: false
rotation: "never"
gateway: { host: "127.0.0.1", port: 8080 }
appwrite:
  endpoint: "http://localhost/v1"
  project_id: "p"
  database_id: "d"
  user_collection_id: "u"
  bank_collection_id: "b"
  transaction_collection_id: "t"
"#,
        )
        .unwrap();
        config.verbose_http = verbose_http;
        config
    }

    #[test]
    fn test_http_internals_quiet_by_default() {
        assert_eq!(
            default_filter(&config(false)),
            "debug,hyper=warn,hyper_util=warn,reqwest=warn"
        );
        assert_eq!(default_filter(&config(true)), "debug");
    }
}
