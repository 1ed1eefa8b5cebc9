use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global tracing subscriber.
///
/// Without `RUST_LOG` the service logs its own events and request traces at
/// `info` (`debug` with `verbose`) and everything else at `warn`. A valid
/// `RUST_LOG` replaces those defaults entirely.
pub fn init_logging(verbose: bool) {
    let (app_filter, env_filter) = build_filters(verbose, std::env::var("RUST_LOG").ok());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(app_filter)
        .with(env_filter)
        .init();
}

fn build_filters(verbose: bool, rust_log: Option<String>) -> (Option<Targets>, EnvFilter) {
    if let Some(env_filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return (None, env_filter);
    }

    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::INFO, "info")
    };
    let app_filter = Targets::new()
        .with_target("myfolio", level_filter)
        .with_target("tower_http", level_filter)
        .with_default(LevelFilter::WARN);
    (Some(app_filter), EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_default_filters() {
        let (app_filter, _) = build_filters(false, None);
        let app_filter = app_filter.unwrap();
        assert!(app_filter.would_enable("myfolio::server", &Level::INFO));
        assert!(!app_filter.would_enable("myfolio::server", &Level::DEBUG));
        assert!(!app_filter.would_enable("reqwest", &Level::INFO));
        assert!(app_filter.would_enable("reqwest", &Level::WARN));
    }

    #[test]
    fn test_verbose_filters() {
        let (app_filter, _) = build_filters(true, None);
        let app_filter = app_filter.unwrap();
        assert!(app_filter.would_enable("myfolio", &Level::DEBUG));
        assert!(app_filter.would_enable("tower_http::trace", &Level::DEBUG));
        assert!(!app_filter.would_enable("hyper", &Level::DEBUG));
    }

    #[test]
    fn test_rust_log_replaces_defaults() {
        let (app_filter, env_filter) = build_filters(false, Some("reqwest=debug".to_string()));
        assert!(app_filter.is_none());
        assert_eq!(env_filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_invalid_rust_log_keeps_defaults() {
        let (app_filter, _) = build_filters(false, Some("reqwest=loud".to_string()));
        assert!(app_filter.is_some());
    }
}
