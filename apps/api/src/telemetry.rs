use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: this crate at `default_level`,
/// plus tower-http's request/response spans from `TraceLayer`.
fn default_directives(default_level: &str) -> String {
    let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
    format!("{crate_target}={default_level},tower_http=debug")
}

/// Initializes structured logging on stderr, keeping stdout free for CLI output.
///
/// `RUST_LOG` wins when set.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directives(default_level))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_include_http_traces() {
        let directives = default_directives("info");
        assert!(directives.starts_with("applicant_fit=info"));
        assert!(directives.contains("tower_http=debug"));
        assert!(directives.parse::<EnvFilter>().is_ok());
    }
}
