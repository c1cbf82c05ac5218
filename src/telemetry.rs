//! Tracing setup. `LOG_LEVEL` takes EnvFilter directives and `LOG_FORMAT=json`
//! switches to one JSON object per line.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,resolver=debug,cache=debug,oneline_judge=debug,tower_http=info,axum=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Blank or unparsable directives fall back to the default filter.
fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| match EnvFilter::try_new(d) {
            Ok(filter) => Some(filter),
            Err(e) => {
                eprintln!("ignoring LOG_LEVEL={d:?}: {e}");
                None
            }
        })
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok();
    let format = std::env::var("LOG_FORMAT").ok();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level.as_deref()))
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match LogFormat::from_env_value(format.as_deref()) {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_format_is_case_insensitive() {
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("text")), LogFormat::Pretty);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Pretty);
    }

    #[test]
    fn explicit_directives_are_used() {
        assert_eq!(env_filter(Some("warn")).to_string(), EnvFilter::new("warn").to_string());
    }

    #[test]
    fn blank_or_invalid_directives_fall_back_to_default() {
        let default = EnvFilter::new(DEFAULT_FILTER).to_string();
        assert_eq!(env_filter(None).to_string(), default);
        assert_eq!(env_filter(Some("  ")).to_string(), default);
        assert_eq!(env_filter(Some("resolver=loudest")).to_string(), default);
    }
}
