use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Live cricket match-state report service
#[derive(Parser, Debug, Clone)]
#[command(name = "cricket-momentum", version, about)]
pub struct Config {
    /// Report API listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: String,

    /// Historical ball-by-ball CSV used for per-player career aggregates
    #[arg(long, env = "HISTORICAL_CSV", default_value = "ball_by_ball_ipl.csv")]
    pub historical_csv: PathBuf,

    /// Model artifacts JSON (feature lists, scalers, venue vocabulary)
    #[arg(long, env = "MODEL_ARTIFACTS", default_value = "momentum_artifacts.json")]
    pub model_artifacts: PathBuf,

    /// Momentum model server URL; the artifacts' linear head is used when unset
    #[arg(long, env = "PREDICTOR_URL")]
    pub predictor_url: Option<String>,

    /// Timeout for a single momentum model request, in seconds
    #[arg(long, env = "PREDICTOR_TIMEOUT_SECS", default_value = "10")]
    pub predictor_timeout_secs: u64,

    /// Deliveries in the momentum model's sequence window
    #[arg(long, env = "SEQ_LENGTH", default_value = "10")]
    pub seq_length: usize,

    /// Balls allotted to an innings (120 for twenty overs)
    #[arg(long, env = "TOTAL_BALLS", default_value = "120")]
    pub total_balls: u32,

    /// Render a report for this CSV to stdout and exit instead of serving
    #[arg(long)]
    pub report_csv: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.seq_length == 0 {
            anyhow::bail!("seq_length must be at least 1");
        }
        if self.total_balls == 0 || self.total_balls % 6 != 0 {
            anyhow::bail!("total_balls must be a positive multiple of 6");
        }
        if self.predictor_timeout_secs == 0 {
            anyhow::bail!("predictor_timeout_secs must be positive");
        }
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!("listen_addr '{}' is not a socket address", self.listen_addr);
        }
        if let Some(raw) = &self.predictor_url {
            let url = url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("predictor_url '{}' is invalid: {}", raw, e))?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("predictor_url must use http or https");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["cricket-momentum"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let config = parse(&[]);
        assert_eq!(config.seq_length, 10);
        assert_eq!(config.total_balls, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_innings_length_and_window() {
        assert!(parse(&["--total-balls", "100"]).validate().is_err());
        assert!(parse(&["--seq-length", "0"]).validate().is_err());
    }

    #[test]
    fn predictor_url_must_be_http() {
        assert!(parse(&["--predictor-url", "http://localhost:8501/v1/predict"])
            .validate()
            .is_ok());
        assert!(parse(&["--predictor-url", "ftp://models/momentum"])
            .validate()
            .is_err());
        assert!(parse(&["--predictor-url", "not a url"]).validate().is_err());
    }
}
