use std::time::Duration;

use clap::{builder::ValueParser, Args};

use crate::loader::{DataLoader, DataRoot};

pub const STREAMERS_PATH: &str = "assets/data/streamers.json";
pub const TOURNAMENTS_PATH: &str = "assets/data/tournaments.json";

fn validator_root() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<DataRoot, String> {
        if s.starts_with("http") {
            let reg = regex::Regex::new(r#"^https?://[-a-zA-Z0-9.]+(:\d+)?(/[-a-zA-Z0-9()@:%_+.~#?&/=]*)?$"#)
                .map_err(|e| e.to_string())?;
            if !reg.is_match(s) {
                return Err("Invalid data root url".to_string());
            }
        }
        s.parse::<DataRoot>().map_err(|e| e.to_string())
    })
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Config {
    #[arg(
        long,
        env = "ESDIR_DATA_ROOT",
        default_value = ".",
        value_parser = validator_root(),
        help = "Directory or http(s) URL the data paths are relative to"
    )]
    pub data_root: DataRoot,
    #[arg(long, default_value = STREAMERS_PATH)]
    pub streamers_path: String,
    #[arg(long, default_value = TOURNAMENTS_PATH)]
    pub tournaments_path: String,
    #[arg(long, env = "ESDIR_VIEWPORT_WIDTH", default_value_t = 1280)]
    pub viewport_width: u32,
    #[arg(long, default_value_t = 768, help = "Widths up to this count as touch devices")]
    pub mobile_breakpoint: u32,
    #[arg(long, default_value_t = 2000)]
    pub counter_duration_ms: u64,
}

impl Config {
    pub fn is_touch(&self) -> bool {
        self.viewport_width <= self.mobile_breakpoint
    }

    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    pub fn loader(&self) -> DataLoader {
        DataLoader::new(self.data_root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn defaults() {
        let h = Harness::try_parse_from(["esdir"]).unwrap();
        assert_eq!(h.config.streamers_path, STREAMERS_PATH);
        assert_eq!(h.config.tournaments_path, TOURNAMENTS_PATH);
        assert_eq!(h.config.counter_duration(), Duration::from_millis(2000));
        assert!(!h.config.is_touch());
    }

    #[test]
    fn narrow_viewport_is_touch() {
        let h = Harness::try_parse_from(["esdir", "--viewport-width", "768"]).unwrap();
        assert!(h.config.is_touch());
    }

    #[test]
    fn rejects_malformed_url_root() {
        assert!(Harness::try_parse_from(["esdir", "--data-root", "http://bad host/"]).is_err());
        let h = Harness::try_parse_from(["esdir", "--data-root", "https://example.org/site"]).unwrap();
        assert!(matches!(h.config.data_root, DataRoot::Http(_)));
    }
}
