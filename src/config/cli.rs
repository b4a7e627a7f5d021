use super::AppConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "backoffice-views")]
#[command(about = "Retail back-office pages over a pluggable data source")]
pub struct CliArgs {
    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Listen address, overrides server.bind")]
    pub bind: Option<String>,

    #[arg(long, help = "JSON seed for the in-memory store")]
    pub seed: Option<String>,

    #[arg(long, help = "JSON label overrides")]
    pub labels: Option<String>,

    #[arg(long, value_name = "DIR", help = "Copy bundled CSS/JS into DIR/backoffice and exit")]
    pub publish_assets: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// Loads the config file when given, then applies flag overrides.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(seed) = &self.seed {
            config.store.seed = Some(seed.clone());
        }
        if let Some(labels) = &self.labels {
            config.labels.file = Some(labels.clone());
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nbind = \"127.0.0.1:7000\"\n[store]\nseed = \"a.json\"\n")
            .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = CliArgs::parse_from(["backoffice-views", "--config", &path, "--bind", "0.0.0.0:9000"]);
        let config = args.load_config().unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.store.seed.as_deref(), Some("a.json"));
    }

    #[test]
    fn test_defaults_without_file() {
        let args = CliArgs::parse_from(["backoffice-views", "-v", "--publish-assets", "./public"]);
        let config = args.load_config().unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(args.publish_assets, Some(PathBuf::from("./public")));
    }
}
