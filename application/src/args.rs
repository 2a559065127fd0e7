//! [`Args`] definitions.

use std::path::PathBuf;

use clap::Parser;

/// Server of the car rental system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Path to a JSON file with cars to add to the catalog on startup.
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn defaults_config_path() {
        let args = Args::try_parse_from(["server"]).unwrap();

        assert_eq!(args.config, "config.toml");
        assert!(args.seed.is_none());
    }

    #[test]
    fn parses_seed_path() {
        let args =
            Args::try_parse_from(["server", "-c", "prod.toml", "--seed", "cars.json"])
                .unwrap();

        assert_eq!(args.config, "prod.toml");
        assert_eq!(args.seed.unwrap().to_str(), Some("cars.json"));
    }
}
