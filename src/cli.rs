use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "orbweather", author, version, about = "Weather dashboard with an animated orb")]
pub struct Cli {
    /// Read configuration from this file instead of the default location.
    #[arg(long, global = true, value_name = "PATH", env = "ORBWEATHER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and print the dashboard for a city.
    Show {
        /// City name; defaults to `dashboard.default_city`.
        city: Option<String>,

        /// Keep redrawing once a second so the city clock ticks (until Ctrl-C).
        #[arg(long)]
        watch: bool,
    },
    /// Run the debounced autocomplete for a query and print the suggestions.
    Search {
        query: String,

        /// Choose the Nth suggestion (1-based) and load its dashboard.
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        pick: Option<u32>,
    },
    /// Preview the orb animation in the terminal.
    Orb(OrbArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OrbArgs {
    /// Stop after this many frames (runs until Ctrl-C otherwise).
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    /// Preview width in terminal columns.
    #[arg(long, value_name = "COLS", default_value_t = 64)]
    pub width: usize,

    /// Preview height in terminal rows.
    #[arg(long, value_name = "ROWS", default_value_t = 32)]
    pub height: usize,

    /// Print one of every N frames.
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub every: u64,

    /// Hold a virtual pointer over the centre of the orb.
    #[arg(long)]
    pub hover: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_city_is_optional() {
        let cli = Cli::try_parse_from(["orbweather", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: None, watch: false }));

        let cli = Cli::try_parse_from(["orbweather", "show", "Bandung", "--watch"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Show { city: Some(ref c), watch: true } if c == "Bandung"
        ));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["orbweather", "search", "Jak", "--config", "/tmp/o.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/o.toml")));
    }

    #[test]
    fn test_orb_defaults() {
        let cli = Cli::try_parse_from(["orbweather", "orb", "--frames", "10"]).unwrap();
        let Command::Orb(args) = cli.command else {
            unreachable!("orb arguments parse into Command::Orb");
        };
        assert_eq!(args.frames, Some(10));
        assert_eq!((args.width, args.height), (64, 32));
        assert!(!args.hover);
    }

    #[test]
    fn test_search_pick_is_one_based() {
        let cli = Cli::try_parse_from(["orbweather", "search", "Band", "--pick", "2"]).unwrap();
        assert!(matches!(cli.command, Command::Search { pick: Some(2), .. }));
        assert!(Cli::try_parse_from(["orbweather", "search", "Band", "--pick", "0"]).is_err());
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["orbweather", "search"]).is_err());
    }
}
