//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

/// Runs the animated holiday scene through the headless backend
#[derive(Debug, Parser)]
#[command(name = "yuletide", version, about)]
pub struct Args {
    /// Scene configuration file (.toml or .ron); built-in defaults when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of frames to render
    #[arg(short, long, default_value_t = 600)]
    pub frames: u64,

    /// Frame rate of the fixed-step clock
    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    /// Seed for the decoration layout; random when omitted
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Pace frames against the wall clock instead of stepping as fast as possible
    #[arg(long)]
    pub realtime: bool,

    /// Reported viewport width in pixels
    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    /// Reported viewport height in pixels
    #[arg(long, default_value_t = 1080)]
    pub height: u32,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write the default configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub write_default_config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["yuletide"]);
        assert_eq!(args.frames, 600);
        assert_eq!(args.fps, 60.0);
        assert!(args.config.is_none());
        assert!(args.seed.is_none());
        assert!(!args.realtime);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "yuletide",
            "--config",
            "scene.ron",
            "--frames",
            "30",
            "--seed",
            "2025",
            "--realtime",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("scene.ron")));
        assert_eq!(args.frames, 30);
        assert_eq!(args.seed, Some(2025));
        assert!(args.realtime);
    }
}
