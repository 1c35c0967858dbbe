//! CLI argument parsing module for gomod-outdated

use crate::orchestrator::{ToolPaths, DEFAULT_GIT, DEFAULT_GO};
use clap::Parser;

/// Usage line printed when no repository URL is given
pub const USAGE: &str = "Usage: gomod-outdated <git-repo-url>";

/// Report outdated dependencies of a Go module hosted in a git repository
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gomod-outdated",
    version,
    about = "Clone a Go repository and report dependencies with newer versions"
)]
pub struct CliArgs {
    /// Git repository URL to clone and analyze
    #[arg(value_name = "REPO_URL")]
    pub url: Option<String>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// git executable used to clone the repository
    #[arg(long, env = "GOMOD_OUTDATED_GIT", default_value = DEFAULT_GIT)]
    pub git: String,

    /// go executable used to list module updates
    #[arg(long, env = "GOMOD_OUTDATED_GO", default_value = DEFAULT_GO)]
    pub go: String,
}

impl CliArgs {
    /// External tool names or paths to use
    pub fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            git: self.git.clone(),
            go: self.go.clone(),
        }
    }

    /// Default tracing filter for the selected verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "gomod_outdated=debug"
        } else {
            "gomod_outdated=warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["gomod-outdated"]);
        assert!(args.url.is_none());
        assert!(!args.json);
        assert!(!args.verbose);
        assert!(!args.no_color);
    }

    #[test]
    fn test_url_argument() {
        let args = CliArgs::parse_from(["gomod-outdated", "https://github.com/acme/widget.git"]);
        assert_eq!(
            args.url.as_deref(),
            Some("https://github.com/acme/widget.git")
        );
    }

    #[test]
    fn test_json_flag() {
        let args = CliArgs::parse_from(["gomod-outdated", "--json", "u"]);
        assert!(args.json);
    }

    #[test]
    fn test_verbose_flags() {
        let args = CliArgs::parse_from(["gomod-outdated", "-v", "u"]);
        assert!(args.verbose);
        assert_eq!(args.log_filter(), "gomod_outdated=debug");

        let args = CliArgs::parse_from(["gomod-outdated", "--verbose", "u"]);
        assert!(args.verbose);
    }

    #[test]
    fn test_quiet_log_filter() {
        let args = CliArgs::parse_from(["gomod-outdated", "u"]);
        assert_eq!(args.log_filter(), "gomod_outdated=warn");
    }

    #[test]
    fn test_tool_overrides() {
        let args = CliArgs::parse_from([
            "gomod-outdated",
            "--git",
            "/opt/git/bin/git",
            "--go",
            "/usr/local/go/bin/go",
            "u",
        ]);
        let tools = args.tool_paths();
        assert_eq!(tools.git, "/opt/git/bin/git");
        assert_eq!(tools.go, "/usr/local/go/bin/go");
    }

    #[test]
    fn test_extra_positional_rejected() {
        assert!(CliArgs::try_parse_from(["gomod-outdated", "a", "b"]).is_err());
    }
}
