use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "revision-report",
    about = "Resolve analyzed dependencies against the revisions API and print a report",
    version
)]
pub struct Cli {
    /// Analysis JSON produced by dependency analysis; `-` reads stdin
    #[arg(default_value = "-")]
    pub analysis: PathBuf,

    /// Report type: `licenses` or `dependencies` [default: licenses]
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub report_type: Option<String>,

    /// Base URL of the API server
    #[arg(long, env = "FOSSA_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API key sent with every revisions request
    #[arg(long, env = "FOSSA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Locators per revisions request [default: 20]
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Config file [default: ./.revision-report/config.toml, fallback ~/.config/revision-report/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log requests and pages to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress spinner
    #[arg(short, long)]
    pub quiet: bool,
}
