use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "form-check",
    version,
    about = "Validate a form submission against a rule file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Path to the rule file (overrides config file setting)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Pretty-print the JSON report (overrides config file setting)
    #[arg(long)]
    pub pretty: bool,

    /// JSON object of field values; reads stdin when omitted or "-"
    pub input: Option<PathBuf>,
}

impl Cli {
    /// The input path, or `None` when the submission comes from stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}
