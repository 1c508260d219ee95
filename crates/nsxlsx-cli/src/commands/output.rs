//! Output command

use std::path::PathBuf;

use clap::Args;
use nsxlsx_core::layout::LayoutPolicy;
use nsxlsx_core::logging_facility::{init, Profile};
use nsxlsx_core_types::RunContext;
use nsxlsx_engine::config::{
    OPT_API_BASE_URL, OPT_INPUT_PATH, OPT_SOURCE_IDENTIFIER, OPT_STORE_PATH,
};
use nsxlsx_engine::{
    run_once, AppendingOutputter, ConfigFile, Configurable, Configuration, OutputReport,
    ProviderKind,
};

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Nation whose statistics are fetched
    #[arg(short = 'n', long, env = "NSXLSX_NATION")]
    pub nation: Option<String>,

    /// Store to create or append to (.xlsx or .json)
    #[arg(short = 'o', long, env = "NSXLSX_OUTFILE")]
    pub outfile: Option<PathBuf>,

    /// Snapshot source: nationstates or json-file
    #[arg(long, env = "NSXLSX_PROVIDER", default_value = "nationstates")]
    pub provider: String,

    /// Snapshot file for the json-file provider
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// TOML file with default options and sheet layouts
    #[arg(long, env = "NSXLSX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, env = "NSXLSX_API_BASE_URL", hide = true)]
    pub api_base_url: Option<String>,

    /// Log format: human or json
    #[arg(long, default_value = "human")]
    pub log_format: String,
}

impl OutputArgs {
    /// Options given on the command line
    fn overrides(&self) -> Configuration {
        let mut config = Configuration::new();
        if let Some(nation) = &self.nation {
            config.set(OPT_SOURCE_IDENTIFIER, nation.as_str());
        }
        if let Some(outfile) = &self.outfile {
            config.set(OPT_STORE_PATH, outfile.display().to_string());
        }
        if let Some(input) = &self.input {
            config.set(OPT_INPUT_PATH, input.display().to_string());
        }
        if let Some(url) = &self.api_base_url {
            config.set(OPT_API_BASE_URL, url.as_str());
        }
        config
    }
}

pub fn execute(args: OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let profile: Profile = args.log_format.parse()?;
    init(profile);

    let (mut config, layouts) = match &args.config {
        Some(path) => ConfigFile::load_from_path(path)?.into_parts(),
        None => (Configuration::new(), LayoutPolicy::default()),
    };
    config.merge(&args.overrides());

    let kind: ProviderKind = args.provider.parse()?;
    let mut provider = kind.build();
    provider.configure(&config)?;

    let mut outputter = AppendingOutputter::new(layouts);
    outputter.configure(&config)?;

    let mut ctx = RunContext::new();
    if let Some(source) = config.get(OPT_SOURCE_IDENTIFIER) {
        ctx = ctx.with_source_identifier(source);
    }

    let report = run_once(provider.as_ref(), &outputter, &ctx)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &OutputReport) {
    println!(
        "{} {} ({} sheets)",
        report.mode,
        report.store_path.display(),
        report.sheets.len()
    );
    for outcome in &report.sheets {
        let row = match outcome.data_row {
            Some(row) => format!("row {}", row + 1),
            None => "no values".to_string(),
        };
        let added: Vec<&str> = outcome
            .new_columns
            .iter()
            .map(|(_, name)| name.as_str())
            .collect();
        if added.is_empty() {
            println!("  {}: {}", outcome.sheet, row);
        } else {
            println!(
                "  {}: {}, new columns: {}",
                outcome.sheet,
                row,
                added.join(", ")
            );
        }
    }
}
