//! Generate CLI command

use super::util::{load_config, write_output};
use super::{Cli, GenerateArgs};
use casegen::*;

pub fn cmd_generate(args: &GenerateArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let report = generate_cases(&args.contract, &config)?;

    let content = if args.json || config.output == OutputFormat::Json {
        format!("{}\n", serde_json::to_string_pretty(&report)?)
    } else {
        report.to_report()
    };

    write_output(&args.output, &content)
}
