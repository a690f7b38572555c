//! Validation CLI command

use super::util::load_config;
use super::{Cli, ValidateArgs};
use casegen::*;

pub fn cmd_validate(args: &ValidateArgs, cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;
    if let Some(threshold) = args.fail_under {
        config.fail_under = Some(threshold);
        config.validate()?;
    }

    let report = validate_report(&args.contract, &args.report, &config)?;

    if args.json || config.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_report());
    }

    // Exit code: 0 = threshold met (or none set), 1 = below threshold
    match config.fail_under {
        Some(threshold) if !report.meets(threshold) => Err(format!(
            "coverage {:.1}% is below the required {:.1}%",
            report.coverage.percentage, threshold
        )
        .into()),
        _ => Ok(()),
    }
}
