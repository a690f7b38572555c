//! Schema CLI command

use casegen::*;

pub fn cmd_schema(name: Option<&str>) -> Result<()> {
    match name.unwrap_or("list") {
        "list" => {
            println!("Available schemas: case-report, reconciliation, config");
            Ok(())
        }
        "case-report" => print_schema::<CaseReport>(),
        "reconciliation" => print_schema::<ReconciliationReport>(),
        "config" => print_schema::<Config>(),
        other => Err(format!("Unknown schema: {}", other).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
