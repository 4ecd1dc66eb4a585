use crate::cli::args::CliArgs;
use crate::dataset::RangeLabel;
use crate::filter::RegionField;
use crate::output::OutputFormat;

pub fn validate_range(raw: &str) -> Result<(), String> {
    if raw.trim().is_empty() || RangeLabel::parse(raw).is_some() {
        return Ok(());
    }
    Err(format!(
        "invalid range '{raw}', expected one of {}",
        RangeLabel::labels().join(", ")
    ))
}

pub fn validate_region_field(raw: &str) -> Result<(), String> {
    RegionField::parse(raw)
        .map(|_| ())
        .ok_or_else(|| format!("invalid region field '{raw}', expected community or province"))
}

pub fn validate_output_format(raw: &str) -> Result<(), String> {
    OutputFormat::parse(raw)
        .map(|_| ())
        .ok_or_else(|| format!("invalid output format '{raw}', expected text, json, geojson or html"))
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.person_range.as_deref() {
        validate_range(raw).map_err(|e| format!("--range: {e}"))?;
    }
    if let Some(raw) = args.region_field.as_deref() {
        validate_region_field(raw).map_err(|e| format!("--region-field: {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        validate_output_format(raw).map_err(|e| format!("--output-format: {e}"))?;
    }
    if args.interactive && args.list_options {
        return Err("use either --interactive or --list-options, not both".to_string());
    }
    Ok(())
}
