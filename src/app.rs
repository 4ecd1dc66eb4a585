use std::sync::Arc;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::dashboard::{self, Dashboard, InputEvent, InputId};
use crate::dataset::{self, format_count, LoadReport};
use crate::filter::{FilterCriteria, RegionField, SelectorOptions};
use crate::markers::{MarkerDescriptor, MarkerStyle};
use crate::output::{self, OutputFormat, ReportContext};

fn print_banner() {
    const BANNER: &str = r#"
    ____
   / __/___  _________ _____ ___  ____ _____
  / /_/ __ \/ ___/ __ `/ __ `__ \/ __ `/ __ \
 / __/ /_/ (__  ) /_/ / / / / / / /_/ / /_/ /
/_/  \____/____/\__,_/_/ /_/ /_/\__,_/ .___/
                                    /_/
       v0.2.0 - mass graves of the Spanish Civil War
    "#;
    eprint!("{}", BANNER);
    eprintln!();
}

// status lines go to stderr so stdout stays clean for rendered markers
fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn print_tagged(tag: colored::ColoredString, message: &str) {
    eprintln!(
        "{}{}{} {}",
        "[".bold().white(),
        tag,
        "]".bold().white(),
        message
    );
}

fn warn(message: &str) {
    print_tagged("WRN".bold().yellow(), message);
}

fn info(message: &str) {
    print_tagged("INF".bold().blue(), message);
}

fn selection_line(criteria: &FilterCriteria) -> String {
    criteria.summary().unwrap_or_else(|| "none".to_string())
}

fn selection_pairs(criteria: &FilterCriteria) -> Vec<(String, String)> {
    InputId::ALL
        .iter()
        .filter_map(|input| {
            input
                .value(criteria)
                .map(|v| (input.name().to_string(), v.to_string()))
        })
        .collect()
}

#[derive(Clone, Debug)]
struct RunConfig {
    data_path: String,
    output: Option<String>,
    output_format: OutputFormat,
    region_field: RegionField,
    criteria: FilterCriteria,
    style: MarkerStyle,
    title: String,
    no_color: bool,
    verbose: u8,
    list_options: bool,
    interactive: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let data_path = args
        .data
        .or(cfg.data)
        .map(|p| config::expand_tilde_string(p.trim()))
        .filter(|p| !p.is_empty())
        .ok_or_else(|| "dataset path is required (--data or 'data' in config)".to_string())?;

    let region_field_raw = args
        .region_field
        .or(cfg.region_field)
        .unwrap_or_else(|| "community".to_string());
    let region_field = RegionField::parse(&region_field_raw)
        .ok_or_else(|| format!("invalid region field '{region_field_raw}'"))?;

    let person_range = non_empty(args.person_range.or(cfg.person_range));
    if let Some(raw) = person_range.as_deref() {
        validation::validate_range(raw)?;
    }
    let criteria = FilterCriteria {
        region: non_empty(args.community.or(cfg.community)),
        municipality: non_empty(args.municipality.or(cfg.municipality)),
        grave_type: non_empty(args.grave_type.or(cfg.grave_type)),
        person_range,
        region_field,
    };

    let defaults = MarkerStyle::default();
    let fill_opacity = cfg.fill_opacity.unwrap_or(defaults.fill_opacity);
    if !(0.0..=1.0).contains(&fill_opacity) {
        return Err(format!("invalid fill_opacity {fill_opacity}, expected 0.0-1.0"));
    }
    let style = MarkerStyle {
        stroke_color: cfg.stroke_color.unwrap_or(defaults.stroke_color),
        fill_color: cfg.fill_color.unwrap_or(defaults.fill_color),
        fill_opacity,
    };

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        data_path,
        output,
        output_format,
        region_field,
        criteria,
        style,
        title: cfg
            .title
            .unwrap_or_else(|| output::report::DEFAULT_TITLE.to_string()),
        no_color,
        verbose: args.verbose,
        list_options: args.list_options,
        interactive: args.interactive,
    })
}

fn log_load_report(report: &LoadReport, kept: usize, verbose: u8) {
    format_kv_line(
        "Dataset",
        &format!(
            "{} rows={} kept={} skipped={} defaulted={}",
            report.source_name,
            report.rows_read,
            kept,
            report.skipped.len(),
            report.defaulted_counts
        ),
    );
    format_kv_line(
        "Aggregate",
        &format!(
            "{} persons={} transferred_graves={}",
            dataset::AGGREGATE_LABEL,
            format_count(report.aggregate_count),
            report.transferred_rows
        ),
    );
    if report.skipped.is_empty() {
        return;
    }
    if verbose > 0 {
        for row in report.skipped.iter() {
            warn(&format!(
                "skipped line {} ({}): {}",
                row.line,
                if row.registration.is_empty() {
                    "no registration"
                } else {
                    row.registration.as_str()
                },
                row.reason
            ));
        }
    } else {
        warn(&format!(
            "{} rows skipped for unusable coordinates (use -v for details)",
            report.skipped.len()
        ));
    }
}

fn print_options(options: &SelectorOptions) {
    for input in InputId::ALL {
        let values = input.options(options);
        println!(
            "{} {} ({} values, {})",
            input.name().bold().green(),
            input.label(),
            values.len(),
            input.placeholder()
        );
        for value in values {
            println!("  {value}");
        }
    }
}

async fn emit(run: &RunConfig, dashboard: &Dashboard, markers: &[MarkerDescriptor]) -> Result<(), String> {
    let ctx = ReportContext {
        title: run.title.clone(),
        selection: selection_pairs(dashboard.criteria()),
        total_records: dashboard.dataset().len(),
        ..ReportContext::default()
    };
    let rendered = output::render(run.output_format, markers, &ctx)
        .map_err(|e| format!("failed to render {} output: {e}", run.output_format.as_str()))?;

    match run.output.as_ref() {
        Some(outfile_path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(outfile_path)
                .await
                .map_err(|e| format!("failed to open output file '{outfile_path}': {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output file '{outfile_path}': {e}"))?;
            if run.verbose > 0 {
                info(&format!(
                    "wrote {} markers to {} ({})",
                    markers.len(),
                    outfile_path,
                    run.output_format.as_str()
                ));
            }
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to flush stdout: {e}"))?;
        }
    }
    Ok(())
}

async fn run_interactive<R>(run: &RunConfig, dashboard: &mut Dashboard, input: R) -> Result<(), String>
where
    R: AsyncBufRead + Unpin,
{
    info("interactive mode: <input>=<value> (region, municipality, type, range), clear, show, options, quit");
    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn(&format!("ignored unreadable input line: {e}"));
                continue;
            }
            Err(e) => return Err(format!("failed to read stdin: {e}")),
        };
        let line = line.trim();
        let markers = match line {
            "" => continue,
            "quit" | "exit" => break,
            "show" => {
                format_kv_line("Selection", &selection_line(dashboard.criteria()));
                continue;
            }
            "options" => {
                print_options(dashboard.options());
                continue;
            }
            "clear" => dashboard.reset(),
            _ => match InputEvent::parse(line) {
                Ok(event) => dashboard.handle(event),
                Err(e) => {
                    warn(&e.to_string());
                    continue;
                }
            },
        };
        format_kv_line("Selection", &selection_line(dashboard.criteria()));
        format_kv_line("Markers", &markers.len().to_string());
        emit(run, dashboard, &markers).await?;
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();

    let now = Instant::now();
    let dataset = dataset::load(&run.data_path)
        .await
        .map_err(|e| e.to_string())?;
    log_load_report(dataset.report(), dataset.len(), run.verbose);

    let mut dashboard = Dashboard::new(
        Arc::new(dataset),
        dashboard::Options {
            region_field: run.region_field,
            style: run.style.clone(),
            initial: run.criteria.clone(),
        },
    );

    if run.list_options {
        print_options(dashboard.options());
        return Ok(());
    }

    format_kv_line("Selection", &selection_line(dashboard.criteria()));
    format_kv_line(
        "Output",
        &format!(
            "{} format={}",
            run.output.as_deref().unwrap_or("stdout"),
            run.output_format.as_str()
        ),
    );

    let markers = dashboard.render();
    format_kv_line("Markers", &markers.len().to_string());
    emit(&run, &dashboard, &markers).await?;

    if run.interactive {
        let stdin = BufReader::new(tokio::io::stdin());
        run_interactive(&run, &mut dashboard, stdin).await?;
    }

    eprintln!();
    eprintln!(
        ":: Completed :: took {}ms ::",
        now.elapsed().as_millis()
    );
    Ok(())
}

fn init_config(path: Option<String>) -> Result<(), String> {
    let path = match path {
        Some(p) => config::expand_tilde(&p),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine home directory for config".to_string())?,
    };
    if config::ensure_default_config_file(&path)? {
        info(&format!("wrote default config to {}", path.display()));
    } else {
        info(&format!("config already exists at {}", path.display()));
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    if args.init_config {
        return init_config(args.config);
    }

    let cfg = match args.config.as_ref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
