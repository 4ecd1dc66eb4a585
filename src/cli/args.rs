use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fosamap",
    version,
    about = "filter and map Spanish Civil War mass-grave records",
    long_about = "fosamap loads a CSV of mass-grave records, applies the region, municipality, type and person-count range selectors, and writes circle markers for a map widget.\n\nExamples:\n  fosamap -d fosas_with_url.csv\n  fosamap -d fosas_with_url.csv --community Andalucía --range 10-30 -o map.html\n  fosamap -d fosas_with_url.csv --list-options\n  fosamap -d fosas_with_url.csv -o map.html --interactive\n\nTip: Use --config to persist the dataset path and marker style."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'd',
        long = "data",
        visible_alias = "input-file",
        value_name = "FILE",
        help_heading = "Input",
        help = "Mass-grave CSV dataset."
    )]
    pub data: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.fosamap/config.yml when it exists)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'r',
        long = "community",
        visible_alias = "province",
        value_name = "VALUE",
        help_heading = "Filters",
        help = "Only graves in this autonomous community (or province, see --region-field)."
    )]
    pub community: Option<String>,

    #[arg(
        short = 'm',
        long = "municipality",
        value_name = "VALUE",
        help_heading = "Filters",
        help = "Only graves in this municipality."
    )]
    pub municipality: Option<String>,

    #[arg(
        short = 't',
        long = "type",
        value_name = "VALUE",
        help_heading = "Filters",
        help = "Only graves of this type (e.g. 'Fosa común')."
    )]
    pub grave_type: Option<String>,

    #[arg(
        short = 'p',
        long = "range",
        visible_alias = "people",
        value_name = "LABEL",
        help_heading = "Filters",
        help = "Only graves in this person-count range (0-5, 5-10, 10-30, 30-60, 60-100, +100)."
    )]
    pub person_range: Option<String>,

    #[arg(
        long = "region-field",
        value_name = "FIELD",
        help_heading = "Filters",
        help = "Column compared by --community: community (ComAutonom) or province (Provincia)."
    )]
    pub region_field: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write markers to a file (stdout when unset)."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'f',
        long = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, geojson, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'l',
        long = "list-options",
        help_heading = "Output",
        help = "Print the values available to each selector and exit."
    )]
    pub list_options: bool,

    #[arg(
        short = 'i',
        long = "interactive",
        help_heading = "Mode",
        help = "Read selection changes from stdin (e.g. municipality=Jaca, range=, clear, quit)."
    )]
    pub interactive: bool,
}
