use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

const ABOUT: &str = "OpenWeatherMap weather TUI";

const LONG_ABOUT: &str = "
TUI showing current conditions and a 5-day forecast from OpenWeatherMap.

Type a city name and press Enter. The last five cities you searched are kept as recent searches,
and the last successful search is shown again the next time `skyfetch` starts.

The API key is read from the SKYFETCH_API_KEY environment variable, or from `api_key` in the
config file.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "City to search on startup instead of the last searched city")]
    pub city: Option<String>,

    #[arg(long, value_name = "PATH", help = "Config file (default: <config dir>/skyfetch/config.toml)")]
    pub config: Option<PathBuf>,
}
