use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aoiscan - Area-of-interest analysis against feature service layers
#[derive(Parser, Debug)]
#[command(name = "aoiscan")]
#[command(about = "Area-of-interest analysis against feature service layers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file (defaults to ./aoiscan.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query layers for features intersecting an area of interest
    Analyze(AnalyzeArgs),

    /// Resolve, generate and validate widget configuration
    Config(ConfigArgs),

    /// Print an iframe snippet embedding a configured widget
    Embed(EmbedArgs),

    /// List ready-made widget configurations
    Presets(PresetsArgs),
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Layer URLs or local GeoJSON files (defaults to the widget, preset or configured layers)
    pub layers: Vec<String>,

    /// Widget URL supplying title, layers and extent
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Start from a preset (oil-and-gas, environmental, custom)
    #[arg(long)]
    pub preset: Option<String>,

    /// Bounding box area of interest
    #[arg(long, value_name = "XMIN,YMIN,XMAX,YMAX", allow_hyphen_values = true, conflicts_with_all = ["geometry", "current_view"])]
    pub bbox: Option<String>,

    /// GeoJSON geometry or Feature file used as the area of interest
    #[arg(long, value_name = "FILE", conflicts_with = "current_view")]
    pub geometry: Option<PathBuf>,

    /// Use the map view given by --extent (or the widget extent) as the area
    #[arg(long)]
    pub current_view: bool,

    /// Map view as longitude,latitude,zoom
    #[arg(long, value_name = "LON,LAT,ZOOM", allow_hyphen_values = true)]
    pub extent: Option<String>,

    /// Report title used for exports
    #[arg(long)]
    pub title: Option<String>,

    /// Export formats to write (csv, json, text)
    #[arg(long, value_delimiter = ',')]
    pub export: Vec<String>,

    /// Directory receiving exported files
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Layers queried at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Seconds allowed per layer
    #[arg(long, value_name = "SECS")]
    pub layer_timeout: Option<u64>,

    /// Seconds allowed per HTTP request
    #[arg(long, value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Maximum features kept per layer
    #[arg(long)]
    pub max_features: Option<usize>,

    /// Retries for transient HTTP failures
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Viewport size used to turn an extent into a view (e.g. 1024x768)
    #[arg(long, value_name = "WxH")]
    pub viewport: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Resolve widget settings from a URL or query string
    Resolve {
        /// Widget URL or query string
        url: String,
    },

    /// Build a widget URL carrying the given settings
    Generate(GenerateArgs),

    /// Check that layer URLs look like feature service endpoints
    Validate {
        /// Layer URLs
        #[arg(required = true)]
        layers: Vec<String>,
    },

    /// Show runtime settings and where each value came from
    Show,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Base URL of the hosted widget
    pub base_url: String,

    /// Start from a preset
    #[arg(long)]
    pub preset: Option<String>,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Comma-separated layer URLs
    #[arg(long)]
    pub layers: Option<String>,

    /// Basemap name
    #[arg(long)]
    pub basemap: Option<String>,

    /// Initial extent as longitude,latitude,zoom
    #[arg(long, value_name = "LON,LAT,ZOOM", allow_hyphen_values = true)]
    pub extent: Option<String>,
}

#[derive(Parser, Debug)]
pub struct EmbedArgs {
    /// Configured widget URL
    pub url: String,

    /// Iframe width (default 100%)
    #[arg(long)]
    pub width: Option<String>,

    /// Iframe height (default 600px)
    #[arg(long)]
    pub height: Option<String>,
}

#[derive(Parser, Debug)]
pub struct PresetsArgs {
    /// Also print the widget URL of each preset on this base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}
