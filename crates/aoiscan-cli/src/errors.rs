use aoiscan_core::error::AoiscanError;
use console::style;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }

    /// Machine-readable form for `--json`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "error",
            "message": self.message,
            "context": self.context,
            "suggestions": self.suggestions,
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Neither an area nor any layer was given
pub fn nothing_to_analyze() -> CliError {
    CliError::new(AoiscanError::NothingToAnalyze.to_string())
        .with_context("An analysis needs an area of interest, a list of layers, or both.")
        .with_suggestion("Pass an area: aoiscan analyze --bbox -100,30,-90,40")
        .with_suggestion("Or use the map view: aoiscan analyze --current-view --extent -98,39.5,4")
        .with_suggestion("Or name layers: aoiscan analyze https://.../FeatureServer/0")
        .with_help("Run: aoiscan analyze --help")
}

/// The supplied area of interest was rejected
pub fn invalid_region(reason: &str) -> CliError {
    CliError::new("Invalid area of interest")
        .with_context(format!("The area could not be used for analysis.\n\nReason: {}", reason))
        .with_suggestion("Give --bbox as xmin,ymin,xmax,ymax in WGS 84 degrees")
        .with_suggestion("Or pass a GeoJSON geometry or Feature file with --geometry")
        .with_help("Run: aoiscan analyze --help")
}

/// Export requested but nothing was found
pub fn no_data() -> CliError {
    CliError::new("No Data")
        .with_context(AoiscanError::NoData.to_string())
        .with_suggestion("Widen the area of interest or check the layer URLs")
        .with_help("Run: aoiscan config validate <layer-url>")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check aoiscan.toml (or the file passed with --config) for typos")
        .with_suggestion("Check AOISCAN_* environment variables")
        .with_help("Run: aoiscan config show")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(err) = error.downcast_ref::<AoiscanError>() {
        match err {
            AoiscanError::NothingToAnalyze => return nothing_to_analyze(),
            AoiscanError::InvalidRegion { reason } => return invalid_region(reason),
            AoiscanError::NoData => return no_data(),
            AoiscanError::ConfigInvalid { key, reason } => return invalid_config(key, reason),
            AoiscanError::ExportWrite { path, .. } => {
                return CliError::new("Download failed")
                    .with_context(format!("Error: {}", err))
                    .with_suggestion(format!("Check that {} is writable", path.display()))
                    .with_suggestion("Or choose another directory with --out");
            }
            _ => {}
        }
    }

    let message = format!("{:#}", error);

    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(message)
    }
}
