use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browser::readiness::ReadinessConfig;
use crate::element::category::Category;
use crate::element::classifier::KnownElements;

pub const DEFAULT_CONFIG_FILE: &str = "selector-synth.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "selector-synth",
    version,
    about = "Synthesize robust element locators for a live web page"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// WebDriver endpoint (default: http://localhost:9515)
    #[arg(long, global = true)]
    pub webdriver: Option<String>,

    /// Run the browser headless
    #[arg(long, global = true)]
    pub headless: bool,

    /// Path to config file (default: selector-synth.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a page and export selectors for every interactive element
    Analyze {
        /// Page to analyze
        #[arg(long)]
        url: String,

        /// Output directory for exports and HTML snapshots
        #[arg(short, long)]
        output_dir: Option<String>,

        /// CSV output path (default: <output_dir>/selectors_<timestamp>.csv)
        #[arg(long)]
        csv_output: Option<String>,

        /// JSON output path (default: CSV path with a .json extension)
        #[arg(long)]
        json_output: Option<String>,

        /// Do not save the page HTML
        #[arg(long)]
        no_save_html: bool,

        /// Group name written into every record
        #[arg(long)]
        group: Option<String>,
    },

    /// Find one element by its text and suggest selectors for it
    Find {
        /// Page to search
        #[arg(long)]
        url: String,

        /// Text to look for
        #[arg(long)]
        text: String,

        /// Comma-separated tags to scan first
        #[arg(long, default_value = "a,button,div,span")]
        element_types: String,

        /// Require the whole text to match
        #[arg(long)]
        exact_match: bool,

        /// Group name for the suggested selectors
        #[arg(long, default_value = "common")]
        group: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `selector-synth.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    #[serde(default)]
    pub analyze: AnalyzeConfig,
    /// Pre-mapped elements, matched by full xpath before any heuristic.
    #[serde(default)]
    pub known_elements: Vec<KnownElement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub headless: bool,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            headless: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_group")]
    pub group: String,

    #[serde(default = "default_true")]
    pub save_html: bool,

    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,

    #[serde(default = "default_quiesce_timeout")]
    pub quiesce_timeout_secs: u64,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            group: default_group(),
            save_html: true,
            ready_timeout_secs: default_ready_timeout(),
            quiesce_timeout_secs: default_quiesce_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownElement {
    pub full_xpath: String,
    pub category: Category,
}

// Serde default helpers
fn default_endpoint() -> String { "http://localhost:9515".to_string() }
fn default_output_dir() -> String { "data/page_analyze".to_string() }
fn default_group() -> String { "detailed_analysis".to_string() }
fn default_true() -> bool { true }
fn default_ready_timeout() -> u64 { 30 }
fn default_quiesce_timeout() -> u64 { 5 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> AppConfig {
    match serde_yaml::from_str(content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }
    }
}

impl AppConfig {
    pub fn known_elements(&self) -> KnownElements {
        self.known_elements
            .iter()
            .map(|k| (k.full_xpath.clone(), k.category))
            .collect()
    }
}

// ============================================================================
// Resolved settings (CLI > config file > defaults)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WebDriverSettings {
    pub endpoint: String,
    pub headless: bool,
}

pub fn resolve_webdriver(cli: &Cli, config: &AppConfig) -> WebDriverSettings {
    WebDriverSettings {
        endpoint: cli
            .webdriver
            .clone()
            .unwrap_or_else(|| config.webdriver.endpoint.clone()),
        headless: cli.headless || config.webdriver.headless,
    }
}

/// Page-load waits shared by `analyze` and `find`.
pub fn resolve_readiness(config: &AppConfig) -> ReadinessConfig {
    ReadinessConfig::from_secs(
        config.analyze.ready_timeout_secs,
        config.analyze.quiesce_timeout_secs,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeSettings {
    pub output_dir: String,
    pub group: String,
    pub save_html: bool,
    pub csv_output: Option<String>,
    pub json_output: Option<String>,
    pub ready_timeout_secs: u64,
    pub quiesce_timeout_secs: u64,
}

pub fn resolve_analyze(
    config: &AppConfig,
    output_dir: Option<&str>,
    csv_output: Option<&str>,
    json_output: Option<&str>,
    no_save_html: bool,
    group: Option<&str>,
) -> AnalyzeSettings {
    AnalyzeSettings {
        output_dir: output_dir
            .map(str::to_string)
            .unwrap_or_else(|| config.analyze.output_dir.clone()),
        group: group
            .map(str::to_string)
            .unwrap_or_else(|| config.analyze.group.clone()),
        save_html: !no_save_html && config.analyze.save_html,
        csv_output: csv_output.map(str::to_string),
        json_output: json_output.map(str::to_string),
        ready_timeout_secs: config.analyze.ready_timeout_secs,
        quiesce_timeout_secs: config.analyze.quiesce_timeout_secs,
    }
}
