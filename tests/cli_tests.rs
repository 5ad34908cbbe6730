use clap::Parser;
use selector_synth::cli::commands::parse_element_types;
use selector_synth::cli::config::{
    AppConfig, Cli, Commands, load_config, parse_config, resolve_analyze, resolve_readiness,
    resolve_webdriver,
};
use std::time::Duration;
use selector_synth::element::category::Category;
use tempfile::TempDir;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_analyze_minimal() {
    let cli = Cli::parse_from(["selector-synth", "analyze", "--url", "https://example.com"]);
    match cli.command {
        Commands::Analyze {
            url,
            output_dir,
            csv_output,
            json_output,
            no_save_html,
            group,
        } => {
            assert_eq!(url, "https://example.com");
            assert!(output_dir.is_none());
            assert!(csv_output.is_none());
            assert!(json_output.is_none());
            assert!(!no_save_html);
            assert!(group.is_none());
        }
        _ => panic!("Expected Analyze command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(!cli.headless);
    assert!(cli.webdriver.is_none());
}

#[test]
fn cli_parse_analyze_all_flags() {
    let cli = Cli::parse_from([
        "selector-synth",
        "analyze",
        "--url",
        "https://example.com",
        "-o",
        "out",
        "--csv-output",
        "out/a.csv",
        "--json-output",
        "out/a.json",
        "--no-save-html",
        "--group",
        "login_page",
    ]);
    match cli.command {
        Commands::Analyze {
            output_dir,
            csv_output,
            json_output,
            no_save_html,
            group,
            ..
        } => {
            assert_eq!(output_dir.as_deref(), Some("out"));
            assert_eq!(csv_output.as_deref(), Some("out/a.csv"));
            assert_eq!(json_output.as_deref(), Some("out/a.json"));
            assert!(no_save_html);
            assert_eq!(group.as_deref(), Some("login_page"));
        }
        _ => panic!("Expected Analyze command"),
    }
}

#[test]
fn cli_parse_find_defaults() {
    let cli = Cli::parse_from([
        "selector-synth",
        "find",
        "--url",
        "https://example.com",
        "--text",
        "Login",
    ]);
    match cli.command {
        Commands::Find {
            url,
            text,
            element_types,
            exact_match,
            group,
        } => {
            assert_eq!(url, "https://example.com");
            assert_eq!(text, "Login");
            assert_eq!(element_types, "a,button,div,span");
            assert!(!exact_match);
            assert_eq!(group, "common");
        }
        _ => panic!("Expected Find command"),
    }
}

#[test]
fn cli_global_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "selector-synth",
        "find",
        "--url",
        "https://example.com",
        "--text",
        "Go",
        "--exact-match",
        "-vv",
        "--headless",
        "--webdriver",
        "http://127.0.0.1:4444",
        "--config",
        "custom.yaml",
    ]);
    assert_eq!(cli.verbose, 2);
    assert!(cli.headless);
    assert_eq!(cli.webdriver.as_deref(), Some("http://127.0.0.1:4444"));
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    assert!(matches!(cli.command, Commands::Find { exact_match: true, .. }));
}

#[test]
fn cli_requires_url() {
    assert!(Cli::try_parse_from(["selector-synth", "analyze"]).is_err());
    assert!(Cli::try_parse_from(["selector-synth", "find", "--url", "x"]).is_err());
}

#[test]
fn element_types_are_split_and_normalized() {
    assert_eq!(parse_element_types("a, Button,,div "), vec!["a", "button", "div"]);
    assert!(parse_element_types("").is_empty());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_missing_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/selector-synth.yaml"));
    assert_eq!(config.webdriver.endpoint, "http://localhost:9515");
    assert!(!config.webdriver.headless);
    assert_eq!(config.analyze.output_dir, "data/page_analyze");
    assert_eq!(config.analyze.group, "detailed_analysis");
    assert!(config.analyze.save_html);
    assert_eq!(config.analyze.ready_timeout_secs, 30);
    assert_eq!(config.analyze.quiesce_timeout_secs, 5);
    assert!(config.known_elements.is_empty());
}

#[test]
fn config_loads_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("selector-synth.yaml");
    std::fs::write(
        &path,
        "webdriver:\n  endpoint: http://grid:4444\n  headless: true\nanalyze:\n  group: checkout\n",
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.webdriver.endpoint, "http://grid:4444");
    assert!(config.webdriver.headless);
    assert_eq!(config.analyze.group, "checkout");
    assert_eq!(config.analyze.output_dir, "data/page_analyze", "Unset keys keep defaults");
}

#[test]
fn config_parses_known_elements() {
    let yaml = r#"
known_elements:
  - full_xpath: "//*[@id='app']/nav/a[1]"
    category: TOPBAR
  - full_xpath: "//table/tr[2]/td"
    category: TABLE
"#;
    let config = parse_config(yaml);
    assert_eq!(config.known_elements.len(), 2);

    let known = config.known_elements();
    assert_eq!(known.get("//*[@id='app']/nav/a[1]"), Some(Category::Topbar));
    assert_eq!(known.get("//table/tr[2]/td"), Some(Category::Table));
    assert_eq!(known.get("//missing"), None);
}

#[test]
fn config_malformed_falls_back_to_defaults() {
    let config = parse_config("analyze: [not, a, map");
    assert_eq!(config.analyze.group, "detailed_analysis");

    let config = parse_config("known_elements:\n  - full_xpath: //a\n    category: NOPE\n");
    assert!(config.known_elements.is_empty(), "Unknown category rejects the whole file");
}

// ============================================================================
// Precedence: CLI > config file > defaults
// ============================================================================

#[test]
fn webdriver_cli_overrides_config() {
    let mut config = AppConfig::default();
    config.webdriver.endpoint = "http://grid:4444".into();

    let cli = Cli::parse_from(["selector-synth", "analyze", "--url", "u"]);
    let settings = resolve_webdriver(&cli, &config);
    assert_eq!(settings.endpoint, "http://grid:4444");
    assert!(!settings.headless);

    let cli = Cli::parse_from([
        "selector-synth",
        "--webdriver",
        "http://local:9515",
        "--headless",
        "analyze",
        "--url",
        "u",
    ]);
    let settings = resolve_webdriver(&cli, &config);
    assert_eq!(settings.endpoint, "http://local:9515");
    assert!(settings.headless);
}

#[test]
fn analyze_settings_precedence() {
    let mut config = AppConfig::default();
    config.analyze.output_dir = "from_config".into();
    config.analyze.ready_timeout_secs = 12;

    let settings = resolve_analyze(&config, None, None, None, false, None);
    assert_eq!(settings.output_dir, "from_config");
    assert_eq!(settings.group, "detailed_analysis");
    assert!(settings.save_html);
    assert_eq!(settings.ready_timeout_secs, 12);

    let settings = resolve_analyze(
        &config,
        Some("cli_dir"),
        Some("x.csv"),
        None,
        true,
        Some("grp"),
    );
    assert_eq!(settings.output_dir, "cli_dir");
    assert_eq!(settings.group, "grp");
    assert!(!settings.save_html);
    assert_eq!(settings.csv_output.as_deref(), Some("x.csv"));
    assert!(settings.json_output.is_none());
}

#[test]
fn readiness_follows_config_timeouts() {
    let mut config = AppConfig::default();
    config.analyze.ready_timeout_secs = 3;
    config.analyze.quiesce_timeout_secs = 0;

    let readiness = resolve_readiness(&config);
    assert_eq!(readiness.ready_timeout, Duration::from_secs(3));
    assert_eq!(readiness.quiesce_timeout, Duration::from_secs(0));
}

#[test]
fn config_save_html_false_cannot_be_reenabled_by_cli() {
    let mut config = AppConfig::default();
    config.analyze.save_html = false;
    let settings = resolve_analyze(&config, None, None, None, false, None);
    assert!(!settings.save_html);
}
