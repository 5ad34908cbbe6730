use clap::Parser;
use selector_synth::cli::commands::{cmd_analyze, cmd_find, parse_element_types};
use selector_synth::cli::config::{
    Cli, Commands, load_config, resolve_analyze, resolve_readiness, resolve_webdriver,
};
use selector_synth::collect::finder::FindOptions;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());
    let webdriver = resolve_webdriver(&cli, &config);

    match &cli.command {
        Commands::Analyze {
            url,
            output_dir,
            csv_output,
            json_output,
            no_save_html,
            group,
        } => {
            let settings = resolve_analyze(
                &config,
                output_dir.as_deref(),
                csv_output.as_deref(),
                json_output.as_deref(),
                *no_save_html,
                group.as_deref(),
            );
            let outcome = cmd_analyze(url, &webdriver, &settings, config.known_elements())?;
            if !outcome.exported() {
                std::process::exit(1);
            }
        }
        Commands::Find {
            url,
            text,
            element_types,
            exact_match,
            group,
        } => {
            let options = FindOptions {
                element_types: parse_element_types(element_types),
                exact_match: *exact_match,
                group: group.clone(),
            };
            let readiness = resolve_readiness(&config);
            if cmd_find(url, &webdriver, text, &options, &readiness)?.is_none() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
