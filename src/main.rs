use clap::Parser;
use directories::ProjectDirs;
use litslides::{export_deck, init_file_logging, Config, ConfigLoadError, ExportOptions, Presenter, PresenterOptions};
use log::LevelFilter;
use std::{
    env,
    path::{Path, PathBuf},
};

/// Present "How Learning English Literature Improves Our Life" in your terminal.
#[derive(Parser)]
#[command(author, version, about = create_splash())]
struct Cli {
    /// Export the slides into a PDF file rather than presenting them.
    #[clap(short, long)]
    export_pdf: bool,

    /// The directory the PDF file is written to.
    #[clap(short, long)]
    output_directory: Option<PathBuf>,

    /// The path to the configuration file.
    #[clap(short, long)]
    config_file: Option<PathBuf>,

    /// Write logs into this file.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// The minimum level of the logs written into the log file.
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,

    /// Generate a JSON schema for the configuration file.
    #[cfg(feature = "json-schema")]
    #[clap(long)]
    generate_config_file_schema: bool,
}

fn create_splash() -> String {
    let crate_version = env!("CARGO_PKG_VERSION");
    format!(
        r#"
  litslides v{crate_version}
    How learning English literature improves our life, one slide at a time
"#,
    )
}

fn load_config(config_file_path: Option<PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    let explicit = config_file_path.is_some();
    let config_file_path = match config_file_path {
        Some(path) => path,
        None => {
            let configs_path: PathBuf = match env::var("XDG_CONFIG_HOME") {
                Ok(path) => Path::new(&path).join("litslides"),
                Err(_) => {
                    let Some(project_dirs) = ProjectDirs::from("", "", "litslides") else {
                        return Ok(Config::default());
                    };
                    project_dirs.config_dir().into()
                }
            };
            configs_path.join("config.yaml")
        }
    };
    match Config::load(&config_file_path) {
        Ok(config) => Ok(config),
        Err(ConfigLoadError::NotFound) if !explicit => Ok(Config::default()),
        Err(e) => Err(format!("loading {}: {e}", config_file_path.display()).into()),
    }
}

fn make_export_options(cli: &Cli, config: &Config) -> Result<ExportOptions, Box<dyn std::error::Error>> {
    let output_directory = match cli.output_directory.as_ref().or(config.export.output_directory.as_ref()) {
        Some(path) => path.clone(),
        None => env::current_dir()?,
    };
    Ok(ExportOptions { output_directory, font_path: config.export.font_path.clone() })
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "json-schema")]
    if cli.generate_config_file_schema {
        let schema = schemars::schema_for!(Config);
        serde_json::to_writer_pretty(std::io::stdout(), &schema)
            .map_err(|e| format!("failed to write schema: {e}"))?;
        return Ok(());
    }

    if let Some(path) = &cli.log_file {
        init_file_logging(path, cli.log_level)?;
    }
    let config = load_config(cli.config_file.clone())?;
    let export = make_export_options(&cli, &config)?;
    if cli.export_pdf {
        let path = export_deck(&export)?;
        println!("{}", path.display());
    } else {
        let options = PresenterOptions { bindings: config.bindings, export };
        let presenter = Presenter::new(options)?;
        presenter.present()?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
