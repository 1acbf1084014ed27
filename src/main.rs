use clap::{CommandFactory, Parser, error::ErrorKind};
use directories::ProjectDirs;
use pitchterm::{
    CommandListener, Config, ConfigLoadError, DeckTheme, DeckThemeRegistry, Presenter, PresenterOptions,
};
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_THEME: &str = "dark";

/// Present the Termforge pitch deck from your terminal.
#[derive(Parser)]
#[command(author, version, about = create_splash())]
struct Cli {
    /// The theme to use.
    #[clap(short, long)]
    theme: Option<String>,

    /// List all supported themes.
    #[clap(long)]
    list_themes: bool,

    /// Generate a JSON schema for the configuration file.
    #[cfg(feature = "json-schema")]
    #[clap(long)]
    generate_config_schema: bool,

    /// The path to the configuration file.
    #[clap(short, long)]
    config_file: Option<String>,
}

fn create_splash() -> String {
    let crate_version = env!("CARGO_PKG_VERSION");

    format!(
        r#"
  ┌─┐┬┌┬┐┌─┐┬ ┬┌┬┐┌─┐┬─┐┌┬┐
  ├─┘│ │ │  ├─┤ │ ├┤ ├┬┘│││
  ┴  ┴ ┴ └─┘┴ ┴ ┴ └─┘┴└─┴ ┴ v{crate_version}
    The Termforge pitch deck
                    @termforge/pitchterm
"#,
    )
}

#[derive(Default)]
struct Customizations {
    config: Config,
    themes: DeckThemeRegistry,
}

fn load_customizations(config_file_path: Option<PathBuf>) -> Result<Customizations, Box<dyn std::error::Error>> {
    let configs_path: PathBuf = match env::var("XDG_CONFIG_HOME") {
        Ok(path) => Path::new(&path).join("pitchterm"),
        Err(_) => {
            let Some(project_dirs) = ProjectDirs::from("", "", "pitchterm") else {
                return Ok(Default::default());
            };
            project_dirs.config_dir().into()
        }
    };
    let themes = load_themes(&configs_path)?;
    let default_config = config_file_path.is_none();
    let config_file_path = config_file_path.unwrap_or_else(|| configs_path.join("config.yaml"));
    let config = match Config::load(&config_file_path) {
        Ok(config) => config,
        // Not having a config file is fine unless the user pointed us at a specific one.
        Err(ConfigLoadError::NotFound) if default_config => Config::default(),
        Err(e) => return Err(e.into()),
    };
    Ok(Customizations { config, themes })
}

fn load_themes(config_path: &Path) -> Result<DeckThemeRegistry, Box<dyn std::error::Error>> {
    let themes_path = config_path.join("themes");

    let mut themes = DeckThemeRegistry::default();
    themes.register_from_directory(&themes_path)?;
    Ok(themes)
}

fn load_default_theme(config: &Config, themes: &DeckThemeRegistry, cli: &Cli) -> DeckTheme {
    let default_theme_name =
        cli.theme.as_ref().or(config.defaults.theme.as_ref()).map(|s| s.as_str()).unwrap_or(DEFAULT_THEME);
    let Some(default_theme) = themes.load_by_name(default_theme_name) else {
        let valid_themes = themes.theme_names().join(", ");
        let error_message = format!("invalid theme name, valid themes are: {valid_themes}");
        Cli::command().error(ErrorKind::InvalidValue, error_message).exit();
    };
    default_theme
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "json-schema")]
    if cli.generate_config_schema {
        let schema = schemars::schema_for!(Config);
        serde_json::to_writer_pretty(std::io::stdout(), &schema).map_err(|e| format!("failed to write schema: {e}"))?;
        return Ok(());
    }

    let Customizations { config, themes } = load_customizations(cli.config_file.clone().map(PathBuf::from))?;
    if cli.list_themes {
        for theme in themes.theme_names() {
            println!("{theme}");
        }
        return Ok(());
    }

    let theme = load_default_theme(&config, &themes, &cli);
    let commands = CommandListener::new(config.bindings.clone())?;
    let options = PresenterOptions { bindings: config.bindings, scrolling: config.scrolling };
    let presenter = Presenter::new(&theme, commands, options);
    presenter.present()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
