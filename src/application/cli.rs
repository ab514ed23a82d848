#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::StoreName;
use crate::infrastructure::backends::BackendManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn print_models() -> Result<()> {
    let models = BackendManager::get().list_models().await?;
    let res = models
        .iter()
        .enumerate()
        .map(|(idx, model)| {
            let n = idx + 1;
            return format!("- ({n}) {model}");
        })
        .collect::<Vec<String>>();

    println!("{}", res.join("\n"));
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_serve() -> Command {
    return Command::new("serve").about("Start the chat web server. This is the default command.");
}

fn subcommand_models() -> Command {
    return Command::new("models").about("List all models available from the OpenAI API.");
}

fn arg_global(key: ConfigKey, env: &'static str, help: String) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("chatgui")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .subcommand(subcommand_serve())
        .subcommand(subcommand_models())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .arg(
            arg_global(
                ConfigKey::ConfigFile,
                "CHATGUI_CONFIG_FILE",
                format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)),
            )
            .short('c'),
        )
        .arg(arg_global(
            ConfigKey::SettingsFile,
            "CHATGUI_SETTINGS_FILE",
            format!("Path to the JSON settings file with sidebar, default model, temperature slider and bucket name. [default: {}]", Config::default(ConfigKey::SettingsFile)),
        ))
        .arg(
            arg_global(
                ConfigKey::Address,
                "CHATGUI_ADDRESS",
                format!("Address the web server listens on. [default: {}]", Config::default(ConfigKey::Address)),
            )
            .short('a'),
        )
        .arg(
            arg_global(
                ConfigKey::Models,
                "CHATGUI_MODELS",
                format!("Comma separated models offered in the sidebar. [default: {}]", Config::default(ConfigKey::Models)),
            )
            .short('m'),
        )
        .arg(arg_global(
            ConfigKey::OpenAiURL,
            "CHATGUI_OPENAI_URL",
            format!("OpenAI API URL. Can be swapped to a compatible proxy. [default: {}]", Config::default(ConfigKey::OpenAiURL)),
        ))
        .arg(arg_global(
            ConfigKey::OpenAiToken,
            "CHATGUI_OPENAI_TOKEN",
            "OpenAI API token.".to_string(),
        ))
        .arg(arg_global(
            ConfigKey::SessionIdleTimeout,
            "CHATGUI_SESSION_IDLE_TIMEOUT",
            format!("Seconds without a request before a browser session is discarded. [default: {}]", Config::default(ConfigKey::SessionIdleTimeout)),
        ))
        .arg(arg_global(
            ConfigKey::BackendHealthCheckTimeout,
            "CHATGUI_BACKEND_HEALTH_CHECK_TIMEOUT",
            format!("Time to wait in milliseconds before timing out when doing a healthcheck for the OpenAI API. [default: {}]", Config::default(ConfigKey::BackendHealthCheckTimeout)),
        ))
        .arg(
            arg_global(
                ConfigKey::TranscriptStore,
                "CHATGUI_TRANSCRIPT_STORE",
                format!("Where transcripts are written when a chat is ended. [default: {}]", Config::default(ConfigKey::TranscriptStore)),
            )
            .value_parser(PossibleValuesParser::new(StoreName::VARIANTS)),
        )
        .arg(arg_global(
            ConfigKey::TranscriptsDir,
            "CHATGUI_TRANSCRIPTS_DIR",
            "Directory holding the chats folder for saved transcripts. [default: current directory]".to_string(),
        ))
        .arg(arg_global(
            ConfigKey::BucketURL,
            "CHATGUI_BUCKET_URL",
            format!("Object storage API URL used by the bucket transcript store. [default: {}]", Config::default(ConfigKey::BucketURL)),
        ))
        .arg(arg_global(
            ConfigKey::BucketToken,
            "CHATGUI_BUCKET_TOKEN",
            "Bearer token for the object storage API.".to_string(),
        ));
}

/// Parses CLI arguments and loads configuration. Returns `true` when the web
/// server should be started.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("serve", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("models", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            print_models().await?;
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
