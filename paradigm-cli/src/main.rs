use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use paradigm_core::config;

mod actions;
use crate::actions::*;

/// A text editor with inline LLM-resolved triggers.
#[derive(Parser, Debug)]
#[command(
    name = "paradigm",
    version,
    about,
    // Show help when you forget a subcommand
    arg_required_else_help = true,
    // Make version available to subcommands automatically
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug, Default)]
struct GlobalOpts {
    /// TOML or JSON file applied on top of the global config
    #[arg(short = 'C', long = "config-file", global = true)]
    config_file: Option<String>,

    /// Completion gateway endpoint to resolve triggers against
    #[arg(short = 'g', long = "gateway-url", global = true)]
    gateway_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive editor
    ///
    /// Examples:
    ///   paradigm edit              # start from an empty document
    ///   paradigm edit notes.txt    # edit a file in place
    Edit(EditCmd),

    /// Resolve every @paradigm trigger in a single piece of text and print
    /// the result
    ///
    /// Examples:
    ///   paradigm resolve "Sony was founded in @paradigm."
    ///   cat draft.txt | paradigm resolve
    Resolve(ResolveCmd),

    /// Run the completion gateway server
    Gateway(GatewayCmd),
}

#[derive(ClapArgs, Debug)]
struct EditCmd {
    /// File to edit; saved back in place on Ctrl+S. Omit to edit a scratch
    /// document that prints to stdout on save.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct ResolveCmd {
    /// The text to resolve; use '-' or pipe stdin instead
    #[arg(value_name = "TEXT")]
    text: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct GatewayCmd {
    /// Address to bind, e.g. 127.0.0.1:8787; defaults to the configured one
    #[arg(short = 'b', long)]
    bind: Option<String>,
}

fn read_all_stdin() -> Result<String, std::io::Error> {
    use std::io::{self, Read};
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn resolve_text(cmd: &ResolveCmd) -> Result<String, Box<dyn std::error::Error>> {
    match cmd.text.as_deref() {
        Some("-") => {
            let text = read_all_stdin()?;
            if text.trim().is_empty() {
                return Err("stdin is empty; provide TEXT or pipe content".into());
            }
            Ok(text)
        }
        Some(positional) => Ok(positional.to_owned()),
        None => {
            if !std::io::stdin().is_terminal() {
                let text = read_all_stdin()?;
                if text.trim().is_empty() {
                    return Err("stdin is empty; provide TEXT or pipe content".into());
                }
                Ok(text)
            } else {
                Err("no TEXT provided; pass text, use '-', or pipe stdin".into())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut cfg = config::load_config()?;

    if let Some(config_file) = cli.global.config_file {
        let layer = config::load_layer_from_path(std::path::Path::new(&config_file))?;
        cfg.apply_layer(&layer);
    }

    if let Some(url) = cli.global.gateway_url {
        cfg.gateway_url = url;
    }

    config::set_config(cfg);

    match cli.command {
        Commands::Edit(EditCmd { file }) => edit(file).await,

        Commands::Resolve(cmd) => {
            let text = resolve_text(&cmd)?;
            resolve(text).await
        }

        Commands::Gateway(GatewayCmd { bind }) => gateway(bind).await,
    }
}
