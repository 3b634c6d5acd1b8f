use clap::Parser;

/// Command-line interface for the bootstrapper.
#[derive(Parser, Debug)]
#[command(
    name = "zsh-bootstrap",
    about = "Install and configure zsh, oh-my-zsh, plugins and fonts",
    version
)]
pub struct Cli {
    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
