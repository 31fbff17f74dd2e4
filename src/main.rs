use clap::Parser;
use prompt_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_file = cli.config.as_deref();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args, config_file).await,
        Command::Ask(args) => cli::ask::run(args, config_file).await,
    }
}
