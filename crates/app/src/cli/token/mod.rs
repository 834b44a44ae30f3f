use clap::{Args, Subcommand};

mod sweep;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Delete tokens past their expiry
    Sweep(sweep::SweepTokensArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.command {
        TokenSubcommand::Sweep(args) => sweep::run(args).await,
    }
}
