use clap::Args;

use crate::cli::settings::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct SweepTokensArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: SweepTokensArgs) -> Result<(), String> {
    let context = args.store.context().await?;

    let removed = context
        .auth
        .sweep_expired_tokens()
        .await
        .map_err(|error| format!("failed to sweep tokens: {error}"))?;

    println!("removed {removed} expired token(s)");

    Ok(())
}
