use clap::Args;
use turnstile_app::identities::records::IdentityId;

use crate::cli::settings::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct DeactivateIdentityArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Identity to deactivate
    #[arg(long)]
    id: i64,
}

pub(crate) async fn run(args: DeactivateIdentityArgs) -> Result<(), String> {
    let context = args.store.context().await?;

    let existed = context
        .auth
        .deactivate_and_revoke(IdentityId::from_i64(args.id))
        .await
        .map_err(|error| format!("failed to deactivate identity: {error}"))?;

    if !existed {
        return Err(format!("identity {} not found", args.id));
    }

    println!("identity {} deactivated; its tokens are revoked", args.id);

    Ok(())
}
