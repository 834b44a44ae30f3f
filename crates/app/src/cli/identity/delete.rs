use clap::Args;
use turnstile_app::identities::records::IdentityId;

use crate::cli::settings::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct DeleteIdentityArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Identity to delete
    #[arg(long)]
    id: i64,
}

pub(crate) async fn run(args: DeleteIdentityArgs) -> Result<(), String> {
    let context = args.store.context().await?;

    context
        .identities
        .delete_identity(IdentityId::from_i64(args.id))
        .await
        .map_err(|error| format!("failed to delete identity {}: {error}", args.id))?;

    println!("identity {} deleted with its tokens", args.id);

    Ok(())
}
