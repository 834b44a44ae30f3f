use clap::Args;
use turnstile_app::identities::records::IdentityId;

use crate::cli::settings::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ShowIdentityArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Identity to show
    #[arg(long)]
    id: i64,
}

pub(crate) async fn run(args: ShowIdentityArgs) -> Result<(), String> {
    let context = args.store.context().await?;

    let identity = context
        .identities
        .get_identity(IdentityId::from_i64(args.id))
        .await
        .map_err(|error| format!("failed to load identity {}: {error}", args.id))?;

    println!("identity_id: {}", identity.id);
    println!("email: {}", identity.email);
    println!("name: {} {}", identity.first_name, identity.last_name);
    println!("active: {}", identity.active);
    println!("created_at: {}", identity.created_at);
    println!("updated_at: {}", identity.updated_at);

    Ok(())
}
