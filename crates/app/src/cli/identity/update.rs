use clap::Args;
use turnstile_app::identities::{data::IdentityUpdate, records::IdentityId};

use crate::cli::settings::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct UpdateIdentityArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Identity to update
    #[arg(long)]
    pub(super) id: i64,

    /// New login email
    #[arg(long)]
    pub(super) email: Option<String>,

    /// New given name
    #[arg(long)]
    first_name: Option<String>,

    /// New family name
    #[arg(long)]
    last_name: Option<String>,

    /// `true` reactivates the identity; `false` deactivates it and revokes its tokens
    #[arg(long)]
    pub(super) active: Option<bool>,
}

pub(crate) async fn run(args: UpdateIdentityArgs) -> Result<(), String> {
    let context = args.store.context().await?;
    let id = IdentityId::from_i64(args.id);

    // Unset flags keep the stored value.
    let current = context
        .identities
        .get_identity(id)
        .await
        .map_err(|error| format!("failed to load identity {}: {error}", args.id))?;

    let identity = context
        .identities
        .update_identity(
            id,
            IdentityUpdate {
                email: args.email.unwrap_or(current.email),
                first_name: args.first_name.unwrap_or(current.first_name),
                last_name: args.last_name.unwrap_or(current.last_name),
                active: args.active.unwrap_or(current.active),
            },
        )
        .await
        .map_err(|error| format!("failed to update identity {}: {error}", args.id))?;

    println!("identity_id: {}", identity.id);
    println!("email: {}", identity.email);
    println!("name: {} {}", identity.first_name, identity.last_name);
    println!("active: {}", identity.active);

    Ok(())
}
