use clap::Args;
use turnstile_app::identities::data::NewIdentity;

use crate::cli::settings::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateIdentityArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Login email
    #[arg(long)]
    email: String,

    /// Given name
    #[arg(long, default_value = "")]
    first_name: String,

    /// Family name
    #[arg(long, default_value = "")]
    last_name: String,

    /// Initial password
    #[arg(long, env = "IDENTITY_PASSWORD", hide_env_values = true)]
    password: String,

    /// Create the identity without the ability to log in
    #[arg(long)]
    inactive: bool,
}

pub(crate) async fn run(args: CreateIdentityArgs) -> Result<(), String> {
    let context = args.store.context().await?;

    let identity = context
        .identities
        .create_identity(NewIdentity {
            email: args.email,
            first_name: args.first_name,
            last_name: args.last_name,
            password: args.password,
            active: !args.inactive,
        })
        .await
        .map_err(|error| format!("failed to create identity: {error}"))?;

    println!("identity_id: {}", identity.id);
    println!("email: {}", identity.email);
    println!("active: {}", identity.active);

    Ok(())
}
