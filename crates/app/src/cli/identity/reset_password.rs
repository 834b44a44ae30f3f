use clap::Args;
use turnstile_app::identities::records::IdentityId;

use crate::cli::settings::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ResetPasswordArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Identity whose password is replaced
    #[arg(long)]
    id: i64,

    /// New password
    #[arg(long, env = "IDENTITY_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: ResetPasswordArgs) -> Result<(), String> {
    let context = args.store.context().await?;

    context
        .identities
        .reset_password(IdentityId::from_i64(args.id), &args.password)
        .await
        .map_err(|error| format!("failed to reset password: {error}"))?;

    println!("password reset for identity {}; existing tokens revoked", args.id);

    Ok(())
}
