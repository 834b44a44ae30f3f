use clap::{Args, Subcommand};

mod create;
mod deactivate;
mod delete;
mod list;
mod reset_password;
mod show;
mod update;

#[derive(Debug, Args)]
pub(crate) struct IdentityCommand {
    #[command(subcommand)]
    command: IdentitySubcommand,
}

#[derive(Debug, Subcommand)]
enum IdentitySubcommand {
    /// Create a new identity
    Create(create::CreateIdentityArgs),
    /// List identities ordered by last name
    List(list::ListIdentitiesArgs),
    /// Show one identity
    Show(show::ShowIdentityArgs),
    /// Change email, names or the active flag
    Update(update::UpdateIdentityArgs),
    /// Deactivate an identity and revoke its tokens
    Deactivate(deactivate::DeactivateIdentityArgs),
    /// Set a new password and revoke existing tokens
    ResetPassword(reset_password::ResetPasswordArgs),
    /// Delete an identity and its tokens
    Delete(delete::DeleteIdentityArgs),
}

pub(crate) async fn run(command: IdentityCommand) -> Result<(), String> {
    match command.command {
        IdentitySubcommand::Create(args) => create::run(args).await,
        IdentitySubcommand::List(args) => list::run(args).await,
        IdentitySubcommand::Show(args) => show::run(args).await,
        IdentitySubcommand::Update(args) => update::run(args).await,
        IdentitySubcommand::Deactivate(args) => deactivate::run(args).await,
        IdentitySubcommand::ResetPassword(args) => reset_password::run(args).await,
        IdentitySubcommand::Delete(args) => delete::run(args).await,
    }
}
