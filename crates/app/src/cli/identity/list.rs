use clap::Args;

use crate::cli::settings::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ListIdentitiesArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ListIdentitiesArgs) -> Result<(), String> {
    let context = args.store.context().await?;

    let identities = context
        .identities
        .list_identities()
        .await
        .map_err(|error| format!("failed to list identities: {error}"))?;

    if identities.is_empty() {
        println!("no identities found");
        return Ok(());
    }

    for identity in identities {
        println!("identity_id: {}", identity.id);
        println!("email: {}", identity.email);
        println!("name: {} {}", identity.first_name, identity.last_name);
        println!("active: {}", identity.active);
        println!("created_at: {}", identity.created_at);
        println!();
    }

    Ok(())
}
