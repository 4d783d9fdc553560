//! `alumnet users` subcommands.

use alumnet_core::models::UserId;
use alumnet_core::Store;

use crate::cli::UsersCommand;
use crate::commands::common::{format_user_line, print_notifications};
use crate::error::CliError;

pub async fn run(store: &Store, command: UsersCommand) -> Result<(), CliError> {
    match command {
        UsersCommand::List { json } => {
            let users = store.fetch_users().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                println!("The directory is empty.");
            } else {
                for user in &users {
                    let online = store.is_user_online(&user.id);
                    println!("{}", format_user_line(user, online));
                }
            }
        }
        UsersCommand::Online { id, off } => {
            let id = UserId::new(id);
            store.fetch_users().await?;
            store.set_user_online(id, !off).await?;
            let presence = if off { "offline" } else { "online" };
            println!("User #{id} flagged {presence}");
        }
        UsersCommand::Delete { id } => {
            store.fetch_users().await?;
            store.delete_user(UserId::new(id)).await?;
            println!("Deleted user #{id}");
            print_notifications(store);
        }
    }
    Ok(())
}
