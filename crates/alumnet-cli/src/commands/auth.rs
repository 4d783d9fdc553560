//! `alumnet auth` subcommands.

use alumnet_core::models::Credentials;
use alumnet_core::Store;

use crate::cli::AuthCommand;
use crate::error::CliError;

pub async fn run(store: &Store, command: AuthCommand) -> Result<(), CliError> {
    match command {
        AuthCommand::Login { email, password } => {
            let payload = store.login(Credentials { email, password }).await?;
            let role = if store.session().is_admin {
                "admin"
            } else {
                "member"
            };
            println!("Signed in as {} ({role})", payload.user.name);
        }
        AuthCommand::Logout => {
            let session = store.session();
            if !session.is_authenticated {
                return Err(CliError::NotSignedIn);
            }
            store.logout().await?;
            println!("Signed out.");
        }
        AuthCommand::Status => {
            let session = store.session();
            match session.user {
                Some(user) => {
                    let role = if session.is_admin { "admin" } else { "member" };
                    println!("Signed in as {} <{}> ({role})", user.name, user.email);
                }
                None => println!("Not signed in."),
            }
        }
    }
    Ok(())
}
