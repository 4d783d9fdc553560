//! `alumnet events` subcommands.

use alumnet_core::models::EventId;
use alumnet_core::Store;

use crate::cli::EventsCommand;
use crate::commands::common::{format_event_line, print_notifications};
use crate::error::CliError;

pub async fn run(store: &Store, command: EventsCommand) -> Result<(), CliError> {
    match command {
        EventsCommand::List { json } => {
            let events = store.fetch_events().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("No events scheduled.");
            } else {
                for event in &events {
                    println!("{}", format_event_line(event));
                }
            }
        }
        EventsCommand::SetStatus {
            id,
            status,
            message,
        } => {
            let status = status.parse().map_err(CliError::Core)?;
            store.fetch_events().await?;
            store
                .set_event_status(EventId::new(id), status, message)
                .await?;
            println!("Event #{id} is now {status}");
            print_notifications(store);
        }
        EventsCommand::Delete { id } => {
            store.fetch_events().await?;
            store.delete_event(EventId::new(id)).await?;
            println!("Deleted event #{id}");
            print_notifications(store);
        }
    }
    Ok(())
}
