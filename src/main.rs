mod action;
mod auth;
mod catalog;
mod config;
mod controller;
mod error;
mod marvel;
mod projection;
mod types;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::config::Config;
use crate::controller::Controller;
use crate::marvel::MarvelCatalog;
use crate::projection::Projection;

#[derive(Parser)]
#[command(name = "heroes", version, about = "Browse the Marvel character catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List characters, loading another page each time the end is reached
    List {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Records per page (defaults to the configured page size)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,
    },
    /// Show one character, paging through the catalog until it turns up
    Show {
        id: u64,
        /// Give up after this many pages
        #[arg(long, default_value_t = 10)]
        pages: usize,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    let credentials = auth::load_credentials(&config.api)?;
    let catalog = Arc::new(MarvelCatalog::new(&config, credentials)?);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    match cli.command {
        Command::List { pages, page_size } => {
            let page_size = page_size.unwrap_or(config.list.page_size);
            let mut controller = Controller::new(catalog, page_size, action_tx);
            browse(&mut controller, &mut action_rx, pages, |_| false).await;
            controller.update(Action::Dispose);
            tracing::debug!(
                records = controller.items().len(),
                next_offset = controller.next_offset(),
                "listing finished"
            );

            for record in controller.items() {
                println!("{:>8}  {}", record.id, record.name);
            }
            if let Some(error) = controller.last_error() {
                eprintln!("{}", error);
            }
        }
        Command::Show {
            id,
            pages,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(config.list.page_size);
            let mut controller = Controller::new(catalog, page_size, action_tx);
            let view = browse(&mut controller, &mut action_rx, pages, |view| {
                view.records.iter().any(|r| r.id == id)
            })
            .await;
            controller.update(Action::Dispose);

            let Some(record) = controller.record(id) else {
                if let Some(error) = &view.error {
                    eprintln!("{}", error);
                }
                return Err(format!("Character {} not found", id).into());
            };

            println!("{}", record.name);
            println!("{}", record.image_url);
            println!();
            println!("{}", record.display_description());
        }
    }

    Ok(())
}

/// Plays the list screen: attaches the controller, then keeps reporting the
/// last record as visible until `max_pages` pages have landed, `done` is
/// satisfied, the catalog runs dry, or an error is shown.
async fn browse<F>(
    controller: &mut Controller,
    action_rx: &mut mpsc::UnboundedReceiver<Action>,
    max_pages: usize,
    mut done: F,
) -> Projection
where
    F: FnMut(&Projection) -> bool,
{
    let mut projection = controller.subscribe();
    let mut pages = 0;

    controller.update(Action::Attach);

    loop {
        tokio::select! {
            Some(action) = action_rx.recv() => {
                controller.update(action);
            }
            Ok(()) = projection.changed() => {
                let view = projection.borrow_and_update().clone();
                if controller.is_loading() {
                    continue;
                }

                pages += 1;
                if view.error.is_some()
                    || done(&view)
                    || pages >= max_pages
                    || controller.phase().is_exhausted()
                {
                    return view;
                }

                match view.last_index() {
                    Some(last) => controller.update(Action::NearEnd(last)),
                    None => return view,
                }
            }
            else => break,
        }
    }

    controller.projection()
}
