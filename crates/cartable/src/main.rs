//! `cartab` - CLI for cartable
//!
//! This binary lists, searches and edits the car table, and opens the
//! interactive browser.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;
use tracing::{info, warn};

use cartable::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ListCommand,
    OutputFormat,
};
use cartable::logging::Verbosity;
use cartable::table::Mutation;
use cartable::{init_logging, render, tui};
use cartable::{CarStore, CarTable, Config, Error, HttpSeed, Pager, SnapshotStore, Storage};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Log lines would draw over the browser, so keep it to errors there
    let verbosity = match cli.command {
        Command::Browse if !cli.verbosity().is_verbose() => Verbosity::Quiet,
        _ => cli.verbosity(),
    };
    init_logging(verbosity);

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::List(list_cmd) => handle_list(&config, &list_cmd).await,
        Command::Add(add_cmd) => handle_add(&config, &add_cmd).await,
        Command::Edit(edit_cmd) => handle_edit(&config, &edit_cmd).await,
        Command::Delete(delete_cmd) => handle_delete(&config, &delete_cmd).await,
        Command::Browse => handle_browse(&config).await,
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Reset(reset_cmd) => handle_reset(&config, reset_cmd.yes),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_store(config: &Config) -> cartable::Result<CarStore> {
    let storage = Storage::open(config.database_path())?;
    Ok(CarStore::new(storage, config.storage.snapshot_key.clone()))
}

async fn open_table(config: &Config) -> cartable::Result<CarTable<CarStore>> {
    let store = open_store(config)?;
    let seed = HttpSeed::from_config(config)?;
    CarTable::initialize(store, &seed, Pager::new(config.table.page_size)).await
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> CliResult {
    let mut table = open_table(config).await?;
    table.set_search(cmd.search.as_str());
    if !table.go_to_page(cmd.page) {
        warn!(
            "Page {} is out of range (1-{}), showing page 1",
            cmd.page,
            table.page_count().max(1)
        );
    }

    let visible = table.visible();
    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&visible)?),
        OutputFormat::Plain => print!("{}", render::plain(&visible)),
        OutputFormat::Table => {
            print!("{}", render::table(&visible));
            println!();
            println!(
                "{}",
                render::footer(
                    table.page(),
                    table.page_count(),
                    table.filtered().len(),
                    table.cars().len()
                )
            );
        }
    }
    Ok(())
}

async fn handle_add(config: &Config, cmd: &AddCommand) -> CliResult {
    let mut table = open_table(config).await?;
    table.open_add();
    for (field, value) in cmd.fields() {
        table.set_field(field, value)?;
    }
    report(&table.save()?);
    Ok(())
}

async fn handle_edit(config: &Config, cmd: &EditCommand) -> CliResult {
    let changes = cmd.changes();
    if changes.is_empty() {
        println!("Nothing to change. Pass --color, --price or --availability.");
        return Ok(());
    }

    let mut table = open_table(config).await?;
    table.open_edit(&cmd.vin)?;
    for (field, value) in changes {
        table.set_field(field, value)?;
    }
    report(&table.save()?);
    Ok(())
}

async fn handle_delete(config: &Config, cmd: &DeleteCommand) -> CliResult {
    let mut table = open_table(config).await?;
    table.open_delete(&cmd.vin)?;

    if !cmd.yes {
        if let cartable::ModalState::Deleting(car) = table.modal() {
            print!("{}", render::table(&[car]));
        }
        println!();
        println!("This will delete the car above.");
        println!("Use --yes to confirm.");
        table.cancel();
        return Ok(());
    }

    report(&table.save()?);
    Ok(())
}

async fn handle_browse(config: &Config) -> CliResult {
    let table = open_table(config).await?;
    let mut browser = tui::Browser::new(table);
    tui::run(&mut browser)?;
    Ok(())
}

fn report(mutation: &Mutation) {
    match mutation {
        Mutation::Added(car) => println!("Added car {}.", car.vin),
        Mutation::Edited(car) => println!("Updated car {}.", car.vin),
        Mutation::Deleted(car) => println!("Deleted car {}.", car.vin),
    }
}

fn handle_status(config: &Config, json: bool) -> CliResult {
    let store = open_store(config)?;
    let stats = store.storage().stats()?;
    let saved = store.storage().get(store.key())?;
    let updated_at = saved.as_ref().and_then(|s| s.updated_at);
    let cars = match store.load() {
        Ok(cars) => cars.map(|c| c.len()),
        Err(e @ Error::CorruptSnapshot { .. }) => {
            warn!("{}", e);
            None
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "snapshot_key": store.key(),
            "cars": cars,
            "updated_at": updated_at,
            "db_size_bytes": stats.db_size_bytes,
            "seed_url": config.seed.url,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("cartab status");
        println!("-------------");
        println!("Database:      {}", config.database_path().display());
        println!("Snapshot key:  {}", store.key());
        match cars {
            Some(count) => println!("Cars:          {count}"),
            None if saved.is_some() => println!("Cars:          unreadable snapshot"),
            None => println!("Cars:          not seeded yet"),
        }
        if let Some(at) = updated_at {
            println!("Last saved:    {}", at.to_rfc3339());
        }
        println!("Database size: {} bytes", stats.db_size_bytes);
        println!("Seed URL:      {}", config.seed.url);
    }
    Ok(())
}

fn handle_reset(config: &Config, yes: bool) -> CliResult {
    if !yes {
        println!("This will delete the saved car table; the next run fetches the seed again.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let store = open_store(config)?;
    if store.clear()? {
        info!("Cleared snapshot '{}'", store.key());
        println!("Saved table deleted.");
    } else {
        println!("Nothing to reset.");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Snapshot key:   {}", config.storage.snapshot_key);
                println!();
                println!("[Seed]");
                println!("  URL:            {}", config.seed.url);
                println!("  Timeout (secs): {}", config.seed.timeout_secs);
                println!();
                println!("[Table]");
                println!("  Page size:      {}", config.table.page_size);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
