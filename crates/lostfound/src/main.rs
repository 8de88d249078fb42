//! `lostfound` - CLI for the lost person report service
//!
//! Runs the web server and offers maintenance commands over the same record
//! file and photo directory.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;

use lostfound::cli::{
    Cli, Command, ConfigCommand, ListCommand, OutputFormat, PruneCommand, ServeCommand,
    ShowCommand,
};
use lostfound::{init_logging, Config, PersonRecord, ReportService};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, serve_cmd).await,
        Command::List(list_cmd) => handle_list(&config, &list_cmd).await,
        Command::Show(show_cmd) => handle_show(&config, &show_cmd).await,
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json).await,
        Command::Prune(prune_cmd) => handle_prune(&config, &prune_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    lostfound::serve(&config).await?;
    Ok(())
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> Result<()> {
    let service = ReportService::from_config(config).await?;
    let records = service.list().await?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Plain => {
            for record in &records {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.id, record.name, record.age, record.location
                );
            }
        }
        OutputFormat::Table => print_table(&records),
    }
    Ok(())
}

fn print_table(records: &[PersonRecord]) {
    let name_width = records
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once(4))
        .max()
        .unwrap_or(4);

    println!("{:>5}  {:<name_width$}  {:<5}  LOCATION", "ID", "NAME", "AGE");
    for record in records {
        println!(
            "{:>5}  {:<name_width$}  {:<5}  {}",
            record.id, record.name, record.age, record.location
        );
    }
    println!();
    println!("{} report(s)", records.len());
}

async fn handle_show(config: &Config, cmd: &ShowCommand) -> Result<()> {
    let service = ReportService::from_config(config).await?;
    let record = service.get(cmd.id).await?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Plain | OutputFormat::Table => {
            println!("Report #{}", record.id);
            println!("  Name:      {}", record.name);
            println!("  Age:       {}", record.age);
            println!("  Location:  {}", record.location);
            println!("  Details:   {}", record.details);
            println!("  Photo:     {}", record.photo);
        }
    }
    Ok(())
}

async fn handle_status(config: &Config, json: bool) -> Result<()> {
    let service = ReportService::from_config(config).await?;
    let records = service.list().await?;
    let photos = service.photos().list().await?;
    let photo_bytes: u64 = photos.iter().map(|p| p.size).sum();

    if json {
        let status = serde_json::json!({
            "reports": records.len(),
            "photos": photos.len(),
            "photo_bytes": photo_bytes,
            "oldest_photo": photos.first().map(|p| p.created),
            "newest_photo": photos.last().map(|p| p.created),
            "data_file": config.storage.data_file,
            "upload_dir": config.upload_dir(),
            "max_photos": config.storage.max_photos,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("lostfound status");
        println!("----------------");
        println!("Reports:       {}", records.len());
        println!("Photos:        {} ({} bytes)", photos.len(), photo_bytes);
        if let (Some(oldest), Some(newest)) = (photos.first(), photos.last()) {
            println!("Oldest photo:  {}", oldest.created.to_rfc3339());
            println!("Newest photo:  {}", newest.created.to_rfc3339());
        }
        println!("Data file:     {}", config.storage.data_file.display());
        println!("Upload dir:    {}", config.upload_dir().display());
        match config.photo_capacity() {
            Some(max) => println!("Photo cap:     {max}"),
            None => println!("Photo cap:     unlimited"),
        }
    }
    Ok(())
}

async fn handle_prune(config: &Config, cmd: &PruneCommand) -> Result<()> {
    let service = ReportService::from_config(config).await?;
    let evicted = service.prune_photos(cmd.max).await?;
    println!("Evicted {evicted} photo(s)");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!("  Max upload bytes:   {}", config.server.max_upload_bytes);
                println!();
                println!("[Storage]");
                println!("  Data file:          {}", config.storage.data_file.display());
                println!("  Static dir:         {}", config.storage.static_dir.display());
                println!("  Upload dir:         {}", config.upload_dir().display());
                println!("  Max photos:         {}", config.storage.max_photos);
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
