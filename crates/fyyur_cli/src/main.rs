//! Command-line presenter for the booking directory.
//!
//! # Responsibility
//! - Map one subcommand to one core use case over one connection.
//! - Print read results as JSON and write results as flash-style envelopes.
//!
//! # Invariants
//! - Every invocation opens and closes its own connection.
//! - Failures exit with status 1 and a JSON envelope with `ok: false`.

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use fyyur_core::{
    decode_artist, decode_show, decode_venue, init_logging, with_connection, AppConfig,
    ArtistId, ArtistService, FormData, RepoError, RepoResult, ShowService, VenueId,
    VenueService,
};
use log::{error, info};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Fyyur venue and artist booking directory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database file; overrides config and environment
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List venues grouped by city and state
    Venues,
    /// Show one venue with its past and upcoming shows
    Venue { id: VenueId },
    /// List artists
    Artists,
    /// Show one artist with its past and upcoming shows
    Artist { id: ArtistId },
    /// List every show
    Shows,
    /// Search venues by name
    SearchVenues { term: String },
    /// Search artists by name
    SearchArtists { term: String },
    /// Create a venue from submitted fields
    CreateVenue(FieldArgs),
    /// Create an artist from submitted fields
    CreateArtist(FieldArgs),
    /// Create a show from submitted fields
    CreateShow(FieldArgs),
    /// Replace every field of a venue
    EditVenue {
        id: VenueId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Replace every field of an artist
    EditArtist {
        id: ArtistId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a venue that hosts no shows
    DeleteVenue { id: VenueId },
}

#[derive(Debug, Args)]
struct FieldArgs {
    /// Submitted form field as `key=value`; repeat for multi-valued keys
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

impl FieldArgs {
    fn form(&self) -> FormData {
        self.fields.iter().cloned().collect()
    }
}

/// Write result envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ActionResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid field `{raw}`; expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid field `{raw}`; key cannot be empty"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn submitted_name(fields: &FieldArgs) -> String {
    fields.form().get("name").unwrap_or_default().trim().to_string()
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Venues => "venues",
            Self::Venue { .. } => "venue",
            Self::Artists => "artists",
            Self::Artist { .. } => "artist",
            Self::Shows => "shows",
            Self::SearchVenues { .. } => "search_venues",
            Self::SearchArtists { .. } => "search_artists",
            Self::CreateVenue(_) => "create_venue",
            Self::CreateArtist(_) => "create_artist",
            Self::CreateShow(_) => "create_show",
            Self::EditVenue { .. } => "edit_venue",
            Self::EditArtist { .. } => "edit_artist",
            Self::DeleteVenue { .. } => "delete_venue",
        }
    }

    /// Flash message shown when a write fails; reads report the raw error.
    fn failure_message(&self) -> Option<String> {
        match self {
            Self::CreateVenue(fields) => Some(format!(
                "An error occurred. Venue {} could not be listed.",
                submitted_name(fields)
            )),
            Self::CreateArtist(fields) => Some(format!(
                "An error occurred. Artist {} could not be listed.",
                submitted_name(fields)
            )),
            Self::CreateShow(_) => Some("An error occurred. Show could not be listed.".to_string()),
            Self::EditVenue { fields, .. } => Some(format!(
                "An error occurred. Venue {} could not be updated.",
                submitted_name(fields)
            )),
            Self::EditArtist { fields, .. } => Some(format!(
                "An error occurred. Artist {} could not be updated.",
                submitted_name(fields)
            )),
            Self::DeleteVenue { id } => Some(format!(
                "An error occurred. Venue {id} could not be deleted."
            )),
            _ => None,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> RepoResult<String> {
    serde_json::to_string_pretty(value).map_err(|err| RepoError::InvalidData(err.to_string()))
}

fn execute(conn: &Connection, command: &Command) -> RepoResult<String> {
    let now = Utc::now();
    let venues = VenueService::sqlite(conn);
    let artists = ArtistService::sqlite(conn);
    let shows = ShowService::sqlite(conn);

    match command {
        Command::Venues => to_json(&venues.group_by_area_at(now)?),
        Command::Venue { id } => to_json(&venues.get_detail_at(*id, now)?),
        Command::Artists => to_json(&artists.list_artists()?),
        Command::Artist { id } => to_json(&artists.get_detail_at(*id, now)?),
        Command::Shows => to_json(&shows.list_shows()?),
        Command::SearchVenues { term } => to_json(&venues.search_at(term, now)?),
        Command::SearchArtists { term } => to_json(&artists.search_at(term, now)?),
        Command::CreateVenue(fields) => {
            let profile = decode_venue(&fields.form())?;
            let id = venues.create_venue(&profile)?;
            to_json(&ActionResponse::success(
                format!("Venue {} was successfully listed!", profile.name),
                Some(id.to_string()),
            ))
        }
        Command::CreateArtist(fields) => {
            let profile = decode_artist(&fields.form())?;
            let id = artists.create_artist(&profile)?;
            to_json(&ActionResponse::success(
                format!("Artist {} was successfully listed!", profile.name),
                Some(id.to_string()),
            ))
        }
        Command::CreateShow(fields) => {
            let draft = decode_show(&fields.form())?;
            let id = shows.create_show(&draft)?;
            to_json(&ActionResponse::success(
                "Show was successfully listed!",
                Some(id.to_string()),
            ))
        }
        Command::EditVenue { id, fields } => {
            let profile = decode_venue(&fields.form())?;
            venues.update_venue(*id, &profile)?;
            to_json(&ActionResponse::success(
                format!("Venue {} was successfully updated!", profile.name),
                Some(id.to_string()),
            ))
        }
        Command::EditArtist { id, fields } => {
            let profile = decode_artist(&fields.form())?;
            artists.update_artist(*id, &profile)?;
            to_json(&ActionResponse::success(
                format!("Artist {} was successfully updated!", profile.name),
                Some(id.to_string()),
            ))
        }
        Command::DeleteVenue { id } => {
            venues.delete_venue(*id)?;
            to_json(&ActionResponse::success(
                "Venue was successfully deleted!",
                Some(id.to_string()),
            ))
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, String> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

fn start_logging(config: &AppConfig) -> Result<(), String> {
    let Some(log_dir) = &config.log_dir else {
        return Ok(());
    };
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", log_dir.display()))?;
    init_logging(&config.log_level, log_dir)
}

/// Log line for a failed command. Carries codes only, never submitted text.
fn failure_event(command: &Command, err: &RepoError) -> String {
    format!(
        "event=cli_command module=cli status=error command={} error_code={}",
        command.name(),
        err.error_code()
    )
}

/// Runs one command and returns the text to print.
///
/// The error side is already a user-facing message.
fn run(cli: &Cli) -> Result<String, String> {
    let config = resolve_config(cli)?;
    start_logging(&config)?;

    let command = &cli.command;
    info!("event=cli_command module=cli status=start command={}", command.name());
    with_connection(&config.database_path, |conn| execute(conn, command)).map_err(
        |err: RepoError| {
            error!("{}", failure_event(command, &err));
            match command.failure_message() {
                Some(flash) => format!("{flash} {err}"),
                None => err.to_string(),
            }
        },
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            let envelope = ActionResponse::failure(message);
            match serde_json::to_string_pretty(&envelope) {
                Ok(json) => println!("{json}"),
                Err(_) => eprintln!("{}", envelope.message),
            }
            ExitCode::FAILURE
        }
    }
}
