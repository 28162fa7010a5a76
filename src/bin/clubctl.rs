//! clubctl - command-line front end for the club booking service
//!
//! Public commands list, book and cancel seats. `watch` keeps polling the session list
//! like the booking page does. The `admin` subcommands mirror the admin panel.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use club_booking::api::dtos::requests::UpsertSessionRequest;
use club_booking::client::{BookingClient, SessionWatcher};
use club_booking::domain::models::{price::Price, session::SessionDetails};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "clubctl", version, about = "Book and manage club sessions from the terminal")]
struct Cli {
    /// Base URL of the booking service
    #[arg(long, env = "CLUB_BOOKING_URL", default_value = "http://localhost:3000", global = true)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List upcoming sessions and their availability
    Sessions,
    /// Keep printing availability as it changes
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = 3)]
        interval: u64,
    },
    /// Book a seat in a session
    Book {
        #[arg(long)]
        session: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Cancel your booking in a session
    Cancel {
        #[arg(long)]
        session: String,
        #[arg(long)]
        email: String,
    },
    /// Admin operations (sessions CRUD, add/remove bookings)
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand, Debug)]
enum AdminCommands {
    /// List all sessions, including past ones
    Sessions,
    /// Create a session
    Create(SessionArgs),
    /// Replace every field of an existing session
    Update {
        id: String,
        #[command(flatten)]
        fields: SessionArgs,
    },
    /// Delete a session together with its bookings
    Delete { id: String },
    /// Add a booking on behalf of a player
    AddBooking {
        #[arg(long)]
        session: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Remove a booking by id
    RemoveBooking { id: String },
}

/// Times are wall-clock `HH:MM` on `--date`, taken as UTC.
#[derive(Args, Debug)]
struct SessionArgs {
    #[arg(long)]
    name: String,
    /// Session date, YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    start: String,
    #[arg(long)]
    end: String,
    #[arg(long)]
    arrive_by: String,
    /// Cost per player, e.g. 4.00
    #[arg(long)]
    cost: Option<Price>,
    #[arg(long)]
    max_players: Option<i32>,
    #[arg(long)]
    instructions: Option<String>,
}

impl SessionArgs {
    fn into_request(self) -> Result<UpsertSessionRequest> {
        Ok(UpsertSessionRequest {
            name: Some(self.name),
            start_time: Some(utc_datetime(self.date, &self.start)?),
            end_time: Some(utc_datetime(self.date, &self.end)?),
            arrive_by_time: Some(utc_datetime(self.date, &self.arrive_by)?),
            cost_per_player: self.cost,
            max_players: self.max_players,
            instructions: self.instructions,
        })
    }
}

fn utc_datetime(date: NaiveDate, time: &str) -> Result<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .with_context(|| format!("invalid time {:?}, expected HH:MM", time))?;
    Ok(date.and_time(time).and_utc())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = BookingClient::new(&cli.url)?;

    match cli.command {
        Commands::Sessions => print_sessions(&client.list_sessions().await?),
        Commands::Watch { interval } => watch(client, Duration::from_secs(interval.max(1))).await?,
        Commands::Book { session, name, email } => {
            let booking = client.book(&session, &name, &email).await?;
            println!("{} {} is booked in ({})", "✔".green(), booking.player_name, booking.id.dimmed());
        }
        Commands::Cancel { session, email } => {
            let booking = client.cancel(&session, &email).await?;
            println!("{} Booking for {} cancelled", "✔".green(), booking.player_email);
        }
        Commands::Admin(cmd) => admin(&client, cmd).await?,
    }

    Ok(())
}

async fn admin(client: &BookingClient, cmd: AdminCommands) -> Result<()> {
    match cmd {
        AdminCommands::Sessions => print_sessions(&client.admin_list_sessions().await?),
        AdminCommands::Create(fields) => {
            let session = client.create_session(&fields.into_request()?).await?;
            println!("{} Created session {} ({})", "✔".green(), session.name.bold(), session.id);
        }
        AdminCommands::Update { id, fields } => {
            let session = client.update_session(&id, &fields.into_request()?).await?;
            println!("{} Updated session {}", "✔".green(), session.name.bold());
        }
        AdminCommands::Delete { id } => {
            client.delete_session(&id).await?;
            println!("{} Deleted session {}", "✔".green(), id);
        }
        AdminCommands::AddBooking { session, name, email } => {
            let booking = client.add_booking(&session, &name, &email).await?;
            println!("{} Added {} ({})", "✔".green(), booking.player_name, booking.id.dimmed());
        }
        AdminCommands::RemoveBooking { id } => {
            let booking = client.remove_booking(&id).await?;
            println!("{} Removed {} from session {}", "✔".green(), booking.player_name, booking.session_id);
        }
    }
    Ok(())
}

async fn watch(client: BookingClient, interval: Duration) -> Result<()> {
    let mut watcher = SessionWatcher::spawn(client, interval);
    println!("{}", "Watching sessions (Ctrl-C to stop)...".dimmed());

    loop {
        tokio::select! {
            snapshot = watcher.next_snapshot() => {
                let sessions = snapshot.ok_or_else(|| anyhow!("session watcher stopped"))?;
                println!("\n{} {}", "↻".cyan(), Utc::now().format("%H:%M:%S"));
                print_sessions(&sessions);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    watcher.stop();
    Ok(())
}

fn print_sessions(sessions: &[SessionDetails]) {
    if sessions.is_empty() {
        println!("{}", "No sessions scheduled.".yellow());
        return;
    }

    for details in sessions {
        let s = &details.session;
        let availability = if details.is_full() {
            "FULL".red().bold()
        } else {
            format!("{} of {} spots left", details.available_spots, s.max_players).green()
        };

        println!("{}  {}", s.name.bold(), s.id.dimmed());
        println!(
            "  {} - {} (arrive by {})  £{}  {}",
            s.start_time.format("%A, %-d %B %Y %H:%M"),
            s.end_time.format("%H:%M"),
            s.arrive_by_time.format("%H:%M"),
            s.cost_per_player,
            availability
        );
        if !s.instructions.is_empty() {
            println!("  {}", s.instructions.italic());
        }
        for booking in &details.bookings {
            println!("    • {} <{}>  {}", booking.player_name, booking.player_email, booking.id.dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_times_are_taken_as_utc() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 10).unwrap();
        assert_eq!(utc_datetime(date, "19:30").unwrap().to_rfc3339(), "2030-01-10T19:30:00+00:00");
        assert!(utc_datetime(date, "7pm").is_err());
    }

    #[test]
    fn cli_parses_admin_create() {
        let cli = Cli::try_parse_from([
            "clubctl", "admin", "create", "--name", "Club Night", "--date", "2030-01-10",
            "--start", "19:00", "--end", "21:00", "--arrive-by", "18:45", "--cost", "4.50",
        ])
        .unwrap();

        let Commands::Admin(AdminCommands::Create(args)) = cli.command else {
            panic!("expected admin create");
        };
        let request = args.into_request().unwrap();
        assert_eq!(request.cost_per_player.map(Price::minor_units), Some(450));
        assert_eq!(request.max_players, None);
    }
}
