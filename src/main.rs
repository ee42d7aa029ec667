//! Bot-table simulation binary.
//!
//! Seats automated players at one table and plays a match series to
//! completion, logging every turn. Smoke-tests the whole engine end to end:
//! `RUST_LOG=info cargo run -- --seats 4 --games 3`

use clap::Parser;
use durak::room::Room;
use durak::room::RoomConfig;
use durak::room::Synth;
use durak::room::TimerConfig;
use std::time::Duration;

#[derive(Parser)]
#[command(about = "Run a Durak table of automated players")]
struct Args {
    /// Seats at the table.
    #[arg(long, default_value_t = 3)]
    seats: usize,
    /// Games in the series.
    #[arg(long, default_value_t = durak::GAMES_PER_SERIES)]
    games: u32,
    /// Seconds granted for each decision.
    #[arg(long, default_value_t = 10)]
    decision: u64,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    let config = RoomConfig {
        games: args.games,
        timers: TimerConfig {
            decision: Duration::from_secs(args.decision),
            ..TimerConfig::default()
        },
    };
    let mut room = Room::new(config);
    for seat in 0..args.seats {
        room.sit(&format!("synth-{}", seat), Box::new(Synth), false);
    }
    for (name, score) in room.run().await {
        println!("{:<12} {:>3}W {:>3}L", name, score.wins, score.losses);
    }
}
