use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_scorer::calculate::{
    award_delta, evaluate_awards, event_key, event_leaderboard, league_standings, preview,
    prior_rounds_for_player, recompute_all, recompute_event,
};
use league_scorer::config::AppConfig;
use league_scorer::models::{EntityId, LeagueId, PointsBreakdown, Round};
use league_scorer::storage::{RoundStore, StorageConfig};

#[derive(Parser)]
#[command(name = "league-scorer")]
#[command(about = "Golf league scoring and ranking engine")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the rank and points a round would get, without saving it
    Preview(RoundArgs),

    /// Submit a round, recompute its event, and grant awards
    Submit(RoundArgs),

    /// Recompute every event (after a points system change)
    Recompute {
        /// Print the result without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show one event's ranked rounds
    Leaderboard(EventArgs),

    /// Show a league's season table
    Standings {
        /// League id (omit for open events)
        #[arg(long)]
        league: Option<String>,
    },

    /// List a player's badges and trophies
    Awards {
        #[arg(long)]
        player: String,
    },
}

#[derive(Args)]
struct EventArgs {
    #[arg(long)]
    league: Option<String>,

    /// Date played (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    #[arg(long)]
    course: Option<String>,

    #[arg(long, default_value = "18")]
    holes: u8,
}

#[derive(Args)]
struct RoundArgs {
    #[command(flatten)]
    event: EventArgs,

    /// Player the round belongs to
    #[arg(long)]
    player: String,

    /// Account entering the round, if not the player
    #[arg(long)]
    submitted_by: Option<String>,

    /// Total strokes
    #[arg(long)]
    gross: Option<i32>,

    #[arg(long, default_value = "72")]
    par: i32,

    #[arg(long, default_value = "0")]
    birdies: u32,

    #[arg(long, default_value = "0")]
    eagles: u32,

    #[arg(long, default_value = "0")]
    hole_in_ones: u32,

    /// Round was played on a major day
    #[arg(long)]
    major: bool,

    /// Player was registered but did not play
    #[arg(long)]
    did_not_play: bool,
}

fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>> {
    date.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", s))
    })
    .transpose()
}

impl RoundArgs {
    fn to_round(&self) -> Result<Round> {
        let mut round = Round::new(
            EntityId::from(self.player.as_str()),
            self.event.league.as_deref().map(LeagueId::from),
            parse_date(self.event.date.as_deref())?,
            self.event.course.clone(),
            self.event.holes,
        )
        .with_counts(self.birdies, self.eagles, self.hole_in_ones)
        .with_major(self.major)
        .with_did_play(!self.did_not_play);

        round.par = self.par;
        round.gross_score = self.gross;
        if let Some(submitter) = &self.submitted_by {
            round = round.with_submitter(EntityId::from(submitter.as_str()));
        }
        Ok(round)
    }
}

fn describe_breakdown(breakdown: Option<&PointsBreakdown>) -> String {
    match breakdown {
        Some(PointsBreakdown::League {
            placement,
            bonus,
            participation,
            total,
        }) => format!(
            "{} (placement {} + bonus {} + participation {})",
            total, placement, bonus, participation
        ),
        Some(PointsBreakdown::Legacy {
            base,
            extras,
            multiplier,
            total,
        }) => format!(
            "{} ((base {} + extras {}) x {})",
            total, base, extras, multiplier
        ),
        None => "0 (not scored)".to_string(),
    }
}

fn format_rank(rank: Option<u32>) -> String {
    rank.map_or_else(|| "-".to_string(), |r| r.to_string())
}

fn print_board(board: &[&Round]) {
    for r in board {
        println!(
            "  {:>3}  {:<20} {:>4}  {:>4} pts",
            format_rank(r.rank),
            r.player_id.as_str(),
            r.gross_score.map_or_else(|| "-".to_string(), |g| g.to_string()),
            r.points
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting league-scorer v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let store = RoundStore::new(StorageConfig::new(data_dir));
    let registry = config.points.registry();
    let policy = config.duplicate_policy;

    match cli.command {
        Commands::Preview(args) => {
            let draft = args.to_round()?;
            let rounds = store.load_rounds().context("Failed to load rounds")?;
            let system = registry.for_league(draft.league_id.as_ref());
            let result = preview(&rounds, &draft, system, policy);

            println!("\n=== Preview ===");
            println!("Event:        {}", result.event_key);
            println!("Field size:   {}", result.field_size);
            println!("Rank:         {}", format_rank(result.rank));
            println!("Points:       {}", describe_breakdown(result.breakdown.as_ref()));
        }
        Commands::Submit(args) => {
            let round = args.to_round()?;
            round.validate().context("Round rejected")?;

            let rounds = store.load_rounds().context("Failed to load rounds")?;
            let updated = recompute_event(&rounds, &round, &registry, policy);

            let prior = prior_rounds_for_player(&rounds, &round);
            let earned = evaluate_awards(&round, &prior);
            let mut held = store.load_awards().context("Failed to load awards")?;
            let delta = award_delta(&mut held, &round, &earned, round.submitted_at);

            store
                .replace_rounds(&updated)
                .context("Failed to write rounds")?;
            store
                .append_awards(&delta)
                .context("Failed to write awards")?;

            let key = round.event_key();
            println!("\n=== Submitted {} ===", round.id);
            println!("Event:        {}", key);
            if let Some(stored) = updated.iter().find(|r| r.id == round.id) {
                println!("Rank:         {}", format_rank(stored.rank));
                println!("Points:       {}", describe_breakdown(stored.breakdown.as_ref()));
            }
            println!("\nEvent standings after recomputation:");
            print_board(&event_leaderboard(&updated, &key));
            if !delta.is_empty() {
                println!("\nNew awards:");
                for award in &delta {
                    println!("  [{}] {} - {}", award.tier, award.title, award.description);
                }
            }
        }
        Commands::Recompute { dry_run } => {
            let rounds = store.load_rounds().context("Failed to load rounds")?;
            let updated = recompute_all(&rounds, &registry, policy);
            let changed = rounds
                .iter()
                .zip(&updated)
                .filter(|(before, after)| before != after)
                .count();

            println!("\n=== Recompute ===");
            println!("Rounds:       {}", updated.len());
            println!("Changed:      {}", changed);
            if dry_run {
                println!("\n(dry run - no data written to disk)");
            } else if changed > 0 {
                store
                    .replace_rounds(&updated)
                    .context("Failed to write rounds")?;
            }
        }
        Commands::Leaderboard(args) => {
            let league = args.league.as_deref().map(LeagueId::from);
            let key = event_key(
                league.as_ref(),
                parse_date(args.date.as_deref())?,
                args.course.as_deref(),
                args.holes,
            );
            let rounds = store.load_rounds().context("Failed to load rounds")?;
            let board = event_leaderboard(&rounds, &key);

            println!("\n=== {} ===", key);
            if board.is_empty() {
                println!("No rounds in this event");
            }
            print_board(&board);
        }
        Commands::Standings { league } => {
            let league = league.as_deref().map(LeagueId::from);
            let rounds = store.load_rounds().context("Failed to load rounds")?;
            let table = league_standings(&rounds, league.as_ref());

            println!(
                "\n=== Standings: {} ===",
                league.as_ref().map_or("open events", |l| l.as_str())
            );
            println!(
                "  {:>3}  {:<20} {:>6} {:>6} {:>5} {:>5}",
                "#", "Player", "Rounds", "Points", "Wins", "Best"
            );
            for s in table {
                println!(
                    "  {:>3}  {:<20} {:>6} {:>6} {:>5} {:>5}",
                    s.rank,
                    s.player_id.as_str(),
                    s.rounds_played,
                    s.total_points,
                    s.event_wins,
                    s.best_score.map_or_else(|| "-".to_string(), |b| b.to_string())
                );
            }
        }
        Commands::Awards { player } => {
            let player_id = EntityId::from(player.as_str());
            let awards = store
                .awards_for_player(&player_id)
                .context("Failed to load awards")?;

            println!("\n=== Awards: {} ===", player_id);
            if awards.is_empty() {
                println!("No awards yet");
            }
            for award in awards {
                println!(
                    "  [{}] {} - {} (earned {})",
                    award.tier,
                    award.title,
                    award.description,
                    award.earned_at.format("%Y-%m-%d")
                );
            }
        }
    }

    Ok(())
}
