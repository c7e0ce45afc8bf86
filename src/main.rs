//! Binary entrypoint for the Career Clash CLI.
//!
//! Each invocation opens the progression database, applies one command and
//! exits. Commands mirror the game's screens: account (`register`, `login`,
//! `logout`), character (`create`, `status`, `export`), the skill tree
//! (`train`, `skill`), rewards (`xp`, `points`, `badge`, `streak`), catalogs
//! (`careers`, `career`, `quests`, `quest`, `achievements`), activities
//! (`battle`, `minigame`, `personality`) and `leaderboard`.
//!
//! See the library crate docs for module-level details: `careerclash::`.
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::Path;
use std::str::FromStr;

use careerclash::config::Config;
use careerclash::progression::{
    achievement_catalog, apply_personality_result, can_start_quest, can_unlock,
    complete_quest_with_rewards, find_achievement, find_quest, quest_catalog, ranking,
    record_battle, record_minigame, skill_title, summary, train_skill, unlock_career_with_rewards,
    visible_careers, BattleDifficulty, BattleOutcome, Character, Faction, LeaderboardCategory,
    PersonalityType, PointCategory, ProfileExport, ProgressionStorage, ProgressionStorageBuilder,
    ProgressionStore, RewardOutcome, SessionManager, SkillName,
};
use careerclash::validation::validate_character_name;

#[derive(Parser)]
#[command(name = "careerclash")]
#[command(about = "Career Clash character progression")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config.toml and create the data directory
    Init,
    /// Sign up with an email and a chosen username
    Register {
        email: String,
        username: String,
    },
    /// Sign in; the username is taken from the email
    Login { email: String },
    /// Sign out and delete the local character
    Logout,
    /// Create a new character, replacing any existing one
    Create {
        name: String,
        /// Faction id or display name: tech-forgers, creative-artisans,
        /// social-champions, knowledge-seekers or innovation-pioneers
        #[arg(short, long)]
        faction: String,
    },
    /// Show the character sheet
    Status,
    /// Spend a skill-tree upgrade on one skill
    Train { skill: String },
    /// Adjust a skill by a signed amount (clamped to 0..=10)
    Skill {
        skill: String,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Add experience
    Xp { amount: u64 },
    /// Add points to a category (skill, career, quest, battle)
    Points { category: String, amount: u64 },
    /// List careers visible to the character
    Careers,
    /// Unlock a career
    Career { id: String },
    /// List quests
    Quests,
    /// Complete a quest
    Quest { id: String },
    /// Award a badge
    Badge { id: String },
    /// List achievements with progress
    Achievements,
    /// Record a battle arena result
    Battle {
        #[arg(short, long, default_value = "easy")]
        difficulty: String,
        /// Your score
        score: u64,
        /// Opponent's score
        opponent: u64,
    },
    /// Record a mini-game score for a skill
    Minigame { skill: String, score: u64 },
    /// Apply a personality assessment result
    Personality { result: String },
    /// Record activity for today
    Streak,
    /// Rank the character against other players (level, careers, skills)
    Leaderboard {
        #[arg(default_value = "level")]
        category: String,
    },
    /// Print a shareable profile as JSON
    Export {
        /// Print the stored character document unchanged instead
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Init => None,
        _ => match Config::load(&cli.config).await {
            Ok(config) => Some(config),
            Err(e) => {
                if Path::new(&cli.config).exists() {
                    return Err(e);
                }
                None
            }
        },
    };
    init_logging(&config, cli.verbose);

    if let Commands::Init = cli.command {
        return init(&cli.config).await;
    }

    let config = config.unwrap_or_else(|| {
        warn!("{} not found, using defaults", cli.config);
        Config::default()
    });
    let storage = open_storage(&config)?;
    let mut store = ProgressionStore::open(storage.clone())?;
    let mut sessions = SessionManager::open(storage)?;

    match cli.command {
        Commands::Init => {}
        Commands::Register { email, username } => {
            let session = sessions.register(&email, &username)?;
            println!("Welcome to {}, {}!", config.game.name, session.username);
        }
        Commands::Login { email } => {
            let session = sessions.login(&email)?;
            println!("Signed in as {}", session.username);
        }
        Commands::Logout => {
            sessions.logout(&mut store)?;
            println!("Signed out.");
        }
        Commands::Create { name, faction } => {
            let name = validate_character_name(&name)?;
            let faction = Faction::from_str(&faction).map_err(|e| anyhow!(e))?;
            let character = store.create(&name, faction)?;
            println!("{} joins the {}!", character.name, faction.display_name());
            sessions.mark_has_character()?;
        }
        Commands::Status => {
            let character = require_character(&store)?;
            print_status(character);
        }
        Commands::Train { skill } => {
            let skill = parse_skill(&skill)?;
            require_character(&store)?;
            match train_skill(&mut store, skill)? {
                Some(outcome) => print_reward(&outcome),
                None => println!("{} is already at Grandmaster.", skill),
            }
        }
        Commands::Skill { skill, delta } => {
            let skill = parse_skill(&skill)?;
            require_character(&store)?;
            store.adjust_skill(skill, delta)?;
            let level = store.character().map(|c| c.skills.get(skill)).unwrap_or_default();
            println!("{} is now {} ({})", skill, level, skill_title(level));
        }
        Commands::Xp { amount } => {
            require_character(&store)?;
            store.add_experience(amount)?;
            if let Some(c) = store.character() {
                println!("+{} XP: level {} ({} XP)", amount, c.level, c.experience);
            }
        }
        Commands::Points { category, amount } => {
            let category = PointCategory::from_str(&category).map_err(|e| anyhow!(e))?;
            require_character(&store)?;
            store.add_points(category, amount)?;
            if let Some(c) = store.character() {
                println!("+{} {} points (total {})", amount, category, c.total_points);
            }
        }
        Commands::Careers => {
            let character = require_character(&store)?;
            for career in visible_careers(character) {
                let state = if character.has_career(career.id) {
                    "unlocked"
                } else if can_unlock(character, career) {
                    "ready"
                } else {
                    "locked"
                };
                let needs: Vec<String> = career
                    .requirements
                    .iter()
                    .map(|(skill, level)| format!("{} {}", skill.id(), level))
                    .collect();
                println!(
                    "{:<18} {:<9} {:?} {} pts [{}]",
                    career.id,
                    state,
                    career.rarity,
                    career.points,
                    needs.join(", ")
                );
            }
        }
        Commands::Career { id } => {
            require_character(&store)?;
            match unlock_career_with_rewards(&mut store, &id)? {
                Some(outcome) => {
                    println!("{}", outcome.message);
                    println!(
                        "+{} career points, +{} XP",
                        outcome.points_awarded, outcome.experience_awarded
                    );
                    print_achievements(&outcome.achievements_unlocked);
                }
                None => println!("Career {} is already unlocked.", id),
            }
        }
        Commands::Quests => {
            let character = require_character(&store)?;
            for quest in quest_catalog() {
                let state = if character.has_completed_quest(quest.id) {
                    "done"
                } else if can_start_quest(character, quest) {
                    "open"
                } else {
                    "locked"
                };
                println!(
                    "{:<22} {:<6} {:?} {} min, {} XP / {} pts",
                    quest.id,
                    state,
                    quest.difficulty,
                    quest.duration_minutes,
                    quest.rewards.experience,
                    quest.rewards.points
                );
            }
        }
        Commands::Quest { id } => {
            require_character(&store)?;
            match complete_quest_with_rewards(&mut store, &id)? {
                Some(outcome) => {
                    let title = find_quest(outcome.quest_id)
                        .map(|q| q.title)
                        .unwrap_or(outcome.quest_id);
                    println!("Quest complete: {}", title);
                    println!(
                        "+{} XP, +{} quest points",
                        outcome.experience_awarded, outcome.points_awarded
                    );
                    for (skill, level) in &outcome.skill_changes {
                        println!("  {} -> {}", skill, level);
                    }
                    print_achievements(&outcome.achievements_unlocked);
                }
                None => println!("Quest {} was already completed.", id),
            }
        }
        Commands::Badge { id } => {
            require_character(&store)?;
            if store.award_badge(&id)? {
                println!("Badge earned: {}", id);
            } else {
                println!("Badge {} already held.", id);
            }
        }
        Commands::Achievements => {
            let character = require_character(&store)?;
            for achievement in achievement_catalog() {
                let (current, target) = achievement.progress(character);
                let mark = if character.has_achievement(achievement.id) { "x" } else { " " };
                println!(
                    "[{}] {:<18} {:?} {}/{}",
                    mark,
                    achievement.id,
                    achievement.rarity,
                    current.min(target),
                    target
                );
            }
            let totals = summary(character);
            println!(
                "{}/{} unlocked ({}%), {} points, {} legendary",
                totals.unlocked,
                totals.total,
                totals.completion_percent(),
                totals.points,
                totals.legendary
            );
        }
        Commands::Battle { difficulty, score, opponent } => {
            let difficulty = BattleDifficulty::from_str(&difficulty).map_err(|e| anyhow!(e))?;
            require_character(&store)?;
            let outcome = BattleOutcome {
                difficulty,
                user_score: score,
                opponent_score: opponent,
            };
            println!("{}", if outcome.won() { "Victory!" } else { "Defeat." });
            if let Some(reward) = record_battle(&mut store, outcome)? {
                print_reward(&reward);
            }
        }
        Commands::Minigame { skill, score } => {
            let skill = parse_skill(&skill)?;
            require_character(&store)?;
            if let Some(reward) = record_minigame(&mut store, skill, score)? {
                print_reward(&reward);
            }
        }
        Commands::Personality { result } => {
            let personality = PersonalityType::from_str(&result).map_err(|e| anyhow!(e))?;
            require_character(&store)?;
            if let Some(reward) = apply_personality_result(&mut store, personality)? {
                print_reward(&reward);
            }
        }
        Commands::Streak => {
            require_character(&store)?;
            store.update_streak()?;
            if let Some(c) = store.character() {
                println!("Streak: {} day(s)", c.streak);
            }
        }
        Commands::Leaderboard { category } => {
            let category = LeaderboardCategory::from_str(&category).map_err(|e| anyhow!(e))?;
            let character = require_character(&store)?;
            let board = ranking(character, category);
            println!("{} rankings", category);
            for row in &board.rows {
                let marker = if row.is_player { ">" } else { " " };
                println!(
                    "{} #{:<2} {:<22} {:<20} {}",
                    marker,
                    row.rank,
                    row.name,
                    row.faction.display_name(),
                    row.standing
                );
            }
            println!("Your rank: #{}", board.player_rank);
            for standing in &board.factions {
                let average = standing
                    .average_rank
                    .map(|rank| format!("#{}", rank))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:<20} members {}  avg rank {}",
                    standing.faction.display_name(),
                    standing.members,
                    average
                );
            }
        }
        Commands::Export { raw: true } => match store.storage().raw_character()? {
            Some(json) => println!("{}", json),
            None => return Err(anyhow!("no character has been created")),
        },
        Commands::Export { raw: false } => {
            let character = require_character(&store)?;
            let export = ProfileExport::new(character, sessions.current());
            info!("exporting profile as {}", export.file_name());
            println!("{}", export.to_json()?);
        }
    }

    Ok(())
}

async fn init(config_path: &str) -> Result<()> {
    info!("Initializing Career Clash configuration");
    if Path::new(config_path).exists() {
        warn!("{} already exists, leaving it untouched", config_path);
    } else {
        Config::create_default(config_path).await?;
        info!("Configuration file created at {}", config_path);
    }
    let config = Config::load(config_path).await?;
    tokio::fs::create_dir_all(&config.storage.data_dir)
        .await
        .with_context(|| format!("creating data directory {}", config.storage.data_dir))?;
    open_storage(&config)?;
    info!("Progression database ready at {}", config.storage.db_path().display());
    Ok(())
}

fn open_storage(config: &Config) -> Result<ProgressionStorage> {
    let path = config.storage.db_path();
    ProgressionStorageBuilder::new(&path)
        .flush_every_write(config.storage.flush_every_write)
        .open()
        .with_context(|| format!("opening progression database at {}", path.display()))
}

fn require_character(store: &ProgressionStore) -> Result<&Character> {
    store
        .character()
        .ok_or_else(|| {
            anyhow!("no character yet; run `careerclash create <name> --faction <faction>` first")
        })
}

fn parse_skill(raw: &str) -> Result<SkillName> {
    SkillName::from_str(raw).map_err(|e| anyhow!(e))
}

fn print_status(c: &Character) {
    println!("{} - {} (level {})", c.name, c.faction.display_name(), c.level);
    println!("XP: {}  Streak: {} day(s)", c.experience, c.streak);
    println!(
        "Points: {} total (skill {}, career {}, quest {}, battle {})",
        c.total_points, c.skill_points, c.career_points, c.quest_points, c.battle_points
    );
    for (skill, level) in c.skills.iter() {
        println!("  {:<11} {:>2} {}", skill.display_name(), level, skill_title(level));
    }
    println!(
        "Careers: {}  Quests: {}  Badges: {}  Achievements: {}",
        c.unlocked_careers.len(),
        c.completed_quests.len(),
        c.badges.len(),
        c.achievements.len()
    );
}

fn print_reward(reward: &RewardOutcome) {
    let category = reward.category.map(|c| c.id()).unwrap_or("skill");
    println!("+{} XP, +{} {} points", reward.experience, reward.points, category);
    for (skill, level) in &reward.skill_changes {
        println!("  {} -> {} ({})", skill, level, skill_title(*level));
    }
    print_achievements(&reward.achievements_unlocked);
}

fn print_achievements(ids: &[&str]) {
    for &id in ids {
        let name = find_achievement(id)
            .map(|a| a.name)
            .unwrap_or(id);
        println!("Achievement unlocked: {}", name);
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let configured = config
        .as_ref()
        .and_then(|cfg| log::LevelFilter::from_str(&cfg.logging.level).ok())
        .unwrap_or(log::LevelFilter::Info);
    let level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
