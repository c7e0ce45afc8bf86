//! # Career Clash - character progression engine
//!
//! Career Clash is a career-exploration game: a player creates a character,
//! grows five skills, unlocks careers, completes quests and earns
//! achievements. This crate holds the single persistent character record and
//! everything that mutates it.
//!
//! ## Features
//!
//! - **Progression Store**: one owned record, mutated through `current -> next`
//!   updates that are persisted before they become visible to subscribers.
//! - **Durable Storage**: the record and the signed-in session live in a sled
//!   tree as JSON documents; partial or legacy documents load with defaults.
//! - **Catalogs**: careers, quests and achievements with their unlock rules
//!   and rewards.
//! - **Activities**: reward rules for skill training, battles, mini-games and
//!   the personality assessment.
//! - **Leaderboards**: the character ranked against a fixed field of rivals,
//!   with a per-faction breakdown, plus a shareable profile export.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use careerclash::progression::{
//!     Faction, PointCategory, ProgressionStorage, ProgressionStore, SkillName,
//! };
//!
//! fn main() -> Result<(), careerclash::progression::ProgressionError> {
//!     let storage = ProgressionStorage::open("./data/progression")?;
//!     let mut store = ProgressionStore::open(storage)?;
//!     store.create("Ada", Faction::TechForgers)?;
//!     store.adjust_skill(SkillName::Logic, 2)?;
//!     store.add_points(PointCategory::Quest, 150)?;
//!     store.update_streak()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`progression`] - character record, store, storage, catalogs and rewards
//! - [`config`] - TOML configuration for the CLI
//! - [`validation`] - character name, email and username checks
//! - [`logutil`] - single-line escaping for user-provided strings in logs

pub mod config;
pub mod logutil;
pub mod progression;
pub mod validation;
