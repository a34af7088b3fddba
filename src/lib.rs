//! # Gauntlet
//!
//! Multi-round coding-challenge dispatcher and verifier.
//!
//! Gauntlet manufactures a task brief with embedded sample data, posts it to
//! a roster of participants' intake endpoints, and later checks each
//! participant's deployed artifact (a license rule against the repository
//! and a marker rule against the rendered page) to decide who advances to
//! the next round.
//!
//! ## Pipeline
//!
//! ```text
//!   Roster Source ──▶ Dispatcher ──▶ participant endpoints
//!        │
//!        └──────────▶ Evaluator ──▶ verdicts ──▶ progression ──▶ next round
//! ```
//!
//! ## Modules
//! - `attachment`: inline data-URI encoding for payload attachments
//! - `payload`: task templates and payload construction
//! - `delivery`: HTTP delivery with bounded retry and backoff
//! - `roster`: participant roster sources (SQLite, submission CSV)
//! - `verify`: license and rendered-page verification
//! - `round`: round dispatch and progression selection

pub mod attachment;
pub mod config;
pub mod delivery;
pub mod pace;
pub mod payload;
pub mod roster;
pub mod round;
pub mod verify;

pub use config::Config;
