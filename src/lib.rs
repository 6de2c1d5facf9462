//! Role-affinity team builder core for League summoners.
//!
//! Reduces a summoner's match and mastery history into a ranked archetype
//! classification ([`classify`]), derives their best lane + role, and places
//! them onto compatible five-person teams ([`matchmaking`]) backed by SQLite
//! ([`db`]) and the upstream statistics API ([`riot`]).

pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod matchmaking;
pub mod riot;
