pub mod catalog;
pub mod client;
pub mod traits;
pub mod types;

pub use traits::LolApi;

/// Summoner names compare case- and space-insensitively upstream; the
/// normalized form is also the classification cache key.
pub fn normalize_summoner_name(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}
