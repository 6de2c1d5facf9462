//! Reduces a summoner's raw play history to a ranked classification of their
//! strongest archetypes, and derives the single best lane + role tag used for
//! team placement.

use std::fmt;

use serde::Serialize;

pub mod cache;

/// Lane shared by two compatible roles; exempt from collision checks.
pub const SHARED_LANE: &str = "BOTTOM";

/// How often a champion was played in one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaneCount {
    pub lane: String,
    pub count: u32,
}

/// One champion's contribution to a bin, with its lane usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChampionScore {
    pub name: String,
    pub score: i64,
    pub lanes: Vec<LaneCount>,
}

/// All mastery weight accumulated under one archetype tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchetypeBin {
    #[serde(rename = "classification")]
    pub archetype: String,
    pub champions: Vec<ChampionScore>,
    #[serde(rename = "score")]
    pub total_score: i64,
    #[serde(rename = "overall_level")]
    pub total_level: i64,
}

/// Bins ordered by descending total score. Stable and deterministic for a
/// given input order; cached per summoner once computed.
pub type Classification = Vec<ArchetypeBin>;

/// A match reduced to what classification needs.
#[derive(Debug, Clone)]
pub struct PlayedMatch {
    pub champion_name: String,
    pub lane: String,
}

/// A mastery record joined with its champion's catalog entry.
#[derive(Debug, Clone)]
pub struct ScoredMastery {
    pub champion_name: String,
    pub tags: Vec<String>,
    pub points: i64,
    pub level: i64,
}

/// Per-champion lane play counts, in first-seen order. Accumulation is
/// commutative; the insertion order only matters for tie-breaking later.
fn lane_usage(matches: &[PlayedMatch]) -> Vec<(String, Vec<LaneCount>)> {
    let mut usage: Vec<(String, Vec<LaneCount>)> = Vec::new();

    for played in matches {
        let idx = match usage.iter().position(|(name, _)| name == &played.champion_name) {
            Some(idx) => idx,
            None => {
                usage.push((played.champion_name.clone(), Vec::new()));
                usage.len() - 1
            }
        };

        let lanes = &mut usage[idx].1;
        match lanes.iter_mut().find(|entry| entry.lane == played.lane) {
            Some(entry) => entry.count += 1,
            None => lanes.push(LaneCount {
                lane: played.lane.clone(),
                count: 1,
            }),
        }
    }

    usage
}

/// Aggregates masteries into archetype bins and ranks everything.
///
/// A champion with several tags contributes its full score to every matching
/// bin; that is deliberate. All sorts are stable, so equal scores keep the
/// order the records arrived in.
pub fn classify(matches: &[PlayedMatch], masteries: &[ScoredMastery]) -> Classification {
    let usage = lane_usage(matches);
    let mut bins: Vec<ArchetypeBin> = Vec::new();

    for mastery in masteries {
        for tag in &mastery.tags {
            let idx = match bins.iter().position(|bin| &bin.archetype == tag) {
                Some(idx) => idx,
                None => {
                    bins.push(ArchetypeBin {
                        archetype: tag.clone(),
                        champions: Vec::new(),
                        total_score: 0,
                        total_level: 0,
                    });
                    bins.len() - 1
                }
            };

            let lanes = usage
                .iter()
                .find(|(name, _)| name == &mastery.champion_name)
                .map(|(_, lanes)| lanes.clone())
                .unwrap_or_default();

            let bin = &mut bins[idx];
            bin.champions.push(ChampionScore {
                name: mastery.champion_name.clone(),
                score: mastery.points,
                lanes,
            });
            bin.total_score += mastery.points;
            bin.total_level += mastery.level;
        }
    }

    rank(&mut bins);
    bins
}

fn rank(bins: &mut Classification) {
    for bin in bins.iter_mut() {
        bin.champions.sort_by(|a, b| b.score.cmp(&a.score));
        for champion in bin.champions.iter_mut() {
            champion.lanes.sort_by(|a, b| b.count.cmp(&a.count));
        }
    }
    bins.sort_by(|a, b| b.total_score.cmp(&a.total_score));
}

/// The exclusive lane + role slot a player claims on a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub lane: String,
    pub archetype: String,
}

impl Position {
    /// Parses the stored "<LANE> <ARCHETYPE>" form.
    pub fn parse(s: &str) -> Option<Self> {
        let (lane, archetype) = s.split_once(' ')?;
        Some(Self {
            lane: lane.to_string(),
            archetype: archetype.to_string(),
        })
    }

    /// Two players collide when they claim the same slot, except on the
    /// bottom lane, which conventionally hosts two compatible roles.
    pub fn collides_with(&self, other: &Position) -> bool {
        self.lane == other.lane && self.archetype == other.archetype && self.lane != SHARED_LANE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lane, self.archetype)
    }
}

/// Best position: first lane of the top champion of the top bin. `None` when
/// the classification has nothing usable there, which must block placement.
pub fn best_position(classification: &Classification) -> Option<Position> {
    let bin = classification.first()?;
    let champion = bin.champions.first()?;
    let lane = champion.lanes.first()?;

    Some(Position {
        lane: lane.lane.clone(),
        archetype: bin.archetype.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(champion: &str, lane: &str) -> PlayedMatch {
        PlayedMatch {
            champion_name: champion.into(),
            lane: lane.into(),
        }
    }

    fn mastery(champion: &str, tags: &[&str], points: i64, level: i64) -> ScoredMastery {
        ScoredMastery {
            champion_name: champion.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            points,
            level,
        }
    }

    #[test]
    fn fighter_bin_orders_champions_and_lanes() {
        let matches = vec![played("ChampA", "TOP"), played("ChampB", "TOP")];
        let masteries = vec![
            mastery("ChampA", &["Fighter"], 100, 5),
            mastery("ChampB", &["Fighter"], 50, 3),
        ];

        let classification = classify(&matches, &masteries);

        assert_eq!(classification.len(), 1);
        let bin = &classification[0];
        assert_eq!(bin.archetype, "Fighter");
        assert_eq!(bin.total_score, 150);
        assert_eq!(bin.total_level, 8);

        let names: Vec<_> = bin.champions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ChampA", "ChampB"]);
        for champion in &bin.champions {
            assert_eq!(
                champion.lanes,
                vec![LaneCount {
                    lane: "TOP".into(),
                    count: 1
                }]
            );
        }
    }

    #[test]
    fn multi_tag_champion_contributes_fully_to_every_bin() {
        let masteries = vec![mastery("Gragas", &["Fighter", "Mage"], 200, 6)];

        let classification = classify(&[], &masteries);

        assert_eq!(classification.len(), 2);
        for bin in &classification {
            assert_eq!(bin.total_score, 200);
            assert_eq!(bin.total_level, 6);
            assert_eq!(bin.champions.len(), 1);
            assert_eq!(bin.champions[0].score, 200);
        }
    }

    #[test]
    fn lane_counts_accumulate_across_matches() {
        let matches = vec![
            played("Ahri", "MID"),
            played("Ahri", "MID"),
            played("Ahri", "TOP"),
        ];
        let masteries = vec![mastery("Ahri", &["Mage"], 300, 7)];

        let classification = classify(&matches, &masteries);
        let lanes = &classification[0].champions[0].lanes;

        assert_eq!(
            lanes,
            &vec![
                LaneCount {
                    lane: "MID".into(),
                    count: 2
                },
                LaneCount {
                    lane: "TOP".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn ties_preserve_input_order() {
        let masteries = vec![
            mastery("First", &["Mage"], 100, 4),
            mastery("Second", &["Mage"], 100, 4),
            mastery("Third", &["Support"], 100, 4),
            mastery("Fourth", &["Assassin"], 100, 4),
        ];

        let classification = classify(&[], &masteries);

        let bins: Vec<_> = classification.iter().map(|b| b.archetype.as_str()).collect();
        assert_eq!(bins, vec!["Mage", "Support", "Assassin"]);

        let champions: Vec<_> = classification[0]
            .champions
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(champions, vec!["First", "Second"]);
    }

    #[test]
    fn bins_are_ordered_by_total_score() {
        let masteries = vec![
            mastery("Soraka", &["Support"], 50, 2),
            mastery("Zed", &["Assassin"], 500, 7),
        ];

        let classification = classify(&[], &masteries);

        let bins: Vec<_> = classification.iter().map(|b| b.archetype.as_str()).collect();
        assert_eq!(bins, vec!["Assassin", "Support"]);
    }

    #[test]
    fn best_position_reads_the_top_of_everything() {
        let matches = vec![played("Zed", "MID")];
        let masteries = vec![
            mastery("Soraka", &["Support"], 50, 2),
            mastery("Zed", &["Assassin"], 500, 7),
        ];

        let classification = classify(&matches, &masteries);
        let position = best_position(&classification).unwrap();

        assert_eq!(position.lane, "MID");
        assert_eq!(position.archetype, "Assassin");
        assert_eq!(position.to_string(), "MID Assassin");
    }

    #[test]
    fn best_position_is_absent_without_masteries() {
        assert!(best_position(&classify(&[], &[])).is_none());
    }

    #[test]
    fn best_position_is_absent_when_top_champion_was_never_played() {
        // Mastery without any match history leaves the lane list empty.
        let masteries = vec![mastery("Zed", &["Assassin"], 500, 7)];
        assert!(best_position(&classify(&[], &masteries)).is_none());
    }

    #[test]
    fn collision_rule_exempts_bottom_lane() {
        let mid = Position::parse("MID Mage").unwrap();
        let carry = Position::parse("BOTTOM Marksman").unwrap();
        let support = Position::parse("BOTTOM Support").unwrap();

        assert!(mid.collides_with(&mid.clone()));
        assert!(!carry.collides_with(&support));
        assert!(!carry.collides_with(&carry.clone()));
        assert!(!mid.collides_with(&carry));
    }

    #[test]
    fn classification_serializes_like_the_api_payload() {
        let masteries = vec![mastery("Zed", &["Assassin"], 500, 7)];
        let classification = classify(&[], &masteries);

        let json = serde_json::to_value(&classification).unwrap();
        assert_eq!(json[0]["classification"], "Assassin");
        assert_eq!(json[0]["score"], 500);
        assert_eq!(json[0]["overall_level"], 7);
        assert_eq!(json[0]["champions"][0]["name"], "Zed");
    }
}
