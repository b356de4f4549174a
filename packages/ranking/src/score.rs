use chrono::{DateTime, Utc};

const STARS_WEIGHT: f64 = 0.01;
const VIEW_WEIGHT: f64 = 1.0;
const INSTALL_WEIGHT: f64 = 5.0;
const VOTE_WEIGHT: f64 = 10.0;

/// Half-life style constant for the recency boost: a skill one day old gets
/// a 31x multiplier, 30 days old gets 2x, decaying toward 1x with age.
const RECENCY_WINDOW_DAYS: f64 = 30.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Per-skill ranking signals.
///
/// Fully populated at the data-access boundary: the schema keeps every
/// counter `NOT NULL DEFAULT 0`, so a never-refreshed skill carries snapshot
/// values of 0 and its trending delta counts everything since creation.
#[derive(Debug, Clone, Copy)]
pub struct SkillSignals {
    pub stars: i64,
    pub view_count: i64,
    pub install_count: i64,
    pub good_count: i64,
    pub bad_count: i64,
    pub view_count_snapshot: i64,
    pub install_count_snapshot: i64,
    pub good_count_snapshot: i64,
    pub created_at: DateTime<Utc>,
}

/// Composite popularity score: damped stars baseline plus user signals.
///
/// Formula: stars x 0.01 + views x 1 + installs x 5 + good x 10 - bad x 10.
/// Stars are an external, slow-moving, often-large signal, so they are
/// weighted far below installs and votes from the directory's own users.
/// Bad votes subtract with the same magnitude good votes add; the result is
/// never clamped, a net-disliked skill scores negative and sorts last.
pub fn popularity_score(s: &SkillSignals) -> f64 {
    s.stars as f64 * STARS_WEIGHT
        + s.view_count as f64 * VIEW_WEIGHT
        + s.install_count as f64 * INSTALL_WEIGHT
        + s.good_count as f64 * VOTE_WEIGHT
        - s.bad_count as f64 * VOTE_WEIGHT
}

/// Recent momentum score: weighted counter deltas since the last snapshot,
/// scaled by a recency boost so a young skill with modest activity can
/// outrank an older one with a larger raw delta.
///
/// Each per-field delta is clamped to >= 0: a snapshot that briefly runs
/// ahead of its live counter (refresh race) contributes nothing instead of
/// a boosted negative score. A zero delta scores 0 at any age.
pub fn trending_score(s: &SkillSignals, now: DateTime<Utc>) -> f64 {
    let view_delta = (s.view_count - s.view_count_snapshot).max(0) as f64;
    let install_delta = (s.install_count - s.install_count_snapshot).max(0) as f64;
    let good_delta = (s.good_count - s.good_count_snapshot).max(0) as f64;
    let delta = view_delta + install_delta * INSTALL_WEIGHT + good_delta * VOTE_WEIGHT;

    // Floor of one day keeps brand-new skills from dividing by ~zero.
    let age_days = (now - s.created_at).num_milliseconds() as f64 / MS_PER_DAY;
    let days_since = age_days.max(1.0);
    let boost = 1.0 + RECENCY_WINDOW_DAYS / days_since;

    delta * boost
}
