//! Ranking primitives for the skill directory.
//!
//! Three independent pieces, all free of I/O:
//! - [`score`]: popularity and trending scores used to order listings.
//! - [`relevance`]: weighted text relevance for search, with a gated
//!   popularity tiebreak.
//! - [`rate_limit`]: a fixed-window limiter guarding write endpoints,
//!   the only stateful component in this crate.
//!
//! Callers fetch records, compute scores, sort descending, and truncate;
//! nothing here caches or persists a computed score.

pub mod rate_limit;
pub mod relevance;
pub mod score;

pub use rate_limit::{RateLimiter, Verdict};
pub use relevance::{relevance, SearchDoc};
pub use score::{popularity_score, trending_score, SkillSignals};
