use chrono::{DateTime, Utc};
use ranking::{SearchDoc, SkillSignals};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub name_ko: Option<String>,
    pub summary_en: Option<String>,
    pub summary_ko: Option<String>,
    pub description_en: Option<String>,
    pub description_ko: Option<String>,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub github_url: Option<String>,
    pub github_owner: Option<String>,
    pub github_repo: Option<String>,
    pub is_official: bool,
    pub stars: i64,

    // Live counters, NOT NULL DEFAULT 0 in the schema
    pub view_count: i64,
    pub install_count: i64,
    pub good_count: i64,
    pub bad_count: i64,

    // Checkpointed by the snapshot worker; trending reads live minus snapshot
    pub view_count_snapshot: i64,
    pub install_count_snapshot: i64,
    pub good_count_snapshot: i64,

    pub github_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Skill> for SkillSignals {
    fn from(s: &Skill) -> Self {
        SkillSignals {
            stars: s.stars,
            view_count: s.view_count,
            install_count: s.install_count,
            good_count: s.good_count,
            bad_count: s.bad_count,
            view_count_snapshot: s.view_count_snapshot,
            install_count_snapshot: s.install_count_snapshot,
            good_count_snapshot: s.good_count_snapshot,
            created_at: s.created_at,
        }
    }
}

impl<'a> From<&'a Skill> for SearchDoc<'a> {
    fn from(s: &'a Skill) -> Self {
        SearchDoc {
            name: &s.name,
            name_ko: s.name_ko.as_deref(),
            summary_en: s.summary_en.as_deref(),
            summary_ko: s.summary_ko.as_deref(),
            description_en: s.description_en.as_deref(),
            description_ko: s.description_ko.as_deref(),
            tags: &s.tags,
            stars: s.stars,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name_ko: String,
    pub name_en: String,
    pub sort_order: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Install {
    pub id: Uuid,
    pub skill_id: Uuid,
    pub source: String, // 'web' | 'cli' | 'skill'
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SkillRequest {
    pub id: Uuid,
    pub github_url: String,
    pub description: Option<String>,
    pub status: String, // 'pending' | 'approved' | 'rejected'
    pub created_at: DateTime<Utc>,
}

/// Updated vote counters returned to the caller after a vote write.
#[derive(Debug, Serialize, FromRow)]
pub struct VoteCounts {
    pub good_count: i64,
    pub bad_count: i64,
}

#[derive(Debug, Error)]
#[error("invalid vote type: {0}")]
pub struct InvalidVoteType(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    Good,
    Bad,
}

impl FromStr for VoteType {
    type Err = InvalidVoteType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(VoteType::Good),
            "bad" => Ok(VoteType::Bad),
            other => Err(InvalidVoteType(other.to_string())),
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteType::Good => f.write_str("good"),
            VoteType::Bad => f.write_str("bad"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid install source: {0}")]
pub struct InvalidInstallSource(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstallSource {
    #[default]
    Web,
    Cli,
    Skill,
}

impl InstallSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallSource::Web => "web",
            InstallSource::Cli => "cli",
            InstallSource::Skill => "skill",
        }
    }
}

impl FromStr for InstallSource {
    type Err = InvalidInstallSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(InstallSource::Web),
            "cli" => Ok(InstallSource::Cli),
            "skill" => Ok(InstallSource::Skill),
            other => Err(InvalidInstallSource(other.to_string())),
        }
    }
}

impl fmt::Display for InstallSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_type_parses_known_values_only() {
        assert_eq!("good".parse::<VoteType>().unwrap(), VoteType::Good);
        assert_eq!("bad".parse::<VoteType>().unwrap(), VoteType::Bad);
        assert!("GOOD".parse::<VoteType>().is_err());
        assert!("meh".parse::<VoteType>().is_err());
    }

    #[test]
    fn install_source_defaults_to_web() {
        assert_eq!(InstallSource::default(), InstallSource::Web);
        assert_eq!("cli".parse::<InstallSource>().unwrap(), InstallSource::Cli);
        assert!("npm".parse::<InstallSource>().is_err());
    }

    #[test]
    fn skill_converts_into_scoring_inputs() {
        let skill = Skill {
            id: Uuid::nil(),
            slug: "test-runner".into(),
            name: "Test Runner".into(),
            name_ko: None,
            summary_en: Some("Runs tests".into()),
            summary_ko: None,
            description_en: None,
            description_ko: None,
            category_id: Some("testing".into()),
            tags: vec!["tests".into()],
            github_url: None,
            github_owner: None,
            github_repo: None,
            is_official: false,
            stars: 7,
            view_count: 100,
            install_count: 4,
            good_count: 2,
            bad_count: 1,
            view_count_snapshot: 90,
            install_count_snapshot: 4,
            good_count_snapshot: 2,
            github_created_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let signals = SkillSignals::from(&skill);
        assert_eq!(signals.view_count, 100);
        assert_eq!(signals.view_count_snapshot, 90);

        let doc = SearchDoc::from(&skill);
        assert_eq!(doc.name, "Test Runner");
        assert_eq!(doc.stars, 7);
        assert_eq!(doc.tags.len(), 1);
    }
}
