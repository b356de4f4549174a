//! Pure listing logic for `GET /v1/skills`: candidates come in, a filtered
//! and ordered page goes out. Scores are computed per call and never stored,
//! so this layer needs no database and tests without one.

use chrono::{DateTime, Utc};
use database::models::Skill;
use ranking::{popularity_score, relevance, trending_score, SearchDoc, SkillSignals};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Popular,
    Trending,
    #[default]
    Stars,
    Good,
    Installs,
    Views,
    Recent,
}

impl SortKey {
    /// Unknown or missing values fall back to the default instead of
    /// erroring, mirroring the directory's lenient query parsing.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("popular") => SortKey::Popular,
            Some("trending") => SortKey::Trending,
            Some("good") => SortKey::Good,
            Some("installs") => SortKey::Installs,
            Some("views") => SortKey::Views,
            Some("recent") => SortKey::Recent,
            _ => SortKey::Stars,
        }
    }
}

pub struct ListingQuery<'a> {
    pub q: Option<&'a str>,
    pub tag: Option<&'a str>,
    pub sort: SortKey,
    pub limit: i64,
    pub offset: i64,
    pub now: DateTime<Utc>,
}

/// Filters, orders, and pages the candidate set.
///
/// A search query gates candidates on relevance > 0 no matter which sort is
/// chosen. Under the default sort the relevance score also orders the page;
/// an explicit sort key keeps the gate but orders by its own column.
pub fn build_page(candidates: Vec<Skill>, query: &ListingQuery<'_>) -> Vec<Skill> {
    let q = query.q.map(str::trim).filter(|q| !q.is_empty());

    let mut rows: Vec<(Skill, f64)> = Vec::with_capacity(candidates.len());
    for skill in candidates {
        if let Some(tag) = query.tag {
            if !skill.tags.iter().any(|t| t == tag) {
                continue;
            }
        }

        let score = match q {
            Some(q) => {
                let score = relevance(&SearchDoc::from(&skill), q);
                if score <= 0.0 {
                    continue;
                }
                score
            }
            None => 0.0,
        };

        rows.push((skill, score));
    }

    if q.is_some() && query.sort == SortKey::Stars {
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    } else {
        sort_rows(&mut rows, query.sort, query.now);
    }

    paginate(rows, query.limit, query.offset)
}

/// Trending feed for the discover page: every candidate scored, highest
/// first, truncated to `n`.
pub fn top_trending(mut candidates: Vec<Skill>, n: usize, now: DateTime<Utc>) -> Vec<Skill> {
    candidates.sort_by(|a, b| {
        trending_score(&SkillSignals::from(b), now)
            .total_cmp(&trending_score(&SkillSignals::from(a), now))
    });
    candidates.truncate(n);
    candidates
}

fn sort_rows(rows: &mut [(Skill, f64)], sort: SortKey, now: DateTime<Utc>) {
    match sort {
        SortKey::Popular => rows.sort_by(|a, b| {
            popularity_score(&SkillSignals::from(&b.0))
                .total_cmp(&popularity_score(&SkillSignals::from(&a.0)))
        }),
        SortKey::Trending => rows.sort_by(|a, b| {
            trending_score(&SkillSignals::from(&b.0), now)
                .total_cmp(&trending_score(&SkillSignals::from(&a.0), now))
        }),
        SortKey::Stars => rows.sort_by(|a, b| b.0.stars.cmp(&a.0.stars)),
        SortKey::Good => rows.sort_by(|a, b| b.0.good_count.cmp(&a.0.good_count)),
        SortKey::Installs => rows.sort_by(|a, b| b.0.install_count.cmp(&a.0.install_count)),
        SortKey::Views => rows.sort_by(|a, b| b.0.view_count.cmp(&a.0.view_count)),
        SortKey::Recent => rows.sort_by(|a, b| b.0.updated_at.cmp(&a.0.updated_at)),
    }
}

fn paginate(rows: Vec<(Skill, f64)>, limit: i64, offset: i64) -> Vec<Skill> {
    let limit = limit.clamp(0, MAX_LIMIT) as usize;
    let offset = offset.max(0) as usize;

    rows.into_iter()
        .map(|(skill, _)| skill)
        .skip(offset)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn skill(slug: &str) -> Skill {
        let t = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        Skill {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            name: slug.to_string(),
            name_ko: None,
            summary_en: None,
            summary_ko: None,
            description_en: None,
            description_ko: None,
            category_id: Some("development".to_string()),
            tags: Vec::new(),
            github_url: None,
            github_owner: None,
            github_repo: None,
            is_official: false,
            stars: 0,
            view_count: 0,
            install_count: 0,
            good_count: 0,
            bad_count: 0,
            view_count_snapshot: 0,
            install_count_snapshot: 0,
            good_count_snapshot: 0,
            github_created_at: None,
            created_at: t,
            updated_at: t,
        }
    }

    fn query(now: DateTime<Utc>) -> ListingQuery<'static> {
        ListingQuery {
            q: None,
            tag: None,
            sort: SortKey::Stars,
            limit: DEFAULT_LIMIT,
            offset: 0,
            now,
        }
    }

    fn slugs(page: &[Skill]) -> Vec<&str> {
        page.iter().map(|s| s.slug.as_str()).collect()
    }

    #[test]
    fn unknown_sort_values_fall_back_to_stars() {
        assert_eq!(SortKey::parse(None), SortKey::Stars);
        assert_eq!(SortKey::parse(Some("stars")), SortKey::Stars);
        assert_eq!(SortKey::parse(Some("banana")), SortKey::Stars);
        assert_eq!(SortKey::parse(Some("trending")), SortKey::Trending);
    }

    #[test]
    fn default_sort_orders_by_stars() {
        let now = Utc::now();
        let mut a = skill("small");
        a.stars = 10;
        let mut b = skill("big");
        b.stars = 900;
        let mut c = skill("mid");
        c.stars = 40;

        let page = build_page(vec![a, b, c], &query(now));
        assert_eq!(slugs(&page), ["big", "mid", "small"]);
    }

    #[test]
    fn popular_sort_weighs_votes_over_stars() {
        let now = Utc::now();
        // 900 stars is worth 9 points; 20 good votes are worth 200.
        let mut starred = skill("starred");
        starred.stars = 900;
        let mut voted = skill("voted");
        voted.good_count = 20;

        let mut q = query(now);
        q.sort = SortKey::Popular;
        let page = build_page(vec![starred, voted], &q);
        assert_eq!(slugs(&page), ["voted", "starred"]);
    }

    #[test]
    fn trending_sort_rewards_recent_deltas() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();

        let mut quiet = skill("quiet");
        quiet.view_count = 10_000;
        quiet.view_count_snapshot = 10_000;
        quiet.created_at = now - Duration::days(300);

        let mut riser = skill("riser");
        riser.view_count = 600;
        riser.view_count_snapshot = 100;
        riser.created_at = now - Duration::days(2);

        let mut q = query(now);
        q.sort = SortKey::Trending;
        let page = build_page(vec![quiet, riser], &q);
        assert_eq!(slugs(&page), ["riser", "quiet"]);
    }

    #[test]
    fn recent_sort_uses_update_time() {
        let now = Utc::now();
        let mut stale = skill("stale");
        stale.updated_at = now - Duration::days(30);
        let mut fresh = skill("fresh");
        fresh.updated_at = now - Duration::hours(1);

        let mut q = query(now);
        q.sort = SortKey::Recent;
        let page = build_page(vec![stale, fresh], &q);
        assert_eq!(slugs(&page), ["fresh", "stale"]);
    }

    #[test]
    fn tag_filter_requires_exact_membership() {
        let now = Utc::now();
        let mut tagged = skill("tagged");
        tagged.tags = vec!["review".to_string()];
        let mut partial = skill("partial");
        partial.tags = vec!["reviewer".to_string()];

        let mut q = query(now);
        q.tag = Some("review");
        let page = build_page(vec![tagged, partial], &q);
        assert_eq!(slugs(&page), ["tagged"]);
    }

    #[test]
    fn search_gates_and_orders_by_relevance_under_default_sort() {
        let now = Utc::now();
        let mut exact = skill("exact");
        exact.name = "deploy".to_string();
        let mut partial = skill("partial");
        partial.name = "deploy-helper".to_string();
        // Stars alone must not survive the gate.
        let mut unrelated = skill("unrelated");
        unrelated.stars = 1_000_000;

        let mut q = query(now);
        q.q = Some("deploy");
        let page = build_page(vec![partial, unrelated, exact], &q);
        assert_eq!(slugs(&page), ["exact", "partial"]);
    }

    #[test]
    fn explicit_sort_keeps_the_relevance_gate() {
        let now = Utc::now();
        let mut low_views = skill("low-views");
        low_views.name = "deploy".to_string();
        low_views.view_count = 5;
        let mut high_views = skill("high-views");
        high_views.name = "deploy-helper".to_string();
        high_views.view_count = 500;
        let mut noise = skill("noise");
        noise.view_count = 9_999;

        let mut q = query(now);
        q.q = Some("deploy");
        q.sort = SortKey::Views;
        let page = build_page(vec![low_views, noise, high_views], &q);
        // Gated to matches, but ordered by views rather than relevance.
        assert_eq!(slugs(&page), ["high-views", "low-views"]);
    }

    #[test]
    fn blank_search_is_ignored() {
        let now = Utc::now();
        let a = skill("a");
        let b = skill("b");

        let mut q = query(now);
        q.q = Some("   ");
        let page = build_page(vec![a, b], &q);
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn pagination_clamps_limit_and_offset() {
        let now = Utc::now();
        let candidates: Vec<Skill> = (0..150).map(|i| skill(&format!("s{i}"))).collect();

        let mut q = query(now);
        q.limit = 5_000;
        let page = build_page(candidates.clone(), &q);
        assert_eq!(page.len(), MAX_LIMIT as usize);

        let mut q = query(now);
        q.offset = 145;
        let page = build_page(candidates.clone(), &q);
        assert_eq!(page.len(), 5);

        let mut q = query(now);
        q.offset = 10_000;
        let page = build_page(candidates, &q);
        assert!(page.is_empty());
    }

    #[test]
    fn top_trending_truncates_after_ordering() {
        let now = Utc::now();
        let candidates: Vec<Skill> = (0..40)
            .map(|i| {
                let mut s = skill(&format!("s{i}"));
                s.view_count = i;
                s.created_at = now - Duration::days(10);
                s
            })
            .collect();

        let top = top_trending(candidates, 30, now);
        assert_eq!(top.len(), 30);
        assert_eq!(top[0].slug, "s39");
        assert_eq!(top[29].slug, "s10");
    }
}
