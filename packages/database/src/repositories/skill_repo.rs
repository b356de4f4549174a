use crate::models::{Skill, VoteCounts, VoteType};
use sqlx::{PgPool, Result};
use uuid::Uuid;

pub struct SkillRepository {
    pool: PgPool,
}

impl SkillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Candidate rows for the listing layer. Category narrows in SQL; tag
    /// and text filtering happen in the caller, where scoring already runs
    /// over every candidate anyway.
    pub async fn list_candidates(&self, category: Option<&str>) -> Result<Vec<Skill>> {
        match category {
            Some(category) => {
                sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE category_id = $1")
                    .bind(category)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, Skill>("SELECT * FROM skills")
                    .fetch_all(&self.pool)
                    .await
            }
        }
    }

    /// Detail lookup accepts either the UUID or the slug.
    pub async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Skill>> {
        sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE slug = $1 OR id::text = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn increment_view_count(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE skills SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Applies a vote, undoing the caller's previous vote when one is
    /// given. Returns `None` when the skill does not exist.
    pub async fn cast_vote(
        &self,
        id: Uuid,
        vote: VoteType,
        previous: Option<VoteType>,
    ) -> Result<Option<VoteCounts>> {
        let (good_delta, bad_delta) = vote_deltas(Some(vote), previous);
        self.apply_vote_deltas(id, good_delta, bad_delta).await
    }

    /// Removes a previously cast vote.
    pub async fn retract_vote(&self, id: Uuid, vote: VoteType) -> Result<Option<VoteCounts>> {
        let (good_delta, bad_delta) = vote_deltas(None, Some(vote));
        self.apply_vote_deltas(id, good_delta, bad_delta).await
    }

    /// Single statement so a changed vote can never leave the counters
    /// half-updated. GREATEST keeps a decrement from pushing below zero.
    async fn apply_vote_deltas(
        &self,
        id: Uuid,
        good_delta: i64,
        bad_delta: i64,
    ) -> Result<Option<VoteCounts>> {
        sqlx::query_as::<_, VoteCounts>(
            r#"
            UPDATE skills
            SET good_count = GREATEST(good_count + $2, 0),
                bad_count = GREATEST(bad_count + $3, 0)
            WHERE id = $1
            RETURNING good_count, bad_count
            "#,
        )
        .bind(id)
        .bind(good_delta)
        .bind(bad_delta)
        .fetch_optional(&self.pool)
        .await
    }

    /// Recently added skills with at least `min_stars`, newest first.
    pub async fn list_new(&self, min_stars: i64, limit: i64) -> Result<Vec<Skill>> {
        sqlx::query_as::<_, Skill>(
            "SELECT * FROM skills WHERE stars >= $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(min_stars)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}

/// Net effect of a vote transition on (good_count, bad_count). `cast` is the
/// incoming vote, `retract` the one being withdrawn; casting the same vote
/// again nets to zero.
fn vote_deltas(cast: Option<VoteType>, retract: Option<VoteType>) -> (i64, i64) {
    let mut good: i64 = 0;
    let mut bad: i64 = 0;
    match cast {
        Some(VoteType::Good) => good += 1,
        Some(VoteType::Bad) => bad += 1,
        None => {}
    }
    match retract {
        Some(VoteType::Good) => good -= 1,
        Some(VoteType::Bad) => bad -= 1,
        None => {}
    }
    (good, bad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_vote_only_increments() {
        assert_eq!(vote_deltas(Some(VoteType::Good), None), (1, 0));
        assert_eq!(vote_deltas(Some(VoteType::Bad), None), (0, 1));
    }

    #[test]
    fn changed_vote_moves_one_count_to_the_other() {
        assert_eq!(
            vote_deltas(Some(VoteType::Good), Some(VoteType::Bad)),
            (1, -1)
        );
        assert_eq!(
            vote_deltas(Some(VoteType::Bad), Some(VoteType::Good)),
            (-1, 1)
        );
    }

    #[test]
    fn repeated_vote_is_a_no_op() {
        assert_eq!(
            vote_deltas(Some(VoteType::Good), Some(VoteType::Good)),
            (0, 0)
        );
    }

    #[test]
    fn retraction_only_decrements() {
        assert_eq!(vote_deltas(None, Some(VoteType::Good)), (-1, 0));
        assert_eq!(vote_deltas(None, Some(VoteType::Bad)), (0, -1));
    }
}
