const NAME_EXACT: f64 = 100.0;
const NAME_PARTIAL: f64 = 50.0;
const TAG_EXACT: f64 = 40.0;
const TAG_PARTIAL: f64 = 20.0;
const SUMMARY_MATCH: f64 = 15.0;
const DESCRIPTION_MATCH: f64 = 5.0;
const STARS_TIEBREAK_WEIGHT: f64 = 2.0;

/// Searchable text fields of one skill, both locales.
#[derive(Debug, Clone, Copy)]
pub struct SearchDoc<'a> {
    pub name: &'a str,
    pub name_ko: Option<&'a str>,
    pub summary_en: Option<&'a str>,
    pub summary_ko: Option<&'a str>,
    pub description_en: Option<&'a str>,
    pub description_ko: Option<&'a str>,
    pub tags: &'a [String],
    pub stars: i64,
}

/// Weighted text relevance of a query against one skill.
///
/// Scoring weights:
///   name exact match:     100
///   name contains:         50
///   tag exact match:      +40
///   tag partial match:    +20
///   summary contains:     +15
///   description contains:  +5
///   popularity tiebreak:  +log10(stars) x 2
///
/// All comparisons are case-insensitive on the lowercased query. A score of
/// 0 means "no match, exclude from results"; the popularity tiebreak only
/// refines an existing text match and never creates one on its own.
pub fn relevance(doc: &SearchDoc<'_>, query: &str) -> f64 {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;

    // Name match (highest priority, exact beats partial)
    let name = doc.name.to_lowercase();
    let name_ko = doc.name_ko.map(str::to_lowercase);
    if name == q || name_ko.as_deref() == Some(q.as_str()) {
        score += NAME_EXACT;
    } else if name.contains(&q) || name_ko.as_deref().is_some_and(|n| n.contains(&q)) {
        score += NAME_PARTIAL;
    }

    // Tag match, exact beats partial
    if doc.tags.iter().any(|t| t.to_lowercase() == q) {
        score += TAG_EXACT;
    } else if doc.tags.iter().any(|t| t.to_lowercase().contains(&q)) {
        score += TAG_PARTIAL;
    }

    if contains_ci(doc.summary_en, &q) || contains_ci(doc.summary_ko, &q) {
        score += SUMMARY_MATCH;
    }

    if contains_ci(doc.description_en, &q) || contains_ci(doc.description_ko, &q) {
        score += DESCRIPTION_MATCH;
    }

    // Gated tiebreak: stars alone never turn a non-match into a result.
    if score > 0.0 && doc.stars > 0 {
        score += (doc.stars as f64).log10() * STARS_TIEBREAK_WEIGHT;
    }

    score
}

fn contains_ci(field: Option<&str>, q: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(q))
}
