use crate::config::EngineConfig;
use crate::template;

/// Ranks candidates within a single query.
#[derive(Debug, Clone)]
pub struct Scorer {
    base: i64,
    arg_bonus: i64,
    bulk_base: i64,
    similarity_multiplier: i64,
    title_similarity: bool,
}

impl Scorer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            base: config.base_score,
            arg_bonus: config.arg_bonus,
            bulk_base: config.bulk_base,
            similarity_multiplier: config.similarity_multiplier,
            title_similarity: config.title_similarity,
        }
    }

    /// Scores one rendered binding.
    ///
    /// `remainder` is the argument portion of the search, compared against the
    /// title when title similarity is enabled.
    pub fn score(&self, url_template: &str, args: &[String], title: &str, remainder: &str) -> i64 {
        let used = template::placeholders_used(url_template, args.len()) as i64;
        let mut score = self.base + self.arg_bonus * used;

        if self.title_similarity {
            score += self.similarity_multiplier * similarity(remainder, title);
        }

        score
    }

    /// Score of the bulk open candidate, given the placeholder count of every member.
    pub fn bulk_score(&self, total_placeholders: usize) -> i64 {
        self.bulk_base + self.arg_bonus * total_placeholders as i64
    }
}

/// Overlap length minus the Levenshtein distance of both strings cut to their
/// common length, compared case-insensitively. Zero if either is empty.
fn similarity(remainder: &str, title: &str) -> i64 {
    let lhs = remainder.trim().to_lowercase();
    let rhs = title.trim().to_lowercase();

    let overlap = lhs.chars().count().min(rhs.chars().count());
    if overlap == 0 {
        return 0;
    }

    let lhs: String = lhs.chars().take(overlap).collect();
    let rhs: String = rhs.chars().take(overlap).collect();

    overlap as i64 - strsim::levenshtein(&lhs, &rhs) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn base_score_without_arguments() {
        let scorer = Scorer::new(&EngineConfig::default());
        assert_eq!(scorer.score("https://github.com/{0}", &[], "GitHub", ""), 1000);
        assert_eq!(scorer.score("https://github.com", &args(&["x"]), "GitHub", "x"), 1000);
    }

    #[test]
    fn bonus_per_used_placeholder() {
        let scorer = Scorer::new(&EngineConfig::default());
        assert_eq!(scorer.score("https://github.com/{0}", &args(&["torvalds"]), "GitHub", "torvalds"), 1100);
        assert_eq!(scorer.score("https://x.io/{0}/{1}", &args(&["a", "b", "c"]), "X", "a-b-c"), 1200);
    }

    #[test]
    fn title_similarity_rewards_close_titles() {
        let config = EngineConfig { title_similarity: true, ..Default::default() };
        let scorer = Scorer::new(&config);

        // "git" vs "Git": overlap 3, distance 0
        assert_eq!(scorer.score("https://github.com", &[], "GitHub", "git"), 1000 + 3 * 50);
        // "gxt" vs "git": overlap 3, distance 1
        assert_eq!(scorer.score("https://github.com", &[], "GitHub", "gxt"), 1000 + 2 * 50);
        assert_eq!(scorer.score("https://github.com", &[], "GitHub", ""), 1000);
    }

    #[test]
    fn bulk_score_counts_all_placeholders() {
        let scorer = Scorer::new(&EngineConfig::default());
        assert_eq!(scorer.bulk_score(0), 10_000);
        assert_eq!(scorer.bulk_score(3), 10_300);
    }

    #[test]
    fn similarity_only_compares_the_overlap() {
        // "kit" against "sit" of "sitting"
        assert_eq!(similarity("kitten", "sit"), 2);
        assert_eq!(similarity("Same", "same"), 4);
        assert_eq!(similarity("", "abc"), 0);
        // non-ascii counts characters, not bytes
        assert_eq!(similarity("äöü", "äöx extra"), 2);
    }
}
