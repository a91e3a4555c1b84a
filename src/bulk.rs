use itertools::Itertools;
use url::Url;

use crate::binding::Binding;
use crate::engine::MatchCandidate;
use crate::opener::UrlOpener;
use crate::score::Scorer;
use crate::template;

#[derive(Debug, Clone)]
pub struct BulkMember {
    pub binding: Binding,
    pub args: Vec<String>,
    pub url: Url,
}

/// The synthesized "open all" candidate.
#[derive(Debug, Clone)]
pub struct AggregateCandidate {
    pub members: Vec<BulkMember>,
    pub title: String,
    pub subtitle: String,
    pub score: i64,
}

/// Builds the bulk open candidate from every bulk-enabled candidate.
/// Needs at least two of them, otherwise there is nothing to aggregate.
pub fn aggregate(candidates: &[MatchCandidate], search: &str, scorer: &Scorer) -> Option<AggregateCandidate> {
    let members = candidates
        .iter()
        .filter(|candidate| candidate.binding.include_in_bulk_open)
        .map(|candidate| BulkMember {
            binding: candidate.binding.clone(),
            args: candidate.args.clone(),
            url: candidate.url.clone(),
        })
        .collect_vec();

    if members.len() < 2 {
        return None;
    }

    let total_placeholders = members
        .iter()
        .map(|member| template::count_placeholders(&member.binding.url_template))
        .sum();

    let args = members.iter().flat_map(|member| &member.args).unique().join(", ");

    let mut subtitle = format!("Open all matching links for '{}'", search.trim());
    if !args.is_empty() {
        subtitle += &format!(" with {args}");
    }

    Some(AggregateCandidate {
        title: format!("Bulk Open ({} items)", members.len()),
        subtitle,
        score: scorer.bulk_score(total_placeholders),
        members,
    })
}

impl AggregateCandidate {
    /// Opens every member. A failing member is logged and skipped, the rest
    /// are still attempted. Returns whether all of them opened.
    pub fn open_all(&self, opener: &dyn UrlOpener) -> bool {
        let mut all_opened = true;

        for member in &self.members {
            if let Err(err) = opener.open(&member.url) {
                log::warn!("bulk open of {} failed: {}", member.binding, err);
                all_opened = false;
            }
        }

        all_opened
    }
}
