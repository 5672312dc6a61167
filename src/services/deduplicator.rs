//! Cross-channel candidate merging.

use std::collections::HashMap;

use crate::domain::models::{CandidateSource, SourceIdentity};

/// Merge candidates sharing an identity, keeping first-seen order.
///
/// The first record wins; later duplicates contribute their channels,
/// interests, a missing URL and metadata gaps.
pub fn deduplicate(candidates: impl IntoIterator<Item = CandidateSource>) -> Vec<CandidateSource> {
    let mut index: HashMap<SourceIdentity, usize> = HashMap::new();
    let mut merged: Vec<CandidateSource> = Vec::new();

    for candidate in candidates {
        match index.get(&candidate.identity) {
            Some(&position) => {
                let existing = &mut merged[position];
                existing.discovered_via.extend(candidate.discovered_via);
                existing.interests.extend(candidate.interests);
                if existing.url.is_none() {
                    existing.url = candidate.url;
                }
                existing.metadata.merge(candidate.metadata);
            }
            None => {
                index.insert(candidate.identity.clone(), merged.len());
                merged.push(candidate);
            }
        }
    }

    merged
}
