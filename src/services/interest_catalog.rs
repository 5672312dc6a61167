//! Built-in interest catalog and the curated lists mined for each interest.

use std::collections::{BTreeMap, HashSet};

use crate::domain::models::CuratedList;

/// Reputation assumed for a curated GitHub awesome-list.
pub const GITHUB_LIST_REPUTATION: u32 = 5000;
/// Reputation assumed for a subreddit wiki page.
pub const WIKI_REPUTATION: u32 = 1000;

/// Predefined interests, grouped for display.
pub const PREDEFINED_INTERESTS: &[(&str, &[&str])] = &[
    (
        "Tech & Development",
        &[
            "AI & Machine Learning",
            "Rust",
            "Python",
            "JavaScript & Web Dev",
            "Linux",
            "Self-Hosting",
            "Homelab",
            "3D Printing",
            "Mechanical Keyboards",
            "Open Source",
            "Docker & Containers",
            "Raspberry Pi",
        ],
    ),
    (
        "Creative Arts",
        &["Digital Art & Procreate", "Photography", "Music Production", "Writing & Storytelling"],
    ),
    (
        "Home & Living",
        &["Gardening", "Interior Design & Aesthetics", "Cooking & Recipes", "DIY & Home Improvement"],
    ),
    ("Gaming", &["Minecraft", "Roblox", "Indie Games"]),
    (
        "Lifestyle",
        &["Fashion & Style", "Pets & Animals", "Fitness & Wellness", "Coffee & Tea Culture"],
    ),
    ("Learning & Discovery", &["Science & Space", "History", "Today I Learned"]),
];

/// Every predefined interest, in catalog order.
pub fn predefined_interests() -> Vec<String> {
    PREDEFINED_INTERESTS
        .iter()
        .flat_map(|(_, interests)| interests.iter().map(|i| (*i).to_string()))
        .collect()
}

/// Union of the catalog and user interests, deduplicated ignoring case.
/// The catalog comes first and the first spelling seen wins.
pub fn merge_interests<I, S>(catalog: &[String], user: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    let user: Vec<String> = user.into_iter().map(|s| s.as_ref().trim().to_string()).collect();
    for interest in catalog.iter().chain(user.iter()) {
        if interest.is_empty() {
            continue;
        }
        if seen.insert(interest.to_lowercase()) {
            merged.push(interest.clone());
        }
    }
    merged
}

fn github(repo: &str) -> CuratedList {
    CuratedList::github(format!("https://github.com/{repo}"), GITHUB_LIST_REPUTATION)
}

fn wiki(subreddit: &str) -> CuratedList {
    CuratedList::reddit_wiki(format!("https://www.reddit.com/r/{subreddit}/wiki/index"), WIKI_REPUTATION)
}

/// Built-in curated lists per interest.
pub fn default_curated_lists() -> BTreeMap<String, Vec<CuratedList>> {
    let lists = [
        ("Rust", vec![github("rust-unofficial/awesome-rust"), wiki("rust")]),
        ("Python", vec![github("vinta/awesome-python"), wiki("Python")]),
        (
            "AI & Machine Learning",
            vec![
                github("josephmisiti/awesome-machine-learning"),
                github("ChristosChristofidis/awesome-deep-learning"),
                wiki("MachineLearning"),
            ],
        ),
        ("JavaScript & Web Dev", vec![github("sorrycc/awesome-javascript"), wiki("webdev")]),
        ("Linux", vec![github("inputsh/awesome-linux"), wiki("linux")]),
        ("Self-Hosting", vec![github("awesome-selfhosted/awesome-selfhosted"), wiki("selfhosted")]),
        ("Open Source", vec![github("sindresorhus/awesome")]),
        ("Photography", vec![github("ibaaj/awesome-OpenSourcePhotography"), wiki("photography")]),
        ("Cooking & Recipes", vec![wiki("Cooking")]),
        ("Minecraft", vec![wiki("Minecraft")]),
    ];

    lists
        .into_iter()
        .map(|(interest, lists)| (interest.to_string(), lists))
        .collect()
}

/// Built-in lists with configured overrides applied per interest.
pub fn curated_lists_with_overrides(
    overrides: &BTreeMap<String, Vec<CuratedList>>,
) -> BTreeMap<String, Vec<CuratedList>> {
    let mut lists = default_curated_lists();
    for (interest, configured) in overrides {
        lists.retain(|existing, _| !existing.eq_ignore_ascii_case(interest));
        lists.insert(interest.clone(), configured.clone());
    }
    lists
}
