//! Link aggregation
//!
//! Turns the flat link list returned by the store into the ordered category
//! groups the dashboard renders. Pure and deterministic: the output depends
//! only on the input multiset, never on its order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::storage::Link;

/// Reserved label for links without a (non-blank) category.
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub name: String,
    pub links: Vec<Link>,
}

/// Trimmed category, or [`OTHER_CATEGORY`] when absent or blank.
pub fn effective_category(link: &Link) -> &str {
    match link.category.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label,
        _ => OTHER_CATEGORY,
    }
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a == OTHER_CATEGORY, b == OTHER_CATEGORY) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

/// Total order: label ("Other" last), lower-cased name, exact name, id.
fn compare_links(a: &Link, b: &Link) -> Ordering {
    compare_labels(effective_category(a), effective_category(b))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Group and order links for presentation.
///
/// Every input link lands in exactly one group. Empty input gives an empty
/// vector, never a single empty group.
pub fn group_links(mut links: Vec<Link>) -> Vec<CategoryGroup> {
    links.sort_by(compare_links);

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for link in links {
        let label = effective_category(&link);
        match groups.last_mut() {
            Some(group) if group.name == label => group.links.push(link),
            _ => groups.push(CategoryGroup {
                name: label.to_string(),
                links: vec![link],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn link(id: i64, name: &str, category: Option<&str>) -> Link {
        Link {
            id,
            name: name.to_string(),
            url: format!("https://example.com/{}", id),
            icon: None,
            category: category.map(str::to_string),
            colour: None,
            hit_count: 0,
            created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Link> {
        vec![
            link(1, "zeta", Some("Work")),
            link(2, "Alpha", None),
            link(3, "beta", Some("  ")),
            link(4, "Abc", Some("Home")),
            link(5, "ABC", Some("Home")),
            link(6, "gamma", Some(" Work ")),
            link(7, "Delta", Some("Zoo")),
            link(8, "abc", Some("Home")),
        ]
    }

    fn names(groups: &[CategoryGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.name.as_str()).collect()
    }

    fn ids(groups: &[CategoryGroup]) -> Vec<i64> {
        groups
            .iter()
            .flat_map(|g| g.links.iter().map(|l| l.id))
            .collect()
    }

    #[test]
    fn groups_example_in_label_order_with_other_last() {
        let groups = group_links(vec![
            link(1, "A", None),
            link(2, "B", Some("Work")),
            link(3, "C", Some("Home")),
        ]);

        assert_eq!(names(&groups), vec!["Home", "Work", "Other"]);
        assert_eq!(groups[0].links[0].name, "C");
        assert_eq!(groups[1].links[0].name, "B");
        assert_eq!(groups[2].links[0].name, "A");
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(group_links(Vec::new()).is_empty());
    }

    #[test]
    fn partitions_input_exactly() {
        let input = sample();
        let groups = group_links(input.clone());

        let mut seen = ids(&groups);
        seen.sort_unstable();
        let mut expected: Vec<i64> = input.iter().map(|l| l.id).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
        assert!(groups.iter().all(|g| !g.links.is_empty()));
    }

    #[test]
    fn blank_and_missing_categories_share_one_other_group() {
        let groups = group_links(sample());
        let others: Vec<_> = groups.iter().filter(|g| g.name == OTHER_CATEGORY).collect();

        assert_eq!(others.len(), 1);
        assert_eq!(groups.last().unwrap().name, OTHER_CATEGORY);
        assert_eq!(others[0].links.len(), 2);
    }

    #[test]
    fn other_sorts_after_labels_that_compare_greater() {
        let groups = group_links(vec![
            link(1, "x", None),
            link(2, "y", Some("Zzz")),
            link(3, "z", Some("zebra")),
        ]);
        assert_eq!(names(&groups), vec!["Zzz", "zebra", "Other"]);
    }

    #[test]
    fn category_is_trimmed_before_grouping() {
        let groups = group_links(sample());
        let work = groups.iter().find(|g| g.name == "Work").unwrap();
        assert_eq!(work.links.len(), 2);
    }

    #[test]
    fn names_compare_case_insensitively_with_stable_tie_break() {
        let groups = group_links(sample());
        let home = groups.iter().find(|g| g.name == "Home").unwrap();
        let order: Vec<&str> = home.links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(order, vec!["ABC", "Abc", "abc"]);
    }

    #[test]
    fn identical_names_fall_back_to_id() {
        let groups = group_links(vec![link(9, "Docs", None), link(3, "Docs", None)]);
        assert_eq!(ids(&groups), vec![3, 9]);
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let forward = group_links(sample());

        let mut reversed = sample();
        reversed.reverse();
        assert_eq!(group_links(reversed), forward);

        let mut rotated = sample();
        rotated.rotate_left(3);
        assert_eq!(group_links(rotated), forward);
    }

    #[test]
    fn regrouping_flattened_output_is_idempotent() {
        let once = group_links(sample());
        let flattened: Vec<Link> = once.iter().flat_map(|g| g.links.clone()).collect();
        assert_eq!(group_links(flattened), once);
    }
}
