//! Prompt builder: turn the neighbour set into an image-generation prompt.

use std::collections::HashMap;

use crate::similarity::Neighbor;
use crate::types::TagField;

/// Prompt used when no neighbours were found.
pub const FALLBACK_PROMPT: &str = "A mysterious and surreal dreamscape with neutral emotions.";

/// Placeholder theme when no neighbour carries one.
pub const DEFAULT_THEME: &str = "everyday";
/// Placeholder setting when no neighbour carries one.
pub const DEFAULT_SETTING: &str = "unknown";
/// Placeholder emotion when no neighbour carries one.
pub const DEFAULT_EMOTION: &str = "neutral";

/// Most frequent tag for `field` across the neighbours.
///
/// Tags are flattened nearest-neighbour first, then in stored order within
/// each record. Ties go to the value encountered first in that order.
pub fn most_frequent_tag<'a>(neighbors: &[Neighbor<'a>], field: TagField) -> Option<&'a str> {
    // tag -> (count, first position)
    let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    let flattened = neighbors
        .iter()
        .flat_map(|n| n.record.tags(field).iter().map(String::as_str));
    for (position, tag) in flattened.enumerate() {
        counts.entry(tag).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .min_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_b.cmp(count_a).then(first_a.cmp(first_b))
        })
        .map(|(tag, _)| tag)
}

/// Build the prompt for a neighbour set.
pub fn build_prompt(neighbors: &[Neighbor<'_>]) -> String {
    if neighbors.is_empty() {
        return FALLBACK_PROMPT.to_string();
    }

    let theme = most_frequent_tag(neighbors, TagField::Themes).unwrap_or(DEFAULT_THEME);
    let setting = most_frequent_tag(neighbors, TagField::Settings).unwrap_or(DEFAULT_SETTING);
    let emotion = most_frequent_tag(neighbors, TagField::Emotions).unwrap_or(DEFAULT_EMOTION);

    format!(
        "A dreamlike, surreal scene about '{theme}' taking place in a '{setting}'. \
         The atmosphere feels '{emotion}'."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DreamRecord;

    fn record(themes: &[&str], settings: &[&str], emotions: &[&str]) -> DreamRecord {
        let owned = |v: &[&str]| v.iter().map(|s| (*s).to_string()).collect();
        DreamRecord {
            themes: owned(themes),
            settings: owned(settings),
            emotions: owned(emotions),
            ..DreamRecord::default()
        }
    }

    fn neighbors(records: &[DreamRecord]) -> Vec<Neighbor<'_>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| Neighbor {
                index,
                distance: 0.0,
                record,
            })
            .collect()
    }

    #[test]
    fn test_empty_neighbors_fallback() {
        assert_eq!(build_prompt(&[]), FALLBACK_PROMPT);
    }

    #[test]
    fn test_single_neighbor_prompt() {
        let records = vec![record(&["flying"], &["home"], &["happy"])];
        assert_eq!(
            build_prompt(&neighbors(&records)),
            "A dreamlike, surreal scene about 'flying' taking place in a 'home'. The atmosphere feels 'happy'."
        );
    }

    #[test]
    fn test_mode_across_neighbors() {
        let records = vec![
            record(&["chase"], &["city"], &["fear"]),
            record(&["flying", "chase"], &["home"], &["happy"]),
            record(&["flying"], &["home", "school"], &["fear", "sad"]),
        ];
        let n = neighbors(&records);
        assert_eq!(most_frequent_tag(&n, TagField::Themes), Some("chase"));
        assert_eq!(most_frequent_tag(&n, TagField::Settings), Some("home"));
        assert_eq!(most_frequent_tag(&n, TagField::Emotions), Some("fear"));
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let records = vec![
            record(&["zebra"], &["school"], &["sad"]),
            record(&["apple"], &["city"], &["happy"]),
        ];
        let n = neighbors(&records);
        assert_eq!(most_frequent_tag(&n, TagField::Themes), Some("zebra"));
        assert_eq!(most_frequent_tag(&n, TagField::Settings), Some("school"));

        // Same counts, reversed neighbour order flips the winner.
        let reversed: Vec<Neighbor<'_>> = n.iter().rev().copied().collect();
        assert_eq!(most_frequent_tag(&reversed, TagField::Themes), Some("apple"));
    }

    #[test]
    fn test_empty_field_uses_placeholder() {
        let records = vec![record(&[], &["home"], &[])];
        assert_eq!(
            build_prompt(&neighbors(&records)),
            "A dreamlike, surreal scene about 'everyday' taking place in a 'home'. The atmosphere feels 'neutral'."
        );
    }
}
