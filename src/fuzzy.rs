use std::collections::BTreeSet;

/// Minimum 0-100 similarity for a fuzzy match to be accepted. Anything
/// below this is treated as "no match" rather than a weak guess.
pub const DEFAULT_MIN_SCORE: u32 = 70;

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Plain edit-distance similarity, scored 0-100.
pub fn ratio(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 100;
    }
    ((longest - levenshtein(&a, &b)) * 100 / longest) as u32
}

fn tokens(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Similarity that tolerates word reordering: tokens are sorted before
/// comparison. Used for free-text descriptions.
pub fn token_sort_ratio(a: &str, b: &str) -> u32 {
    let mut ta = tokens(a);
    let mut tb = tokens(b);
    ta.sort();
    tb.sort();
    ratio(&ta.join(" "), &tb.join(" "))
}

/// Similarity that additionally tolerates duplicate tokens and subset
/// containment. Used for transaction codes, where one side often carries
/// extra tokens (branch numbers, suffixes).
pub fn token_set_ratio(a: &str, b: &str) -> u32 {
    let sa: BTreeSet<String> = tokens(a).into_iter().collect();
    let sb: BTreeSet<String> = tokens(b).into_iter().collect();

    let common: Vec<&str> = sa.intersection(&sb).map(String::as_str).collect();
    let only_a: Vec<&str> = sa.difference(&sb).map(String::as_str).collect();
    let only_b: Vec<&str> = sb.difference(&sa).map(String::as_str).collect();

    let base = common.join(" ");
    let combined_a = join_nonempty(&base, &only_a.join(" "));
    let combined_b = join_nonempty(&base, &only_b.join(" "));

    ratio(&base, &combined_a)
        .max(ratio(&base, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn join_nonempty(a: &str, b: &str) -> String {
    if a.is_empty() {
        b.to_string()
    } else if b.is_empty() {
        a.to_string()
    } else {
        format!("{a} {b}")
    }
}

/// Return the highest-scoring candidate, or None if nothing reaches
/// `min_score`. Only a strictly greater score replaces the current best,
/// so when callers pass candidates in sorted order, ties resolve to the
/// lexicographically first candidate.
pub fn fuzzy_search<'a, I>(
    query: &str,
    candidates: I,
    scorer: fn(&str, &str) -> u32,
    min_score: u32,
) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, u32)> = None;
    for candidate in candidates {
        let score = scorer(query, candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    match best {
        Some((candidate, score)) if score >= min_score => Some(candidate),
        _ => None,
    }
}
