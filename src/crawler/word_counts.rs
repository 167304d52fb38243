use std::cmp::Ordering;
use std::collections::HashMap;

/// Selects the `limit` most popular words
///
/// Words are ranked by count (descending). Ties go to the longer word, and
/// words of equal count and length are ordered alphabetically, so the result
/// never depends on map iteration order.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use word_tally::crawler::top_words;
///
/// let counts = HashMap::from([
///     ("the".to_string(), 5),
///     ("crawler".to_string(), 2),
///     ("rust".to_string(), 2),
/// ]);
/// let top = top_words(&counts, 2);
/// assert_eq!(top, vec![("the".to_string(), 5), ("crawler".to_string(), 2)]);
/// ```
pub fn top_words(counts: &HashMap<String, u64>, limit: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(&String, &u64)> = counts.iter().collect();
    ranked.sort_by(|a, b| compare_entries(a, b));

    ranked
        .into_iter()
        .take(limit)
        .map(|(word, count)| (word.clone(), *count))
        .collect()
}

fn compare_entries(a: &(&String, &u64), b: &(&String, &u64)) -> Ordering {
    b.1.cmp(a.1)
        .then_with(|| b.0.len().cmp(&a.0.len()))
        .then_with(|| a.0.cmp(b.0))
}
