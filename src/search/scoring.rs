//! Text similarity scoring for search results.
//!
//! A candidate is compared against the descriptor it was searched for by
//! normalizing both "artist title" strings and taking a Levenshtein ratio.

/// Compare two strings for similarity (0.0-1.0).
///
/// Uses normalized Levenshtein distance with some music-specific handling:
/// - Ignores case and punctuation
/// - Ignores leading articles: "The Beatles" ≈ "Beatles"
/// - Handles featuring artists: "Song (feat. X)" ≈ "Song"
pub fn similarity(a: &str, b: &str) -> f32 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 1.0;
    }

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let distance = levenshtein_distance(&a, &b);
    let max_len = a.chars().count().max(b.chars().count());
    1.0 - (distance as f32 / max_len as f32)
}

/// Normalize a string for comparison.
fn normalize(s: &str) -> String {
    let mut result = s.to_lowercase();

    // Remove common prefixes
    for prefix in &["the ", "a ", "an "] {
        if result.starts_with(prefix) {
            result = result[prefix.len()..].to_string();
        }
    }

    // Remove featuring suffixes
    for pattern in &[" (feat.", " (ft.", " feat.", " ft.", " featuring "] {
        if let Some(pos) = result.find(pattern) {
            result = result[..pos].to_string();
        }
    }

    // Remove extra whitespace and punctuation
    result
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Simple Levenshtein distance.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut dp = vec![vec![0usize; n + 1]; m + 1];

    #[allow(clippy::needless_range_loop)]
    for i in 0..=m {
        dp[i][0] = i;
    }
    #[allow(clippy::needless_range_loop)]
    for j in 0..=n {
        dp[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[m][n]
}
