use chrono::{DateTime, Utc};

/// Levenshtein distance between `a` and `b`, counted in Unicode scalar values.
///
/// Insertions, deletions and substitutions all cost one. No case folding or
/// normalisation is applied.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

// 时间工具函数
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

// 字符串工具函数
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_identity() {
        assert_eq!(edit_distance("Alice", "Alice"), 0);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn test_edit_distance_empty_side() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abcd", ""), 4);
    }

    #[test]
    fn test_edit_distance_basic_operations() {
        assert_eq!(edit_distance("Alice", "Alise"), 1); // 替换
        assert_eq!(edit_distance("Alicia", "Alise"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("Bob", "Zorknot"), 6);
    }

    #[test]
    fn test_edit_distance_is_symmetric() {
        assert_eq!(edit_distance("Alicia", "Alise"), edit_distance("Alise", "Alicia"));
    }

    #[test]
    fn test_edit_distance_case_and_whitespace_sensitive() {
        assert_eq!(edit_distance("alice", "Alice"), 1);
        assert_eq!(edit_distance("Alice ", "Alice"), 1);
    }

    #[test]
    fn test_edit_distance_counts_characters_not_bytes() {
        assert_eq!(edit_distance("Øyvind", "Oyvind"), 1);
        assert_eq!(edit_distance("Åse", "Åse"), 0);
    }

    #[test]
    fn test_string_truncation() {
        let long_string = "This is a very long string that needs to be truncated";
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string(long_string, 20), "This is a very lo...");
    }
}
