//! Ratcliff/Obershelp similarity between two strings.
//!
//! The ratio is `2 * M / T`, where `T` is the total number of characters in both
//! strings and `M` the number of characters in matching blocks. The blocks are found
//! by taking the longest common substring, then recursing on the pieces to its left
//! and to its right.

use std::collections::{HashMap, HashSet};

/// Strings at least this long drop their most frequent characters from the index
/// used to seed matches.
const POPULAR_MIN_LEN: usize = 200;

/// A matching block: `a[a_start..a_start + size] == b[b_start..b_start + size]`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Compares one string against another, char by char.
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    // For each char of b, the positions at which it occurs, in increasing order.
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> SequenceMatcher {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        let n = b.len();
        if n >= POPULAR_MIN_LEN {
            let ntest = n / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > ntest)
                .map(|(c, _)| *c)
                .collect();
            for c in popular.iter() {
                b2j.remove(c);
            }
        }

        SequenceMatcher { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among the longest blocks, returns the one that starts earliest in `a`, and
    /// of those, the one that starts earliest in `b`.
    pub fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> MatchingBlock {
        let mut best_i = alo;
        let mut best_j = blo;
        let mut best_size = 0;

        // j2len[j] = length of the longest match ending with a[i-1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(idxs) = self.b2j.get(&self.a[i]) {
                for &j in idxs.iter() {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .cloned()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Popular chars were not indexed: extend the block over them on both sides.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All the matching blocks, in increasing order. Adjacent blocks are not merged.
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let mut queue: Vec<(usize, usize, usize, usize)> =
            vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks: Vec<MatchingBlock> = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
            blocks.push(m);
        }
        blocks.sort_by_key(|m| (m.a_start, m.b_start));
        blocks
    }

    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

/// The similarity ratio between two strings, between 0 (nothing in common) and 1 (equal).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(x: f64, y: f64) {
        assert!((x - y).abs() < 1e-9, "{} != {}", x, y);
    }

    #[test]
    fn identical_and_empty() {
        assert_close(similarity_ratio("", ""), 1.0);
        assert_close(similarity_ratio("abc", "abc"), 1.0);
        assert_close(similarity_ratio("abc", ""), 0.0);
        assert_close(similarity_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn classic_examples() {
        assert_close(similarity_ratio("abcd", "bcde"), 0.75);
        // "ab" and "cd"
        assert_close(similarity_ratio("abxcd", "abcd"), 8.0 / 9.0);
        assert_close(similarity_ratio("wacypaa", "wacypa"), 12.0 / 13.0);
    }

    #[test]
    fn longest_match_prefers_earliest() {
        let sm = SequenceMatcher::new(" abcd", "abcd abcd");
        let m = sm.find_longest_match(0, 5, 0, 9);
        assert_eq!(
            m,
            MatchingBlock {
                a_start: 0,
                b_start: 4,
                size: 5
            }
        );
    }

    #[test]
    fn blocks_are_ordered() {
        let sm = SequenceMatcher::new("abxcd", "abcd");
        assert_eq!(
            sm.matching_blocks(),
            vec![
                MatchingBlock {
                    a_start: 0,
                    b_start: 0,
                    size: 2
                },
                MatchingBlock {
                    a_start: 3,
                    b_start: 2,
                    size: 2
                },
            ]
        );
    }

    #[test]
    fn partial_match_is_bounded() {
        let r = similarity_ratio("Sacramento YPAA", "sacramento ypaa committee");
        assert!(r > 0.0 && r < 1.0);
    }

    #[test]
    fn long_strings_use_popular_heuristic() {
        let a = "a".repeat(250);
        let b = "a".repeat(250);
        let sm = SequenceMatcher::new(&a, &b);
        assert!(sm.b2j.is_empty());
        // Every char is popular: the match is only found by extending the empty block.
        assert_eq!(sm.find_longest_match(0, 250, 0, 250).size, 250);
        assert_close(sm.ratio(), 1.0);
    }
}
