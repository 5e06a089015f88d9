//! Sequence Alignment
//!
//! Longest-matching-block alignment (Ratcliff/Obershelp "gestalt" matching).
//! The same primitive scores characters for the word-level comparison and
//! phoneme symbols for the articulation comparison, so it is generic over the
//! element type.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Sequences at least this long get the popular-element heuristic
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matching block: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Finds matching blocks between two sequences
pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of every non-popular element of `b`, ascending
    b2j: HashMap<&'a T, Vec<usize>>,
    popular: HashSet<&'a T>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    /// Create a matcher with the popular-element heuristic enabled
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        Self::build(a, b, true)
    }

    /// Create a matcher that indexes every element of `b`
    pub fn without_autojunk(a: &'a [T], b: &'a [T]) -> Self {
        Self::build(a, b, false)
    }

    fn build(a: &'a [T], b: &'a [T], autojunk: bool) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        // Elements that appear in more than ~1% of a long `b` swamp the
        // longest-match search; they only match by extension.
        let mut popular = HashSet::new();
        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = b.len() / 100 + 1;
            b2j.retain(|elt, positions| {
                if positions.len() > threshold {
                    popular.insert(*elt);
                    false
                } else {
                    true
                }
            });
        }

        Self { a, b, b2j, popular }
    }

    /// Elements of `b` excluded from the index by the autojunk heuristic
    pub fn popular_count(&self) -> usize {
        self.popular.len()
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`. A zero-sized match means nothing in
    /// the ranges matches.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the longest match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements are never indexed but still count when adjacent
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        Match {
            a: besti,
            b: bestj,
            size: bestsize,
        }
    }

    /// All matching blocks, ascending and with adjacent blocks merged.
    ///
    /// The last entry is always the sentinel `(len(a), len(b), 0)`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
            blocks.push(m);
        }
        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(Match {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }

    /// Similarity in `[0, 1]`: twice the matched elements over the total length.
    ///
    /// Two empty sequences are identical and score 1.0.
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        let total = self.a.len() + self.b.len();
        if total == 0 {
            1.0
        } else {
            2.0 * matches as f64 / total as f64
        }
    }

    /// Elements of `a` not covered by any matching block, in order
    pub fn unmatched_a(&self) -> Vec<&'a T> {
        let blocks = self.matching_blocks();
        uncovered(self.a, blocks.iter().map(|m| (m.a, m.size)))
    }

    /// Elements of `b` not covered by any matching block, in order
    pub fn unmatched_b(&self) -> Vec<&'a T> {
        let blocks = self.matching_blocks();
        uncovered(self.b, blocks.iter().map(|m| (m.b, m.size)))
    }
}

fn uncovered<'a, T>(seq: &'a [T], blocks: impl Iterator<Item = (usize, usize)>) -> Vec<&'a T> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for (start, size) in blocks {
        out.extend(&seq[cursor..start]);
        cursor = start + size;
    }
    out
}

/// Similarity ratio of two strings, compared character by character
pub fn char_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}
