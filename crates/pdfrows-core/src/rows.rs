//! Row reconstruction from word positions.
//!
//! Words whose `top` rounds to the same whole unit form one visual row.
//! Rows are emitted top to bottom, and words within a row left to right.
//! There is no tolerance band: `10.4` and `10.6` land in different rows.

use std::collections::BTreeMap;

use crate::words::Word;

/// Key of the visual row a word belongs to: its `top` rounded to the nearest
/// integer, ties to even (`10.5` -> `10`, `11.5` -> `12`).
pub fn row_key(top: f64) -> i64 {
    top.round_ties_even() as i64
}

/// Group one page's words into rows of word texts.
///
/// Returns an empty vector when `words` is empty. Within a row, words are
/// stable-sorted by `x0`, so words sharing a start position keep the order in
/// which they were extracted.
pub fn cluster_rows(words: &[Word]) -> Vec<Vec<String>> {
    let mut lines: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();
    for word in words {
        lines.entry(row_key(word.top())).or_default().push(word);
    }

    lines
        .into_values()
        .map(|mut line| {
            line.sort_by(|a, b| a.x0().total_cmp(&b.x0()));
            line.into_iter().map(|w| w.text.clone()).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;

    fn make_word(text: &str, x0: f64, top: f64) -> Word {
        Word {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x0 + 10.0, top + 10.0),
            upright: true,
            chars: Vec::new(),
        }
    }

    #[test]
    fn empty_page_yields_no_rows() {
        assert!(cluster_rows(&[]).is_empty());
    }

    #[test]
    fn name_age_scenario() {
        let words = vec![
            make_word("Name", 5.0, 10.2),
            make_word("Age", 50.0, 10.4),
            make_word("Alice", 5.0, 30.0),
            make_word("30", 50.0, 30.1),
        ];
        assert_eq!(
            cluster_rows(&words),
            vec![vec!["Name", "Age"], vec!["Alice", "30"]]
        );
    }

    #[test]
    fn rows_are_ordered_by_rounded_top() {
        let words = vec![
            make_word("bottom", 5.0, 700.0),
            make_word("top", 5.0, 12.0),
            make_word("middle", 5.0, 300.0),
        ];
        assert_eq!(
            cluster_rows(&words),
            vec![vec!["top"], vec!["middle"], vec!["bottom"]]
        );
    }

    #[test]
    fn words_within_row_sorted_by_x0() {
        let words = vec![
            make_word("c", 90.0, 20.0),
            make_word("a", 10.0, 20.2),
            make_word("b", 50.0, 19.9),
        ];
        assert_eq!(cluster_rows(&words), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn equal_x0_keeps_extraction_order() {
        let words = vec![
            make_word("first", 10.0, 20.0),
            make_word("second", 10.0, 20.0),
            make_word("third", 10.0, 20.0),
        ];
        assert_eq!(
            cluster_rows(&words),
            vec![vec!["first", "second", "third"]]
        );
    }

    #[test]
    fn near_values_that_round_apart_are_separate_rows() {
        let words = vec![make_word("a", 5.0, 10.4), make_word("b", 50.0, 10.6)];
        assert_eq!(cluster_rows(&words), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn whole_page_on_one_rounded_line_is_one_row() {
        let words: Vec<Word> = (0..6)
            .rev()
            .map(|i| make_word(&format!("w{i}"), i as f64 * 20.0, 99.6 + i as f64 * 0.15))
            .collect();
        let rows = cluster_rows(&words);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["w0", "w1", "w2", "w3", "w4", "w5"]);
    }

    #[test]
    fn row_key_rounds_half_to_even() {
        assert_eq!(row_key(10.5), 10);
        assert_eq!(row_key(11.5), 12);
        assert_eq!(row_key(10.49), 10);
        assert_eq!(row_key(10.51), 11);
        assert_eq!(row_key(-0.4), 0);
    }

    #[test]
    fn half_values_group_by_even_neighbour() {
        // 10.5 and 9.6 both round to 10; 11.5 rounds to 12
        let words = vec![
            make_word("x", 5.0, 10.5),
            make_word("y", 1.0, 9.6),
            make_word("z", 5.0, 11.5),
        ];
        assert_eq!(cluster_rows(&words), vec![vec!["y", "x"], vec!["z"]]);
    }

    #[test]
    fn row_count_matches_distinct_rounded_tops() {
        let tops = [1.2, 1.4, 5.0, 5.49, 7.7, 8.2, 100.0];
        let words: Vec<Word> = tops
            .iter()
            .enumerate()
            .map(|(i, &t)| make_word(&i.to_string(), i as f64, t))
            .collect();
        let mut keys: Vec<i64> = tops.iter().map(|&t| row_key(t)).collect();
        keys.dedup();
        assert_eq!(cluster_rows(&words).len(), keys.len());
    }
}
