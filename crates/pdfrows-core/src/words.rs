use crate::cluster::cluster_indices;
use crate::geometry::BBox;
use crate::text::Char;

/// Options for word extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct WordOptions {
    /// Maximum horizontal distance between characters to group into a word.
    pub x_tolerance: f64,
    /// Maximum vertical distance between characters to group into a word.
    pub y_tolerance: f64,
    /// If true, include blank/space characters in words instead of splitting on them.
    pub keep_blank_chars: bool,
    /// If true, use the text flow order from the PDF content stream instead of spatial ordering.
    pub use_text_flow: bool,
    /// If true, expand common Latin ligatures (U+FB00–U+FB06) to their multi-character equivalents.
    pub expand_ligatures: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
            use_text_flow: false,
            expand_ligatures: true,
        }
    }
}

/// A word extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// Bounding box encompassing all constituent characters.
    pub bbox: BBox,
    /// Whether the constituent characters are upright.
    pub upright: bool,
    /// The characters that make up this word.
    pub chars: Vec<Char>,
}

impl Word {
    /// Horizontal start position.
    pub fn x0(&self) -> f64 {
        self.bbox.x0
    }

    /// Vertical top position (distance from the top of the page).
    pub fn top(&self) -> f64 {
        self.bbox.top
    }
}

/// Extracts words from a sequence of characters based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words from the given characters using the specified options.
    ///
    /// Characters are first split into runs of equal `upright` value, in
    /// content stream order. Unless `use_text_flow` is set, each run is then
    /// clustered into lines by `top` (within `y_tolerance`), and each line is
    /// ordered left to right by `x0`. Inside a line a new word starts when:
    /// - a blank character is met (unless `keep_blank_chars`),
    /// - the horizontal gap to the previous character exceeds `x_tolerance`,
    /// - the character sits more than `y_tolerance` below the previous one.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        let mut words = Vec::new();

        for run in chars.chunk_by(|a, b| a.upright == b.upright) {
            if options.use_text_flow {
                let line: Vec<&Char> = run.iter().collect();
                Self::line_to_words(&line, options, &mut words);
                continue;
            }

            let tops: Vec<f64> = run.iter().map(|c| c.bbox.top).collect();
            for group in cluster_indices(&tops, options.y_tolerance) {
                let mut line: Vec<&Char> = group.into_iter().map(|i| &run[i]).collect();
                line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
                Self::line_to_words(&line, options, &mut words);
            }
        }

        words
    }

    fn line_to_words(line: &[&Char], options: &WordOptions, words: &mut Vec<Word>) {
        let mut current: Vec<&Char> = Vec::new();

        for &ch in line {
            if ch.is_blank() && !options.keep_blank_chars {
                if !current.is_empty() {
                    words.push(Self::make_word(&current, options.expand_ligatures));
                    current.clear();
                }
                continue;
            }

            if let Some(last) = current.last() {
                if Self::should_split(last, ch, options) {
                    words.push(Self::make_word(&current, options.expand_ligatures));
                    current.clear();
                }
            }
            current.push(ch);
        }

        if !current.is_empty() {
            words.push(Self::make_word(&current, options.expand_ligatures));
        }
    }

    /// Check if two horizontally-adjacent chars should be split into separate words.
    ///
    /// Uses the geometric distance between the x-intervals, so overlapping
    /// chars (e.g. duplicates drawn for fake bold) stay in one word. Only a
    /// drop below the previous char splits; a char set higher stays attached.
    fn should_split(last: &Char, current: &Char, options: &WordOptions) -> bool {
        let x_gap =
            (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
        x_gap > options.x_tolerance || current.bbox.top > last.bbox.top + options.y_tolerance
    }

    fn make_word(chars: &[&Char], expand_ligatures: bool) -> Word {
        let raw_text: String = chars.iter().map(|c| c.text.as_str()).collect();
        let text = if expand_ligatures {
            expand_ligatures_in_text(&raw_text)
        } else {
            raw_text
        };
        let mut bbox = chars[0].bbox;
        for c in &chars[1..] {
            bbox = bbox.union(&c.bbox);
        }
        Word {
            text,
            bbox,
            upright: chars[0].upright,
            chars: chars.iter().map(|&c| c.clone()).collect(),
        }
    }
}

/// Expand common Latin ligatures (U+FB00–U+FB06) to their multi-character equivalents.
fn expand_ligatures_in_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => result.push_str("ff"),
            '\u{FB01}' => result.push_str("fi"),
            '\u{FB02}' => result.push_str("fl"),
            '\u{FB03}' => result.push_str("ffi"),
            '\u{FB04}' => result.push_str("ffl"),
            '\u{FB05}' => result.push_str("\u{017F}t"), // long s + t
            '\u{FB06}' => result.push_str("st"),
            _ => result.push(ch),
        }
    }
    result
}
