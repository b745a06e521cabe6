use crate::libs::error::{parse_pos, RecordError};
use indexmap::IndexMap;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

lazy_static::lazy_static! {
    static ref CHR_RENAME: std::collections::HashMap<&'static str, &'static str> = [
        ("chr1", "chrI"),
        ("chr2", "chrII"),
        ("chr3", "chrIII"),
        ("chr4", "chrIV"),
        ("chr5", "chrV"),
        ("chr6", "chrVI"),
        ("chr7", "chrVII"),
        ("chr8", "chrVIII"),
        ("chr9", "chrIX"),
        ("chr10", "chrX"),
        ("chr11", "chrXI"),
        ("chr12", "chrXII"),
        ("chr13", "chrXIII"),
        ("chr14", "chrXIV"),
        ("chr15", "chrXV"),
        ("chr16", "chrXVI"),
        ("chrM", "chrM"),
    ]
    .into_iter()
    .collect();
}

/// Maps arabic chromosome names to the roman ones; other names are kept
///
/// ```
/// # use pkr::libs::feature::rename_chr;
/// assert_eq!(rename_chr("chr4"), "chrIV");
/// assert_eq!(rename_chr("chrM"), "chrM");
/// assert_eq!(rename_chr("chrIV"), "chrIV");
/// ```
pub fn rename_chr(chr: &str) -> &str {
    CHR_RENAME.get(chr).copied().unwrap_or(chr)
}

//----------------------------
// Feature
//----------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub chr: String,
    pub start: i64,
    pub end: i64,
    pub name: String,
}

impl FromStr for Feature {
    type Err = RecordError;

    /// A GFF line: chromosome, source, type, start, end, score, strand, phase, attributes
    ///
    /// ```
    /// # use pkr::libs::feature::Feature;
    /// let line = "chr1\tSGD\tgene\t335\t649\t.\t+\t.\tID=YAL069W";
    /// let feature: Feature = line.parse().unwrap();
    /// assert_eq!(feature.chr, "chrI");
    /// assert_eq!((feature.start, feature.end), (335, 649));
    /// assert_eq!(feature.name, "ID=YAL069W");
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields.len() < 9 {
            return Err(RecordError::TooFewFields {
                expected: 9,
                found: fields.len(),
            });
        }

        Ok(Feature {
            chr: rename_chr(fields[0]).to_string(),
            start: parse_pos(fields[3])?,
            end: parse_pos(fields[4])?,
            name: fields[8].to_string(),
        })
    }
}

//----------------------------
// Window & OverlapMode
//----------------------------
/// Closed interval `[left, right]` around a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub left: i64,
    pub right: i64,
}

impl Window {
    pub fn new(left: i64, right: i64) -> Self {
        Self { left, right }
    }

    pub fn contains(&self, pos: i64) -> bool {
        self.left <= pos && pos <= self.right
    }

    /// Length shared with `[start, end]`; zero or negative when disjoint or touching
    pub fn overlap(&self, start: i64, end: i64) -> i64 {
        self.right.min(end).saturating_sub(self.left.max(start))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapMode {
    /// Feature start (TSS) lies in the window
    Start,
    /// Feature end (TTS) lies in the window
    End,
    /// Feature span overlaps the window by more than zero
    Span,
}

impl OverlapMode {
    pub fn from_code(code: u8) -> anyhow::Result<Self> {
        match code {
            0 => Ok(OverlapMode::Start),
            1 => Ok(OverlapMode::End),
            2 => Ok(OverlapMode::Span),
            _ => Err(anyhow::anyhow!("Unknown overlap mode: {}", code)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            OverlapMode::Start => 0,
            OverlapMode::End => 1,
            OverlapMode::Span => 2,
        }
    }

    pub fn accepts(&self, feature: &Feature, window: &Window) -> bool {
        match self {
            OverlapMode::Start => window.contains(feature.start),
            OverlapMode::End => window.contains(feature.end),
            OverlapMode::Span => window.overlap(feature.start, feature.end) > 0,
        }
    }
}

impl fmt::Display for OverlapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self {
            OverlapMode::Start => "feature start (TSS) in window",
            OverlapMode::End => "feature end (TTS) in window",
            OverlapMode::Span => "feature span overlaps window",
        };
        write!(f, "{} ({})", self.code(), desc)
    }
}

//----------------------------
// Annotation
//----------------------------
/// Features grouped by chromosome, each group in file order
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    by_chr: IndexMap<String, Vec<Feature>>,
}

impl Annotation {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.by_chr
            .entry(feature.chr.clone())
            .or_default()
            .push(feature);
    }

    pub fn len(&self) -> usize {
        self.by_chr.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads a GFF-like file.
    ///
    /// Empty lines and `#` comments are skipped; reading stops at `##FASTA`.
    ///
    /// ```
    /// # use pkr::libs::feature::Annotation;
    /// let gff = "##gff-version 3\n\
    ///     chr1\tSGD\tgene\t100\t200\t.\t+\t.\tg1\n\
    ///     \n\
    ///     chr2\tSGD\tgene\t50\t80\t.\t-\t.\tg2\n\
    ///     ###FASTA\n\
    ///     >chr1\n";
    /// let annotation = Annotation::from_reader(gff.as_bytes()).unwrap();
    /// assert_eq!(annotation.len(), 2);
    /// ```
    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut annotation = Annotation::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with("##FASTA") {
                break;
            }
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let feature = Feature::from_str(&line)
                .map_err(|e| anyhow::anyhow!("line {}: {}", i + 1, e))?;
            annotation.push(feature);
        }

        Ok(annotation)
    }

    /// Features of `chr` accepted by `mode`.
    ///
    /// Features are assumed sorted by start within a chromosome; the scan
    /// stops after the first feature starting past `window.right`.
    ///
    /// ```
    /// # use pkr::libs::feature::{Annotation, Feature, OverlapMode, Window};
    /// let mut annotation = Annotation::new();
    /// for (start, end, name) in [(100, 390, "f1"), (390, 401, "f2"), (500, 600, "f3")] {
    ///     annotation.push(Feature { chr: "chrI".to_string(), start, end, name: name.to_string() });
    /// }
    /// let found = annotation.lookup("chrI", &Window::new(400, 900), OverlapMode::Span);
    /// assert_eq!(found.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), vec!["f2", "f3"]);
    /// assert!(annotation.lookup("chrII", &Window::new(400, 900), OverlapMode::Span).is_empty());
    /// ```
    pub fn lookup(&self, chr: &str, window: &Window, mode: OverlapMode) -> Vec<&Feature> {
        let mut found = vec![];

        if let Some(features) = self.by_chr.get(chr) {
            for feature in features {
                if mode.accepts(feature, window) {
                    found.push(feature);
                }
                if feature.start > window.right {
                    break;
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(features: &[(&str, i64, i64, &str)]) -> Annotation {
        let mut annotation = Annotation::new();
        for &(chr, start, end, name) in features {
            annotation.push(Feature {
                chr: chr.to_string(),
                start,
                end,
                name: name.to_string(),
            });
        }
        annotation
    }

    fn names(found: &[&Feature]) -> Vec<String> {
        found.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn test_span_mode() {
        let window = Window::new(400, 900);
        let ann = annotation(&[
            ("chrI", 100, 390, "left"),
            ("chrI", 390, 401, "touch_1bp"),
            ("chrI", 500, 600, "inside"),
            ("chrI", 900, 950, "at_right"),
        ]);
        let found = ann.lookup("chrI", &window, OverlapMode::Span);
        assert_eq!(names(&found), vec!["touch_1bp", "inside"]);
    }

    #[test]
    fn test_span_single_point_excluded() {
        let window = Window::new(400, 900);
        assert_eq!(window.overlap(300, 400), 0);
        let ann = annotation(&[("chrI", 300, 400, "touch")]);
        assert!(ann.lookup("chrI", &window, OverlapMode::Span).is_empty());
    }

    #[test]
    fn test_start_mode_inclusive() {
        let window = Window::new(400, 900);
        let ann = annotation(&[
            ("chrI", 399, 1000, "before"),
            ("chrI", 400, 410, "left_edge"),
            ("chrI", 900, 910, "right_edge"),
            ("chrI", 901, 910, "after"),
        ]);
        let found = ann.lookup("chrI", &window, OverlapMode::Start);
        assert_eq!(names(&found), vec!["left_edge", "right_edge"]);
    }

    #[test]
    fn test_end_mode() {
        let window = Window::new(400, 900);
        let ann = annotation(&[
            ("chrI", 100, 399, "ends_before"),
            ("chrI", 100, 400, "ends_left_edge"),
            ("chrI", 350, 2000, "ends_after"),
            ("chrI", 800, 900, "ends_right_edge"),
        ]);
        let found = ann.lookup("chrI", &window, OverlapMode::End);
        assert_eq!(names(&found), vec!["ends_left_edge", "ends_right_edge"]);
    }

    #[test]
    fn test_early_exit_all_modes() {
        // An unsorted feature after one past the window is never reached
        let window = Window::new(400, 900);
        let ann = annotation(&[
            ("chrI", 500, 600, "inside"),
            ("chrI", 1000, 1100, "past"),
            ("chrI", 450, 460, "unsorted"),
        ]);
        for mode in [OverlapMode::Start, OverlapMode::End, OverlapMode::Span] {
            let found = ann.lookup("chrI", &window, mode);
            assert_eq!(names(&found), vec!["inside"], "mode {}", mode);
        }
    }

    #[test]
    fn test_early_exit_keeps_equal_starts() {
        let window = Window::new(400, 900);
        let ann = annotation(&[
            ("chrI", 900, 910, "a"),
            ("chrI", 900, 920, "b"),
            ("chrI", 901, 930, "c"),
        ]);
        let found = ann.lookup("chrI", &window, OverlapMode::Start);
        assert_eq!(names(&found), vec!["a", "b"]);
    }

    #[test]
    fn test_overlap_extreme_coordinates() {
        let window = Window::new(400, 900);
        assert!(window.overlap(i64::MIN, i64::MIN + 1) < 0);
        let ann = annotation(&[("chrI", i64::MIN, 500, "huge")]);
        let found = ann.lookup("chrI", &window, OverlapMode::Span);
        assert_eq!(names(&found), vec!["huge"]);
    }

    #[test]
    fn test_other_chromosomes_skipped() {
        let window = Window::new(400, 900);
        let ann = annotation(&[
            ("chrII", 500, 600, "other"),
            ("chrI", 500, 600, "this"),
        ]);
        let found = ann.lookup("chrI", &window, OverlapMode::Span);
        assert_eq!(names(&found), vec!["this"]);
    }

    #[test]
    fn test_feature_parse_errors() {
        assert_eq!(
            "chr1\tSGD\tgene\t100".parse::<Feature>(),
            Err(RecordError::TooFewFields {
                expected: 9,
                found: 4
            })
        );
        assert_eq!(
            "chr1\tSGD\tgene\tx\t200\t.\t+\t.\tg1".parse::<Feature>(),
            Err(RecordError::InvalidNumber("x".to_string()))
        );
    }

    #[test]
    fn test_annotation_malformed_line() {
        let gff = "chr1\tSGD\tgene\t100\t200\t.\t+\t.\tg1\nchr1\tSGD\n";
        let err = Annotation::from_reader(gff.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));
    }

    #[test]
    fn test_mode_codes() {
        for code in 0..3 {
            assert_eq!(OverlapMode::from_code(code).unwrap().code(), code);
        }
        assert!(OverlapMode::from_code(3).is_err());
        assert_eq!(
            OverlapMode::Span.to_string(),
            "2 (feature span overlaps window)"
        );
    }
}
