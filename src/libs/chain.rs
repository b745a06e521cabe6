use crate::libs::error::RecordError;
use crate::libs::region::{NameFormat, OverlapRecord, Region};
use indexmap::IndexSet;
use itertools::Itertools;
use std::str::FromStr;

/// Separator placed between the members of one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `", "`
    Comma,
    /// `"\t"`
    Tab,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ", ",
            Delimiter::Tab => "\t",
        }
    }
}

impl FromStr for Delimiter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comma" => Ok(Delimiter::Comma),
            "tab" => Ok(Delimiter::Tab),
            _ => Err(anyhow::anyhow!("Unknown delimiter: {}", s)),
        }
    }
}

/// Groups adjacent records into chains.
///
/// A new chain starts when the ordering keys of both sides strictly increase
/// over the previous record. With `break_on_chr`, a change of side-A
/// chromosome starts a new chain as well.
///
/// ```
/// # use pkr::libs::chain::link;
/// # use pkr::libs::region::{OverlapRecord, Region};
/// let rec = |a: &str, b: &str| OverlapRecord {
///     a: Region::new("chrI", 0, 10, a),
///     b: Region::new("chrI", 0, 10, b),
/// };
/// let records = vec![rec("a_1", "b_1"), rec("a_2", "b_1"), rec("a_3", "b_2")];
/// let chains = link(records, false).unwrap();
/// assert_eq!(chains.len(), 2);
/// assert_eq!(chains[0].len(), 2);
/// ```
pub fn link(
    records: Vec<OverlapRecord>,
    break_on_chr: bool,
) -> Result<Vec<Vec<OverlapRecord>>, RecordError> {
    let mut chains: Vec<Vec<OverlapRecord>> = vec![];
    let mut current: Vec<OverlapRecord> = vec![];

    for record in records {
        let is_new = match current.last() {
            None => false,
            Some(prev) => {
                record.follows(prev)? || (break_on_chr && record.a.chr != prev.a.chr)
            }
        };

        if is_new {
            chains.push(std::mem::take(&mut current));
        }
        current.push(record);
    }

    if !current.is_empty() {
        chains.push(current);
    }

    Ok(chains)
}

//----------------------------
// ChainSummary
//----------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSummary {
    pub chr: String,
    pub total_a: i64,
    pub total_b: i64,
    pub members_a: Vec<Region>,
    pub members_b: Vec<Region>,
}

impl ChainSummary {
    /// Deduplicates each side of a non-empty chain and sums member lengths
    ///
    /// ```
    /// # use pkr::libs::chain::ChainSummary;
    /// # use pkr::libs::region::{OverlapRecord, Region};
    /// let chain = vec![
    ///     OverlapRecord {
    ///         a: Region::new("chrI", 100, 200, "a_1"),
    ///         b: Region::new("chrI", 120, 180, "b_1"),
    ///     },
    ///     OverlapRecord {
    ///         a: Region::new("chrI", 150, 250, "a_2"),
    ///         b: Region::new("chrI", 120, 180, "b_1"),
    ///     },
    /// ];
    /// let summary = ChainSummary::from_chain(&chain).unwrap();
    /// assert_eq!(summary.total_a, 200);
    /// assert_eq!(summary.total_b, 60);
    /// assert_eq!(summary.members_b.len(), 1);
    /// ```
    pub fn from_chain(chain: &[OverlapRecord]) -> Result<Self, RecordError> {
        let members_a = Self::unique(chain.iter().map(|r| &r.a));
        let members_b = Self::unique(chain.iter().map(|r| &r.b));

        let chr = members_a
            .first()
            .map(|r| r.chr.clone())
            .unwrap_or_default();

        Ok(Self {
            chr,
            total_a: Self::total(&members_a)?,
            total_b: Self::total(&members_b)?,
            members_a,
            members_b,
        })
    }

    fn total(members: &[Region]) -> Result<i64, RecordError> {
        members.iter().try_fold(0i64, |acc, r| {
            acc.checked_add(r.size()?)
                .ok_or_else(|| RecordError::Overflow("chain total length".to_string()))
        })
    }

    // Exact tuples collapse; ties on (start, end) keep first-seen order
    fn unique<'a>(regions: impl Iterator<Item = &'a Region>) -> Vec<Region> {
        let set: IndexSet<&Region> = regions.collect();
        set.into_iter()
            .cloned()
            .sorted_by_key(|r| (r.start, r.end))
            .collect()
    }

    /// ```
    /// # use pkr::libs::chain::{ChainSummary, Delimiter};
    /// # use pkr::libs::region::{NameFormat, Region};
    /// let summary = ChainSummary {
    ///     chr: "chrI".to_string(),
    ///     total_a: 150,
    ///     total_b: 100,
    ///     members_a: vec![Region::new("chrI", 100, 200, "a_1"), Region::new("chrI", 200, 250, "a_2")],
    ///     members_b: vec![Region::new("chrI", 150, 250, "b_1")],
    /// };
    /// assert_eq!(
    ///     summary.format(NameFormat::Coords, Delimiter::Comma),
    ///     "chrI\t150\t100\ta_1(100,200), a_2(200,250)\tb_1(150,250)"
    /// );
    /// assert_eq!(
    ///     summary.format(NameFormat::Bare, Delimiter::Tab),
    ///     "chrI\t150\t100\ta_1\ta_2\tb_1"
    /// );
    /// ```
    pub fn format(&self, names: NameFormat, sep: Delimiter) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.chr,
            self.total_a,
            self.total_b,
            self.members_a.iter().map(|r| r.member(names)).join(sep.as_str()),
            self.members_b.iter().map(|r| r.member(names)).join(sep.as_str()),
        )
    }
}
