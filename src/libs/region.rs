use crate::libs::error::{parse_pos, RecordError};
use std::str::FromStr;

//----------------------------
// Region
//----------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub chr: String,
    pub start: i64,
    pub end: i64,
    pub name: String,
}

impl Region {
    pub fn new(chr: &str, start: i64, end: i64, name: &str) -> Self {
        Self {
            chr: chr.to_string(),
            start,
            end,
            name: name.to_string(),
        }
    }

    /// `end - start`
    ///
    /// ```
    /// # use pkr::libs::region::Region;
    /// assert_eq!(Region::new("chrI", 100, 250, "peak_1").size().unwrap(), 150);
    /// assert!(Region::new("chrI", i64::MIN, i64::MAX, "peak_1").size().is_err());
    /// ```
    pub fn size(&self) -> Result<i64, RecordError> {
        self.end
            .checked_sub(self.start)
            .ok_or_else(|| RecordError::Overflow(format!("length of {}", self.name)))
    }

    /// The ordering key of a region: the integer after the last `_` of its name
    ///
    /// ```
    /// # use pkr::libs::region::Region;
    /// let region = Region::new("chrI", 100, 200, "cond_a_peak_12");
    /// assert_eq!(region.index().unwrap(), 12);
    ///
    /// assert!(Region::new("chrI", 100, 200, "peak12").index().is_err());
    /// assert!(Region::new("chrI", 100, 200, "peak_x").index().is_err());
    /// ```
    pub fn index(&self) -> Result<u64, RecordError> {
        self.name
            .rsplit_once('_')
            .and_then(|(_, suffix)| suffix.parse::<u64>().ok())
            .ok_or_else(|| RecordError::MissingSuffix(self.name.clone()))
    }

    /// Renders the region as a chain member
    ///
    /// ```
    /// # use pkr::libs::region::{NameFormat, Region};
    /// let region = Region::new("chrI", 100, 200, "peak_1");
    /// assert_eq!(region.member(NameFormat::Coords), "peak_1(100,200)");
    /// assert_eq!(region.member(NameFormat::Bare), "peak_1");
    /// ```
    pub fn member(&self, format: NameFormat) -> String {
        match format {
            NameFormat::Coords => format!("{}({},{})", self.name, self.start, self.end),
            NameFormat::Bare => self.name.clone(),
        }
    }
}

/// How chain members are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFormat {
    /// `name(start,end)`
    Coords,
    /// `name`
    Bare,
}

impl FromStr for NameFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coords" => Ok(NameFormat::Coords),
            "bare" => Ok(NameFormat::Bare),
            _ => Err(anyhow::anyhow!("Unknown name format: {}", s)),
        }
    }
}

//----------------------------
// ColumnLayout
//----------------------------
/// Where the two paired regions sit in an overlap-join line.
///
/// Side A spans columns `offset..offset+width`, side B the following `width`
/// columns. `chr`, `start`, `end` and `name` are relative to a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub offset: usize,
    pub width: usize,
    pub chr: usize,
    pub start: usize,
    pub end: usize,
    pub name: usize,
}

impl Default for ColumnLayout {
    /// A leading overlap column, then two 9-column records with the name last
    fn default() -> Self {
        Self {
            offset: 1,
            width: 9,
            chr: 0,
            start: 1,
            end: 2,
            name: 8,
        }
    }
}

impl ColumnLayout {
    /// Minimal number of fields a line must have
    ///
    /// ```
    /// # use pkr::libs::region::ColumnLayout;
    /// assert_eq!(ColumnLayout::default().min_fields(), 19);
    /// ```
    pub fn min_fields(&self) -> usize {
        let last = self.chr.max(self.start).max(self.end).max(self.name);
        self.offset + self.width + last + 1
    }

    fn region(&self, fields: &[&str], base: usize) -> Result<Region, RecordError> {
        Ok(Region {
            chr: fields[base + self.chr].to_string(),
            start: parse_pos(fields[base + self.start])?,
            end: parse_pos(fields[base + self.end])?,
            name: fields[base + self.name].to_string(),
        })
    }
}

impl FromStr for ColumnLayout {
    type Err = anyhow::Error;

    /// `offset,width,chr,start,end,name`
    ///
    /// ```
    /// # use pkr::libs::region::ColumnLayout;
    /// let layout: ColumnLayout = "0,4,0,1,2,3".parse().unwrap();
    /// assert_eq!(layout.min_fields(), 8);
    /// assert!("0,4,0,1,2".parse::<ColumnLayout>().is_err());
    /// assert!("0,3,0,1,2,3".parse::<ColumnLayout>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|e| {
                e.trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("Invalid layout value: {}", e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if parts.len() != 6 {
            return Err(anyhow::anyhow!(
                "Layout needs 6 values (offset,width,chr,start,end,name), got {}",
                parts.len()
            ));
        }

        let layout = ColumnLayout {
            offset: parts[0],
            width: parts[1],
            chr: parts[2],
            start: parts[3],
            end: parts[4],
            name: parts[5],
        };
        if parts[2..].iter().any(|&i| i >= layout.width) {
            return Err(anyhow::anyhow!(
                "Layout column index out of the record width {}",
                layout.width
            ));
        }

        Ok(layout)
    }
}

//----------------------------
// OverlapRecord
//----------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapRecord {
    pub a: Region,
    pub b: Region,
}

impl OverlapRecord {
    /// ```
    /// # use pkr::libs::region::{ColumnLayout, OverlapRecord};
    /// let layout: ColumnLayout = "0,4,0,1,2,3".parse().unwrap();
    /// let line = "chrI\t100\t200\tA_1\tchrI\t150\t250\tB_1";
    /// let record = OverlapRecord::parse(line, &layout).unwrap();
    /// assert_eq!(record.a.start, 100);
    /// assert_eq!(record.b.name, "B_1");
    /// ```
    pub fn parse(line: &str, layout: &ColumnLayout) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        let expected = layout.min_fields();
        if fields.len() < expected {
            return Err(RecordError::TooFewFields {
                expected,
                found: fields.len(),
            });
        }

        let record = OverlapRecord {
            a: layout.region(&fields, layout.offset)?,
            b: layout.region(&fields, layout.offset + layout.width)?,
        };
        // both keys are needed for chaining
        record.keys()?;

        Ok(record)
    }

    /// Ordering keys of both sides
    pub fn keys(&self) -> Result<(u64, u64), RecordError> {
        Ok((self.a.index()?, self.b.index()?))
    }

    /// Both keys of `self` are strictly greater than those of `prev`
    pub fn follows(&self, prev: &OverlapRecord) -> Result<bool, RecordError> {
        let (a, b) = self.keys()?;
        let (prev_a, prev_b) = prev.keys()?;
        Ok(a > prev_a && b > prev_b)
    }
}
