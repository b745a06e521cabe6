use crate::libs::error::{parse_pos, RecordError};
use crate::libs::feature::Window;
use regex::Regex;
use std::str::FromStr;

lazy_static::lazy_static! {
    // a digit run right after `(` or `,`
    static ref RE_POS: Regex = Regex::new(r"[(,](\d+)").unwrap();
}

/// One chain-summary line, as written by `pkr merge` with optional extra
/// columns (e.g. a flank size) between the chromosome and the totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub chr: String,
    pub total_a: String,
    pub total_b: String,
    pub members_a: String,
    pub members_b: String,
}

impl FromStr for SummaryRow {
    type Err = RecordError;

    /// ```
    /// # use pkr::libs::summary::SummaryRow;
    /// let row: SummaryRow = "chrI\t150\t100\ta_1(100,200), a_2(200,250)\tb_1(150,250)"
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(row.total_a, "150");
    /// assert_eq!(row.members_b, "b_1(150,250)");
    ///
    /// // a flank column inserted after the chromosome
    /// let row: SummaryRow = "chrI\t500\t150\t100\ta_1(100,200)\tb_1(150,250)"
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(row.total_b, "100");
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim_end_matches(['\r', '\n']).split('\t').collect();
        let n = fields.len();
        if n < 5 {
            return Err(RecordError::TooFewFields {
                expected: 5,
                found: n,
            });
        }

        Ok(SummaryRow {
            chr: fields[0].to_string(),
            total_a: fields[n - 4].to_string(),
            total_b: fields[n - 3].to_string(),
            members_a: fields[n - 2].to_string(),
            members_b: fields[n - 1].to_string(),
        })
    }
}

impl SummaryRow {
    /// Outer boundaries of both sides widened by `flank`.
    ///
    /// Members are taken in the given order: the first one supplies the
    /// start, the last one the end.
    ///
    /// ```
    /// # use pkr::libs::feature::Window;
    /// # use pkr::libs::summary::SummaryRow;
    /// let row: SummaryRow = "chrI\t150\t200\ta_1(100,200), a_2(200,250)\tb_1(150,350)"
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(row.window(0).unwrap(), Window::new(100, 350));
    /// assert_eq!(row.window(500).unwrap(), Window::new(-400, 850));
    /// ```
    pub fn window(&self, flank: i64) -> Result<Window, RecordError> {
        let (start_a, end_a) = bounds(&self.members_a)?;
        let (start_b, end_b) = bounds(&self.members_b)?;

        let left = start_a
            .min(start_b)
            .checked_sub(flank)
            .ok_or_else(|| RecordError::Overflow(format!("window left of {}", self.chr)))?;
        let right = end_a
            .max(end_b)
            .checked_add(flank)
            .ok_or_else(|| RecordError::Overflow(format!("window right of {}", self.chr)))?;

        Ok(Window::new(left, right))
    }

    /// Output line for a matched feature
    pub fn format(&self, flank: i64, feature: &str) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chr,
            flank,
            self.total_a,
            self.total_b,
            self.members_a,
            self.members_b,
            feature
        )
    }
}

// Start of the first member and end of the last one
fn bounds(members: &str) -> Result<(i64, i64), RecordError> {
    let descriptors: Vec<&str> = members.split(", ").collect();
    let first = descriptors.first().copied().unwrap_or_default();
    let last = descriptors.last().copied().unwrap_or_default();

    let start = nth_pos(first, 0)?;
    let end = nth_pos(last, 1)?;

    Ok((start, end))
}

fn nth_pos(descriptor: &str, n: usize) -> Result<i64, RecordError> {
    let cap = RE_POS
        .captures_iter(descriptor)
        .nth(n)
        .and_then(|c| c.get(1))
        .ok_or_else(|| RecordError::MissingCoordinates(descriptor.to_string()))?;
    parse_pos(cap.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_fields() {
        assert_eq!(
            "chrI\t150\ta_1(1,2)\tb_1(1,2)".parse::<SummaryRow>(),
            Err(RecordError::TooFewFields {
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn test_window_uses_boundary_members() {
        let row: SummaryRow =
            "chrI\t0\t0\tpeak_3(500,600), peak_4(700,900)\tpeak_8(450,650), peak_9(800,880)"
                .parse()
                .unwrap();
        assert_eq!(row.window(0).unwrap(), Window::new(450, 900));
        assert_eq!(row.window(100).unwrap(), Window::new(350, 1000));
    }

    #[test]
    fn test_window_not_resorted() {
        // the first descriptor wins even when a later one starts earlier
        let row: SummaryRow = "chrI\t0\t0\tp_1(500,600), p_2(100,700)\tq_1(550,560)"
            .parse()
            .unwrap();
        assert_eq!(row.window(0).unwrap(), Window::new(500, 700));
    }

    #[test]
    fn test_window_digits_in_names() {
        let row: SummaryRow = "chrI\t0\t0\tchr2peak_12(1000,1200)\tb_1(1100,1300)"
            .parse()
            .unwrap();
        assert_eq!(row.window(10).unwrap(), Window::new(990, 1310));
    }

    #[test]
    fn test_window_bare_names() {
        let row: SummaryRow = "chrI\t0\t0\tpeak_1, peak_2\tpeak_3".parse().unwrap();
        assert_eq!(
            row.window(0),
            Err(RecordError::MissingCoordinates("peak_1".to_string()))
        );
    }

    #[test]
    fn test_window_overflow() {
        let row: SummaryRow = "chrI\t0\t0\ta_1(100,200)\tb_1(150,250)".parse().unwrap();
        assert_eq!(
            row.window(i64::MAX),
            Err(RecordError::Overflow("window right of chrI".to_string()))
        );

        let row: SummaryRow = "chrI\t0\t0\ta_1(9223372036854775807,9223372036854775807)\tb_1(1,2)"
            .parse()
            .unwrap();
        assert_eq!(row.window(0).unwrap(), Window::new(1, i64::MAX));
        assert!(row.window(1).is_err());
    }

    #[test]
    fn test_format() {
        let row: SummaryRow = "chrI\t150\t100\ta_1(100,250)\tb_1(150,250)"
            .parse()
            .unwrap();
        assert_eq!(
            row.format(500, "ID=YAL001C"),
            "chrI\t500\t150\t100\ta_1(100,250)\tb_1(150,250)\tID=YAL001C"
        );
    }
}
