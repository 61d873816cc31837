//! Month lookup and partial-precision date composition.

/// Month part of a [`PartialDate`] that lacks day precision.
///
/// Serialised as the two-digit month string, or `false` when the month is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Month {
    Known(String),
    Unknown,
}

/// A date truncated to the most specific unit the upstream actually reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialDate {
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub date: String,
    pub fulldate: bool,
    /// Set only when `fulldate` is false.
    pub year: Option<String>,
    /// Set only when `fulldate` is false.
    pub month: Option<Month>,
}

const MONTHS: [(&str, &str); 12] = [
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dec", "12"),
];

/// Map a three-letter month abbreviation to its two-digit number.
///
/// Ranges such as `Jul-Aug` resolve to their first month.
pub fn month_number(token: &str) -> Option<&'static str> {
    let first = token.split('-').next().unwrap_or(token);
    MONTHS
        .iter()
        .find(|(abbr, _)| *abbr == first)
        .map(|(_, num)| *num)
}

/// Like [`month_number`], but also accepts numeric months (`7`, `07`).
pub fn resolve_month(token: &str) -> Option<String> {
    if let Some(num) = month_number(token) {
        return Some(num.to_string());
    }
    let n: u8 = token.trim().parse().ok()?;
    (1..=12).contains(&n).then(|| format!("{n:02}"))
}

/// Build the best partial ISO date available from its components.
pub fn compose_date(year: &str, month: Option<&str>, day: Option<&str>) -> PartialDate {
    let month = month.and_then(resolve_month);
    let day = day.map(str::trim).filter(|d| !d.is_empty());

    match (month, day) {
        (Some(m), Some(d)) => PartialDate {
            date: format!("{year}-{m}-{d:0>2}"),
            fulldate: true,
            year: None,
            month: None,
        },
        (Some(m), None) => PartialDate {
            date: format!("{year}-{m}"),
            fulldate: false,
            year: Some(year.to_string()),
            month: Some(Month::Known(m)),
        },
        (None, _) => PartialDate {
            date: year.to_string(),
            fulldate: false,
            year: Some(year.to_string()),
            month: Some(Month::Unknown),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_number_covers_every_abbreviation() {
        let expected = [
            "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
        ];
        for ((abbr, _), want) in MONTHS.iter().zip(expected) {
            assert_eq!(month_number(abbr), Some(want));
        }
    }

    #[test]
    fn month_number_takes_first_month_of_range() {
        assert_eq!(month_number("Jul-Aug"), Some("07"));
        assert_eq!(month_number("Dec-Jan"), Some("12"));
    }

    #[test]
    fn month_number_rejects_unknown_tokens() {
        assert_eq!(month_number("Xyz"), None);
        assert_eq!(month_number("jul"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn resolve_month_accepts_numeric() {
        assert_eq!(resolve_month("7").as_deref(), Some("07"));
        assert_eq!(resolve_month("11").as_deref(), Some("11"));
        assert_eq!(resolve_month("13"), None);
        assert_eq!(resolve_month("0"), None);
    }

    #[test]
    fn compose_year_only() {
        let d = compose_date("1999", None, None);
        assert_eq!(d.date, "1999");
        assert!(!d.fulldate);
        assert_eq!(d.year.as_deref(), Some("1999"));
        assert_eq!(d.month, Some(Month::Unknown));
    }

    #[test]
    fn compose_year_month() {
        let d = compose_date("1999", Some("Jul"), None);
        assert_eq!(d.date, "1999-07");
        assert!(!d.fulldate);
        assert_eq!(d.year.as_deref(), Some("1999"));
        assert_eq!(d.month, Some(Month::Known("07".into())));
    }

    #[test]
    fn compose_full_date_pads_day_and_omits_parts() {
        let d = compose_date("1999", Some("Jul"), Some("4"));
        assert_eq!(d.date, "1999-07-04");
        assert!(d.fulldate);
        assert_eq!(d.year, None);
        assert_eq!(d.month, None);
    }

    #[test]
    fn compose_with_unknown_month_drops_day() {
        let d = compose_date("2003", Some("Spring"), Some("12"));
        assert_eq!(d.date, "2003");
        assert!(!d.fulldate);
        assert_eq!(d.month, Some(Month::Unknown));
    }

    #[test]
    fn year_and_month_present_iff_not_fulldate() {
        proptest::proptest!(|(
            year in "[12][0-9]{3}",
            month in proptest::option::of(proptest::sample::select(vec!["Jan", "Jun", "Dec", "Foo", "3"])),
            day in proptest::option::of(1u8..=31),
        )| {
            let day = day.map(|d| d.to_string());
            let d = compose_date(&year, month, day.as_deref());
            proptest::prop_assert_eq!(d.fulldate, d.year.is_none());
            proptest::prop_assert_eq!(d.fulldate, d.month.is_none());
            proptest::prop_assert!(d.date.starts_with(&year));
        })
    }
}
