//! Splitting free-text personal names into given and family parts.

use once_cell::sync::Lazy;
use regex::Regex;

/// Which naming convention a raw author string follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// "Given Names Family", split on the last space.
    Simple,
    /// Library-catalog style, e.g. "Smith, John (1920-1999).".
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub given: String,
    pub family: String,
}

impl Name {
    /// Whether a family part was actually separated from the input.
    pub fn is_split(&self) -> bool {
        !self.family.is_empty()
    }
}

pub fn parse(raw: &str, style: NameStyle) -> Option<Name> {
    match style {
        NameStyle::Simple => Some(parse_simple(raw)),
        NameStyle::Catalog => parse_catalog(raw),
    }
}

fn parse_simple(raw: &str) -> Name {
    static SIMPLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?) (\S*)$").unwrap());

    match SIMPLE_RE.captures(raw) {
        Some(caps) => Name {
            given: caps[1].to_string(),
            family: caps[2].to_string(),
        },
        None => Name {
            given: raw.to_string(),
            family: String::new(),
        },
    }
}

fn parse_catalog(raw: &str) -> Option<Name> {
    static PARENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" \([^)]*\)").unwrap());
    static YEARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" [\d\-.,]+").unwrap());
    static TRAILING_PERIOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w{2,})\.$").unwrap());
    static FAMILY_GIVEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^,]+), (.+)").unwrap());

    let s = PARENS_RE.replace_all(raw, "");
    let s = YEARS_RE.replace_all(&s, "");
    let s = s.strip_suffix(',').unwrap_or(&s);

    // Suffixes and single initials keep their period.
    let s = if s.ends_with(" Jr.") || s.ends_with(" Sr.") {
        s.to_string()
    } else {
        TRAILING_PERIOD_RE.replace(s, "$1").into_owned()
    };

    let caps = FAMILY_GIVEN_RE.captures(&s)?;
    Some(Name {
        given: caps[2].to_string(),
        family: caps[1].to_string(),
    })
}

/// Which parsed author names an adapter keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamePolicy {
    pub reject_commas: bool,
}

impl NamePolicy {
    pub fn accepts_part(&self, part: &str) -> bool {
        let leading_digit = part.chars().next().is_some_and(|c| c.is_ascii_digit());
        !leading_digit && !(self.reject_commas && part.contains(','))
    }

    pub fn accepts(&self, name: &Name) -> bool {
        self.accepts_part(&name.given) && self.accepts_part(&name.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(s: &str) -> Name {
        parse(s, NameStyle::Simple).unwrap()
    }

    fn catalog(s: &str) -> Option<Name> {
        parse(s, NameStyle::Catalog)
    }

    #[test]
    fn simple_splits_on_last_space() {
        assert_eq!(
            simple("John Smith"),
            Name {
                given: "John".into(),
                family: "Smith".into()
            }
        );
        let n = simple("John Ronald Reuel Tolkien");
        assert_eq!(n.given, "John Ronald Reuel");
        assert_eq!(n.family, "Tolkien");
    }

    #[test]
    fn simple_without_space_leaves_family_empty() {
        let n = simple("Cher");
        assert_eq!(n.given, "Cher");
        assert!(!n.is_split());
    }

    #[test]
    fn pubmed_style_author_keeps_order() {
        // PubMed lists "Family Initials"; the split is positional only.
        let n = simple("Smith JA");
        assert_eq!(n.given, "Smith");
        assert_eq!(n.family, "JA");
    }

    #[test]
    fn catalog_strips_lifespan_and_period() {
        let n = catalog("Smith, John (1920-1999).").unwrap();
        assert_eq!(n.given, "John");
        assert_eq!(n.family, "Smith");
    }

    #[test]
    fn catalog_strips_bare_years() {
        let n = catalog("Austen, Jane, 1775-1817.").unwrap();
        assert_eq!(n.given, "Jane");
        assert_eq!(n.family, "Austen");
    }

    #[test]
    fn catalog_keeps_suffix_periods() {
        let n = catalog("Smith, John Jr.").unwrap();
        assert_eq!(n.given, "John Jr.");
        let n = catalog("Doe, Jane Sr.").unwrap();
        assert_eq!(n.given, "Jane Sr.");
    }

    #[test]
    fn catalog_keeps_initial_period() {
        let n = catalog("Tolkien, J. R. R.").unwrap();
        assert_eq!(n.given, "J. R. R.");
    }

    #[test]
    fn catalog_without_comma_fails() {
        assert_eq!(catalog("Plato"), None);
        assert_eq!(catalog("Anonymous (1900-1950)."), None);
    }

    #[test]
    fn policy_rejects_leading_digits() {
        let policy = NamePolicy::default();
        assert!(!policy.accepts_part("1920-1999"));
        assert!(policy.accepts_part("Smith"));
        assert!(policy.accepts_part("Smith, Jr"));
    }

    #[test]
    fn policy_can_reject_commas() {
        let policy = NamePolicy {
            reject_commas: true,
        };
        assert!(!policy.accepts(&Name {
            given: "John".into(),
            family: "Smith,".into()
        }));
    }

    #[test]
    fn simple_round_trips_two_tokens() {
        proptest::proptest!(|(given in "[A-Za-z]{1,12}( [A-Za-z]{1,12}){0,2}", family in "[A-Za-z'-]{1,16}")| {
            let n = simple(&format!("{given} {family}"));
            proptest::prop_assert_eq!(n.given, given);
            proptest::prop_assert_eq!(n.family, family);
        })
    }
}
