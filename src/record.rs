use serde::{Serialize, Serializer};

use crate::date::{Month, PartialDate};

/// The canonical citation record every source is normalised into.
///
/// Absent fields mean the source did not report them; none are ever filled in with defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CitationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulldate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Author>>,
}

/// One author, serialised as a `[family, given]` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub family: String,
    pub given: String,
}

impl Author {
    pub fn new(family: impl Into<String>, given: impl Into<String>) -> Self {
        Author {
            family: family.into(),
            given: given.into(),
        }
    }
}

impl Serialize for Author {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.family, &self.given).serialize(serializer)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Month::Known(m) => serializer.serialize_str(m),
            Month::Unknown => serializer.serialize_bool(false),
        }
    }
}

/// Plain string-valued fields that source field tables can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Chapter,
    Journal,
    Volume,
    Issue,
    Pages,
    Publisher,
    Location,
    Edition,
    Isbn,
    Issn,
    Doi,
    Language,
    Date,
}

impl CitationRecord {
    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Chapter => &mut self.chapter,
            Field::Journal => &mut self.journal,
            Field::Volume => &mut self.volume,
            Field::Issue => &mut self.issue,
            Field::Pages => &mut self.pages,
            Field::Publisher => &mut self.publisher,
            Field::Location => &mut self.location,
            Field::Edition => &mut self.edition,
            Field::Isbn => &mut self.isbn,
            Field::Issn => &mut self.issn,
            Field::Doi => &mut self.doi,
            Field::Language => &mut self.language,
            Field::Date => &mut self.date,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Store a composed date along with its `fulldate`, `year` and `month` companions.
    pub fn set_date(&mut self, date: PartialDate) {
        self.date = Some(date.date);
        self.fulldate = Some(date.fulldate);
        self.year = date.year;
        self.month = date.month;
    }

    /// Append an author, creating the list on first use.
    pub fn push_author(&mut self, author: Author) {
        self.authors.get_or_insert_with(Vec::new).push(author);
    }

    /// Mark that the source carried an author list, even if every entry gets dropped.
    pub fn touch_authors(&mut self) {
        self.authors.get_or_insert_with(Vec::new);
    }

    pub fn is_empty(&self) -> bool {
        *self == CitationRecord::default()
    }

    /// Escape pipes in every string so the record can be spliced into wiki template markup.
    pub fn finalize(mut self) -> Self {
        for slot in [
            &mut self.title,
            &mut self.chapter,
            &mut self.journal,
            &mut self.volume,
            &mut self.issue,
            &mut self.pages,
            &mut self.publisher,
            &mut self.location,
            &mut self.edition,
            &mut self.isbn,
            &mut self.issn,
            &mut self.doi,
            &mut self.language,
            &mut self.date,
            &mut self.year,
        ]
        .into_iter()
        .flatten()
        {
            *slot = escape_pipes(slot);
        }
        if let Some(Month::Known(m)) = &mut self.month {
            *m = escape_pipes(m);
        }
        for author in self.authors.iter_mut().flatten() {
            author.family = escape_pipes(&author.family);
            author.given = escape_pipes(&author.given);
        }
        self
    }
}

pub fn escape_pipes(s: &str) -> String {
    s.replace('|', "{{!}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::compose_date;

    #[test]
    fn empty_record_serialises_as_empty_object() {
        let json = serde_json::to_string(&CitationRecord::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn unknown_month_serialises_as_false() {
        let mut r = CitationRecord::default();
        r.set_date(compose_date("1999", None, None));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"date": "1999", "year": "1999", "month": false, "fulldate": false})
        );
    }

    #[test]
    fn full_date_omits_year_and_month() {
        let mut r = CitationRecord::default();
        r.set_date(compose_date("1999", Some("Jul"), Some("4")));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, serde_json::json!({"date": "1999-07-04", "fulldate": true}));
    }

    #[test]
    fn authors_serialise_as_pairs() {
        let mut r = CitationRecord::default();
        r.push_author(Author::new("Doe", "Jane"));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, serde_json::json!({"authors": [["Doe", "Jane"]]}));
    }

    #[test]
    fn finalize_escapes_pipes_everywhere() {
        let mut r = CitationRecord::default();
        r.set(Field::Title, "A|B");
        r.set(Field::Publisher, "x|y|z");
        r.push_author(Author::new("Fam|ily", "Gi|ven"));
        let r = r.finalize();
        assert_eq!(r.title.as_deref(), Some("A{{!}}B"));
        assert_eq!(r.publisher.as_deref(), Some("x{{!}}y{{!}}z"));
        assert_eq!(r.authors.unwrap()[0], Author::new("Fam{{!}}ily", "Gi{{!}}ven"));
    }

    #[test]
    fn finalize_leaves_no_pipes() {
        proptest::proptest!(|(s in "[a-z|]{0,24}")| {
            let mut r = CitationRecord::default();
            r.set(Field::Journal, s.clone());
            let r = r.finalize();
            let j = r.journal.unwrap();
            proptest::prop_assert!(!j.replace("{{!}}", "").contains('|'));
        })
    }

    #[test]
    fn touched_author_list_is_present_but_empty() {
        let mut r = CitationRecord::default();
        r.touch_authors();
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"authors":[]}"#);
    }
}
