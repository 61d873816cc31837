use crate::{
    date::compose_date,
    error::LookupError,
    record::{Author, CitationRecord, Field},
    source::{Request, Source, parse_url},
    xml::Element,
};

const OPENURL_URL: &str = "https://doi.crossref.org/openurl";

/// CrossRef OpenURL lookups returning `unixref` XML.
pub struct CrossRef {
    /// Account identifier CrossRef requires on every OpenURL query.
    pid: Option<String>,
}

/// Paths under `<journal>` copied straight into the record.
const FIELDS: &[(&[&str], Field)] = &[
    (&["journal_article", "titles", "title"], Field::Title),
    (&["journal_metadata", "full_title"], Field::Journal),
    (&["journal_metadata", "issn"], Field::Issn),
    (&["journal_issue", "journal_volume", "volume"], Field::Volume),
    (&["journal_issue", "issue"], Field::Issue),
    (&["journal_article", "doi_data", "doi"], Field::Doi),
];

impl CrossRef {
    pub fn new(pid: Option<String>) -> Self {
        CrossRef { pid }
    }
}

fn pages(article: &Element) -> Option<String> {
    let first = article.path_text(&["pages", "first_page"])?;
    Some(match article.path_text(&["pages", "last_page"]) {
        Some(last) => format!("{first}–{last}"),
        None => first,
    })
}

fn contributors(article: &Element, record: &mut CitationRecord) {
    let Some(list) = article.child("contributors") else {
        return;
    };
    record.touch_authors();
    for person in list.children_named("person_name") {
        if person
            .attr("contributor_role")
            .is_some_and(|role| role != "author")
        {
            continue;
        }
        if let Some(surname) = person.path_text(&["surname"]) {
            let given = person.path_text(&["given_name"]).unwrap_or_default();
            record.push_author(Author::new(surname, given));
        }
    }
}

impl Source for CrossRef {
    fn name(&self) -> &'static str {
        "crossref"
    }

    fn request(&self, identifier: &str) -> Result<Request, LookupError> {
        let pid = self
            .pid
            .as_deref()
            .ok_or_else(|| LookupError::InvalidRequest("no CrossRef pid configured".into()))?;
        let mut url = parse_url(OPENURL_URL)?;
        url.query_pairs_mut()
            .append_pair("pid", pid)
            .append_pair("id", &format!("doi:{identifier}"))
            .append_pair("noredirect", "true")
            .append_pair("format", "unixref");
        Ok(Request {
            url,
            follow_redirects: false,
        })
    }

    fn normalize(&self, body: &str, _template: &str) -> Result<CitationRecord, LookupError> {
        let root = Element::parse(body)?;
        let crossref = root
            .path(&["doi_record", "crossref"])
            .ok_or_else(|| LookupError::malformed("no doi_record/crossref element"))?;
        if let Some(err) = crossref.child("error") {
            return Err(LookupError::malformed(format!(
                "CrossRef reported: {}",
                err.text()
            )));
        }

        let mut record = CitationRecord::default();
        let Some(journal) = crossref.child("journal") else {
            return Ok(record);
        };

        for (path, field) in FIELDS {
            if let Some(v) = journal.path_text(path) {
                record.set(*field, v);
            }
        }

        let article = journal.child("journal_article");
        if let Some(p) = article.and_then(pages) {
            record.set(Field::Pages, p);
        }

        let published = journal
            .path(&["journal_issue", "publication_date"])
            .or_else(|| article.and_then(|a| a.child("publication_date")));
        if let Some(date) = published
            && let Some(year) = date.path_text(&["year"])
        {
            let month = date.path_text(&["month"]);
            let day = date.path_text(&["day"]);
            record.set_date(compose_date(&year, month.as_deref(), day.as_deref()));
        }

        if let Some(article) = article {
            contributors(article, &mut record);
        }
        Ok(record)
    }
}
