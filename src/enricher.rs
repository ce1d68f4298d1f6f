// Apply-link enrichment. Never touches a non-blank link and never invents a
// URL: either an existing generic URL passes the job-posting test, or a
// configured search provider supplies candidates, or the link stays blank.
use crate::model::{Record, RecordView};
use crate::search::SearchChain;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::info;
use url::Url;

/// Host substrings of known ATS platforms and job boards.
const JOB_DOMAIN_HINTS: &[&str] = &[
    "greenhouse.io",
    "boards.greenhouse.io",
    "lever.co",
    "workable.com",
    "jobs.lever.co",
    "smartrecruiters.com",
    "myworkdayjobs.com",
    "workday.com",
    "successfactors.com",
    "applytojob.com",
    "jobvite.com",
    "icims.com",
    "paylocity.com",
    "ashbyhq.com",
    "recruitee.com",
    "teamtailor.com",
    "bamboohr.com",
    "tal.net",
    "civilservicejobs.service.gov.uk",
    "nhs.jobs",
    "trac.jobs",
    "indeed.com",
    "indeed.co.uk",
    "linkedin.com",
    "glassdoor.com",
    "careers",
    "jobs",
    "vacancies",
];

const JOB_PATH_WORDS: &[&str] = &["job", "jobs", "careers", "vacancy", "vacancies", "apply"];

const COMPANY_SUFFIXES: &[&str] = &[
    "ltd",
    "limited",
    "plc",
    "inc",
    "llc",
    "gmbh",
    "bv",
    "sa",
    "ag",
    "co",
    "company",
    "foundation",
    "trust",
    "nhs",
];

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9 ]+").unwrap());

fn is_blank(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Lowercased words of the company name minus corporate suffixes.
pub fn company_tokens(name: &str) -> Vec<String> {
    NON_ALNUM_RE
        .replace_all(&name.to_lowercase(), " ")
        .split_whitespace()
        .filter(|t| !COMPANY_SUFFIXES.contains(t))
        .map(str::to_string)
        .collect()
}

/// Title words longer than 2 characters, capped at 6.
pub fn job_tokens(title: &str) -> Vec<String> {
    NON_ALNUM_RE
        .replace_all(&title.to_lowercase(), " ")
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .take(6)
        .map(str::to_string)
        .collect()
}

pub fn build_query(title: &str, company: &str, location: &str) -> String {
    [title, company, location, "apply"]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Heuristic test for a genuine job-application link: a known ATS/job-board
/// host, or a company token in the host with a job-ish path, or an "apply"
/// path that also carries a title token.
pub fn is_probable_job_url(u: &str, company_tokens: &[String], job_tokens: &[String]) -> bool {
    let parsed = match Url::parse(u) {
        Ok(p) => p,
        Err(_) => return false,
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let host = parsed.host_str().unwrap_or("").to_lowercase();
    let path = parsed.path().to_lowercase();

    if JOB_DOMAIN_HINTS.iter().any(|h| host.contains(h)) {
        return true;
    }
    if company_tokens.iter().any(|t| host.contains(t.as_str()))
        && JOB_PATH_WORDS.iter().any(|w| path.contains(w))
    {
        return true;
    }
    if path.contains("apply") && job_tokens.iter().any(|t| path.contains(t.as_str())) {
        return true;
    }
    false
}

pub struct LinkEnricher {
    chain: SearchChain,
}

impl LinkEnricher {
    pub fn new(chain: SearchChain) -> Self {
        Self { chain }
    }

    /// Returns an augmented copy of the record. Pass-through whenever the
    /// apply link is already populated or there is nothing to search with.
    pub async fn enrich(&self, rec: &Record) -> Record {
        let mut out = rec.clone();
        if !is_blank(out.get("apply_link")) {
            return out;
        }

        let view = RecordView::new(rec);
        let title = view.title();
        let company = view.company();
        if title.is_empty() && company.is_empty() {
            return out;
        }

        let comp_toks = company_tokens(&company);
        let title_toks = job_tokens(&title);

        // A generic URL that already looks like a job posting costs zero
        // web calls.
        if let Some(fallback) = view.generic_url() {
            if is_probable_job_url(&fallback, &comp_toks, &title_toks) {
                out.insert("apply_link".to_string(), Value::String(fallback));
                return out;
            }
        }

        if !self.chain.is_empty() {
            let query = build_query(&title, &company, &view.location());
            let links = self.chain.best_links(&query).await;
            let chosen = links
                .iter()
                .find(|u| is_probable_job_url(u, &comp_toks, &title_toks))
                .or_else(|| links.first());
            if let Some(link) = chosen {
                info!("Filled apply_link for '{}'", title);
                out.insert("apply_link".to_string(), Value::String(link.clone()));
            }
        }
        out
    }
}
