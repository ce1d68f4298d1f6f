// Per-file pipeline: load → resolve field → classify all → enrich links →
// filter → write the labeled/filtered artifact pair. Output is only written
// once the whole file has been processed in memory.
use crate::classifier::{LlmClassifier, rules};
use crate::enricher::LinkEnricher;
use crate::model::{ClassifyError, Label, PipelineError, Record, RecordView};
use crate::resolver::{detect_desc_key, extract_text};
use crate::scoring::likely_to_sponsor;
use crate::window::focus_window;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Default, Serialize)]
pub struct LabelCounts {
    #[serde(rename = "YES")]
    pub yes: usize,
    #[serde(rename = "No")]
    pub no: usize,
    #[serde(rename = "Maybe")]
    pub maybe: usize,
}

impl LabelCounts {
    fn bump(&mut self, label: Label) {
        match label {
            Label::Yes => self.yes += 1,
            Label::No => self.no += 1,
            Label::Maybe => self.maybe += 1,
        }
    }
}

/// One-line summary of a processed file, also serialized into the final
/// aggregate report.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub desc_key: Option<String>,
    pub counts: LabelCounts,
    pub kept: usize,
    pub out_labeled: String,
    pub out_filtered: String,
}

/// Reads a JSON array or line-delimited JSON, detected by the first
/// non-whitespace character. Every element must be an object.
pub fn load_records(path: &Path) -> Result<Vec<Record>, PipelineError> {
    let raw = fs::read_to_string(path)?;
    let shape_err = || PipelineError::InvalidShape(path.display().to_string());

    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed)?;
        return values
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => Ok(map),
                _ => Err(shape_err()),
            })
            .collect();
    }

    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match serde_json::from_str::<Value>(line)? {
            Value::Object(map) => Ok(map),
            _ => Err(shape_err()),
        })
        .collect()
}

/// Classifies one record against the resolved description field, returning an
/// augmented copy alongside the verdict. LLM first; any failure degrades to
/// the rule tier with a marked reason.
async fn classify_record(
    rec: &Record,
    desc_key: Option<&str>,
    llm: &LlmClassifier,
) -> (Record, Label) {
    let view = RecordView::new(rec);
    let title = view.title();
    let desc = extract_text(rec, desc_key);
    let combined = if title.is_empty() {
        desc
    } else {
        format!("{title}. {desc}").trim().to_string()
    };

    let (window, full_context) = focus_window(&combined);
    let (label, reason) = match llm.classify(&title, &window, &full_context).await {
        Ok(result) => result,
        Err(e) => {
            match e {
                ClassifyError::MissingApiKey => {
                    debug!("No LLM credential, using rule classifier")
                }
                other => warn!("LLM classification failed ({}), using rules", other),
            }
            let (label, reason) = rules::classify(&combined);
            (label, format!("{reason} (fallback)"))
        }
    };

    let mut out = rec.clone();
    out.insert(
        "visa_sponsorship".to_string(),
        Value::String(label.as_str().to_string()),
    );
    out.insert("visa_sponsorship_reason".to_string(), Value::String(reason));
    if let Some(score) = likely_to_sponsor(label, &combined, &view.salary_formatted()) {
        out.insert("likely_to_sponsor".to_string(), Value::Number(score.into()));
    }
    (out, label)
}

fn is_yes_or_maybe(rec: &Record) -> bool {
    rec.get("visa_sponsorship")
        .and_then(Value::as_str)
        .map(|s| {
            let up = s.trim().to_uppercase();
            up == "YES" || up == "MAYBE"
        })
        .unwrap_or(false)
}

fn write_records(path: &Path, records: &[Record]) -> Result<(), PipelineError> {
    let array = Value::Array(records.iter().cloned().map(Value::Object).collect());
    fs::write(path, serde_json::to_string_pretty(&array)?)?;
    Ok(())
}

pub async fn process_file(
    path: &Path,
    out_dir: &Path,
    llm: &LlmClassifier,
    enricher: &LinkEnricher,
) -> Result<FileReport, PipelineError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    let records = load_records(path)?;
    let desc_key = detect_desc_key(&records);
    info!(
        "Loaded {} record(s) from {} (desc_key={:?})",
        records.len(),
        path.display(),
        desc_key
    );

    // Classification happens before enrichment; enrichment reuses the title
    // and company fields but not the label.
    let mut labeled = Vec::with_capacity(records.len());
    let mut counts = LabelCounts::default();
    for rec in &records {
        let (classified, label) = classify_record(rec, desc_key.as_deref(), llm).await;
        counts.bump(label);
        labeled.push(classified);
    }

    let mut enriched = Vec::with_capacity(labeled.len());
    for rec in &labeled {
        enriched.push(enricher.enrich(rec).await);
    }

    let filtered: Vec<Record> = enriched.iter().filter(|r| is_yes_or_maybe(r)).cloned().collect();

    let labeled_path = out_dir.join(format!("{stem}_labeled.json"));
    let filtered_path = out_dir.join(format!("{stem}_filtered_yes_maybe.json"));
    write_records(&labeled_path, &enriched)?;
    write_records(&filtered_path, &filtered)?;

    Ok(FileReport {
        file: path.display().to_string(),
        desc_key,
        kept: filtered.len(),
        counts,
        out_labeled: labeled_path.display().to_string(),
        out_filtered: filtered_path.display().to_string(),
    })
}

/// Processes every `*.json` file in a directory in name order. A file that
/// fails to load or parse is logged and skipped; the run continues and the
/// summary holds one report per successful file.
pub async fn process_dir(
    input_dir: &Path,
    out_dir: &Path,
    llm: &LlmClassifier,
    enricher: &LinkEnricher,
) -> Result<Vec<FileReport>, PipelineError> {
    let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        info!(
            "No JSON files found in {}. Place files there or use --file.",
            input_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut reports = Vec::new();
    for (i, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        info!("[{}/{}] Processing {} ...", i + 1, files.len(), name);
        match process_file(file, out_dir, llm, enricher).await {
            Ok(report) => {
                info!("  -> kept {} | desc_key={:?}", report.kept, report.desc_key);
                reports.push(report);
            }
            Err(e) => {
                warn!("  !! error processing {}: {}", name, e);
            }
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::search::SearchChain;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_json_arrays_and_ndjson() {
        let dir = TempDir::new().unwrap();
        let array = write_file(&dir, "a.json", r#"  [{"x": 1}, {"y": 2}]"#);
        assert_eq!(load_records(&array).unwrap().len(), 2);

        let ndjson = write_file(&dir, "b.json", "{\"x\": 1}\n\n{\"y\": 2}\n");
        assert_eq!(load_records(&ndjson).unwrap().len(), 2);
    }

    #[test]
    fn rejects_malformed_and_non_object_input() {
        let dir = TempDir::new().unwrap();
        let bad = write_file(&dir, "bad.json", "{not json at all");
        assert!(load_records(&bad).is_err());

        let scalars = write_file(&dir, "scalars.json", "[1, 2, 3]");
        assert!(matches!(
            load_records(&scalars),
            Err(PipelineError::InvalidShape(_))
        ));
    }

    #[tokio::test]
    async fn process_file_writes_both_artifacts_and_filters_no() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let input = write_file(
            &dir,
            "batch.json",
            &json!([
                {
                    "job_title": "Care Assistant",
                    "description_text": "We do not offer visa sponsorship for this role.",
                },
                {
                    "job_title": "Software Engineer",
                    "description_text": "Visa sponsorship is available for this position.",
                    "salary_formatted": "£38k",
                },
            ])
            .to_string(),
        );

        let llm = LlmClassifier::new(None, "gpt-4o-mini".into());
        let enricher = LinkEnricher::new(SearchChain::from_config(&AppConfig::offline()));
        let report = process_file(&input, out.path(), &llm, &enricher)
            .await
            .unwrap();

        assert_eq!(report.desc_key.as_deref(), Some("description_text"));
        assert_eq!(report.counts.no, 1);
        assert_eq!(report.counts.yes, 1);
        assert_eq!(report.kept, 1);

        let labeled = load_records(Path::new(&report.out_labeled)).unwrap();
        assert_eq!(labeled.len(), 2);
        assert_eq!(labeled[0]["visa_sponsorship"], json!("No"));
        assert!(!labeled[0].contains_key("likely_to_sponsor"));
        assert_eq!(labeled[1]["visa_sponsorship"], json!("YES"));
        // YES base 80, positive cue +5, low salary penalty −10.
        assert_eq!(labeled[1]["likely_to_sponsor"], json!(75));
        assert!(
            labeled[1]["visa_sponsorship_reason"]
                .as_str()
                .unwrap()
                .ends_with("(fallback)")
        );

        let filtered = load_records(Path::new(&report.out_filtered)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["visa_sponsorship"], json!("YES"));
    }

    #[tokio::test]
    async fn inconclusive_records_default_to_maybe_and_are_kept() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let input = write_file(
            &dir,
            "plain.json",
            r#"[{"description": "A friendly team with great benefits."}]"#,
        );

        let llm = LlmClassifier::new(None, "gpt-4o-mini".into());
        let enricher = LinkEnricher::new(SearchChain::from_config(&AppConfig::offline()));
        let report = process_file(&input, out.path(), &llm, &enricher)
            .await
            .unwrap();

        assert_eq!(report.counts.maybe, 1);
        assert_eq!(report.kept, 1);
        let labeled = load_records(Path::new(&report.out_labeled)).unwrap();
        assert_eq!(labeled[0]["visa_sponsorship"], json!("Maybe"));
        let score = labeled[0]["likely_to_sponsor"].as_i64().unwrap();
        assert!((50..=90).contains(&score));
    }

    #[tokio::test]
    async fn directory_run_continues_past_malformed_files() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        // Sorts first, so the run must survive it to reach the valid file.
        write_file(&dir, "00_bad.json", "{not json at all");
        write_file(
            &dir,
            "01_good.json",
            r#"[{"job_title": "Engineer", "description_text": "Visa sponsorship is available."}]"#,
        );
        write_file(&dir, "notes.txt", "not a batch file");

        let llm = LlmClassifier::new(None, "gpt-4o-mini".into());
        let enricher = LinkEnricher::new(SearchChain::from_config(&AppConfig::offline()));
        let reports = process_dir(dir.path(), out.path(), &llm, &enricher)
            .await
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert!(reports[0].file.ends_with("01_good.json"));
        assert_eq!(reports[0].counts.yes, 1);
        assert!(Path::new(&reports[0].out_labeled).exists());
        assert!(Path::new(&reports[0].out_filtered).exists());
    }

    #[tokio::test]
    async fn empty_directory_yields_an_empty_summary() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let llm = LlmClassifier::new(None, "gpt-4o-mini".into());
        let enricher = LinkEnricher::new(SearchChain::from_config(&AppConfig::offline()));
        let reports = process_dir(dir.path(), out.path(), &llm, &enricher)
            .await
            .unwrap();
        assert!(reports.is_empty());
    }
}
