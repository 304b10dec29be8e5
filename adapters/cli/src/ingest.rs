//! Splits manual ingestion files into per-model submissions.
//!
//! Each block starts with a `model: <name>` header line. An optional
//! `time: <seconds>` line inside the block records how long the model took;
//! the remaining text is graded as-is.

use std::sync::OnceLock;

use anyhow::{bail, Result};
use regex::Regex;

static MODEL_HEADER: OnceLock<Regex> = OnceLock::new();
static ELAPSED_TIME: OnceLock<Regex> = OnceLock::new();

fn model_header() -> &'static Regex {
    MODEL_HEADER.get_or_init(|| Regex::new(r"(?m)^(?:model|MODEL):[ \t]*(.+?)\s*$").expect("valid regex"))
}

fn elapsed_time() -> &'static Regex {
    ELAPSED_TIME.get_or_init(|| Regex::new(r"(?m)^(?:time|TIME):[ \t]*([\d.]+)").expect("valid regex"))
}

/// One model's submission inside an ingestion file.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct IngestEntry<'a> {
    pub(crate) model: &'a str,
    pub(crate) elapsed_seconds: f64,
    pub(crate) body: &'a str,
}

/// Splits `contents` at every model header.
pub(crate) fn split_entries(contents: &str) -> Result<Vec<IngestEntry<'_>>> {
    if contents.trim().is_empty() {
        bail!("ingest file is empty");
    }

    let headers: Vec<_> = model_header().captures_iter(contents).collect();
    if headers.is_empty() {
        bail!("no 'model: <name>' headers found");
    }

    let mut entries = Vec::with_capacity(headers.len());
    for (index, captures) in headers.iter().enumerate() {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let end = headers
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(contents.len(), |next| next.start());
        let body = &contents[whole.end()..end];

        let elapsed_seconds = elapsed_time()
            .captures(body)
            .and_then(|time| time.get(1))
            .and_then(|value| value.as_str().parse().ok())
            .unwrap_or(0.0);

        entries.push(IngestEntry {
            model: name.as_str(),
            elapsed_seconds,
            body,
        });
    }

    Ok(entries)
}
