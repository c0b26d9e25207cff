//! FAQ export reader (`QUESTION`, `ANSWER` columns).

use std::{fs::File, io::Read, path::Path};

use tracing::debug;

use crate::{errors::RagError, record::FaqEntry};

/// Reads every row of the export at `path`.
pub fn read_faq_csv(path: impl AsRef<Path>) -> Result<Vec<FaqEntry>, RagError> {
    let file = File::open(path.as_ref())?;
    let rows = read_faq_from(file)?;
    debug!(path = ?path.as_ref(), rows = rows.len(), "faq csv loaded");
    Ok(rows)
}

/// Reads FAQ rows from any reader.
///
/// Header names are matched case-insensitively. Ids are assigned by row
/// position (`id_0`, `id_1`, ...) so a re-read of the same file reproduces
/// the same ids.
pub fn read_faq_from<R: Read>(reader: R) -> Result<Vec<FaqEntry>, RagError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(RagError::MissingColumn(name))
    };
    let q_idx = column("QUESTION")?;
    let a_idx = column("ANSWER")?;

    let mut out = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        out.push(FaqEntry {
            id: format!("id_{i}"),
            question: row.get(q_idx).unwrap_or_default().to_string(),
            answer: row.get(a_idx).unwrap_or_default().to_string(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_with_sequential_ids() {
        let data = "QUESTION,ANSWER\n\
                    What is your return policy?,Returns are accepted within 30 days.\n\
                    \"Do you ship abroad?\",\"No, only within India.\"\n";
        let rows = read_faq_from(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "id_0");
        assert_eq!(rows[1].id, "id_1");
        assert_eq!(rows[1].answer, "No, only within India.");
    }

    #[test]
    fn headers_are_case_insensitive_and_required() {
        let rows = read_faq_from("question,answer\nq,a\n".as_bytes()).unwrap();
        assert_eq!(rows[0].question, "q");

        let err = read_faq_from("prompt,answer\nq,a\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RagError::MissingColumn("QUESTION")));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.csv");
        std::fs::write(&path, "QUESTION,ANSWER\nHi?,Hello.\n").unwrap();
        assert_eq!(read_faq_csv(&path).unwrap().len(), 1);
        assert!(matches!(
            read_faq_csv(dir.path().join("missing.csv")),
            Err(RagError::Io(_))
        ));
    }
}
