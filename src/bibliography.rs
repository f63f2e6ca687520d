//! Bibliography (.bib) author extraction.
//!
//! Pulls the distinct author names out of a BibTeX file's `author` fields.
//! Names are taken as written: each field is split on the literal
//! `" and "` separator and trimmed, with no person-name normalization.

use crate::error::{DblpError, Result};
use biblatex::{Bibliography, Chunk, Spanned};
use std::collections::BTreeSet;
use tracing::debug;

/// Extract the distinct author names from BibTeX source.
///
/// Entries without an `author` field are skipped. The contract leaves
/// ordering unspecified; this returns names sorted for stable display.
pub fn distinct_authors(src: &str) -> Result<Vec<String>> {
    let bibliography =
        Bibliography::parse(src).map_err(|e| DblpError::Bibliography(e.to_string()))?;

    let mut names: BTreeSet<String> = BTreeSet::new();
    let mut entries = 0usize;

    for entry in bibliography.iter() {
        entries += 1;
        let Some(field) = entry.get("author") else {
            continue;
        };
        let text = chunks_to_string(field);
        for name in text.split(" and ") {
            let name = name.trim();
            if !name.is_empty() {
                names.insert(name.to_string());
            }
        }
    }

    debug!(entries, authors = names.len(), "Parsed bibliography");
    Ok(names.into_iter().collect())
}

/// Flatten biblatex chunks to a plain string.
fn chunks_to_string(chunks: &[Spanned<Chunk>]) -> String {
    chunks
        .iter()
        .map(|c| match &c.v {
            Chunk::Normal(s) => s.as_str(),
            Chunk::Verbatim(s) => s.as_str(),
            Chunk::Math(s) => s.as_str(),
        })
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_and() {
        let bib = r#"
@article{doe2023,
  title = {A Paper},
  author = {Doe, John and Smith, Jane},
  year = {2023}
}
"#;
        let authors = distinct_authors(bib).expect("parse failed");
        assert_eq!(authors, vec!["Doe, John", "Smith, Jane"]);
    }

    #[test]
    fn test_deduplicates_across_entries() {
        let bib = r#"
@article{a2022,
  title = {First},
  author = {Doe, John and Smith, Jane},
  year = {2022}
}
@inproceedings{b2023,
  title = {Second},
  author = {Doe, John and Kim, Sun},
  year = {2023}
}
"#;
        let authors = distinct_authors(bib).expect("parse failed");
        assert_eq!(authors, vec!["Doe, John", "Kim, Sun", "Smith, Jane"]);
    }

    #[test]
    fn test_entry_without_author_skipped() {
        let bib = r#"
@misc{web2020,
  title = {Some Website},
  year = {2020}
}
@article{doe2023,
  title = {A Paper},
  author = {Doe, John},
  year = {2023}
}
"#;
        let authors = distinct_authors(bib).expect("parse failed");
        assert_eq!(authors, vec!["Doe, John"]);
    }

    #[test]
    fn test_empty_source() {
        let authors = distinct_authors("").expect("parse failed");
        assert!(authors.is_empty());
    }
}
