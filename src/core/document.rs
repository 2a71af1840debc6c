//! Rewriting the flashcard page: template patches plus HSK1 meaning cleanup.

use tracing::{info, warn};

use super::cleaner::MeaningCleaner;
use super::embed::{locate_array, splice, EmbedError};
use super::patch::{LiteralPatch, PatchOutcome};
use crate::domain::vocab::{parse_entries, serialize_entries};

/// One meaning that the cleaner changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeaningChange {
    pub headword: String,
    pub before: String,
    pub after: String,
}

/// What happened to the document
#[derive(Debug, Default)]
pub struct RewriteReport {
    /// Descriptions of patches that applied
    pub patches_applied: Vec<String>,

    /// Descriptions of patches that were already applied or not found
    pub patches_skipped: Vec<String>,

    /// Changed meanings, in document order
    pub changes: Vec<MeaningChange>,

    /// Set when the meaning rewrite was skipped
    pub meaning_error: Option<EmbedError>,
}

impl RewriteReport {
    /// True if the document needs to be written back
    pub fn modified(&self) -> bool {
        !self.patches_applied.is_empty() || !self.changes.is_empty()
    }
}

/// Applies literal patches and cleans the embedded vocabulary array
pub struct DocumentRewriter {
    cleaner: MeaningCleaner,
    marker: String,
    patches: Vec<LiteralPatch>,
}

impl DocumentRewriter {
    pub fn new(cleaner: MeaningCleaner, marker: impl Into<String>) -> Self {
        Self {
            cleaner,
            marker: marker.into(),
            patches: Vec::new(),
        }
    }

    pub fn with_patches(mut self, patches: Vec<LiteralPatch>) -> Self {
        self.patches = patches;
        self
    }

    /// Rewrite `document` in place.
    ///
    /// Patches run first. A missing marker, unbalanced array or invalid
    /// JSON skips the meaning rewrite entirely and is recorded in the report.
    pub fn rewrite(&self, document: &mut String) -> RewriteReport {
        let mut report = RewriteReport::default();

        for patch in &self.patches {
            match patch.apply(document) {
                PatchOutcome::Applied => {
                    info!("Patch applied: {}", patch.description);
                    report.patches_applied.push(patch.description.clone());
                }
                PatchOutcome::NotFound => {
                    info!("Patch already applied or not found: {}", patch.description);
                    report.patches_skipped.push(patch.description.clone());
                }
            }
        }

        match self.clean_meanings(document) {
            Ok(changes) => report.changes = changes,
            Err(e) => {
                warn!("Meaning cleanup skipped: {}", e);
                report.meaning_error = Some(e);
            }
        }

        report
    }

    fn clean_meanings(&self, document: &mut String) -> Result<Vec<MeaningChange>, EmbedError> {
        let span = locate_array(document, &self.marker)?;
        let mut entries = parse_entries(span.slice(document))?;

        let mut changes = Vec::new();
        for entry in &mut entries {
            let before = entry.meaning().to_string();
            let after = self.cleaner.clean_entry(entry.headword(), &before);
            if after != before {
                info!("  {}: {:?} → {:?}", entry.headword(), before, after);
                changes.push(MeaningChange {
                    headword: entry.headword().to_string(),
                    before,
                    after: after.clone(),
                });
                entry.set_meaning(after);
            }
        }

        if !changes.is_empty() {
            let json = serialize_entries(&entries)?;
            *document = splice(document, span, &json);
        }

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::embed::DEFAULT_MARKER;

    fn rewriter() -> DocumentRewriter {
        DocumentRewriter::new(MeaningCleaner::new().unwrap(), DEFAULT_MARKER)
    }

    #[test]
    fn test_rewrite_cleans_and_splices() {
        let mut doc = concat!(
            "<script>\nconst h1=[",
            r#"{"s":"本","m":"volume; CL:本[ben3]"},"#,
            r#"{"s":"个","m":"[gè]"},"#,
            r#"{"s":"好","m":"good"}"#,
            "];\nrender(h1);\n</script>"
        )
        .to_string();

        let report = rewriter().rewrite(&mut doc);

        assert_eq!(report.changes.len(), 2);
        assert!(report.modified());
        assert_eq!(
            doc,
            concat!(
                "<script>\nconst h1=[",
                r#"{"s":"本","m":"volume"},"#,
                r#"{"s":"个","m":"(general measure word)"},"#,
                r#"{"s":"好","m":"good"}"#,
                "];\nrender(h1);\n</script>"
            )
        );
    }

    #[test]
    fn test_unchanged_array_not_reserialized() {
        let original = "const h1=[ {\"s\": \"好\", \"m\": \"good\"} ];";
        let mut doc = original.to_string();

        let report = rewriter().rewrite(&mut doc);

        assert!(!report.modified());
        assert_eq!(doc, original);
    }

    #[test]
    fn test_missing_marker_skips() {
        let original = "<html>no data</html>";
        let mut doc = original.to_string();

        let report = rewriter().rewrite(&mut doc);

        assert!(matches!(report.meaning_error, Some(EmbedError::MarkerNotFound(_))));
        assert!(!report.modified());
        assert_eq!(doc, original);
    }

    #[test]
    fn test_invalid_json_skips() {
        let original = "const h1=[{s:1}];";
        let mut doc = original.to_string();

        let report = rewriter().rewrite(&mut doc);

        assert!(matches!(report.meaning_error, Some(EmbedError::InvalidJson(_))));
        assert_eq!(doc, original);
    }

    #[test]
    fn test_patches_run_before_cleanup() {
        let patch = LiteralPatch::new("rename", "const data=", "const h1=");
        let mut doc = r#"const data=[{"s":"爱","m":"love 爱"}]"#.to_string();

        let report = rewriter().with_patches(vec![patch]).rewrite(&mut doc);

        assert_eq!(report.patches_applied, vec!["rename".to_string()]);
        assert_eq!(doc, r#"const h1=[{"s":"爱","m":"love"}]"#);
    }
}
