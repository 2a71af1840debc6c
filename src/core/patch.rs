//! One-shot literal patches for the flashcard page template.

/// Replace the first occurrence of `old` with `new`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralPatch {
    pub description: String,
    pub old: String,
    pub new: String,
}

/// Result of applying a literal patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// `old` was not present: the patch already ran or the template moved on
    NotFound,
}

impl LiteralPatch {
    pub fn new(
        description: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    /// Apply in place
    pub fn apply(&self, document: &mut String) -> PatchOutcome {
        match document.find(&self.old) {
            Some(pos) => {
                document.replace_range(pos..pos + self.old.len(), &self.new);
                PatchOutcome::Applied
            }
            None => PatchOutcome::NotFound,
        }
    }
}

/// Patches shipped with the tool
pub fn builtin_patches() -> Vec<LiteralPatch> {
    vec![LiteralPatch::new(
        "Traditional label hidden in Simplified mode",
        "        ${showAlt?`<div class=\"card-alt-label\">${isTrad?'Simplified':'Traditional'}: <span>${alt}</span></div>`:''}",
        "        ${showAlt&&isTrad?`<div class=\"card-alt-label\">Simplified: <span>${alt}</span></div>`:''}",
    )]
}
