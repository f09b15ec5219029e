//! Builds the user message for a chat turn from typed text and an
//! optional extracted document.

use crate::domain::foundation::ValidationError;

const DOCUMENT_ONLY_PREFIX: &str = "Please analyze and summarize the following document:\n\n";
const DOCUMENT_SEPARATOR: &str = "\n\nDocument content:\n";

/// The final instruction text sent to the model and stored as the user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
    /// Combines the typed instruction with extracted document text.
    ///
    /// `document` is `None` when nothing was uploaded, and `Some` with the
    /// extracted text otherwise. Document text is embedded verbatim.
    pub fn compose(
        instruction: Option<&str>,
        document: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let typed = instruction.map(str::trim).filter(|s| !s.is_empty());

        match document {
            Some(doc) if doc.trim().is_empty() => Err(ValidationError::invalid_format(
                "document",
                "Could not extract content from the file.",
            )),
            Some(doc) => Ok(Self(match typed {
                Some(typed) => format!("{typed}{DOCUMENT_SEPARATOR}{doc}"),
                None => format!("{DOCUMENT_ONLY_PREFIX}{doc}"),
            })),
            None => typed.map(|t| Self(t.to_string())).ok_or_else(|| {
                ValidationError::invalid_format(
                    "instruction",
                    "Please provide an instruction or upload a file.",
                )
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
