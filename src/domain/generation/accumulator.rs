//! Folds streamed completion fragments into one reply.

use thiserror::Error;

/// The completion finished without producing any visible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("The model returned an empty response")]
pub struct EmptyResponse;

/// Concatenates fragments strictly in arrival order.
///
/// Empty fragments are skipped. A reply consisting only of whitespace is
/// rejected by [`ResponseAccumulator::finish`].
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    text: String,
    fragments: usize,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fragment.
    pub fn push(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        self.text.push_str(fragment);
        self.fragments += 1;
    }

    /// Number of non-empty fragments received so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// Returns the complete reply.
    pub fn finish(self) -> Result<String, EmptyResponse> {
        if self.text.trim().is_empty() {
            Err(EmptyResponse)
        } else {
            Ok(self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn concatenates_in_order() {
        let mut acc = ResponseAccumulator::new();
        for f in ["Hel", "lo", ", ", "world"] {
            acc.push(f);
        }
        assert_eq!(acc.finish().unwrap(), "Hello, world");
    }

    #[test]
    fn skips_empty_fragments() {
        let mut acc = ResponseAccumulator::new();
        acc.push("");
        acc.push("a");
        acc.push("");
        assert_eq!(acc.fragment_count(), 1);
        assert_eq!(acc.finish().unwrap(), "a");
    }

    #[test]
    fn no_fragments_is_empty_response() {
        assert_eq!(ResponseAccumulator::new().finish(), Err(EmptyResponse));
    }

    #[test]
    fn whitespace_only_is_empty_response() {
        let mut acc = ResponseAccumulator::new();
        acc.push("  ");
        acc.push("\n\t");
        assert_eq!(acc.finish(), Err(EmptyResponse));
    }

    #[test]
    fn surrounding_whitespace_is_preserved() {
        let mut acc = ResponseAccumulator::new();
        acc.push("\n");
        acc.push("answer ");
        assert_eq!(acc.finish().unwrap(), "\nanswer ");
    }

    proptest! {
        #[test]
        fn result_equals_concatenation(fragments in prop::collection::vec("\\PC{0,8}", 0..30)) {
            let mut acc = ResponseAccumulator::new();
            for f in &fragments {
                acc.push(f);
            }
            let expected: String = fragments.concat();
            match acc.finish() {
                Ok(text) => prop_assert_eq!(text, expected),
                Err(EmptyResponse) => prop_assert!(expected.trim().is_empty()),
            }
        }
    }
}
