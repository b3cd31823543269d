//! Read-only view of the knowledge-base source, independent of the copy
//! loaded into the evaluator.
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum KbView {
    Source(String),
    /// The file could not be read; carries a warning for the user.
    Missing(String),
}

/// Read the knowledge base verbatim. Failure is never fatal here.
pub fn read_source(path: &Path) -> KbView {
    match std::fs::read_to_string(path) {
        Ok(text) => KbView::Source(text),
        Err(err) => {
            log::warn!("cannot display knowledge base {}: {}", path.display(), err);
            KbView::Missing(format!(
                "Knowledge base file {} not found.",
                path.display()
            ))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn shipped_knowledge_base_is_readable() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../prolog_kb.pl");
        match read_source(&path) {
            KbView::Source(text) => assert!(text.contains("lagu_ekstrem(X)")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_warning() {
        let view = read_source(Path::new("does/not/exist.pl"));
        assert_eq!(
            view,
            KbView::Missing("Knowledge base file does/not/exist.pl not found.".to_owned())
        );
    }
}
