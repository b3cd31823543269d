//! The fixed list of named inferences offered to the user.

/// A canned query over the playlist knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedInference {
    pub label: &'static str,
    pub query: &'static str,
    pub description: &'static str,
}

pub static CATALOG: [NamedInference; 8] = [
    NamedInference {
        label: "Inference 1: Extreme Songs",
        query: "lagu_ekstrem(X)",
        description: "Rule 1 - songs with very high or very low energy",
    },
    NamedInference {
        label: "Inference 2: Outlier Makers",
        query: "pembentuk_outlier(X)",
        description: "Rule 2 - extreme songs are potential outliers",
    },
    NamedInference {
        label: "Inference 3: Mandatory Manual Curation",
        query: "wajib_kurasi_manual(X)",
        description: "Rule 3 - inference chain (extreme -> outlier -> curation)",
    },
    NamedInference {
        label: "Inference 4: Contrasting Energy",
        query: "energi_kontras(X, Y)",
        description: "Rule 5 - significant energy gap between two songs",
    },
    NamedInference {
        label: "Inference 5: Rough Transition",
        query: "transisi_kasar(X, Y)",
        description: "Rule 6 - contrasting energy or a large graph distance",
    },
    NamedInference {
        label: "Inference 6: Needs a Bridge Song",
        query: "butuh_lagu_bridge(X, Y)",
        description: "Rule 8 - conclusion drawn from a rough transition",
    },
    NamedInference {
        label: "Inference 7: Harmonious Transition",
        query: "transisi_harmonis(X, Y)",
        description: "Rule 7 - small graph distance (smooth transition)",
    },
    NamedInference {
        label: "Inference 8: Playlist Order Recommendation",
        query: "rekomendasi_urutan(X, Y)",
        description: "Rule 9 - ideal song pairs",
    },
];

/// Look up an entry by its 1-based position.
pub fn by_number(n: usize) -> Option<&'static NamedInference> {
    n.checked_sub(1).and_then(|i| CATALOG.get(i))
}

#[test]
fn catalog_entries_are_distinct() {
    use std::collections::HashSet;

    let queries: HashSet<_> = CATALOG.iter().map(|e| e.query).collect();
    assert_eq!(queries.len(), CATALOG.len());
    for entry in CATALOG.iter() {
        assert!(!entry.label.is_empty());
        assert!(!entry.query.trim().is_empty());
        assert!(!entry.description.is_empty());
    }
}

#[test]
fn lookup_by_number() {
    assert_eq!(by_number(1).unwrap().query, "lagu_ekstrem(X)");
    assert_eq!(by_number(8).unwrap().query, "rekomendasi_urutan(X, Y)");
    assert!(by_number(0).is_none());
    assert!(by_number(9).is_none());
}
