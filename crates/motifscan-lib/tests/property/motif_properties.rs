use motifscan_lib::{
    cluster, dissect, distance, Codon, ClusterParams, CodonSet, DistanceWeights, MotifRecord,
    SymbolSequence,
};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = MotifRecord> {
    ("[0-9]{3}", "[ACGT]{0,30}", 0usize..400).prop_map(|(id, content, window)| {
        MotifRecord::new(
            id,
            content,
            window * 3,
            Codon::parse("ATG").unwrap(),
            Codon::parse("TAA").unwrap(),
        )
    })
}

fn weights_strategy() -> impl Strategy<Value = DistanceWeights> {
    (0.0f64..10.0, 0.0f64..10.0).prop_map(|(content, position)| DistanceWeights { content, position })
}

// ── Dissection ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn dissected_positions_are_aligned_and_ordered(text in "[ACGT]{1,600}") {
        let seq = SymbolSequence::from_text("s", &text).unwrap();
        let codons = CodonSet::default();
        for m in dissect(&seq, &codons) {
            prop_assert!(m.start_position() < m.end_position());
            prop_assert_eq!(m.start_position() % 3, 0);
            prop_assert_eq!(m.end_position() % 3, 0);
            prop_assert!(m.end_position() <= seq.len());
            prop_assert_eq!(
                &text[m.start_position() + 3..m.end_position() - 3],
                m.content()
            );
        }
    }

    #[test]
    fn dissection_is_idempotent(text in "[ACGT]{1,600}") {
        let seq = SymbolSequence::from_text("s", &text).unwrap();
        let codons = CodonSet::default();
        let first: Vec<_> = dissect(&seq, &codons).collect();
        let second: Vec<_> = dissect(&seq, &codons).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn motifs_do_not_overlap(text in "[ACGT]{1,600}") {
        let seq = SymbolSequence::from_text("s", &text).unwrap();
        let codons = CodonSet::default();
        let motifs: Vec<_> = dissect(&seq, &codons).collect();
        for pair in motifs.windows(2) {
            prop_assert!(pair[0].end_position() <= pair[1].start_position());
        }
    }
}

// ── Distance ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn distance_is_symmetric(a in record_strategy(), b in record_strategy(), w in weights_strategy()) {
        prop_assert_eq!(distance(&a, &b, &w), distance(&b, &a, &w));
    }

    #[test]
    fn distance_to_self_is_zero(a in record_strategy(), w in weights_strategy()) {
        prop_assert_eq!(distance(&a, &a, &w), 0.0);
    }

    #[test]
    fn distance_monotone_in_position_weight(
        a in record_strategy(),
        b in record_strategy(),
        w in weights_strategy(),
        bump in 0.0f64..10.0,
    ) {
        let heavier = DistanceWeights { content: w.content, position: w.position + bump };
        prop_assert!(distance(&a, &b, &heavier) >= distance(&a, &b, &w));
    }
}

// ── Clustering ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn clustering_is_deterministic(
        records in prop::collection::vec(record_strategy(), 0..40),
        threshold in 0.0f64..50.0,
    ) {
        let params = ClusterParams { threshold, weights: DistanceWeights::default() };
        let first = cluster(records.clone(), &params).unwrap();
        let second = cluster(records, &params).unwrap();
        prop_assert_eq!(first.assignments(), second.assignments());
        let a: Vec<_> = first.ranked().map(|c| c.id()).collect();
        let b: Vec<_> = second.ranked().map(|c| c.id()).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn clustering_partitions_all_records(
        records in prop::collection::vec(record_strategy(), 0..40),
    ) {
        let n = records.len();
        let clustering = cluster(records, &ClusterParams::default()).unwrap();
        let total: usize = clustering.ranked().map(|c| c.len()).sum();
        prop_assert_eq!(total, n);
        prop_assert_eq!(clustering.assignments().len(), n);
    }

    #[test]
    fn threshold_boundary_is_inclusive(a in record_strategy(), b in record_strategy()) {
        let weights = DistanceWeights::default();
        let d = distance(&a, &b, &weights);

        let at = ClusterParams { threshold: d, weights };
        let joined = cluster(vec![a.clone(), b.clone()], &at).unwrap();
        prop_assert_eq!(joined.len(), 1);

        let below = ClusterParams { threshold: d - 0.5, weights };
        if below.threshold >= 0.0 {
            let split = cluster(vec![a, b], &below).unwrap();
            prop_assert_eq!(split.len(), 2);
        }
    }
}
