//! Structural invariants checked over seeded random corpora.

use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cpt_rs::{CompactPredictionTree, SequenceId, SharedCpt};

/// Random sequences over a small alphabet so prefixes are shared often.
fn generate_corpus(seed: u64, count: usize, alphabet: u32, max_len: usize) -> Vec<Vec<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..=max_len);
            (0..len).map(|_| rng.gen_range(0..alphabet)).collect()
        })
        .collect()
}

fn train_corpus(corpus: &[Vec<u32>]) -> CompactPredictionTree<u32> {
    let mut cpt = CompactPredictionTree::new();
    cpt.train_all(corpus).unwrap();
    cpt
}

#[test]
fn lookup_table_tracks_training_calls() {
    let corpus = generate_corpus(7, 200, 6, 8);
    let mut cpt: CompactPredictionTree<u32> = CompactPredictionTree::new();
    for (expected, sequence) in corpus.iter().enumerate() {
        let id = cpt.train(sequence).unwrap();
        assert_eq!(id, SequenceId::new(expected));
        assert_eq!(cpt.lookup_table().len(), expected + 1);
    }
    assert_eq!(cpt.lookup_table().next_id(), SequenceId::new(corpus.len()));
}

#[test]
fn every_item_indexes_its_sequences() {
    let corpus = generate_corpus(11, 150, 10, 12);
    let cpt = train_corpus(&corpus);
    let index = cpt.inverted_index();

    for (position, sequence) in corpus.iter().enumerate() {
        let id = SequenceId::new(position);
        for item in sequence {
            assert!(index.candidates(item).contains(&id));
        }
    }
    for item in 0..10u32 {
        for id in index.candidates(&item) {
            assert!(corpus[id.index()].contains(&item));
        }
    }
}

#[test]
fn lookup_reconstructs_every_sequence() {
    let corpus = generate_corpus(23, 300, 4, 10);
    let cpt = train_corpus(&corpus);

    for (position, sequence) in corpus.iter().enumerate() {
        assert_eq!(&cpt.sequence(SequenceId::new(position)).unwrap(), sequence);
    }
}

#[test]
fn export_is_a_tree_and_stable() {
    let corpus = generate_corpus(5, 120, 5, 7);
    let cpt = train_corpus(&corpus);

    let dot = cpt.export();
    let edges = dot.lines().filter(|line| line.contains(" -> ")).count();
    let nodes = dot.lines().filter(|line| line.contains("[label=")).count();
    assert_eq!(nodes, edges + 1);
    assert_eq!(nodes, cpt.node_count());
    assert_eq!(dot, cpt.export());
}

#[test]
fn retraining_yields_identical_structure() {
    let corpus = generate_corpus(99, 250, 7, 9);
    let first = train_corpus(&corpus);
    let second = train_corpus(&corpus);

    assert_eq!(first.stats(), second.stats());
    assert_eq!(first.export(), second.export());
    assert_eq!(first.export_json(), second.export_json());
}

#[test]
fn predictions_are_deterministic_and_exclude_query_items() {
    let corpus = generate_corpus(3, 200, 8, 10);
    let cpt = train_corpus(&corpus);
    let queries = generate_corpus(4, 50, 10, 4);

    for query in &queries {
        let first = cpt.predict(query).unwrap();
        let second = cpt.predict(query).unwrap();
        assert_eq!(first, second);

        for pair in first.windows(2) {
            assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].item < pair[1].item)
            );
        }
        for prediction in &first {
            assert!(!query.contains(&prediction.item));
            assert!(prediction.score > 0.0);
            assert!(prediction.confidence > 0.0 && prediction.confidence <= 1.0);
        }
    }
}

#[test]
fn readers_see_whole_training_calls() {
    let shared: SharedCpt<u32> = SharedCpt::default();
    let corpus = generate_corpus(42, 200, 6, 8);

    thread::scope(|scope| {
        let writer = shared.clone();
        let corpus = &corpus;
        scope.spawn(move || {
            for sequence in corpus {
                writer.train(sequence).unwrap();
            }
        });

        for _ in 0..3 {
            let reader = shared.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    reader.with_snapshot(|cpt| {
                        let trained = cpt.sequence_count();
                        assert_eq!(cpt.lookup_table().len(), trained);
                        for position in 0..trained {
                            let id = SequenceId::new(position);
                            assert_eq!(cpt.sequence(id).unwrap(), corpus[position]);
                        }
                    });
                    reader.match_sequence(&[1, 2]).unwrap();
                }
            });
        }
    });

    assert_eq!(shared.stats().sequences, corpus.len());
}
