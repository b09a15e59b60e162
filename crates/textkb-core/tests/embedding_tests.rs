use std::sync::Mutex;

use textkb_core::config::EmbedConfig;
use textkb_core::embedding::{embed_all, embed_query, normalize};
use textkb_core::error::Error;
use textkb_core::traits::Embedder;

/// Records the size of every batch it receives and returns constant vectors.
struct RecordingEmbedder {
    batches: Mutex<Vec<usize>>,
    dim: usize,
}

impl RecordingEmbedder {
    fn new(dim: usize) -> Self {
        Self { batches: Mutex::new(Vec::new()), dim }
    }
}

impl Embedder for RecordingEmbedder {
    fn model(&self) -> &str {
        "recording"
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.batches.lock().expect("lock").push(texts.len());
        Ok(texts.iter().map(|_| vec![3.0; self.dim]).collect())
    }
}

struct MixedDimEmbedder;

impl Embedder for MixedDimEmbedder {
    fn model(&self) -> &str {
        "mixed"
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, _)| vec![1.0; 4 + i % 2])
            .collect())
    }
}

fn texts(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("text {i}")).collect()
}

#[test]
fn normalize_produces_unit_norm() {
    let mut v = vec![3.0, 4.0];
    normalize(&mut v);
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[test]
fn embed_all_splits_into_batches_and_normalizes() {
    let embedder = RecordingEmbedder::new(8);
    let cfg = EmbedConfig { batch_size: 2, pace_ms: 0 };

    let vectors = embed_all(&embedder, &texts(5), &cfg).expect("embed");
    assert_eq!(vectors.len(), 5);
    assert_eq!(*embedder.batches.lock().expect("lock"), vec![2, 2, 1]);
    for v in &vectors {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm={norm}");
    }
}

#[test]
fn embed_all_rejects_mixed_dimensions() {
    let cfg = EmbedConfig { batch_size: 10, pace_ms: 0 };
    let err = embed_all(&MixedDimEmbedder, &texts(3), &cfg).expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Collaborator(_))
    ));
}

#[test]
fn embed_query_returns_one_unit_vector() {
    let embedder = RecordingEmbedder::new(4);
    let v = embed_query(&embedder, "hello").expect("embed");
    assert_eq!(v.len(), 4);
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}
