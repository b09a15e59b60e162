//! Flat inner-product index.
//!
//! Vectors are stored row-major in insertion order and searched by exact
//! brute force: the query is dotted against every row and the top `k` are
//! kept. With unit-normalized vectors the inner product is the cosine
//! similarity. Row order is the identity contract: row `i` here and record
//! `i` in the metadata store describe the same chunk.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use textkb_core::error::Error;

const MAGIC: &[u8; 4] = b"TKBF";
const FORMAT_VERSION: u32 = 1;
// magic + version + dim + count
const HEADER_LEN: u64 = 20;

#[derive(Debug, Clone)]
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dim: usize) -> anyhow::Result<Self> {
        if dim == 0 {
            return Err(Error::Config("index dimension must be > 0".into()).into());
        }
        Ok(Self { dim, data: Vec::new() })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append vectors, preserving their order as row order.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> anyhow::Result<()> {
        for v in vectors {
            if v.len() != self.dim {
                anyhow::bail!(
                    "cannot add vector of dimension {} to index of dimension {}",
                    v.len(),
                    self.dim
                );
            }
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    /// Exact top-`k` search, sorted by descending score. Ties go to the
    /// earlier row so results are deterministic across runs. Returns fewer
    /// than `k` hits only when the index holds fewer vectors.
    pub fn search(&self, query: &[f32], k: usize) -> anyhow::Result<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            anyhow::bail!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dim
            );
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(row, v)| (row, dot(query, v)))
            .collect();

        let cmp = |a: &(usize, f32), b: &(usize, f32)| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        };
        let k = k.min(scored.len());
        if k < scored.len() {
            scored.select_nth_unstable_by(k, cmp);
            scored.truncate(k);
        }
        scored.sort_by(cmp);
        Ok(scored)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        w.write_all(MAGIC)?;
        w.write_all(&FORMAT_VERSION.to_le_bytes())?;
        w.write_all(&u32::try_from(self.dim)?.to_le_bytes())?;
        w.write_all(&u64::try_from(self.len())?.to_le_bytes())?;
        for x in &self.data {
            w.write_all(&x.to_le_bytes())?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut r = BufReader::new(File::open(path)?);

        let mut magic = [0u8; 4];
        read_exact(&mut r, &mut magic, path)?;
        if &magic != MAGIC {
            return Err(corrupt(path, "bad magic").into());
        }
        let version = read_u32(&mut r, path)?;
        if version != FORMAT_VERSION {
            return Err(corrupt(path, &format!("unsupported format version {version}")).into());
        }
        let dim = read_u32(&mut r, path)? as usize;
        if dim == 0 {
            return Err(corrupt(path, "zero dimension").into());
        }
        let count = read_u64(&mut r, path)? as usize;

        // Validate the header against the actual file size before trusting
        // it for an allocation; a corrupted count must fail, not abort.
        let expected = dim
            .checked_mul(count)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| corrupt(path, "vector data size overflows"))?;
        let remaining = std::fs::metadata(path)?.len().saturating_sub(HEADER_LEN);
        if expected as u64 != remaining {
            return Err(corrupt(
                path,
                &format!("header declares {expected} bytes of vector data, file holds {remaining}"),
            )
            .into());
        }

        let mut data = vec![0f32; dim * count];
        let mut buf = [0u8; 4];
        for x in &mut data {
            read_exact(&mut r, &mut buf, path)?;
            *x = f32::from_le_bytes(buf);
        }
        Ok(Self { dim, data })
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn corrupt(path: &Path, what: &str) -> Error {
    Error::IndexCorruption(format!("{}: {what}", path.display()))
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8], path: &Path) -> anyhow::Result<()> {
    r.read_exact(buf)
        .map_err(|_| anyhow::Error::from(corrupt(path, "truncated index file")))
}

fn read_u32<R: Read>(r: &mut R, path: &Path) -> anyhow::Result<u32> {
    let mut buf = [0u8; 4];
    read_exact(r, &mut buf, path)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(r: &mut R, path: &Path) -> anyhow::Result<u64> {
    let mut buf = [0u8; 8];
    read_exact(r, &mut buf, path)?;
    Ok(u64::from_le_bytes(buf))
}
