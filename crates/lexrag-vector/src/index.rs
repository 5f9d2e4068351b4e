use std::cmp::Ordering;

use lexrag_core::{Error, Metric, Result};

/// One search hit: position in the index and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

/// Exact nearest-neighbor index over N vectors of dimension D.
///
/// Vectors are kept row-major in one flat buffer; row `i` is the embedding of
/// chunk `i` in the chunk store. Search scans every row, so recall is exact.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    data: Vec<f32>,
    dim: usize,
    len: usize,
    metric: Metric,
}

impl VectorIndex {
    /// Batch-builds the index. Rows of differing length fail with `DimensionMismatch`.
    pub fn build(embeddings: &[Vec<f32>], metric: Metric) -> Result<Self> {
        let dim = embeddings.first().map_or(0, Vec::len);
        if dim == 0 && !embeddings.is_empty() {
            return Err(Error::InvalidArgument("embeddings must have at least one component".to_string()));
        }
        let mut data = Vec::with_capacity(dim * embeddings.len());
        for row in embeddings {
            if row.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, actual: row.len() });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, dim, len: embeddings.len(), metric })
    }

    /// Wraps an already flattened `len x dim` buffer.
    pub fn from_flat(data: Vec<f32>, len: usize, dim: usize, metric: Metric) -> Result<Self> {
        if data.len() != len * dim || (dim == 0 && len > 0) {
            return Err(Error::CorruptData(format!(
                "flat buffer holds {} values, expected {len} x {dim}",
                data.len()
            )));
        }
        Ok(Self { data, dim, len, metric })
    }

    /// The `k` nearest rows by ascending distance; ties go to the lower index.
    ///
    /// Returns every row (still ordered) when the index holds fewer than `k`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".to_string()));
        }
        if self.len == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: query.len() });
        }
        if query.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidArgument("query vector has non-finite components".to_string()));
        }

        let mut hits: Vec<Neighbor> = self
            .rows()
            .enumerate()
            .map(|(index, row)| Neighbor { index, distance: self.distance(query, row) })
            .collect();

        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, compare);
            hits.truncate(k);
        }
        hits.sort_by(compare);
        Ok(hits)
    }

    pub fn vector(&self, index: usize) -> Option<&[f32]> {
        (index < self.len).then(|| &self.data[index * self.dim..(index + 1) * self.dim])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // dim is only 0 for an empty index, whose buffer is empty too.
        self.data.chunks_exact(self.dim.max(1))
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn dim(&self) -> usize { self.dim }
    pub fn metric(&self) -> Metric { self.metric }

    pub(crate) fn as_flat(&self) -> &[f32] { &self.data }

    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        let d = match self.metric {
            Metric::Euclidean => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f32>(),
            Metric::InnerProduct => -a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>(),
        };
        // Fold -0.0 into 0.0 so total_cmp does not split equal distances.
        d + 0.0
    }
}

fn compare(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index))
}
