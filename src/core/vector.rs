//! Sparse term-weight vectors

use serde::{Deserialize, Serialize};

/// Sparse vector over a fixed vocabulary. Indices are strictly increasing and
/// stored values are never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
	dim: usize,
	indices: Vec<u32>,
	values: Vec<f32>,
}

impl SparseVector {
	/// All-zero vector of the given dimension
	pub fn zeros(dim: usize) -> Self {
		Self { dim, indices: Vec::new(), values: Vec::new() }
	}

	/// Build from unordered `(index, value)` pairs; duplicate indices are summed.
	pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f32)>) -> Self {
		pairs.sort_unstable_by_key(|&(i, _)| i);

		let mut indices = Vec::with_capacity(pairs.len());
		let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
		for (i, v) in pairs {
			debug_assert!(i < dim, "index {} out of range for dim {}", i, dim);
			if indices.last() == Some(&(i as u32)) {
				if let Some(last) = values.last_mut() {
					*last += v;
				}
			} else {
				indices.push(i as u32);
				values.push(v);
			}
		}

		let mut vector = Self { dim, indices, values };
		vector.prune();
		vector
	}

	pub fn from_dense(data: &[f32]) -> Self {
		let (indices, values) = data
			.iter()
			.enumerate()
			.filter(|(_, v)| **v != 0.0)
			.map(|(i, v)| (i as u32, *v))
			.unzip();
		Self { dim: data.len(), indices, values }
	}

	pub fn to_dense(&self) -> Vec<f32> {
		let mut dense = vec![0.0; self.dim];
		for (i, v) in self.iter() {
			dense[i] = v;
		}
		dense
	}

	pub fn dim(&self) -> usize {
		self.dim
	}

	/// Number of stored (non-zero) entries
	pub fn nnz(&self) -> usize {
		self.indices.len()
	}

	pub fn is_zero(&self) -> bool {
		self.indices.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
		self.indices.iter().zip(self.values.iter()).map(|(&i, &v)| (i as usize, v))
	}

	pub fn get(&self, index: usize) -> f32 {
		match self.indices.binary_search(&(index as u32)) {
			Ok(pos) => self.values[pos],
			Err(_) => 0.0,
		}
	}

	pub fn norm(&self) -> f32 {
		self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
	}

	/// True when every stored value is finite
	pub fn is_finite(&self) -> bool {
		self.values.iter().all(|v| v.is_finite())
	}

	pub fn dot(&self, other: &Self) -> f32 {
		let (mut a, mut b) = (0, 0);
		let mut sum = 0.0;
		while a < self.indices.len() && b < other.indices.len() {
			match self.indices[a].cmp(&other.indices[b]) {
				std::cmp::Ordering::Less => a += 1,
				std::cmp::Ordering::Greater => b += 1,
				std::cmp::Ordering::Equal => {
					sum += self.values[a] * other.values[b];
					a += 1;
					b += 1;
				}
			}
		}
		sum
	}

	/// Cosine similarity; `None` when either side has zero length.
	pub fn cosine(&self, other: &Self) -> Option<f32> {
		let denom = self.norm() * other.norm();
		if denom > 0.0 {
			Some(self.dot(other) / denom)
		} else {
			None
		}
	}

	/// Unit-length copy; the zero vector stays zero.
	pub fn normalized(&self) -> Self {
		let norm = self.norm();
		if norm > 0.0 {
			Self {
				dim: self.dim,
				indices: self.indices.clone(),
				values: self.values.iter().map(|v| v / norm).collect(),
			}
		} else {
			self.clone()
		}
	}

	/// `self - other`
	pub fn sub(&self, other: &Self) -> Self {
		let pairs = self
			.iter()
			.chain(other.iter().map(|(i, v)| (i, -v)))
			.collect();
		Self::from_pairs(self.dim, pairs)
	}

	/// Coordinate-wise mean. `None` for an empty input.
	pub fn mean<'a, I>(vectors: I) -> Option<Self>
	where
		I: IntoIterator<Item = &'a SparseVector>,
	{
		let mut iter = vectors.into_iter().peekable();
		let dim = iter.peek()?.dim;
		let mut sums = vec![0.0f64; dim];
		let mut count = 0usize;

		for vector in iter {
			debug_assert_eq!(vector.dim, dim);
			for (i, v) in vector.iter() {
				sums[i] += v as f64;
			}
			count += 1;
		}

		let n = count as f64;
		let dense: Vec<f32> = sums.into_iter().map(|s| (s / n) as f32).collect();
		Some(Self::from_dense(&dense))
	}

	fn prune(&mut self) {
		let mut keep = 0;
		for pos in 0..self.indices.len() {
			if self.values[pos] != 0.0 {
				self.indices[keep] = self.indices[pos];
				self.values[keep] = self.values[pos];
				keep += 1;
			}
		}
		self.indices.truncate(keep);
		self.values.truncate(keep);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_pairs_sorts_and_merges() {
		let v = SparseVector::from_pairs(5, vec![(3, 1.0), (0, 2.0), (3, 0.5), (1, 0.0)]);
		assert_eq!(v.nnz(), 2);
		assert_eq!(v.get(0), 2.0);
		assert_eq!(v.get(3), 1.5);
		assert_eq!(v.get(1), 0.0);
	}

	#[test]
	fn dot_and_cosine() {
		let a = SparseVector::from_dense(&[1.0, 0.0, 2.0]);
		let b = SparseVector::from_dense(&[0.0, 3.0, 4.0]);
		assert_eq!(a.dot(&b), 8.0);
		let cos = a.cosine(&b).unwrap();
		assert!((cos - 8.0 / (5.0f32.sqrt() * 5.0)).abs() < 1e-6);
		assert!(a.cosine(&SparseVector::zeros(3)).is_none());
	}

	#[test]
	fn subtraction_drops_cancelled_terms() {
		let a = SparseVector::from_dense(&[1.0, 2.0, 0.0]);
		let b = SparseVector::from_dense(&[1.0, 0.5, 3.0]);
		let d = a.sub(&b);
		assert_eq!(d.to_dense(), vec![0.0, 1.5, -3.0]);
		assert_eq!(d.nnz(), 2);
	}

	#[test]
	fn mean_is_coordinate_wise() {
		let a = SparseVector::from_dense(&[1.0, 0.0, 2.0]);
		let b = SparseVector::from_dense(&[3.0, 4.0, 0.0]);
		let m = SparseVector::mean([&a, &b]).unwrap();
		assert_eq!(m.to_dense(), vec![2.0, 2.0, 1.0]);
		assert!(SparseVector::mean(std::iter::empty()).is_none());
	}

	#[test]
	fn normalized_has_unit_length() {
		let v = SparseVector::from_dense(&[3.0, 0.0, 4.0]).normalized();
		assert!((v.norm() - 1.0).abs() < 1e-6);
		assert!(SparseVector::zeros(4).normalized().is_zero());
	}
}
