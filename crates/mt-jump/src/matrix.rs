//! Dense GF(2) matrices of arbitrary size.
//!
//! Rows are packed little-endian into `u64` words: bit `c` of row `r` is bit
//! `c % 64` of word `r * stride + c / 64`, with `stride = ceil(cols / 64)`.
//! Unused high bits of the last word in each row are always zero.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of `u64` words needed for `bits` bits.
pub fn words_for(bits: usize) -> usize {
    bits.div_ceil(64)
}

/// Binary matrix over GF(2), stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    stride: usize,
    data: Vec<u64>,
}

/// On-disk layout of a [`BitMatrix`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatrix {
    /// Row count.
    pub rows: u64,
    /// Column count.
    pub cols: u64,
    /// `rows * ceil(cols / 64)` packed words.
    pub data: Vec<u64>,
}

impl BitMatrix {
    /// Returns the `rows × cols` zero matrix.
    pub fn zero(rows: usize, cols: usize) -> Self {
        let stride = words_for(cols);
        Self {
            rows,
            cols,
            stride,
            data: vec![0u64; rows * stride],
        }
    }

    /// Returns the `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zero(n, n);
        for i in 0..n {
            m.set_bit(i, i, true);
        }
        m
    }

    /// Builds the `n × n` matrix of a linear map on `n`-bit vectors.
    ///
    /// Column `j` is `f(e_j)`, so the result satisfies `M·v = f(v)` whenever
    /// `f` is GF(2)-linear.
    pub fn from_linear_map<F>(n: usize, mut f: F) -> Self
    where
        F: FnMut(&[u64]) -> Vec<u64>,
    {
        let words = words_for(n);
        let mut m = Self::zero(n, n);
        let mut basis = vec![0u64; words];
        for col in 0..n {
            basis[col / 64] = 1u64 << (col % 64);
            let image = f(&basis);
            debug_assert_eq!(image.len(), words, "image has the wrong width");
            for (segment_idx, segment) in image.iter().enumerate() {
                let mut bits = *segment;
                while bits != 0 {
                    let row = segment_idx * 64 + bits.trailing_zeros() as usize;
                    m.set_bit(row, col, true);
                    bits &= bits - 1;
                }
            }
            basis[col / 64] = 0;
        }
        m
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix is square.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// The packed words of row `r`.
    pub fn row(&self, r: usize) -> &[u64] {
        &self.data[r * self.stride..(r + 1) * self.stride]
    }

    /// Reads the bit at `(row, col)`.
    pub fn bit(&self, row: usize, col: usize) -> bool {
        (self.data[row * self.stride + col / 64] >> (col % 64)) & 1 == 1
    }

    /// Writes the bit at `(row, col)`.
    pub fn set_bit(&mut self, row: usize, col: usize, value: bool) {
        let word = &mut self.data[row * self.stride + col / 64];
        let mask = 1u64 << (col % 64);
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Multiplies two matrices (`self * rhs`).
    ///
    /// Row `i` of the product is the XOR of the rows of `rhs` selected by the
    /// set bits of row `i` of `self`.
    pub fn mul(&self, rhs: &Self) -> Self {
        assert_eq!(self.cols, rhs.rows, "dimension mismatch in GF(2) product");
        let mut result = Self::zero(self.rows, rhs.cols);
        let stride = result.stride;

        let fill_row = |(row_idx, out): (usize, &mut [u64])| {
            for (segment_idx, segment) in self.row(row_idx).iter().enumerate() {
                let mut bits = *segment;
                while bits != 0 {
                    let source = rhs.row(segment_idx * 64 + bits.trailing_zeros() as usize);
                    for (acc, word) in out.iter_mut().zip(source) {
                        *acc ^= *word;
                    }
                    bits &= bits - 1;
                }
            }
        };

        if stride == 0 {
            return result;
        }

        #[cfg(feature = "parallel")]
        result
            .data
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(fill_row);

        #[cfg(not(feature = "parallel"))]
        result.data.chunks_mut(stride).enumerate().for_each(fill_row);

        result
    }

    /// Raises a square matrix to the power `exponent` by repeated squaring.
    /// `exponent = 0` gives the identity.
    pub fn pow(&self, exponent: u64) -> Self {
        assert!(self.is_square(), "only square matrices have powers");
        let mut result = Self::identity(self.rows);
        if exponent == 0 {
            return result;
        }
        let mut base = self.clone();
        let mut e = exponent;
        let mut first = true;
        while e != 0 {
            if e & 1 == 1 {
                result = if first { base.clone() } else { result.mul(&base) };
                first = false;
            }
            e >>= 1;
            if e != 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    /// Computes `M·v` for a packed column vector of `cols` bits.
    pub fn apply(&self, v: &[u64]) -> Vec<u64> {
        assert_eq!(v.len(), self.stride, "vector width mismatch");
        let mut out = vec![0u64; words_for(self.rows)];
        for row_idx in 0..self.rows {
            let parity = self
                .row(row_idx)
                .iter()
                .zip(v)
                .fold(0u32, |acc, (a, b)| acc ^ (a & b).count_ones());
            if parity & 1 == 1 {
                out[row_idx / 64] |= 1u64 << (row_idx % 64);
            }
        }
        out
    }

    /// Inverts a square matrix by Gauss-Jordan elimination, or returns `None`
    /// when it is singular.
    pub fn invert(&self) -> Option<Self> {
        if !self.is_square() {
            return None;
        }
        let n = self.rows;
        let stride = self.stride;
        let mut left = self.data.clone();
        let mut right = Self::identity(n).data;

        for col in 0..n {
            let segment = col / 64;
            let mask = 1u64 << (col % 64);
            let pivot = (col..n).find(|&row| left[row * stride + segment] & mask != 0)?;
            if pivot != col {
                for k in 0..stride {
                    left.swap(pivot * stride + k, col * stride + k);
                    right.swap(pivot * stride + k, col * stride + k);
                }
            }
            for row in 0..n {
                if row != col && left[row * stride + segment] & mask != 0 {
                    for k in 0..stride {
                        left[row * stride + k] ^= left[col * stride + k];
                        right[row * stride + k] ^= right[col * stride + k];
                    }
                }
            }
        }

        Some(Self {
            rows: n,
            cols: n,
            stride,
            data: right,
        })
    }

    /// Returns true if the matrix is invertible.
    pub fn is_invertible(&self) -> bool {
        self.invert().is_some()
    }

    /// Converts to the serialized layout.
    pub fn to_raw(&self) -> RawMatrix {
        RawMatrix {
            rows: self.rows as u64,
            cols: self.cols as u64,
            data: self.data.clone(),
        }
    }

    /// Validates and converts from the serialized layout.
    pub fn from_raw(raw: RawMatrix) -> Result<Self, String> {
        let rows = usize::try_from(raw.rows).map_err(|_| format!("{} rows", raw.rows))?;
        let cols = usize::try_from(raw.cols).map_err(|_| format!("{} columns", raw.cols))?;
        let stride = words_for(cols);
        let expected = rows
            .checked_mul(stride)
            .ok_or_else(|| format!("{rows}x{cols} overflows"))?;
        if raw.data.len() != expected {
            return Err(format!(
                "{rows}x{cols} matrix needs {expected} words, found {}",
                raw.data.len()
            ));
        }
        let spare = stride * 64 - cols;
        if spare > 0 {
            let mask = !0u64 << (64 - spare);
            if raw.data.chunks(stride).any(|row| row[stride - 1] & mask != 0) {
                return Err("bits set beyond the last column".to_string());
            }
        }
        Ok(Self {
            rows,
            cols,
            stride,
            data: raw.data,
        })
    }
}
