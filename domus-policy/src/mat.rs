use serde::{Deserialize, Serialize};

/// Row-major matrix.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Mat {
    pub data: Vec<f32>,
    pub shape: Vec<i32>,
}

impl Mat {
    /// Matrix of zeros with `m` rows and `n` columns.
    pub fn zeros(m: usize, n: usize) -> Self {
        Self {
            data: vec![0.0; m * n],
            shape: vec![m as _, n as _],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.shape[0] as usize
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.shape[1] as usize
    }

    /// Matrix product.
    ///
    /// # Panics
    ///
    /// If the inner dimensions differ.
    pub fn matmul(&self, x: &Mat) -> Self {
        let (m, l, n) = (self.rows(), self.cols(), x.cols());
        if l != x.rows() {
            panic!(
                "Trying to multiply matrices of incompatible sizes: {:?}",
                (&self.shape, &x.shape)
            );
        }
        let mut data = vec![0.0f32; m * n];
        for i in 0..m {
            for j in 0..n {
                let kk = i * n + j;
                for k in 0..l {
                    data[kk] += self.data[i * l + k] * x.data[k * n + j];
                }
            }
        }

        Self {
            shape: vec![m as _, n as _],
            data,
        }
    }

    /// Element-wise sum.
    ///
    /// # Panics
    ///
    /// If the shapes differ.
    pub fn add(&self, x: &Mat) -> Self {
        if self.shape != x.shape {
            panic!(
                "Trying to add matrices of different sizes: {:?}",
                (&self.shape, &x.shape)
            );
        }

        let data = self
            .data
            .iter()
            .zip(x.data.iter())
            .map(|(a, b)| *a + *b)
            .collect();

        Mat {
            data,
            shape: self.shape.clone(),
        }
    }

    pub fn relu(&self) -> Self {
        self.map(|a| a.max(0.0))
    }

    pub fn tanh(&self) -> Self {
        self.map(f32::tanh)
    }

    fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            data: self.data.iter().map(|a| f(*a)).collect(),
            shape: self.shape.clone(),
        }
    }
}

impl From<Vec<f32>> for Mat {
    /// A column vector.
    fn from(x: Vec<f32>) -> Self {
        let shape = vec![x.len() as i32, 1];
        Self { shape, data: x }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul() {
        let x = Mat {
            data: vec![1.0, 2., 3., 4., 5., 6.],
            shape: vec![2, 3],
        };
        let y: Mat = vec![7.0, 8., 9.].into();
        assert_eq!(x.matmul(&y), Mat::from(vec![50.0, 122.0]));
    }

    #[test]
    fn test_activations() {
        let x: Mat = vec![-1.0, 0.0, 2.0].into();
        assert_eq!(x.relu().data, vec![0.0, 0.0, 2.0]);
        assert!(x.tanh().data.iter().all(|v| v.abs() < 1.0));
        assert_eq!(x.add(&Mat::zeros(3, 1)), x);
    }
}
