use crate::Mat;
use anyhow::{ensure, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
/// Multilayer perceptron with ReLU activation function and `tanh` output.
pub struct Mlp {
    /// Weights of layers.
    ws: Vec<Mat>,

    /// Biases of layers.
    bs: Vec<Mat>,
}

impl Mlp {
    /// Builds an MLP with layer sizes `dims`, input first, and weights drawn
    /// from the Glorot uniform distribution. Biases are zero.
    pub fn new<R: Rng>(dims: &[usize], rng: &mut R) -> Self {
        let (ws, bs) = dims
            .windows(2)
            .map(|d| {
                let (n_in, n_out) = (d[0], d[1]);
                let bound = (6.0 / (n_in + n_out) as f32).sqrt();
                let w = Mat {
                    data: (0..n_in * n_out)
                        .map(|_| rng.gen_range(-bound..=bound))
                        .collect(),
                    shape: vec![n_out as _, n_in as _],
                };
                (w, Mat::zeros(n_out, 1))
            })
            .unzip();
        Self { ws, bs }
    }

    pub fn forward(&self, x: &Mat) -> Mat {
        let n_layers = self.ws.len();
        let mut x = x.clone();
        for i in 0..n_layers {
            x = self.ws[i].matmul(&x).add(&self.bs[i]);
            if i != n_layers - 1 {
                x = x.relu();
            }
        }
        x.tanh()
    }

    /// Input size.
    pub fn in_dim(&self) -> usize {
        self.ws.first().map(|w| w.cols()).unwrap_or(0)
    }

    /// Output size.
    pub fn out_dim(&self) -> usize {
        self.ws.last().map(|w| w.rows()).unwrap_or(0)
    }

    /// Number of parameters.
    pub fn n_params(&self) -> usize {
        self.layers().map(|m| m.data.len()).sum()
    }

    /// All parameters flattened, layer by layer, weights before biases.
    pub fn params(&self) -> Vec<f32> {
        self.layers().flat_map(|m| m.data.iter().copied()).collect()
    }

    /// Overwrites all parameters with a vector laid out as [`Mlp::params`].
    pub fn set_params(&mut self, p: &[f32]) -> Result<()> {
        ensure!(
            p.len() == self.n_params(),
            "Expected {} parameters, got {}",
            self.n_params(),
            p.len()
        );
        let mut offset = 0;
        for (w, b) in self.ws.iter_mut().zip(self.bs.iter_mut()) {
            for m in [w, b] {
                let n = m.data.len();
                m.data.copy_from_slice(&p[offset..offset + n]);
                offset += n;
            }
        }
        Ok(())
    }

    fn layers(&self) -> impl Iterator<Item = &Mat> {
        self.ws.iter().zip(self.bs.iter()).flat_map(|(w, b)| [w, b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_params() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut mlp = Mlp::new(&[10, 16, 7], &mut rng);
        assert_eq!(mlp.in_dim(), 10);
        assert_eq!(mlp.out_dim(), 7);
        assert_eq!(mlp.n_params(), 10 * 16 + 16 + 16 * 7 + 7);

        let p: Vec<f32> = (0..mlp.n_params()).map(|i| i as f32 * 1e-3).collect();
        mlp.set_params(&p).unwrap();
        assert_eq!(mlp.params(), p);
        assert!(mlp.set_params(&p[1..]).is_err());

        let y = mlp.forward(&vec![1.0; 10].into());
        assert_eq!(y.shape, vec![7, 1]);
        assert!(y.data.iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}
