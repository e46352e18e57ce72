//! Layer implementations for the exported sequence regressor.
//!
//! Weight layouts follow the Keras export convention so artifacts can be
//! written straight from the training environment:
//!
//! ```text
//! LSTM   kernel [input_dim][4*units], recurrent_kernel [units][4*units], bias [4*units]
//!        gate order i, f, c, o
//!        i = sigmoid(x W_i + h U_i + b_i)
//!        f = sigmoid(x W_f + h U_f + b_f)
//!        c = f * c + i * tanh(x W_c + h U_c + b_c)
//!        o = sigmoid(x W_o + h U_o + b_o)
//!        h = o * tanh(c)
//! Dense  kernel [input_dim][units], bias [units]
//!        y = act(x W + b)
//! ```

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Logistic sigmoid.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Dense layer activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::Relu => x.max(0.0),
            Self::Tanh => x.tanh(),
            Self::Sigmoid => sigmoid(x),
        }
    }
}

/// `out[j] = bias[j] + sum_i x[i] * kernel[i][j]`
fn affine(x: &[f32], kernel: &[Vec<f32>], bias: &[f32], out: &mut [f32]) {
    out.copy_from_slice(bias);
    for (&xi, row) in x.iter().zip(kernel) {
        for (o, &w) in out.iter_mut().zip(row) {
            *o += xi * w;
        }
    }
}

/// Check a `[rows][cols]` matrix.
fn check_matrix(name: &str, m: &[Vec<f32>], rows: usize, cols: usize) -> Result<(), String> {
    if m.len() != rows {
        return Err(format!("{name} has {} rows, expected {rows}", m.len()));
    }
    if let Some((r, row)) = m.iter().enumerate().find(|(_, row)| row.len() != cols) {
        return Err(format!(
            "{name} row {r} has {} columns, expected {cols}",
            row.len()
        ));
    }
    Ok(())
}

/// Uniform Xavier/Glorot initialisation.
#[allow(clippy::cast_precision_loss)]
fn xavier(rows: usize, cols: usize, fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let limit = (6.0 / (fan_in + fan_out).max(1) as f32).sqrt();
    (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen::<f32>() * 2.0 * limit - limit).collect())
        .collect()
}

// ============================================================================
// LSTM
// ============================================================================

/// Long short-term memory layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmLayer {
    pub units: usize,
    /// Emit the hidden state at every timestep instead of only the last one.
    #[serde(default)]
    pub return_sequences: bool,
    pub kernel: Vec<Vec<f32>>,
    pub recurrent_kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl LstmLayer {
    /// Randomly initialised layer. Forget-gate bias starts at 1.
    pub fn init(input_dim: usize, units: usize, return_sequences: bool, rng: &mut StdRng) -> Self {
        let kernel = xavier(input_dim, 4 * units, input_dim, 4 * units, rng);
        let recurrent_kernel = xavier(units, 4 * units, units, 4 * units, rng);
        let mut bias = vec![0.0; 4 * units];
        bias[units..2 * units].fill(1.0);
        Self {
            units,
            return_sequences,
            kernel,
            recurrent_kernel,
            bias,
        }
    }

    pub fn check_shape(&self, input_dim: usize) -> Result<(), String> {
        if self.units == 0 {
            return Err("units must be > 0".to_string());
        }
        let gates = 4 * self.units;
        check_matrix("kernel", &self.kernel, input_dim, gates)?;
        check_matrix("recurrent_kernel", &self.recurrent_kernel, self.units, gates)?;
        if self.bias.len() != gates {
            return Err(format!("bias has {} entries, expected {gates}", self.bias.len()));
        }
        Ok(())
    }

    /// Run the layer over a sequence from a zero initial state.
    ///
    /// Returns the hidden state after every timestep.
    pub fn forward(&self, sequence: &[Vec<f32>]) -> Vec<Vec<f32>> {
        let u = self.units;
        let mut h = vec![0.0_f32; u];
        let mut c = vec![0.0_f32; u];
        let mut z = vec![0.0_f32; 4 * u];
        let mut recurrent = vec![0.0_f32; 4 * u];
        let zero_bias = vec![0.0_f32; 4 * u];
        let mut outputs = Vec::with_capacity(sequence.len());

        for x in sequence {
            affine(x, &self.kernel, &self.bias, &mut z);
            affine(&h, &self.recurrent_kernel, &zero_bias, &mut recurrent);

            for j in 0..u {
                let i_gate = sigmoid(z[j] + recurrent[j]);
                let f_gate = sigmoid(z[u + j] + recurrent[u + j]);
                let candidate = (z[2 * u + j] + recurrent[2 * u + j]).tanh();
                let o_gate = sigmoid(z[3 * u + j] + recurrent[3 * u + j]);

                c[j] = f_gate * c[j] + i_gate * candidate;
                h[j] = o_gate * c[j].tanh();
            }
            outputs.push(h.clone());
        }

        outputs
    }
}

// ============================================================================
// Dense
// ============================================================================

/// Fully connected layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub units: usize,
    #[serde(default)]
    pub activation: Activation,
    pub kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    pub fn init(input_dim: usize, units: usize, activation: Activation, rng: &mut StdRng) -> Self {
        Self {
            units,
            activation,
            kernel: xavier(input_dim, units, input_dim, units, rng),
            bias: vec![0.0; units],
        }
    }

    pub fn check_shape(&self, input_dim: usize) -> Result<(), String> {
        if self.units == 0 {
            return Err("units must be > 0".to_string());
        }
        check_matrix("kernel", &self.kernel, input_dim, self.units)?;
        if self.bias.len() != self.units {
            return Err(format!(
                "bias has {} entries, expected {}",
                self.bias.len(),
                self.units
            ));
        }
        Ok(())
    }

    pub fn forward(&self, x: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0; self.units];
        affine(x, &self.kernel, &self.bias, &mut out);
        for v in &mut out {
            *v = self.activation.apply(*v);
        }
        out
    }
}

// ============================================================================
// Layer
// ============================================================================

/// One serialized layer, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    Lstm(LstmLayer),
    Dense(DenseLayer),
}

impl Layer {
    pub const fn units(&self) -> usize {
        match self {
            Self::Lstm(l) => l.units,
            Self::Dense(d) => d.units,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Lstm(_) => "lstm",
            Self::Dense(_) => "dense",
        }
    }
}
