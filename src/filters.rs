use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
  #[error("invalid filter input: {reason}")]
  InvalidInput { reason: String },
  #[error("no derivative coefficients for window size {window_size}")]
  UnsupportedWindowSize { window_size: usize },
}

fn invalid_input(reason: String) -> FilterError {
  FilterError::InvalidInput { reason }
}

// Discrete correlation of `signal` with `kernel`. The output has the same
// length as the signal. Only the band of indices where the kernel fits
// entirely inside the signal is computed, the rest stays at zero. Use
// `fill_margins` to extend the band outwards.
pub fn convolve(signal: &[f64], kernel: &[f64]) -> Result<Vec<f64>, FilterError> {
  if kernel.is_empty() {
    return Err(invalid_input("kernel is empty".to_string()));
  }
  if signal.len() < kernel.len() {
    return Err(invalid_input(format!(
      "signal of length {} is shorter than the kernel of length {}",
      signal.len(), kernel.len())));
  }

  let mut out = vec![0.; signal.len()];
  // Kernel taps to the left and to the right of the output index.
  let l_half = kernel.len() / 2;
  let r_half = kernel.len() - 1 - l_half;
  for i in l_half..(signal.len() - r_half) {
    let mut sum = 0.;
    for (j, k) in kernel.iter().enumerate() {
      sum += signal[i + j - l_half] * k;
    }
    out[i] = sum;
  }
  Ok(out)
}

// Gaussian weights normalized to sum to one. The peak sits at `window_size / 2`.
pub fn gaussian_kernel(window_size: usize, sigma: f64) -> Result<Vec<f64>, FilterError> {
  if window_size == 0 {
    return Err(invalid_input("window size is zero".to_string()));
  }
  // Also catches NaN.
  if !(sigma > 0.) {
    return Err(invalid_input(format!("sigma must be positive, got {}", sigma)));
  }

  let center = (window_size / 2) as f64;
  let mut kernel = Vec::with_capacity(window_size);
  let mut sum = 0.;
  for i in 0..window_size {
    let d = i as f64 - center;
    let v = (-d * d / (2. * sigma * sigma)).exp();
    sum += v;
    kernel.push(v);
  }
  for v in &mut kernel {
    *v /= sum;
  }
  Ok(kernel)
}

// Central difference templates from T. Brox et al. CFilter.
pub fn derivative_kernel(window_size: usize) -> Result<Vec<f64>, FilterError> {
  match window_size {
    2 => Ok(vec![-1., 1.]),
    3 => Ok(vec![-0.5, 0., 0.5]),
    4 => Ok(vec![1. / 24., -9. / 8., 9. / 8., -1. / 24.]),
    5 => Ok(vec![1. / 12., -2. / 3., 0., 2. / 3., -1. / 12.]),
    _ => Err(FilterError::UnsupportedWindowSize { window_size }),
  }
}

// Copies the nearest computed band value into the margins `convolve` leaves
// at zero. A no-op when the band would be empty.
pub fn fill_margins(values: &mut [f64], kernel_len: usize) {
  if kernel_len == 0 || values.len() < kernel_len { return }
  let l_half = kernel_len / 2;
  let r_half = kernel_len - 1 - l_half;
  for i in 0..l_half {
    values[i] = values[l_half];
  }
  for i in (values.len() - r_half)..values.len() {
    values[i] = values[values.len() - r_half - 1];
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::Rng;
  use rand_xoshiro::rand_core::SeedableRng;
  use rand_xoshiro::Xoshiro256PlusPlus;

  #[test]
  fn test_convolve_identity_kernel() {
    let signal = [3., -1., 4., 1.5];
    let out = convolve(&signal, &[1.]).unwrap();
    assert_eq!(out, signal.to_vec());
  }

  #[test]
  fn test_convolve_band() {
    let signal = [1., 2., 3., 4., 5.];
    let out = convolve(&signal, &[1., 1., 1.]).unwrap();
    assert_eq!(out, vec![0., 6., 9., 12., 0.]);
  }

  #[test]
  fn test_convolve_orientation() {
    // A kernel with its only tap on the left shifts the signal to the right.
    let signal = [1., 2., 3., 4., 5.];
    let out = convolve(&signal, &[1., 0., 0.]).unwrap();
    assert_eq!(out, vec![0., 1., 2., 3., 0.]);
  }

  #[test]
  fn test_convolve_even_kernel() {
    // Two taps put one element on the left and none on the right.
    let signal = [1., 3., 6., 10.];
    let out = convolve(&signal, &[-1., 1.]).unwrap();
    assert_eq!(out, vec![0., 2., 3., 4.]);
  }

  #[test]
  fn test_convolve_signal_as_long_as_kernel() {
    let out = convolve(&[1., 2., 3.], &[-0.5, 0., 0.5]).unwrap();
    assert_eq!(out, vec![0., 1., 0.]);
  }

  #[test]
  fn test_convolve_rejects_short_signal() {
    let err = convolve(&[1., 2.], &[1., 1., 1.]).unwrap_err();
    assert!(matches!(err, FilterError::InvalidInput { .. }));
  }

  #[test]
  fn test_convolve_rejects_empty_kernel() {
    let err = convolve(&[1., 2., 3.], &[]).unwrap_err();
    assert!(matches!(err, FilterError::InvalidInput { .. }));
  }

  #[test]
  fn test_gaussian_kernel_normalized_and_symmetric() {
    let kernel = gaussian_kernel(5, 1.2).unwrap();
    assert_eq!(kernel.len(), 5);
    let sum: f64 = kernel.iter().sum();
    assert!((sum - 1.).abs() < 1e-12);
    assert!((kernel[0] - kernel[4]).abs() < 1e-12);
    assert!((kernel[1] - kernel[3]).abs() < 1e-12);
    assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
  }

  #[test]
  fn test_gaussian_kernel_even_window() {
    // The peak is at index window_size / 2.
    let kernel = gaussian_kernel(4, 1.).unwrap();
    let sum: f64 = kernel.iter().sum();
    assert!((sum - 1.).abs() < 1e-12);
    for v in &kernel {
      assert!(*v <= kernel[2]);
    }
    assert_eq!(kernel[1], kernel[3]);
  }

  #[test]
  fn test_gaussian_kernel_flattens_with_large_sigma() {
    let kernel = gaussian_kernel(3, 1000.).unwrap();
    for v in &kernel {
      assert!((v - 1. / 3.).abs() < 1e-5);
    }
  }

  #[test]
  fn test_gaussian_kernel_rejects_bad_input() {
    assert!(matches!(gaussian_kernel(0, 1.), Err(FilterError::InvalidInput { .. })));
    assert!(matches!(gaussian_kernel(3, 0.), Err(FilterError::InvalidInput { .. })));
    assert!(matches!(gaussian_kernel(3, -2.), Err(FilterError::InvalidInput { .. })));
    assert!(matches!(gaussian_kernel(3, f64::NAN), Err(FilterError::InvalidInput { .. })));
  }

  #[test]
  fn test_derivative_kernel_coefficients() {
    assert_eq!(derivative_kernel(2).unwrap(), vec![-1., 1.]);
    assert_eq!(derivative_kernel(3).unwrap(), vec![-0.5, 0., 0.5]);
    assert_eq!(derivative_kernel(4).unwrap(), vec![1. / 24., -9. / 8., 9. / 8., -1. / 24.]);
    assert_eq!(derivative_kernel(5).unwrap(), vec![1. / 12., -2. / 3., 0., 2. / 3., -1. / 12.]);
  }

  #[test]
  fn test_derivative_kernel_rejects_other_sizes() {
    for window_size in [0, 1, 6, 100] {
      let err = derivative_kernel(window_size).unwrap_err();
      assert_eq!(err, FilterError::UnsupportedWindowSize { window_size });
    }
  }

  #[test]
  fn test_derivative_kernels_sum_to_zero() {
    for window_size in 2..=5 {
      let sum: f64 = derivative_kernel(window_size).unwrap().iter().sum();
      assert!(sum.abs() < 1e-12);
    }
  }

  #[test]
  fn test_derivative_kernels_antisymmetric() {
    for window_size in 2..=5 {
      let kernel = derivative_kernel(window_size).unwrap();
      for i in 0..kernel.len() {
        assert_eq!(kernel[i], -kernel[kernel.len() - 1 - i]);
      }
    }
  }

  #[test]
  fn test_derivative_of_constant_signal() {
    let signal = vec![3.25; 12];
    for window_size in 2..=5 {
      let kernel = derivative_kernel(window_size).unwrap();
      let out = convolve(&signal, &kernel).unwrap();
      let l_half = window_size / 2;
      for i in l_half..(signal.len() - (window_size - 1 - l_half)) {
        assert!(out[i].abs() < 1e-12, "window {} index {}", window_size, i);
      }
    }
  }

  #[test]
  fn test_derivative_of_linear_ramp() {
    let signal: Vec<f64> = (0..9).map(|i| 2. * i as f64 + 1.).collect();
    for window_size in [3, 5] {
      let kernel = derivative_kernel(window_size).unwrap();
      let out = convolve(&signal, &kernel).unwrap();
      let l_half = window_size / 2;
      for i in l_half..(signal.len() - (window_size - 1 - l_half)) {
        assert!((out[i] - 2.).abs() < 1e-12, "window {} index {}", window_size, i);
      }
    }
  }

  #[test]
  fn test_derivative_of_parabola() {
    let signal: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
    let out = convolve(&signal, &derivative_kernel(3).unwrap()).unwrap();
    for i in 1..9 {
      assert_eq!(out[i], 2. * i as f64);
    }
  }

  #[test]
  fn test_smoothing_preserves_linear_ramp() {
    let signal: Vec<f64> = (0..8).map(|i| i as f64).collect();
    let kernel = gaussian_kernel(3, 3.).unwrap();
    let out = convolve(&signal, &kernel).unwrap();
    for i in 1..7 {
      assert!((out[i] - signal[i]).abs() < 1e-12);
    }
  }

  #[test]
  fn test_fill_margins() {
    let mut values = vec![0., 7., 8., 9., 0.];
    fill_margins(&mut values, 3);
    assert_eq!(values, vec![7., 7., 8., 9., 9.]);

    let mut values = vec![0., 4., 5., 6., 7.];
    fill_margins(&mut values, 2);
    assert_eq!(values, vec![4., 4., 5., 6., 7.]);

    let mut values = vec![0., 0., 3., 4., 0., 0.];
    fill_margins(&mut values, 5);
    assert_eq!(values, vec![3., 3., 3., 4., 4., 4.]);

    // Identity kernel computes everything, nothing to fill.
    let mut values = vec![1., 2., 3.];
    fill_margins(&mut values, 1);
    assert_eq!(values, vec![1., 2., 3.]);
  }

  #[test]
  fn test_fill_margins_short_input() {
    let mut values = vec![5., 6.];
    fill_margins(&mut values, 3);
    assert_eq!(values, vec![5., 6.]);
    fill_margins(&mut values, 0);
    assert_eq!(values, vec![5., 6.]);
  }

  #[test]
  fn test_smoothing_of_constant_signal() {
    // A normalized kernel must reproduce a constant exactly up to rounding,
    // whatever the window and sigma.
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    for _ in 0..100 {
      let window_size = rng.gen_range(1..=50);
      let sigma = rng.gen_range(0.1..100.);
      let kernel = gaussian_kernel(window_size, sigma).unwrap();
      let sum: f64 = kernel.iter().sum();
      assert!((sum - 1.).abs() < 1e-9, "window {} sigma {}", window_size, sigma);
      let signal = vec![4.2; 60 + rng.gen_range(0..20)];
      let mut out = convolve(&signal, &kernel).unwrap();
      fill_margins(&mut out, kernel.len());
      for v in &out {
        assert!((v - 4.2).abs() < 1e-9, "window {} sigma {}", window_size, sigma);
      }
    }
  }
}
