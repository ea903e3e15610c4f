use crate::all::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrajectoryId(pub usize);

// A point track over consecutive video frames. Sample `i` was observed on
// frame `start_frame + i`.
#[derive(Clone, Debug)]
pub struct Trajectory {
  pub points: Vec<Vector2d>,
  pub start_frame: usize,
}

// Indexes of the samples where the trajectory was cut into segments,
// strictly increasing.
pub type Partition = Vec<usize>;

impl Trajectory {
  pub fn new(points: Vec<Vector2d>, start_frame: usize) -> Trajectory {
    Trajectory { points, start_frame }
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn frame_of(&self, i: usize) -> usize {
    self.start_frame + i
  }

  // Frame of the last sample. Parsing rejects empty trajectories.
  pub fn end_frame(&self) -> usize {
    self.start_frame + self.points.len() - 1
  }

  pub fn point_at_frame(&self, frame: usize) -> Option<(usize, Vector2d)> {
    if frame < self.start_frame { return None }
    let i = frame - self.start_frame;
    if i >= self.points.len() { return None }
    Some((i, self.points[i]))
  }

  pub fn xs(&self) -> Vec<f64> {
    self.points.iter().map(|p| p[0]).collect()
  }

  pub fn ys(&self) -> Vec<f64> {
    self.points.iter().map(|p| p[1]).collect()
  }
}

// Smoothed position and its two derivatives, one value per sample.
#[derive(Clone, Debug)]
pub struct MotionProfile {
  pub smooth_x: Vec<f64>,
  pub smooth_y: Vec<f64>,
  pub velocity_x: Vec<f64>,
  pub velocity_y: Vec<f64>,
  pub acceleration_x: Vec<f64>,
  pub acceleration_y: Vec<f64>,
}

impl MotionProfile {
  pub fn compute(
    trajectory: &Trajectory,
    smooth_window: usize,
    smooth_sigma: f64,
    derivative_window: usize,
  ) -> Result<MotionProfile, FilterError> {
    let gaussian = gaussian_kernel(smooth_window, smooth_sigma)?;
    let derivative = derivative_kernel(derivative_window)?;

    let smooth_x = stage(&trajectory.xs(), &gaussian)?;
    let smooth_y = stage(&trajectory.ys(), &gaussian)?;
    let velocity_x = stage(&smooth_x, &derivative)?;
    let velocity_y = stage(&smooth_y, &derivative)?;
    let acceleration_x = stage(&velocity_x, &derivative)?;
    let acceleration_y = stage(&velocity_y, &derivative)?;

    Ok(MotionProfile {
      smooth_x,
      smooth_y,
      velocity_x,
      velocity_y,
      acceleration_x,
      acceleration_y,
    })
  }
}

fn stage(signal: &[f64], kernel: &[f64]) -> Result<Vec<f64>, FilterError> {
  let mut out = convolve(signal, kernel)?;
  fill_margins(&mut out, kernel.len());
  Ok(out)
}
