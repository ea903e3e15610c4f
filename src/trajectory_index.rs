use crate::all::*;

use thiserror::Error;

// Cell value meaning no trajectory covers the position.
pub const NO_TRAJECTORY: i32 = -1;

#[derive(Error, Debug, PartialEq)]
pub enum IndexError {
  #[error("point {point} of trajectory {id} is outside the video volume at ({x}, {y}, frame {frame})")]
  OutOfBounds { id: usize, point: usize, x: i64, y: i64, frame: usize },
}

// Dense map from a pixel and frame number to the trajectory covering it.
// Trajectory footprints are dilated by `margin` pixels in both directions so
// that a click does not need to be exact.
pub struct TrajectoryIndex {
  cells: Vec<i32>,
  width: usize,
  height: usize,
  frames: usize,
  margin: i32,
}

// Rounded center dilated by `margin` and clamped to the grid. None if the
// rounded center itself is off the grid.
pub fn dilated_box(
  point: &Vector2d,
  margin: i32,
  width: usize,
  height: usize,
) -> Option<(Pixel, Pixel)> {
  let x = point[0].round() as i64;
  let y = point[1].round() as i64;
  if x < 0 || x >= width as i64 || y < 0 || y >= height as i64 {
    return None;
  }
  let margin = margin as i64;
  let p1 = Pixel::new(
    i64::max(x - margin, 0) as i32,
    i64::max(y - margin, 0) as i32,
  );
  let p2 = Pixel::new(
    i64::min(x + margin, width as i64 - 1) as i32,
    i64::min(y + margin, height as i64 - 1) as i32,
  );
  Some((p1, p2))
}

impl TrajectoryIndex {
  pub fn new(width: usize, height: usize, frames: usize, margin: i32) -> TrajectoryIndex {
    assert!(width > 0 && height > 0 && frames > 0);
    assert!(margin >= 0);
    TrajectoryIndex {
      cells: vec![NO_TRAJECTORY; width * height * frames],
      width,
      height,
      frames,
      margin,
    }
  }

  // Inserting in ascending id order makes the highest id win where
  // footprints overlap.
  pub fn build(
    width: usize,
    height: usize,
    frames: usize,
    margin: i32,
    trajectories: &[Trajectory],
  ) -> Result<TrajectoryIndex, IndexError> {
    let mut index = TrajectoryIndex::new(width, height, frames, margin);
    for (i, trajectory) in trajectories.iter().enumerate() {
      index.insert(TrajectoryId(i), trajectory)?;
    }
    Ok(index)
  }

  pub fn insert(&mut self, id: TrajectoryId, trajectory: &Trajectory) -> Result<(), IndexError> {
    for (i, point) in trajectory.points.iter().enumerate() {
      let frame = trajectory.frame_of(i);
      let bounds = dilated_box(point, self.margin, self.width, self.height);
      let (p1, p2) = match bounds {
        Some(bounds) if frame < self.frames => bounds,
        _ => {
          return Err(IndexError::OutOfBounds {
            id: id.0,
            point: i,
            x: point[0].round() as i64,
            y: point[1].round() as i64,
            frame,
          });
        },
      };
      for y in p1[1]..=p2[1] {
        for x in p1[0]..=p2[0] {
          let offset = self.offset(x as usize, y as usize, frame);
          self.cells[offset] = id.0 as i32;
        }
      }
    }
    Ok(())
  }

  pub fn lookup(&self, p: &Pixel, frame: usize) -> Option<TrajectoryId> {
    if p[0] < 0 || p[0] >= self.width as i32 { return None }
    if p[1] < 0 || p[1] >= self.height as i32 { return None }
    if frame >= self.frames { return None }
    let value = self.cells[self.offset(p[0] as usize, p[1] as usize, frame)];
    if value == NO_TRAJECTORY { None } else { Some(TrajectoryId(value as usize)) }
  }

  // Drops all footprints and starts over with the new geometry.
  pub fn resize(&mut self, width: usize, height: usize, frames: usize) {
    assert!(width > 0 && height > 0 && frames > 0);
    self.width = width;
    self.height = height;
    self.frames = frames;
    self.cells.clear();
    self.cells.resize(width * height * frames, NO_TRAJECTORY);
  }

  fn offset(&self, x: usize, y: usize, t: usize) -> usize {
    (t * self.height + y) * self.width + x
  }
}
