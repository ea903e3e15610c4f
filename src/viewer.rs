use crate::all::*;
use crate::visualize_3d::Viewer3d;

// With the default window sizes, shorter trajectories have no acceleration
// samples left outside the filled margins.
const MIN_PLOT_SAMPLES: usize = 5;

// One clicked trajectory. The same trajectory can be selected repeatedly,
// each time with a fresh color.
pub struct Selection {
  pub id: TrajectoryId,
  pub color: u32,
  pub raw_x: Vec<f64>,
  pub raw_y: Vec<f64>,
  // None when the trajectory is too short to filter.
  pub profile: Option<MotionProfile>,
}

pub struct Viewer {
  video: Video,
  trajectories: Vec<Trajectory>,
  partitions: Vec<Partition>,
  index: TrajectoryIndex,
  // Accumulated xy projections of the clicked trajectories.
  canvas: Vec<u32>,
  current_frame: usize,
  selections: Vec<Selection>,
  viewer_3d: Option<Viewer3d>,
  margin: i32,
  smooth_window: usize,
  smooth_sigma: f64,
  derivative_window: usize,
  hide_partitions: bool,
}

impl Viewer {
  pub fn new(mut video: Video, dataset: Dataset) -> Result<Viewer> {
    let p = &*PARAMETER_SET.lock().unwrap();
    // Fail on bad filter parameters before the first click needs them.
    gaussian_kernel(p.smooth_window, p.smooth_sigma)
      .context("Bad smoothing parameters.")?;
    derivative_kernel(p.derivative_window)
      .context("Bad derivative parameters.")?;

    let index = TrajectoryIndex::build(
      video.width,
      video.height,
      video.frames.len(),
      p.dilation_margin,
      &dataset.trajectories,
    ).context("Failed to index trajectories.")?;
    if !p.hide_overlay {
      bake_overlay(&mut video, &dataset.trajectories, p.dilation_margin);
    }
    info!("Indexed {} trajectories over {} frames.",
      dataset.trajectories.len(), video.frames.len());

    let canvas = vec![0; video.width * video.height];
    Ok(Viewer {
      video,
      trajectories: dataset.trajectories,
      partitions: dataset.partitions,
      index,
      canvas,
      current_frame: 0,
      selections: vec![],
      viewer_3d: None,
      margin: p.dilation_margin,
      smooth_window: p.smooth_window,
      smooth_sigma: p.smooth_sigma,
      derivative_window: p.derivative_window,
      hide_partitions: p.hide_partitions,
    })
  }

  pub fn buffer_w(&self) -> usize {
    2 * self.video.width
  }

  pub fn buffer_h(&self) -> usize {
    self.video.height + PLOT_STRIP_HEIGHT
  }

  // Looks up the trajectory under the pixel on the current frame, draws its
  // xy projection onto the canvas and appends a selection. Returns whether
  // anything changed.
  pub fn select_at(&mut self, p: &Pixel) -> Result<bool> {
    let id = match self.index.lookup(p, self.current_frame) {
      Some(id) => id,
      None => {
        debug!("Nothing at ({}, {}) on frame {}.", p[0], p[1], self.current_frame);
        return Ok(false);
      },
    };
    let trajectory = &self.trajectories[id.0];
    let color = selection_color(self.selections.len());

    let pixels: Vec<Pixel> = trajectory.points.iter().map(from_f64).collect();
    let (w, h) = (self.video.width, self.video.height);
    draw_polyline(&mut self.canvas, w, h, &pixels, color);
    if !self.hide_partitions {
      for &cut in &self.partitions[id.0] {
        draw_marker(&mut self.canvas, w, h, &pixels[cut], PARTITION_COLOR, 1);
      }
    }

    // Larger windows than the defaults raise the bar accordingly.
    let min_samples = MIN_PLOT_SAMPLES
      .max(self.smooth_window)
      .max(self.derivative_window);
    let profile = if trajectory.len() >= min_samples {
      Some(MotionProfile::compute(
        trajectory,
        self.smooth_window,
        self.smooth_sigma,
        self.derivative_window,
      )?)
    }
    else {
      warn!("Trajectory {} has only {} points, too short to plot derivatives.",
        id.0, trajectory.len());
      None
    };

    info!("Selected trajectory {} with {} points starting at frame {}.",
      id.0, trajectory.len(), trajectory.start_frame);
    self.selections.push(Selection {
      id,
      color,
      raw_x: trajectory.xs(),
      raw_y: trajectory.ys(),
      profile,
    });
    Ok(true)
  }

  // Returns whether the frame changed.
  pub fn step_frame(&mut self, delta: i32) -> bool {
    let last = self.video.frames.len() as i32 - 1;
    let frame = (self.current_frame as i32 + delta).max(0).min(last) as usize;
    let changed = frame != self.current_frame;
    if changed {
      debug!("Showing frame {} of {}.", frame + 1, self.video.frames.len());
    }
    self.current_frame = frame;
    changed
  }

  pub fn current_frame(&self) -> usize {
    self.current_frame
  }

  // Clears the canvas and forgets the selections.
  pub fn refresh(&mut self) {
    self.canvas.fill(0);
    self.selections.clear();
  }

  // One file per distinct selected trajectory, in selection order.
  pub fn export_selected(&self) -> Result<()> {
    let exports = self.distinct_exports();
    if exports.is_empty() {
      info!("Nothing selected to export.");
      return Ok(());
    }
    for export in exports {
      let path = PathBuf::from(format!("trajectory_{}.json", export.trajectory));
      write_selection(&path, &export)?;
      info!("Exported trajectory {} to {}.", export.trajectory, path.display());
    }
    Ok(())
  }

  fn distinct_exports(&self) -> Vec<SelectionExport> {
    let mut seen: Vec<usize> = vec![];
    let mut exports = vec![];
    for selection in &self.selections {
      let id = selection.id.0;
      if seen.contains(&id) { continue }
      seen.push(id);
      let trajectory = &self.trajectories[id];
      exports.push(SelectionExport {
        trajectory: id,
        start_frame: trajectory.start_frame,
        points: trajectory.points.iter().map(|p| [p[0], p[1]]).collect(),
        partition: self.partitions[id].clone(),
        profile: selection.profile.as_ref().map(ProfileExport::from_profile),
      });
    }
    exports
  }

  // Opens the rotatable 3d view of the trajectory under the pixel, replacing
  // the previous one. Does not touch the selections.
  pub fn show_3d_at(&mut self, p: &Pixel) {
    let id = match self.index.lookup(p, self.current_frame) {
      Some(id) => id,
      None => return,
    };
    if let Some(viewer_3d) = self.viewer_3d.take() {
      viewer_3d.stop();
    }
    self.viewer_3d = Some(Viewer3d::spawn(
      &self.trajectories[id.0],
      &self.partitions[id.0],
      id,
    ));
  }

  pub fn shutdown(&mut self) {
    if let Some(viewer_3d) = self.viewer_3d.take() {
      viewer_3d.stop();
    }
  }

  // The most recent selection that has plottable derived signals.
  fn plotted(&self) -> Option<&Selection> {
    self.selections.iter().rev().find(|s| s.profile.is_some())
  }

  pub fn draw(&self, buffer: &mut Vec<u32>, buffer_w: usize, buffer_h: usize) {
    let mut highlights = vec![];
    for selection in &self.selections {
      let trajectory = &self.trajectories[selection.id.0];
      if let Some((_, point)) = trajectory.point_at_frame(self.current_frame) {
        highlights.push((from_f64(&point), selection.color));
      }
    }
    let plots = self.plotted().map(|selection| PlotData {
      color: selection.color,
      raw_x: &selection.raw_x,
      raw_y: &selection.raw_y,
      // Checked by `plotted`.
      profile: selection.profile.as_ref().unwrap(),
      partition: &self.partitions[selection.id.0],
      show_partitions: !self.hide_partitions,
    });
    let mut args = VisualizeArgs {
      buffer,
      buffer_w,
      buffer_h,
      video_w: self.video.width,
      video_h: self.video.height,
      frame: &self.video.frames[self.current_frame],
      canvas: &self.canvas,
      highlights: &highlights,
      // Ring outside the baked footprint.
      highlight_r: self.margin + 2,
      plots,
    };
    visualize(&mut args);
  }
}
