use crate::all::*;

// Height of the plot strip below the video and projection panels.
pub const PLOT_STRIP_HEIGHT: usize = 240;
// Blank border between a plot panel edge and its contents.
const PLOT_MARGIN: usize = 8;

const PANEL_FRAME_COLOR: u32 = 0x303030;
const ZERO_AXIS_COLOR: u32 = 0x404040;
const SECONDARY_SERIES_COLOR: u32 = 0xffffff;
// Shared by the plot cut markers and the xy projection canvas.
pub const PARTITION_COLOR: u32 = 0xff0000;

pub struct VisualizeArgs<'a> {
  pub buffer: &'a mut Vec<u32>,
  pub buffer_w: usize,
  pub buffer_h: usize,
  pub video_w: usize,
  pub video_h: usize,
  // Current video frame, `video_w * video_h`.
  pub frame: &'a [u32],
  // Accumulated xy projections of the selected trajectories, same size.
  pub canvas: &'a [u32],
  // Positions of the selected trajectories on the current frame, ringed in
  // their selection colors.
  pub highlights: &'a [(Pixel, u32)],
  pub highlight_r: i32,
  pub plots: Option<PlotData<'a>>,
}

// Signals of the latest selection, drawn into the plot strip.
#[derive(Clone, Copy)]
pub struct PlotData<'a> {
  pub color: u32,
  pub raw_x: &'a [f64],
  pub raw_y: &'a [f64],
  pub profile: &'a MotionProfile,
  pub partition: &'a [usize],
  pub show_partitions: bool,
}

#[inline(always)]
pub fn draw_pixel(buffer: &mut [u32], w: usize, h: usize, p: &Pixel, v: u32) {
  if p[0] < 0 || p[0] >= w as i32 { return }
  if p[1] < 0 || p[1] >= h as i32 { return }
  buffer[p[1] as usize * w + p[0] as usize] = v;
}

pub fn draw_marker(buffer: &mut [u32], w: usize, h: usize, p: &Pixel, v: u32, r: i32) {
  for y in (-r)..(r + 1) {
    for x in (-r)..(r + 1) {
      draw_pixel(buffer, w, h, &(p + Pixel::new(x, y)), v);
    }
  }
}

pub fn draw_square(buffer: &mut [u32], w: usize, h: usize, p: &Pixel, v: u32, r: i32) {
  for z in (-r)..(r + 1) {
    draw_pixel(buffer, w, h, &(p + Pixel::new(z, -r)), v);
    draw_pixel(buffer, w, h, &(p + Pixel::new(z, r)), v);
    draw_pixel(buffer, w, h, &(p + Pixel::new(-r, z)), v);
    draw_pixel(buffer, w, h, &(p + Pixel::new(r, z)), v);
  }
}

pub fn draw_line(buffer: &mut [u32], w: usize, h: usize, mut p0: Pixel, mut p1: Pixel, v: u32) {
  let dx = p1[0] - p0[0];
  let dy = p1[1] - p0[1];
  if dx.abs() < dy.abs() {
    if p0[1] > p1[1] { (p0, p1) = (p1, p0); }
    let k = dx as f32 / dy as f32;
    for y in p0[1] ..= p1[1] {
      let x = p0[0] + (k * (y - p0[1]) as f32).round() as i32;
      draw_pixel(buffer, w, h, &Pixel::new(x, y), v);
    }
  }
  else {
    if p0[0] > p1[0] { (p0, p1) = (p1, p0); }
    let k = dy as f32 / dx as f32;
    for x in p0[0] ..= p1[0] {
      let y = p0[1] + (k * (x - p0[0]) as f32).round() as i32;
      draw_pixel(buffer, w, h, &Pixel::new(x, y), v);
    }
  }
}

// Connects consecutive points, like the xy projection curve.
pub fn draw_polyline(buffer: &mut [u32], w: usize, h: usize, points: &[Pixel], v: u32) {
  for i in 1..points.len() {
    draw_line(buffer, w, h, points[i - 1], points[i], v);
  }
}

// Stamps each trajectory point onto its frame as a filled box colored by
// position along the trajectory. Same footprint the index uses for lookup,
// so everything visible is also clickable.
pub fn bake_overlay(video: &mut Video, trajectories: &[Trajectory], margin: i32) {
  let ramp = trajectory_ramp();
  for trajectory in trajectories {
    for (i, point) in trajectory.points.iter().enumerate() {
      if let Some((p1, p2)) = dilated_box(point, margin, video.width, video.height) {
        if let Some(frame) = video.frames.get_mut(trajectory.frame_of(i)) {
          fill_box(frame, video.width, &p1, &p2, ramp_color(&ramp, i));
        }
      }
    }
  }
}

fn fill_box(buffer: &mut [u32], w: usize, p1: &Pixel, p2: &Pixel, v: u32) {
  for y in p1[1]..=p2[1] {
    for x in p1[0]..=p2[0] {
      buffer[y as usize * w + x as usize] = v;
    }
  }
}

fn blit(
  args: &mut VisualizeArgs,
  image: &[u32],
  image_w: usize,
  image_h: usize,
  // Top-left coordinates of drawing target.
  ax: usize,
  ay: usize,
) {
  for y in 0..image_h {
    if y + ay >= args.buffer_h { continue }
    for x in 0..image_w {
      if x + ax >= args.buffer_w { continue }
      args.buffer[(y + ay) * args.buffer_w + x + ax] = image[y * image_w + x];
    }
  }
}

#[derive(Clone, Copy)]
struct PanelRect {
  x: usize,
  y: usize,
  w: usize,
  h: usize,
}

fn panel_rect(args: &VisualizeArgs, i: usize) -> PanelRect {
  let w = args.buffer_w / 4;
  PanelRect {
    x: i * w,
    y: args.video_h,
    w,
    h: args.buffer_h - args.video_h,
  }
}

// Maps sample `i` of a series of length `n` into panel coordinates. The
// extent maps to the inner area, top is the largest value.
fn value_point(rect: &PanelRect, n: usize, i: usize, v: f64, extent: (f64, f64)) -> Pixel {
  let (min, max) = extent;
  let x0 = rect.x as i64 + PLOT_MARGIN as i64;
  let x1 = rect.x as i64 + rect.w as i64 - 1 - PLOT_MARGIN as i64;
  let tx = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 };
  let x = x0 as f64 + tx * (x1 - x0) as f64;

  let y0 = rect.y as i64 + PLOT_MARGIN as i64;
  let y1 = rect.y as i64 + rect.h as i64 - 1 - PLOT_MARGIN as i64;
  let ty = if max > min { (max - v) / (max - min) } else { 0.5 };
  let y = y0 as f64 + ty * (y1 - y0) as f64;
  Pixel::new(x.round() as i32, y.round() as i32)
}

fn draw_panel_frame(args: &mut VisualizeArgs, rect: &PanelRect) {
  let x0 = rect.x as i32;
  let x1 = (rect.x + rect.w - 1) as i32;
  let y0 = rect.y as i32;
  let y1 = (rect.y + rect.h - 1) as i32;
  let (w, h) = (args.buffer_w, args.buffer_h);
  draw_line(args.buffer, w, h, Pixel::new(x0, y0), Pixel::new(x1, y0), PANEL_FRAME_COLOR);
  draw_line(args.buffer, w, h, Pixel::new(x0, y1), Pixel::new(x1, y1), PANEL_FRAME_COLOR);
  draw_line(args.buffer, w, h, Pixel::new(x0, y0), Pixel::new(x0, y1), PANEL_FRAME_COLOR);
  draw_line(args.buffer, w, h, Pixel::new(x1, y0), Pixel::new(x1, y1), PANEL_FRAME_COLOR);
}

fn draw_series(args: &mut VisualizeArgs, rect: &PanelRect, series: &[f64], extent: (f64, f64), color: u32) {
  let (w, h) = (args.buffer_w, args.buffer_h);
  for i in 1..series.len() {
    let p0 = value_point(rect, series.len(), i - 1, series[i - 1], extent);
    let p1 = value_point(rect, series.len(), i, series[i], extent);
    draw_line(args.buffer, w, h, p0, p1, color);
  }
  if series.len() == 1 {
    let p = value_point(rect, 1, 0, series[0], extent);
    draw_pixel(args.buffer, w, h, &p, color);
  }
}

fn draw_series_markers(args: &mut VisualizeArgs, rect: &PanelRect, series: &[f64], extent: (f64, f64), cuts: &[usize]) {
  for &cut in cuts {
    if cut >= series.len() { continue }
    let p = value_point(rect, series.len(), cut, series[cut], extent);
    draw_marker(args.buffer, args.buffer_w, args.buffer_h, &p, PARTITION_COLOR, 1);
  }
}

fn draw_zero_axis(args: &mut VisualizeArgs, rect: &PanelRect, n: usize, extent: (f64, f64)) {
  if extent.0 > 0. || extent.1 < 0. { return }
  let p0 = value_point(rect, n, 0, 0., extent);
  let p1 = value_point(rect, n, n.max(2) - 1, 0., extent);
  draw_line(args.buffer, args.buffer_w, args.buffer_h, p0, p1, ZERO_AXIS_COLOR);
}

// Panels left to right: x position with its smoothed version, x velocity and
// acceleration, then the same pair for y. Partition cut points are marked on
// the derivative panels only.
fn draw_plots(args: &mut VisualizeArgs) {
  for i in 0..4 {
    let rect = panel_rect(args, i);
    draw_panel_frame(args, &rect);
  }
  let plots = match args.plots {
    Some(plots) => plots,
    None => return,
  };
  let profile = plots.profile;

  let panels = [
    (0, [plots.raw_x, &profile.smooth_x[..]], false),
    (1, [&profile.velocity_x[..], &profile.acceleration_x[..]], true),
    (2, [plots.raw_y, &profile.smooth_y[..]], false),
    (3, [&profile.velocity_y[..], &profile.acceleration_y[..]], true),
  ];
  for (i, series, derivative) in panels {
    let rect = panel_rect(args, i);
    let extent = match series_extent(&series) {
      Some(extent) => extent,
      None => continue,
    };
    if derivative {
      draw_zero_axis(args, &rect, series[0].len(), extent);
    }
    draw_series(args, &rect, series[1], extent, SECONDARY_SERIES_COLOR);
    draw_series(args, &rect, series[0], extent, plots.color);
    if derivative && plots.show_partitions {
      draw_series_markers(args, &rect, series[0], extent, plots.partition);
      draw_series_markers(args, &rect, series[1], extent, plots.partition);
    }
  }
}

pub fn visualize(args: &mut VisualizeArgs) {
  // Clear buffer.
  for y in 0..args.buffer_h {
    for x in 0..args.buffer_w {
      args.buffer[y * args.buffer_w + x] = 0;
    }
  }

  let frame = args.frame;
  let canvas = args.canvas;
  let (video_w, video_h) = (args.video_w, args.video_h);
  blit(args, frame, video_w, video_h, 0, 0);
  let highlights = args.highlights;
  let r = args.highlight_r;
  for (p, v) in highlights {
    draw_square(args.buffer, args.buffer_w, args.buffer_h, p, *v, r);
  }
  blit(args, canvas, video_w, video_h, video_w, 0);
  draw_plots(args);
}
