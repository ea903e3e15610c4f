use kiss3d::camera::ArcBall;
use kiss3d::event::{Action, Key, WindowEvent};
use kiss3d::window::Window;
use nalgebra::Point3;

use crate::all::*;

// Rotatable view of a single trajectory with time along the z axis, running
// in its own thread so the main window stays responsive.
pub struct Viewer3d {
  tx: mpsc::Sender<()>,
  handle: thread::JoinHandle<()>,
}

impl Viewer3d {
  pub fn spawn(trajectory: &Trajectory, partition: &[usize], id: TrajectoryId) -> Viewer3d {
    let scene = Scene3d::new(trajectory, partition);
    let title = format!("trajectory {}", id.0);
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || run_visualize_3d(rx, scene, title));
    Viewer3d { tx, handle }
  }

  pub fn stop(self) {
    // The user may have closed the window already.
    let _ = self.tx.send(());
    let _ = self.handle.join();
  }
}

struct Scene3d {
  points: Vec<Point3<f32>>,
  colors: Vec<Point3<f32>>,
  cut_points: Vec<Point3<f32>>,
}

// Scales values to [-5, 5]. A flat axis maps to 0.
fn normalize(values: &[f64]) -> Vec<f32> {
  let extent = series_extent(&[values]);
  values.iter().map(|v| match extent {
    Some((min, max)) if max > min => (10. * (v - min) / (max - min) - 5.) as f32,
    _ => 0.,
  }).collect()
}

impl Scene3d {
  fn new(trajectory: &Trajectory, partition: &[usize]) -> Scene3d {
    let n = trajectory.len();
    let xs = normalize(&trajectory.xs());
    let ys = normalize(&trajectory.ys());
    let ts: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let zs = normalize(&ts);
    let ramp = trajectory_ramp();

    let mut points = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);
    for i in 0..n {
      // Flip the image y axis so up in the video is up in the scene.
      points.push(Point3::new(xs[i], -ys[i], zs[i]));
      let c = ramp_color(&ramp, i);
      colors.push(Point3::new(
        ((c >> 16) & 0xff) as f32 / 255.,
        ((c >> 8) & 0xff) as f32 / 255.,
        (c & 0xff) as f32 / 255.,
      ));
    }
    let cut_points = partition.iter().map(|cut| points[*cut]).collect();
    Scene3d { points, colors, cut_points }
  }
}

fn run_visualize_3d(rx: mpsc::Receiver<()>, scene: Scene3d, title: String) {
  let eye = Point3::new(10.0f32, 10.0, 10.0);
  let at = Point3::origin();
  let mut state = State {
    arc_ball: ArcBall::new(eye, at),
  };

  let mut window = Window::new(&title);

  while !window.should_close() {
    render(&mut window, &mut state, &scene);
    if let Ok(_) = rx.try_recv() { break }
  }
  window.close();
}

struct State {
  arc_ball: ArcBall,
}

fn render(window: &mut Window, state: &mut State, scene: &Scene3d) {
  for event in window.events().iter() {
    match event.value {
      WindowEvent::Key(Key::Q, Action::Release, _) => {
        window.close();
      },
      _ => {},
    }
  }

  // Draw axes.
  for i in 0..3 {
    let mut p = Point3::new(0.0, 0.0, 0.0);
    p[i] = 1.;
    window.draw_line(&Point3::origin(), &p, &p);
  }

  for i in 1..scene.points.len() {
    window.draw_line(&scene.points[i - 1], &scene.points[i], &scene.colors[i]);
  }
  window.set_point_size(4.0);
  for p in &scene.cut_points {
    window.draw_point(p, &Point3::new(1.0, 0.0, 0.0));
  }

  window.render_with_camera(&mut state.arc_ball);
}
