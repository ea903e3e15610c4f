mod all;
mod colors;
mod event_loop;
mod export;
mod filters;
mod input;
mod parameters;
mod trajectory;
mod trajectory_index;
mod types;
mod util;
mod video;
mod viewer;
mod visualize;
mod visualize_3d;

use all::*;

#[macro_use] extern crate lazy_static;
use clap::Parser;

use softbuffer::GraphicsContext;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit::platform::run_return::EventLoopExtRunReturn;

#[derive(Parser)]
struct Args {
  // Trajectory file in the dense tracker's text format.
  trajectories: String,
  // Partition file produced for the same trajectory file.
  partitions: String,
  // Frame list with the video frame image names.
  frames: String,
  #[clap(flatten)]
  parameters: ParameterSet,
}

fn handle_error(err: &anyhow::Error) {
  for (i, e) in err.chain().enumerate() {
    println!("  {}: {}", i + 1, e);
  }
}

fn main() {
  if let Err(err) = run() {
    handle_error(&err);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();
  *PARAMETER_SET.lock().unwrap() = args.parameters.clone();

  // Unlike the window setup, the data loading below wants to log.
  env_logger::Builder::new()
    .filter_level(LevelFilter::Info)
    .format(util::format_log)
    .init();

  // Validate the text files before decoding a single image.
  let (video_length, frame_paths) = read_frame_list(Path::new(&args.frames))?;
  let dataset = load_dataset(
    Path::new(&args.trajectories),
    Path::new(&args.partitions),
    video_length,
  )?;
  let video = Video::load(&frame_paths)?;
  let mut viewer = Viewer::new(video, dataset)?;

  let size = winit::dpi::PhysicalSize::new(
    viewer.buffer_w() as u32,
    viewer.buffer_h() as u32,
  );
  let mut event_loop = EventLoop::new();
  let window = WindowBuilder::new()
    .with_title("indigo")
    .with_resizable(false)
    .with_inner_size(size)
    .with_min_inner_size(size)
    .with_max_inner_size(size)
    .build(&event_loop)
    .unwrap();
  let mut graphics_context = unsafe { GraphicsContext::new(window) }.unwrap();

  let mut buffer = vec![];
  let mut args = EventLoopArgs {
    viewer: &mut viewer,
    buffer: &mut buffer,
    graphics_context: &mut graphics_context,
    cursor: None,
  };

  event_loop.run_return(move |event, _, control_flow| {
    if let Err(err) = handle_event(event, control_flow, &mut args) {
      handle_error(&err);
      *control_flow = ControlFlow::Exit;
    }
  });
  Ok(())
}
