use crate::all::*;

use softbuffer::GraphicsContext;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::ControlFlow;
use winit::window::Window;

pub struct EventLoopArgs<'a> {
  pub viewer: &'a mut Viewer,
  pub buffer: &'a mut Vec<u32>,
  pub graphics_context: &'a mut GraphicsContext<Window>,
  // Last cursor position in buffer coordinates.
  pub cursor: Option<Pixel>,
}

pub fn handle_event(
  event: Event<()>,
  control_flow: &mut ControlFlow,
  args: &mut EventLoopArgs,
) -> Result<()> {
  // Everything happens in response to user input, so no need to poll.
  *control_flow = ControlFlow::Wait;

  let (window_width, window_height) = {
    let size = args.graphics_context.window().inner_size();
    (size.width as usize, size.height as usize)
  };
  if args.buffer.is_empty() {
    *args.buffer = vec![0; window_width * window_height];
    args.viewer.draw(args.buffer, window_width, window_height);
    args.graphics_context.window().request_redraw();
  }
  assert_eq!(window_width * window_height, args.buffer.len());

  match event {
    Event::RedrawRequested(window_id) if window_id == args.graphics_context.window().id() => {
      args.graphics_context.set_buffer(&args.buffer, window_width as u16, window_height as u16);
    },
    Event::WindowEvent {
      event,
      window_id,
    } => {
      if event == WindowEvent::CloseRequested && window_id == args.graphics_context.window().id() {
        args.viewer.shutdown();
        *control_flow = ControlFlow::Exit;
      }
      match event {
        WindowEvent::KeyboardInput {
          input: KeyboardInput {
            state: ElementState::Pressed,
            virtual_keycode: Some(keycode),
            scancode: _,
            ..
          },
          is_synthetic: _,
          device_id: _,
        } => {
          match keycode {
            VirtualKeyCode::Escape | VirtualKeyCode::Q => {
              args.viewer.shutdown();
              *control_flow = ControlFlow::Exit;
            },
            VirtualKeyCode::F => {
              if args.viewer.step_frame(1) {
                redraw(args, window_width, window_height);
              }
            },
            VirtualKeyCode::B => {
              if args.viewer.step_frame(-1) {
                redraw(args, window_width, window_height);
              }
            },
            VirtualKeyCode::R => {
              args.viewer.refresh();
              redraw(args, window_width, window_height);
            },
            VirtualKeyCode::E => {
              // A failed export should not end the session.
              if let Err(err) = args.viewer.export_selected() {
                warn!("Export failed: {:#}", err);
              }
            },
            _ => {}, // Other keys.
          }
        },
        WindowEvent::CursorMoved { position, .. } => {
          args.cursor = Some(Pixel::new(position.x as i32, position.y as i32));
        },
        WindowEvent::MouseInput { state: ElementState::Pressed, button, .. } => {
          if let Some(cursor) = args.cursor {
            match button {
              MouseButton::Left => {
                if args.viewer.select_at(&cursor)? {
                  redraw(args, window_width, window_height);
                }
              },
              MouseButton::Right => {
                args.viewer.show_3d_at(&cursor);
              },
              _ => {}, // Other buttons.
            }
          }
        },
        _ => {}, // Other window events.
      }
    },
    _ => {}, // Other events.
  }
  Ok(())
}

fn redraw(args: &mut EventLoopArgs, window_width: usize, window_height: usize) {
  args.viewer.draw(args.buffer, window_width, window_height);
  args.graphics_context.window().request_redraw();
}
