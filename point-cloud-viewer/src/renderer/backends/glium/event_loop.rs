use crate::modules::ModuleRegistry;
use crate::renderer::backends::glium::windows::WindowManager;
use crate::renderer::backends::glium::{GliumRenderOptions, SessionState};
use crate::renderer::viewer_command::ViewerCommand;
use glium::glutin::event::{Event, WindowEvent};
use glium::glutin::event_loop::{ControlFlow, EventLoop as WInitEventLoop, EventLoopBuilder};
use log::{debug, error, trace};
use std::time::Instant;

pub type EventLoop = WInitEventLoop<ViewerCommand>;

pub fn new() -> EventLoop {
    EventLoopBuilder::with_user_event().build()
}

pub fn run<F>(
    event_loop: EventLoop,
    options: GliumRenderOptions,
    registry: ModuleRegistry,
    on_exit: F,
) -> !
where
    F: FnOnce(SessionState) + 'static,
{
    let mut window_manager = WindowManager::new(options);
    let mut on_exit = Some(on_exit);

    debug!("Start event loop");
    event_loop.run(move |event, window_target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { window_id, event } => {
                // log
                trace!("Window event: {:?} - {:?}", window_id, event);

                match &event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        window_manager.close_os(window_id);
                    }
                    WindowEvent::Focused(true) => window_manager.activate_os(window_id),
                    WindowEvent::DroppedFile(path) => {
                        window_manager.drop_file(window_target, window_id, path.clone())
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        let command = window_manager
                            .window_by_os_id_mut(window_id)
                            .and_then(|window| window.shortcut(input))
                            .and_then(|shortcut| registry.command_for(shortcut).cloned());
                        if let Some(command) = command {
                            debug!("Shortcut command: {:?}", command);
                            if !window_manager.execute(window_target, &registry, command) {
                                *control_flow = ControlFlow::Exit;
                            }
                        }
                    }
                    _ => {}
                }

                // handle user input
                if let Some(window) = window_manager.window_by_os_id_mut(window_id) {
                    window.process_window_event(event)
                };
            }
            Event::UserEvent(command) => {
                debug!("Command: {:?}", command);
                if !window_manager.execute(window_target, &registry, command) {
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::RedrawRequested(window_id) => {
                if let Some(window) = window_manager.window_by_os_id_mut(window_id) {
                    let time_start = Instant::now();
                    if let Err(e) = window.draw() {
                        error!("Drawing failed: {}", e);
                    }
                    let time = Instant::now().duration_since(time_start);
                    trace!("Window draw: {:?} - {} ms", window_id, time.as_millis());
                }
            }
            Event::MainEventsCleared => {
                // closing the last viewer ends the application
                if window_manager.is_finished() {
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::LoopDestroyed => {
                debug!("Event loop destroyed. This terminates the application.");
                if let Some(on_exit) = on_exit.take() {
                    on_exit(window_manager.session_state());
                }
            }
            _ => {}
        }
    })
}
