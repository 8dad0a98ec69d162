//! CLI entry point. Opens (or creates) `./saves/<world-name>/`, wires the
//! window/GL context/UI overlay that the rendering and UI collaborators
//! plug into, and drives the per-frame sequence via `app::Application`.

use std::ffi::CString;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopBuilder};
use winit::window::{Window, WindowBuilder};

use voxel_engine_core::app::{Application, PlayState};
use voxel_engine_core::config::Config;
use voxel_engine_core::events::EventBus;
use voxel_engine_core::state::GameContext;
use voxel_engine_core::world::Level;

fn world_dir_from_args() -> PathBuf {
    let mut args = std::env::args().skip(1);
    let mut name = "world".to_string();
    while let Some(arg) = args.next() {
        if arg == "--world" {
            if let Some(value) = args.next() {
                name = value;
            }
        }
    }
    PathBuf::from("saves").join(name)
}

struct Window3d {
    window: Window,
    gl_display: glutin::display::Display,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
}

fn create_window(event_loop: &EventLoop<()>) -> Result<Window3d> {
    let window_builder = WindowBuilder::new().with_title("voxel-engine-core").with_inner_size(LogicalSize::new(1280, 720));

    let template = ConfigTemplateBuilder::new().with_alpha_size(8).with_depth_size(24).with_stencil_size(8);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

    let (window, gl_config) = display_builder
        .build(event_loop, template, |configs| {
            configs
                .reduce(|accum, config| if config.num_samples() > accum.num_samples() { config } else { accum })
                .expect("no suitable OpenGL configuration found")
        })
        .map_err(|e| anyhow::anyhow!("failed to build display: {e}"))?;

    let window = window.context("window creation did not yield a window")?;
    let raw_window_handle = window.raw_window_handle();

    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .with_profile(GlProfile::Core)
        .build(Some(raw_window_handle));

    let gl_display = gl_config.display();
    let gl_context =
        unsafe { gl_display.create_context(&gl_config, &context_attributes).context("failed to create GL context")? };

    let attrs = window.build_surface_attributes(<_>::default());
    let gl_surface =
        unsafe { gl_config.display().create_window_surface(&gl_config, &attrs).context("failed to create GL surface")? };

    let gl_context = gl_context.make_current(&gl_surface).context("failed to make GL context current")?;

    gl::load_with(|symbol| {
        let symbol = CString::new(symbol).unwrap_or_default();
        gl_display.get_proc_address(symbol.as_c_str()) as *const _
    });

    let _ = gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()));

    unsafe {
        gl::Enable(gl::DEPTH_TEST);
        gl::ClearColor(0.1, 0.1, 0.15, 1.0);
    }

    Ok(Window3d { window, gl_display, gl_context, gl_surface })
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init().context("failed to initialize logger")?;

    info!("starting up");

    let world_dir = world_dir_from_args();
    std::fs::create_dir_all(&world_dir).ok();

    let config = Config::load(std::path::Path::new("config.toml"));

    let event_loop: EventLoop<()> = EventLoopBuilder::new().build().context("failed to create event loop")?;
    let win3d = create_window(&event_loop)?;

    let egui_ctx = egui::Context::default();
    let mut egui_winit_state =
        egui_winit::State::new(egui_ctx.clone(), egui::ViewportId::from_hash_of(win3d.window.id()), &event_loop, None, None);

    let glow_context = Arc::new(unsafe {
        egui_glow::glow::Context::from_loader_function(|symbol| {
            let c_str = CString::new(symbol).unwrap_or_default();
            win3d.gl_display.get_proc_address(c_str.as_c_str()) as *const _
        })
    });
    let mut painter =
        egui_glow::Painter::new(glow_context, "", None).map_err(|e| anyhow::anyhow!("failed to init painter: {e}"))?;

    let level = Level::open(world_dir, &config.engine, &config.world_gen, &config.chunk_sys);
    let tick_rate = config.engine.tick_rate;
    let max_frame_dt = std::time::Duration::from_secs_f32(config.engine.max_frame_dt);
    let ctx = GameContext { registry: voxel_engine_core::ecs::Registry::new(), level, config, events: EventBus::new() };

    let mut app = Application::new(ctx, tick_rate, max_frame_dt);
    app.states.push(Box::new(PlayState::new()));
    app.states.process_pending_changes(&mut app.ctx);

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, window_id } if window_id == win3d.window.id() => {
                let response = egui_winit_state.on_window_event(&win3d.window, &event);
                if response.consumed {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => {
                        info!("close requested, unwinding state stack");
                        app.states.clear();
                        app.states.process_pending_changes(&mut app.ctx);
                        app.ctx.level.save();
                        painter.destroy();
                        elwt.exit();
                    }
                    WindowEvent::Resized(size) => {
                        if size.width > 0 && size.height > 0 {
                            unsafe { gl::Viewport(0, 0, size.width as i32, size.height as i32) };
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let raw_input = egui_winit_state.take_egui_input(&win3d.window);
                        let full_output = egui_ctx.run(raw_input, |ctx| {
                            app.run_frame(ctx);
                        });

                        egui_winit_state.handle_platform_output(&win3d.window, full_output.platform_output);
                        let clipped_primitives = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

                        unsafe {
                            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
                        }
                        let size = win3d.window.inner_size();
                        painter.paint_and_update_textures(
                            [size.width, size.height],
                            full_output.pixels_per_point,
                            &clipped_primitives,
                            &full_output.textures_delta,
                        );

                        if let Err(e) = win3d.gl_surface.swap_buffers(&win3d.gl_context) {
                            error!("failed to swap buffers: {e}");
                        }

                        if app.is_finished() {
                            app.ctx.level.save();
                            elwt.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                win3d.window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("event loop exited with error: {e}"))?;

    Ok(())
}
