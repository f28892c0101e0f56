use std::any::Any;
use std::env;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use pollster::block_on;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{CursorGrabMode, WindowBuilder};

use terra::starfield::FIELD_RANGE;
use terra::{
    sphere, FrameState, InputState, KeyCode, Renderer, SphereMesh, Starfield, TextureImage,
};

const WINDOW_WIDTH: f64 = 800.0;
const WINDOW_HEIGHT: f64 = 800.0;

const EARTH_RADIUS: f32 = 1.0;
const EARTH_SLICES: u32 = 72;
const EARTH_STACKS: u32 = 36;

const STAR_RADIUS: f32 = 0.01;
const STAR_SLICES: u32 = 36;
const STAR_STACKS: u32 = 18;

const DEFAULT_STAR_COUNT: usize = 1000;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;

    let earth_mesh = sphere(EARTH_RADIUS, EARTH_SLICES, EARTH_STACKS)?;
    let star_mesh = sphere(STAR_RADIUS, STAR_SLICES, STAR_STACKS)?;
    let starfield = match options.seed {
        Some(seed) => {
            Starfield::generate(options.stars, FIELD_RANGE, &mut StdRng::seed_from_u64(seed))
        }
        None => Starfield::generate(options.stars, FIELD_RANGE, &mut rand::thread_rng()),
    };

    println!(
        "Earth mesh: {} vertices, {} indices",
        earth_mesh.vertex_count(),
        earth_mesh.index_count()
    );
    println!(
        "Star mesh: {} vertices, {} indices",
        star_mesh.vertex_count(),
        star_mesh.index_count()
    );
    println!(
        "Star field: {} stars within +/-{} units",
        starfield.len(),
        FIELD_RANGE
    );

    if options.summary_only {
        return Ok(());
    }

    match run_interactive(&options, earth_mesh, star_mesh, starfield) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Nothing to render without a window (set DISPLAY or pass --summary-only)."
            );
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn run_interactive(
    options: &CliOptions,
    earth_mesh: SphereMesh,
    star_mesh: SphereMesh,
    starfield: Starfield,
) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop =
        event_loop.map_err(|panic| WindowInitError::from_panic("event loop", panic))?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Earth & Stars")
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    // Not every backend supports both grab modes; when neither works the
    // cursor stays visible and mouse aim still functions.
    if window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        .is_ok()
    {
        window.set_cursor_visible(false);
    }

    let earth_textures = [
        load_texture_slot(&options.earth_texture),
        load_texture_slot(&options.alternate_texture),
    ];

    let renderer = block_on(Renderer::new(
        Arc::clone(&window),
        &earth_mesh,
        &star_mesh,
        starfield.len(),
        earth_textures,
    ))?;
    info!("renderer ready, entering frame loop");

    let mut app = AppState {
        renderer,
        input: Arc::new(InputState::new()),
        frame: FrameState::new(),
        starfield,
        last_frame: Instant::now(),
        last_error: None,
    };

    let mut event_loop = event_loop;
    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        if let Err(err) = app.process_event(&event, control_flow) {
            app.last_error = Some(err);
            control_flow.set_exit();
        }
    });

    app.shutdown();

    if let Some(err) = app.last_error {
        return Err(err);
    }

    Ok(())
}

fn load_texture_slot(path: &str) -> Option<TextureImage> {
    match TextureImage::from_file(path) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("{err}; rendering the Earth with a solid color instead");
            None
        }
    }
}

struct AppState {
    renderer: Renderer,
    input: Arc<InputState>,
    frame: FrameState,
    starfield: Starfield,
    last_frame: Instant,
    last_error: Option<anyhow::Error>,
}

impl AppState {
    fn process_event(&mut self, event: &Event<()>, control_flow: &mut ControlFlow) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        control_flow.set_exit();
                    }
                    WindowEvent::Resized(size) => {
                        self.renderer.resize(*size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        self.renderer.resize(**new_inner_size);
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        self.handle_keyboard(input, control_flow);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        self.input.set_mouse_position(glam::Vec2::new(
                            position.x as f32,
                            position.y as f32,
                        ));
                    }
                    _ => {}
                }
            }
            Event::RedrawRequested(window_id) if *window_id == self.renderer.window_id() => {
                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f32();
                self.last_frame = now;

                self.frame.update(&self.input, dt);
                let matrices = self.frame.matrices(self.renderer_aspect(), &self.starfield);
                if let Err(err) = self.renderer.render(&matrices) {
                    match err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            let size = self.renderer.window().inner_size();
                            self.renderer.resize(size);
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            return Err(anyhow!("GPU is out of memory"));
                        }
                        wgpu::SurfaceError::Timeout => {
                            info!("Surface timeout; retrying next frame");
                        }
                    }
                }
            }
            Event::MainEventsCleared => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    fn renderer_aspect(&self) -> f32 {
        let size = self.renderer.window().inner_size();
        if size.height == 0 {
            1.0
        } else {
            size.width as f32 / size.height as f32
        }
    }

    fn handle_keyboard(&self, input: &KeyboardInput, control_flow: &mut ControlFlow) {
        let Some(keycode) = input.virtual_keycode.and_then(map_keycode) else {
            return;
        };
        if keycode == KeyCode::Escape && input.state == ElementState::Pressed {
            control_flow.set_exit();
            return;
        }
        match input.state {
            ElementState::Pressed => self.input.set_key_down(keycode),
            ElementState::Released => self.input.set_key_up(keycode),
        }
    }

    fn shutdown(&self) {
        let camera = &self.frame.camera;
        println!(
            "Final camera position: ({:.2}, {:.2}, {:.2}), earth angle {:.3} rad",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            self.frame.earth_angle()
        );
    }
}

fn map_keycode(code: VirtualKeyCode) -> Option<KeyCode> {
    use VirtualKeyCode as Key;
    Some(match code {
        Key::W => KeyCode::Character('W'),
        Key::A => KeyCode::Character('A'),
        Key::S => KeyCode::Character('S'),
        Key::D => KeyCode::Character('D'),
        Key::Z => KeyCode::Character('Z'),
        Key::X => KeyCode::Character('X'),
        Key::L => KeyCode::Character('L'),
        Key::Escape => KeyCode::Escape,
        _ => return None,
    })
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

const USAGE: &str = "Usage: terra [--earth-texture PATH] [--alternate-texture PATH] \
[--stars N] [--seed N] [--summary-only]";

struct CliOptions {
    earth_texture: String,
    alternate_texture: String,
    stars: usize,
    seed: Option<u64>,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut options = Self {
            earth_texture: "assets/earth.jpg".to_string(),
            alternate_texture: "assets/earth2.jpg".to_string(),
            stars: DEFAULT_STAR_COUNT,
            seed: None,
            summary_only: false,
        };
        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--earth-texture" => options.earth_texture = expect_value(&mut args, &arg)?,
                "--alternate-texture" => options.alternate_texture = expect_value(&mut args, &arg)?,
                "--stars" => {
                    options.stars = expect_value(&mut args, &arg)?
                        .parse()
                        .context("--stars expects a non-negative number")?;
                }
                "--seed" => {
                    options.seed = Some(
                        expect_value(&mut args, &arg)?
                            .parse()
                            .context("--seed expects a number")?,
                    );
                }
                "--summary-only" => options.summary_only = true,
                other => {
                    return Err(anyhow!("Unknown argument: {other}. {USAGE}"));
                }
            }
        }
        Ok(options)
    }
}

fn expect_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{flag} expects a value. {USAGE}"))
}
