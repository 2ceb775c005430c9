//! SDL2 window that presents a `PixelBuffer` once per frame

use linecast::PixelBuffer;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 1000;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
    y_up: bool,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

/// Window settings taken from the command line
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Present row 0 at the bottom of the window
    pub y_up: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
            y_up: false,
        }
    }
}

impl Display {
    pub fn with_options(
        title: &str,
        options: &DisplayOptions,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, options.width, options.height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if options.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        log::info!(
            "window {}x{} (vsync {}, y-up {})",
            options.width,
            options.height,
            if options.vsync { "on" } else { "off" },
            options.y_up
        );

        Ok((
            Self {
                canvas,
                event_pump,
                width: options.width,
                height: options.height,
                y_up: options.y_up,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn present(
        &mut self,
        target: &mut RenderTarget,
        buffer: &PixelBuffer,
    ) -> Result<(), String> {
        let pitch = (buffer.width() * 4) as usize;
        if self.y_up {
            let flipped = buffer.flipped_vertical();
            target
                .texture
                .update(None, flipped.as_bytes(), pitch)
                .map_err(|e| e.to_string())?;
        } else {
            target
                .texture
                .update(None, buffer.as_bytes(), pitch)
                .map_err(|e| e.to_string())?;
        }

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Streaming texture matching the pixel buffer's packed RGBA8888 layout
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self { texture })
    }
}
