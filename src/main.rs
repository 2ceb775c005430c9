mod display;
mod mqtt;

use display::{Display, DisplayOptions, InputEvent, RenderTarget};
use linecast::scene::{draw_all, Scene};
use linecast::util::{FpsCounter, Rng};
use linecast::{PixelBuffer, SegmentSpec};
use mqtt::SegmentFeed;
use sdl2::keyboard::Keycode;
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_SCENE_PATH: &str = "scene.json";
const RANDOM_SEGMENTS: usize = 64;

/// Settings gathered from the command line
struct Config {
    display: DisplayOptions,
    scene_path: String,
    mqtt_host: Option<String>,
    mqtt_topic: String,
}

/// Parse command line arguments
fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config {
        display: DisplayOptions::default(),
        scene_path: DEFAULT_SCENE_PATH.to_string(),
        mqtt_host: None,
        mqtt_topic: mqtt::DEFAULT_TOPIC.to_string(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => config.display.vsync = false,
            "--y-up" => config.display.y_up = true,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        config.display.width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        config.display.height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // WxH, e.g. 1000x1000
                    if let Some((w, h)) = args[i + 1].split_once('x') {
                        if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                            config.display.width = w;
                            config.display.height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--scene" | "-s" => {
                if i + 1 < args.len() {
                    config.scene_path = args[i + 1].clone();
                    i += 1;
                }
            },
            "--mqtt" => {
                if i + 1 < args.len() {
                    config.mqtt_host = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--topic" => {
                if i + 1 < args.len() {
                    config.mqtt_topic = args[i + 1].clone();
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: linecast [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W           Set window width (default: {})",
                    display::DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H          Set window height (default: {})",
                    display::DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1000x1000)");
                println!(
                    "  --scene PATH, -s PATH     Scene file (default: {}, demo scene if missing)",
                    DEFAULT_SCENE_PATH
                );
                println!("  --y-up                    Put row 0 at the bottom of the window");
                println!("  --no-vsync                Disable VSync");
                println!("  --mqtt HOST               Draw live segment lists from an MQTT broker");
                println!(
                    "  --topic TOPIC             MQTT topic (default: {})",
                    mqtt::DEFAULT_TOPIC
                );
                println!("  --help                    Show this help message");
                println!();
                println!("Keys: Esc quit, S save scene, L reload scene, Space random segments,");
                println!("      N reseed random segments, F log FPS");
                std::process::exit(0);
            },
            other => log::warn!("ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    config
}

fn load_scene(path: &str) -> Scene {
    match Scene::load(path) {
        Ok(scene) => {
            log::info!("loaded scene '{}' ({} segments) from {}", scene.name, scene.segments.len(), path);
            scene
        },
        Err(e) => {
            log::info!("no scene at {} ({}), using the demo scene", path, e);
            Scene::demo()
        },
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_args();
    let (width, height) = (config.display.width, config.display.height);

    let (mut display, texture_creator) = Display::with_options("linecast", &config.display)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut buffer = PixelBuffer::with_size(width, height);

    let mut scene = load_scene(&config.scene_path);

    let feed = match &config.mqtt_host {
        Some(host) => match SegmentFeed::connect(host, &config.mqtt_topic) {
            Ok(feed) => Some(feed),
            Err(e) => {
                log::error!("{}", e);
                None
            },
        },
        None => None,
    };
    let mut live: Vec<SegmentSpec> = Vec::new();

    let mut rng = Rng::new(time_seed());
    let mut random: Option<Scene> = None;

    let mut fps_counter = FpsCounter::new(60);
    let mut log_fps = false;
    let mut since_fps_log = 0.0;

    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::S) => match scene.save(&config.scene_path) {
                    Ok(()) => log::info!("scene saved to {}", config.scene_path),
                    Err(e) => log::error!("failed to save scene: {}", e),
                },
                InputEvent::KeyDown(Keycode::L) => scene = load_scene(&config.scene_path),
                InputEvent::KeyDown(Keycode::Space) => {
                    random = match random {
                        Some(_) => None,
                        None => Some(Scene::random(
                            &mut rng,
                            RANDOM_SEGMENTS,
                            display.width(),
                            display.height(),
                        )),
                    };
                },
                InputEvent::KeyDown(Keycode::N) => {
                    if random.is_some() {
                        random = Some(Scene::random(
                            &mut rng,
                            RANDOM_SEGMENTS,
                            display.width(),
                            display.height(),
                        ));
                    }
                },
                InputEvent::KeyDown(Keycode::F) => log_fps = !log_fps,
                InputEvent::KeyDown(_) => {},
            }
        }

        if let Some(segments) = feed.as_ref().and_then(SegmentFeed::poll) {
            live = segments;
        }

        buffer.clear(scene.clear_color);
        {
            let mut surface = buffer.surface().map_err(|e| e.to_string())?;
            scene.draw(&mut surface);
            draw_all(&live, &mut surface);
            if let Some(random) = &random {
                random.draw(&mut surface);
            }
        }

        if log_fps {
            since_fps_log += dt;
            if since_fps_log >= 1.0 {
                since_fps_log = 0.0;
                log::info!("{:.0} fps ({:.2} ms)", avg_fps, fps_counter.avg_frame_time_ms());
            }
        }

        display.present(&mut target, &buffer)?;
    }

    Ok(())
}
