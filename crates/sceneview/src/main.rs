//! Headless scene viewer
//!
//! Loads a scene description file, or generates one from a prompt through
//! an external translator program, then runs the layout pipeline and ticks
//! animation and physics for a fixed number of steps before reporting the
//! final poses. Rendering goes to the recording backend, so this doubles as
//! a smoke test for generated scene payloads.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use scene_engine::assets::ModelResolver;
use scene_engine::foundation::time::Timer;
use scene_engine::generate::CommandTranslator;
use scene_engine::prelude::*;

enum Source {
    File(PathBuf),
    Prompt { translator: String, prompt: String },
}

struct Args {
    source: Source,
    config: Option<String>,
    ticks: u32,
}

const USAGE: &str = "usage: sceneview <scene.json> [--config <file.toml|file.ron>] [--ticks <n>]\n\
       sceneview --translator <program> --prompt <text> [--config ...] [--ticks <n>]";

fn parse_args() -> Result<Args, String> {
    let mut scene = None;
    let mut translator = None;
    let mut prompt = None;
    let mut config = None;
    let mut ticks = 600u32;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(args.next().ok_or("--config needs a file argument")?);
            }
            "--ticks" => {
                let value = args.next().ok_or("--ticks needs a number argument")?;
                ticks = value
                    .parse()
                    .map_err(|_| format!("invalid tick count {value:?}"))?;
            }
            "--translator" => {
                translator = Some(args.next().ok_or("--translator needs a program argument")?);
            }
            "--prompt" => {
                prompt = Some(args.next().ok_or("--prompt needs a text argument")?);
            }
            "--help" | "-h" => return Err(USAGE.to_string()),
            _ if scene.is_none() => scene = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument {arg:?}")),
        }
    }

    let source = match (scene, translator, prompt) {
        (Some(path), None, None) => Source::File(path),
        (None, Some(translator), Some(prompt)) => Source::Prompt { translator, prompt },
        (None, _, Some(_)) => return Err("--prompt needs --translator".to_string()),
        (None, Some(_), None) => return Err("--translator needs --prompt".to_string()),
        (Some(_), _, _) => {
            return Err("pass either a scene file or --translator/--prompt, not both".to_string())
        }
        (None, None, None) => return Err(USAGE.to_string()),
    };

    Ok(Args {
        source,
        config,
        ticks,
    })
}

fn resolver_for(config: &ViewerConfig) -> Box<dyn ModelResolver> {
    if config.models_dir.is_dir() {
        log::info!("using model library at {:?}", config.models_dir);
        Box::new(ModelLibrary::new(config.models_dir.clone()))
    } else {
        log::info!(
            "models directory {:?} not found, using built-in primitives",
            config.models_dir
        );
        Box::new(StaticResolver::primitives())
    }
}

fn load_payload(source: &Source, config: &ViewerConfig) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match source {
        Source::File(path) => Ok(std::fs::read(path)?),
        Source::Prompt { translator, prompt } => {
            let mut generator = SceneGenerator::new();
            generator.request(CommandTranslator::new(translator), prompt)?;
            let timeout = Duration::from_secs(config.generate_timeout_secs);
            let payload = generator.wait_timeout(timeout)?;
            Ok(payload.into_bytes())
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => ViewerConfig::load_from_file(path)?,
        None => ViewerConfig::default(),
    };

    let payload = load_payload(&args.source, &config)?;
    let builder =
        SceneBuilder::new(resolver_for(&config)).with_floor(Floor::new(config.floor_level));

    let mut backend = HeadlessBackend::new();
    let mut scene = builder.build(&payload, &mut backend)?;
    log::info!(
        "scene built: {} objects, {} orbital couples",
        scene.registry.len(),
        scene.animations.orbital_count()
    );

    let physics = PhysicsWorld::new();
    let clock = TickClock::new();
    let dt = clock.step_seconds();
    let mut timer = Timer::new();
    for _ in 0..args.ticks {
        if config.animation_enabled {
            scene
                .animations
                .update(&mut scene.registry, &mut backend, dt);
        }
        if config.physics_enabled {
            physics.step(&mut scene.registry, &mut backend, dt);
        }
        timer.update();
    }
    log::info!(
        "ran {} ticks in {:.3}s wall time",
        timer.frame_count(),
        timer.total_time()
    );

    println!(
        "after {} ticks ({:.1}s simulated):",
        args.ticks,
        f64::from(args.ticks) * f64::from(dt)
    );
    for object in scene.registry.objects() {
        println!(
            "  {:<12} {:<8} at ({:+.2}, {:+.2}, {:+.2}) scale {:.2}",
            object.id,
            object.kind,
            object.position.x,
            object.position.y,
            object.position.z,
            object.transform.scale
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
