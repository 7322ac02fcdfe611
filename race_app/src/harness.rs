//! Headless race harness
//!
//! Wires the play session to the recording graphics device, the scripted
//! input source and the quiet audio sink so a full race runs without a
//! window. The binary and the integration tests both drive races through
//! this module; windowed platform glue is a separate concern entirely.

use crate::play::{PlayError, PlayState, TurnStatus};
use orbit_engine::foundation::time::Timer;
use orbit_engine::prelude::*;
use orbit_engine::render::backend::DeviceResult;
use orbit_engine::render::mesh::{self, MultiMesh, Vertex};

/// Simulation step used by headless runs
pub const FRAME_STEP: f32 = 1.0 / 30.0;

/// Frames the player climbs at the start to reach artifact height
const CLIMB_FRAMES: u32 = 20;

/// Scene configuration for the demo race
///
/// Auto-forward with all three axes restricted, a sky, and the two
/// postprocess effects the speed pickup toggles between.
pub fn demo_scene() -> SceneConfig {
    let text = r#"(
        assets: (
            shaders: {
                "textured": (
                    vertex: "assets/shaders/textured.vert",
                    fragment: "assets/shaders/textured.frag",
                ),
            },
            textures: {
                "moon": "assets/textures/moon.png",
                "planet_1": "assets/textures/planet-1.png",
                "planet_2": "assets/textures/planet-2.png",
                "star": "assets/textures/star.png",
                "green": "assets/textures/green-metal.png",
                "metal": "assets/textures/metal.png",
                "portal": "assets/textures/portal.png",
                "asphalt": "assets/textures/asphalt.png",
            },
            materials: {
                "moon": (kind: textured, shader: "textured", texture: Some("moon")),
                "planet_1": (kind: textured, shader: "textured", texture: Some("planet_1")),
                "planet_2": (kind: textured, shader: "textured", texture: Some("planet_2")),
                "star": (kind: textured, shader: "textured", texture: Some("star")),
                "green_metal": (kind: textured, shader: "textured", texture: Some("green")),
                "metal": (kind: textured, shader: "textured", texture: Some("metal")),
                "portal": (
                    kind: textured,
                    shader: "textured",
                    texture: Some("portal"),
                    transparent: true,
                    blending: true,
                ),
                "track_surface": (kind: textured, shader: "textured", texture: Some("asphalt")),
            },
        ),
        world: [
            (
                name: "player-camera",
                components: [
                    camera(()),
                    free_camera_controller(()),
                ],
            ),
            (
                name: "aircraft",
                kind: MAIN_AIRCRAFT,
                components: [
                    mesh_renderer((mesh: "aircraft", material: "metal")),
                ],
            ),
            (
                name: "track",
                kind: TRACK,
                components: [
                    multi_mesh_renderer((meshes: "track", materials: ["track_surface"])),
                ],
            ),
        ],
        game: (
            movement_restriction: (
                restrict_x: true,
                restrict_y: true,
                restrict_z: true,
                auto_move_forward: true,
            ),
        ),
        renderer: (
            sky: Some("assets/textures/space.png"),
            postprocess: {
                "default": "assets/shaders/vignette.frag",
                "speedup": "assets/shaders/speed-lines.frag",
            },
        ),
        track_length: Some(25.0),
    )"#;

    SceneConfig::from_ron_str(text).expect("demo scene text is well-formed")
}

fn quad(half_width: f32, half_height: f32) -> (Vec<Vertex>, Vec<u32>) {
    let normal = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex::new([-half_width, -half_height, 0.0], normal, [0.0, 0.0]),
        Vertex::new([half_width, -half_height, 0.0], normal, [1.0, 0.0]),
        Vertex::new([half_width, half_height, 0.0], normal, [1.0, 1.0]),
        Vertex::new([-half_width, half_height, 0.0], normal, [0.0, 1.0]),
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

/// A flat strip on the XZ plane: the track's drivable surface
///
/// Spans the full track width and one unit of depth; the track entity's Z
/// scale stretches it to the configured length.
fn track_strip(half_width: f32) -> (Vec<Vertex>, Vec<u32>) {
    let normal = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex::new([-half_width, 0.0, 1.0], normal, [0.0, 0.0]),
        Vertex::new([half_width, 0.0, 1.0], normal, [1.0, 0.0]),
        Vertex::new([half_width, 0.0, 0.0], normal, [1.0, 1.0]),
        Vertex::new([-half_width, 0.0, 0.0], normal, [0.0, 1.0]),
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

/// Register the procedural meshes the demo scene references
pub fn register_demo_meshes(
    cache: &mut AssetCache,
    device: &mut dyn GraphicsDevice,
) -> DeviceResult<()> {
    let (vertices, indices) = mesh::sphere((16, 16));
    cache.insert("sphere", Mesh::create(device, &vertices, &indices)?);

    let (vertices, indices) = mesh::sphere((8, 8));
    cache.insert("collectable", Mesh::create(device, &vertices, &indices)?);

    let (vertices, indices) = quad(1.0, 1.0);
    cache.insert("plane", Mesh::create(device, &vertices, &indices)?);

    // A crude dart shape is plenty for an object the camera hides behind.
    let aircraft_vertices = vec![
        Vertex::new([0.0, 0.0, -1.5], [0.0, 1.0, 0.0], [0.5, 1.0]),
        Vertex::new([-1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
        Vertex::new([1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
        Vertex::new([0.0, 0.5, 1.0], [0.0, 0.0, 1.0], [0.5, 0.5]),
    ];
    let aircraft_indices = vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2];
    cache.insert(
        "aircraft",
        Mesh::create(device, &aircraft_vertices, &aircraft_indices)?,
    );

    let (vertices, indices) = track_strip(10.0);
    let surface = Mesh::create(device, &vertices, &indices)?;
    cache.insert("track", MultiMesh { meshes: vec![surface] });

    Ok(())
}

/// Outcome of a headless race
#[derive(Debug)]
pub struct RaceReport {
    /// Final turn status
    pub status: TurnStatus,
    /// Frames simulated
    pub frames: u32,
    /// Artifacts collected out of the total
    pub collected: usize,
    /// Total artifacts the race started with
    pub total: usize,
}

/// Run a full race headlessly and report how it went
///
/// The player climbs to artifact height for the first few frames, then
/// auto-forward carries them down the track until the finish line or the
/// frame budget runs out.
pub fn run_race(seed: u64, max_frames: u32) -> Result<RaceReport, PlayError> {
    let mut device = HeadlessDevice::new();
    let mut input = ScriptedInput::new();
    let mut audio = NullAudio;

    let mut cache = AssetCache::new();
    if let Err(error) = register_demo_meshes(&mut cache, &mut device) {
        log::error!("demo mesh registration failed: {}", error);
    }

    let scene = demo_scene();
    let mut state = PlayState::initialize(cache, &scene, seed, (1280, 720), &mut device)?;

    let mut status = TurnStatus::Running;
    let mut frames = 0;
    let mut timer = Timer::new();
    input.press_key(KeyCode::Q);
    while frames < max_frames {
        if frames == CLIMB_FRAMES {
            input.release_key(KeyCode::Q);
        }
        status = state.tick(FRAME_STEP, &mut input, &mut audio, &mut device);
        input.next_frame();
        // Keep the recording device from accumulating the whole race.
        device.take_calls();
        timer.update();
        frames += 1;
        if matches!(status, TurnStatus::Finished { .. }) {
            break;
        }
    }
    log::info!(
        "{} frames in {:.3}s wall clock",
        timer.frame_count(),
        timer.total_time()
    );

    let hud = state.hud();
    state.destroy(&mut input, &mut device);
    Ok(RaceReport {
        status,
        frames,
        collected: hud.collected,
        total: hud.total,
    })
}
