use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use tracing::info;

use fireball::config::RenderConfig;
use fireball::rt::Scene;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::from_path(Path::new(&path))?,
        None => RenderConfig::default(),
    };

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let scene = Scene::new(&config);
    info!(
        width = config.width,
        height = config.height,
        nframes = config.nframes,
        fps = config.fps,
        "rendering"
    );

    for frame in 0..config.nframes {
        let t = config.frame_time(frame);

        let chrono = Instant::now();
        let raw_image = scene.render(t);
        let elapsed = chrono.elapsed();

        let path = config.output_dir.join(format!("frame_{:04}.png", frame));
        raw_image
            .convert_to_image(&config.tone_mapping)
            .save(&path)
            .with_context(|| format!("saving {}", path.display()))?;

        info!(frame, t, ?elapsed, "wrote {}", path.display());
    }

    Ok(())
}
