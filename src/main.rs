// What you SEE:
// • Live (mirrored) camera fills the window.
// • Hold Left Mouse: ripples spread from the cursor and bend the video like water.
// • T cycles the built-in themes, R reloads the theme file (if one was given),
//   C flattens the water. ESC quits.
//
// Usage: liquid-mirror [theme.json]
//        LIQUID_MIRROR_CAMERA=<index> picks the camera (default 0).

mod camera;
mod draw;

use anyhow::Context;
use camera::CameraCapture;
use draw::Drawer;
use liquid_mirror::{FrameOutcome, FrameScheduler, ThemeConfig};
use log::{info, warn};
use minifb::Key;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    /* --- Theme ---
       Visual: decides the water's tint, glint colour, and how long ripples live. */
    let theme_path = std::env::args().nth(1).map(PathBuf::from);
    let presets = ThemeConfig::presets();
    let mut preset_idx = 0;
    let theme = match &theme_path {
        Some(path) => ThemeConfig::load(path).with_context(|| format!("loading theme {}", path.display()))?,
        None => presets[preset_idx].clone(),
    };

    /* --- Camera + window setup ---
       Visual: window opens at the camera's size; until frames arrive it shows the fallback fill. */
    let camera_index = match std::env::var("LIQUID_MIRROR_CAMERA") {
        Ok(v) => v.parse::<u32>().with_context(|| format!("LIQUID_MIRROR_CAMERA={v:?} is not a camera index"))?,
        Err(_) => 0,
    };
    let mut cam = CameraCapture::new(camera_index, 640, 480).context("opening camera")?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Liquid Mirror", w as usize, h as usize).context("opening window")?;

    let mut window_size = drawer.size();
    let mut scheduler = FrameScheduler::new(window_size.0, window_size.1, theme);
    info!("Starting with theme {}", scheduler.theme().label);

    /* --- FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Resize events land before the frame, so the tick never sees stale sizes. */
        let size = drawer.size();
        if size != window_size {
            window_size = size;
            scheduler.on_resize(size.0, size.1);
        }

        /* 2) Keys */
        if drawer.pressed_once(Key::T) {
            preset_idx = (preset_idx + 1) % presets.len();
            scheduler.set_theme(presets[preset_idx].clone());
        }
        if drawer.pressed_once(Key::R) {
            match &theme_path {
                Some(path) => match ThemeConfig::load(path) {
                    Ok(theme) => scheduler.set_theme(theme),
                    Err(e) => warn!("Keeping current theme: {e}"),
                },
                None => info!("No theme file given; R has nothing to reload"),
            }
        }
        if drawer.pressed_once(Key::C) {
            scheduler.clear();
        }

        /* 3) Pointer -> scheduler, overlay -> drawer */
        let pointer = drawer.pointer();
        scheduler.on_pointer(pointer);
        let hud = format!("{} | {}", scheduler.theme().label, hud_fps_text);
        drawer.set_overlay(Some((pointer.x, pointer.y)), hud);

        /* 4) One frame: inject, propagate, render, present, swap. */
        match scheduler.tick(&mut cam, &mut drawer)? {
            FrameOutcome::Presented => {}
            FrameOutcome::Skipped(_) => drawer.pump(),
        }

        /* 5) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            info!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("Window closed after {} frames", scheduler.frames());
    Ok(())
}
