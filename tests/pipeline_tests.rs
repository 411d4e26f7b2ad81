// End-to-end properties of the ripple pipeline, driven through the public API
// with an in-memory camera and an in-memory screen.

use image::{Rgba, RgbaImage};
use liquid_mirror::constants::{FALLBACK_RGB, INJECT_STRENGTH};
use liquid_mirror::inject::inject;
use liquid_mirror::refract::render;
use liquid_mirror::theme::parse_hex_color;
use liquid_mirror::wave::WaveField;
use liquid_mirror::{
    Dimensions, Error, FrameOutcome, FrameScheduler, FrameSink, InteractionPoint, Rgb, SkipReason,
    ThemeConfig, VideoSource,
};

/// Camera stand-in: always the same frame, or never ready.
struct FakeCamera(Option<RgbaImage>);

impl VideoSource for FakeCamera {
    fn poll_frame(&mut self) -> Option<&RgbaImage> {
        self.0.as_ref()
    }
}

/// Screen stand-in: keeps the last presented frame.
#[derive(Default)]
struct FakeScreen {
    last: Option<RgbaImage>,
    presents: usize,
}

impl FrameSink for FakeScreen {
    fn present(&mut self, frame: &RgbaImage) -> Result<(), Error> {
        self.last = Some(frame.clone());
        self.presents += 1;
        Ok(())
    }
}

fn dims(w: usize, h: usize) -> Dimensions {
    Dimensions::new(w, h).unwrap()
}

fn interior_max_abs(grid: &[i32], d: Dimensions) -> i32 {
    let mut m = 0;
    for y in 1..d.height - 1 {
        for x in 1..d.width - 1 {
            m = m.max(grid[y * d.width + x].abs());
        }
    }
    m
}

fn patterned_frame(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| Rgba([(x * 7 + y) as u8, (y * 5) as u8, (x ^ y) as u8, 128]))
}

/// Small deterministic pseudo-random grid (xorshift).
fn noisy_grid(len: usize, seed: u32) -> Vec<i32> {
    let mut s = seed | 1;
    (0..len)
        .map(|_| {
            s ^= s << 13;
            s ^= s >> 17;
            s ^= s << 5;
            (s % 401) as i32 - 200
        })
        .collect()
}

#[test]
fn ripples_die_out_without_new_splashes() {
    let d = dims(32, 32);
    let mut field = WaveField::new(d);
    inject(field.current_mut(), &InteractionPoint::active(0.5, 0.5), d);
    assert_eq!(interior_max_abs(field.current(), d), INJECT_STRENGTH);

    for _ in 0..500 {
        field.step(0.9).unwrap();
        field.swap();
    }
    assert!(interior_max_abs(field.current(), d) <= 1);
    assert!(interior_max_abs(field.previous(), d) <= 1);
}

#[test]
fn scheduler_settles_after_the_pointer_lifts() {
    let theme = ThemeConfig::from_parts(0.9, 8.0, "#1e90ff", "#ffffff", "Test");
    let mut s = FrameScheduler::new(64, 48, theme);
    let mut cam = FakeCamera(None);
    let mut screen = FakeScreen::default();

    s.on_pointer(InteractionPoint::active(0.5, 0.5));
    s.tick(&mut cam, &mut screen).unwrap();
    s.on_pointer(InteractionPoint::inactive());
    for _ in 0..500 {
        assert_eq!(s.tick(&mut cam, &mut screen).unwrap(), FrameOutcome::Presented);
    }
    let d = s.dims().unwrap();
    let field = s.field().unwrap();
    assert!(interior_max_abs(field.current(), d) <= 1);
    assert_eq!(screen.presents, 501);
    assert_eq!(s.frames(), 501);
}

#[test]
fn border_keeps_its_last_written_value() {
    let d = dims(12, 10);
    let mut field = WaveField::new(d);
    let is_border = |i: usize| {
        let (x, y) = (i % d.width, i / d.width);
        x == 0 || y == 0 || x == d.width - 1 || y == d.height - 1
    };
    // distinct border values in both grids
    for round in 0..2 {
        for (i, v) in field.current_mut().iter_mut().enumerate() {
            if is_border(i) {
                *v = (i as i32 + 1) * if round == 0 { 1 } else { -1 };
            }
        }
        field.swap();
    }
    let before: Vec<(i32, i32)> = field.current().iter().copied().zip(field.previous().iter().copied()).collect();

    inject(field.current_mut(), &InteractionPoint::active(0.5, 0.5), d);
    for _ in 0..137 {
        field.step(0.95).unwrap();
        field.swap();
    }

    // 137 swaps: the roles are flipped relative to `before`
    for i in (0..d.len()).filter(|&i| is_border(i)) {
        assert_eq!(field.previous()[i], before[i].0, "border cell {i}");
        assert_eq!(field.current()[i], before[i].1, "border cell {i}");
    }
}

#[test]
fn splash_sets_exactly_the_disc() {
    let d = dims(10, 10);
    let mut grid = vec![7; d.len()];
    inject(&mut grid, &InteractionPoint::active(0.5, 0.5), d);
    for y in 0..10i32 {
        for x in 0..10i32 {
            let d2 = (x - 5) * (x - 5) + (y - 5) * (y - 5);
            let expected = if d2 < 16 { INJECT_STRENGTH } else { 7 };
            assert_eq!(grid[(y * 10 + x) as usize], expected, "cell ({x},{y})");
        }
    }
}

#[test]
fn splash_is_visible_in_the_same_frame() {
    let mut s = FrameScheduler::new(20, 20, ThemeConfig::default());
    let mut screen = FakeScreen::default();
    s.on_pointer(InteractionPoint::active(0.5, 0.5));
    s.tick(&mut FakeCamera(None), &mut screen).unwrap();
    // slopes around the splash moved pixels away from the flat fallback
    let out = screen.last.unwrap();
    let [r, g, b] = FALLBACK_RGB;
    assert!(out.pixels().any(|p| p.0 != [r, g, b, 255]));
}

#[test]
fn render_is_deterministic() {
    let d = dims(40, 30);
    let grid = noisy_grid(d.len(), 0xBEEF);
    let tex = patterned_frame(40, 30);
    let theme = ThemeConfig::presets()[1].clone();
    let mut a = RgbaImage::new(40, 30);
    let mut b = RgbaImage::new(40, 30);
    render(&grid, &tex, &theme, d, &mut a).unwrap();
    render(&grid, &tex, &theme, d, &mut b).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn flat_water_shows_the_mirrored_camera() {
    // display 2x the field, so the camera frame is already at field size
    let frame = patterned_frame(16, 12);
    let mut cam = FakeCamera(Some(frame.clone()));
    let mut screen = FakeScreen::default();
    for shimmer in [1.0, 7.5, 20.0] {
        let theme = ThemeConfig::from_parts(0.97, shimmer, "#ff00ff", "#00ff00", "Flat");
        let mut s = FrameScheduler::new(32, 24, theme);
        assert_eq!(s.tick(&mut cam, &mut screen).unwrap(), FrameOutcome::Presented);

        let out = screen.last.as_ref().unwrap();
        for y in 0..12 {
            for x in 0..16 {
                let src = frame.get_pixel(15 - x, y).0;
                let px = out.get_pixel(x, y).0;
                assert_eq!(&px[..3], &src[..3], "pixel ({x},{y}) at shimmer {shimmer}");
                assert_eq!(px[3], 255);
            }
        }
    }
}

#[test]
fn camera_not_ready_renders_the_fallback_fill() {
    let mut s = FrameScheduler::new(20, 16, ThemeConfig::default());
    let mut screen = FakeScreen::default();
    assert_eq!(s.tick(&mut FakeCamera(None), &mut screen).unwrap(), FrameOutcome::Presented);
    let [r, g, b] = FALLBACK_RGB;
    assert!(screen.last.unwrap().pixels().all(|p| p.0 == [r, g, b, 255]));
}

#[test]
fn resize_discards_all_amplitude() {
    let mut s = FrameScheduler::new(40, 30, ThemeConfig::default());
    let mut screen = FakeScreen::default();
    s.on_pointer(InteractionPoint::active(0.4, 0.6));
    for _ in 0..5 {
        s.tick(&mut FakeCamera(None), &mut screen).unwrap();
    }
    assert!(s.field().unwrap().current().iter().any(|&v| v != 0));

    s.on_resize(24, 18);
    let d = s.dims().unwrap();
    assert_eq!(d, dims(12, 9));
    let field = s.field().unwrap();
    assert_eq!(field.current().len(), 12 * 9);
    assert_eq!(field.previous().len(), 12 * 9);
    assert!(field.current().iter().chain(field.previous()).all(|&v| v == 0));
    assert_eq!(s.output().unwrap().dimensions(), (12, 9));
}

#[test]
fn zero_sized_display_skips_until_resized() {
    let mut s = FrameScheduler::new(40, 30, ThemeConfig::default());
    let mut screen = FakeScreen::default();
    s.on_resize(0, 30);
    assert_eq!(s.dims(), None);
    assert_eq!(
        s.tick(&mut FakeCamera(None), &mut screen).unwrap(),
        FrameOutcome::Skipped(SkipReason::NoDimensions)
    );
    assert_eq!(screen.presents, 0);

    s.on_resize(10, 10);
    assert_eq!(s.tick(&mut FakeCamera(None), &mut screen).unwrap(), FrameOutcome::Presented);
    assert_eq!(screen.last.unwrap().dimensions(), (5, 5));
}

#[test]
fn theme_change_applies_on_the_next_frame() {
    // same splash under two themes; 20x20 display -> 10x10 field, splash at (5,5)
    let splashed_frame = |theme: Option<ThemeConfig>| {
        let mut s = FrameScheduler::new(20, 20, ThemeConfig::default());
        if let Some(t) = theme {
            s.set_theme(t);
        }
        s.on_pointer(InteractionPoint::active(0.5, 0.5));
        let mut screen = FakeScreen::default();
        assert_eq!(s.tick(&mut FakeCamera(None), &mut screen).unwrap(), FrameOutcome::Presented);
        (s, screen.last.unwrap())
    };
    let lava = ThemeConfig::presets()[1].clone();
    assert_eq!(lava.label, "Lava");

    let (_, ocean_frame) = splashed_frame(None);
    let (s, lava_frame) = splashed_frame(Some(lava.clone()));
    assert_ne!(ocean_frame, lava_frame);

    // (1,5): steep slope, no glint; halfway from the fallback fill to #ff4500
    assert_eq!(lava_frame.get_pixel(1, 5).0, [136, 45, 14, 255]);
    assert_eq!(ocean_frame.get_pixel(1, 5).0, [23, 82, 142, 255]);
    // (8,5): crest facing the light; full #ffd700 glint, then the lava tint
    assert_eq!(lava_frame.get_pixel(8, 5).0, [255, 152, 14, 255]);
    assert_eq!(ocean_frame.get_pixel(8, 5).0, [143, 200, 255, 255]);

    // the whole frame is exactly what the renderer gives for the lava theme
    let d = s.dims().unwrap();
    let [r, g, b] = FALLBACK_RGB;
    let fill = RgbaImage::from_pixel(d.width as u32, d.height as u32, Rgba([r, g, b, 255]));
    let mut expected = RgbaImage::new(d.width as u32, d.height as u32);
    render(s.field().unwrap().current(), &fill, &lava, d, &mut expected).unwrap();
    assert_eq!(lava_frame, expected);
}

#[test]
fn colour_strings() {
    assert_eq!(parse_hex_color("#ff0000"), Rgb::new(255, 0, 0));
    assert_eq!(parse_hex_color("blue"), Rgb::new(0, 0, 0));
}
