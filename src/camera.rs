// Opens the default camera on a background thread and hands the newest frame
// to the render loop without ever blocking it.
// Visual expectation: until the first frame arrives the scheduler shows the
// fallback fill; after that, `poll_frame()` always returns the latest image.

use liquid_mirror::VideoSource;
use liquid_mirror::error::Error;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::{DynamicImage, RgbImage, RgbaImage};
use log::{info, warn};
// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// Capture thread + the newest frame it delivered.
pub struct CameraCapture {
    frames: Receiver<RgbaImage>,
    latest: Option<RgbaImage>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution and start streaming.
    /// Blocks only until the device reports success or failure.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        // Capacity 1: the render loop only ever wants the newest frame.
        let (frame_tx, frame_rx) = mpsc::sync_channel::<RgbaImage>(1);
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(u32, u32), Error>>();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        // nokhwa's `frame()` blocks until the device delivers, so it gets its own thread.
        let worker = thread::Builder::new()
            .name("camera".into())
            .spawn(move || {
                let mut cam = match open_camera(index, width, height) {
                    Ok(cam) => cam,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let res = cam.resolution();
                let _ = ready_tx.send(Ok((res.width(), res.height())));

                while !worker_stop.load(Ordering::Relaxed) {
                    match grab_rgba(&mut cam) {
                        Ok(img) => match frame_tx.try_send(img) {
                            // Full: the loop hasn't taken the last one yet; drop this one.
                            Ok(()) | Err(TrySendError::Full(_)) => {}
                            Err(TrySendError::Disconnected(_)) => break,
                        },
                        Err(e) => {
                            warn!("{e}");
                            thread::sleep(Duration::from_millis(10));
                        }
                    }
                }
                if let Err(e) = cam.stop_stream() {
                    warn!("Stop camera stream: {e}");
                }
            })
            .map_err(|e| Error::CameraInit(format!("Spawn capture thread: {e}")))?;

        let (w, h) = ready_rx
            .recv()
            .map_err(|_| Error::CameraInit("Capture thread exited before opening the camera".into()))??;
        info!("Camera {index} streaming at {w}x{h}");

        Ok(Self {
            frames: frame_rx,
            latest: None,
            stop,
            worker: Some(worker),
            width: w,
            height: h,
        })
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl VideoSource for CameraCapture {
    fn poll_frame(&mut self) -> Option<&RgbaImage> {
        while let Ok(frame) = self.frames.try_recv() {
            self.latest = Some(frame);
        }
        self.latest.as_ref()
    }
}

impl Drop for CameraCapture {
    // Stop and join the capture thread so nothing keeps streaming after the loop ends.
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Camera thread panicked");
            }
        }
    }
}

fn open_camera(index: u32, width: u32, height: u32) -> Result<Camera, Error> {
    // 1) Choose the device (0 = default webcam)
    let idx = CameraIndex::Index(index);

    let fmt = CameraFormat::new(
        Resolution::new(width, height),
        FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
        30,                // target FPS
    );

    // 2) Ask for RGB frames, closest to the requested format.
    let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

    // 3) Create the camera (this might fail if no device exists).
    let mut cam = Camera::new(idx, req).map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

    // 4) Start streaming frames from the camera.
    cam.open_stream()
        .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

    Ok(cam)
}

/// Grab one frame and convert it to RGBA (the scheduler mirrors/resamples it).
fn grab_rgba(cam: &mut Camera) -> Result<RgbaImage, Error> {
    let frame = cam
        .frame()
        .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

    let decoded = frame
        .decode_image::<RgbFormat>()
        .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

    // Rebuild through the raw bytes so we don't depend on nokhwa's image version.
    let (w, h) = decoded.dimensions();
    let rgb = RgbImage::from_raw(w, h, decoded.into_raw())
        .ok_or_else(|| Error::CameraFrame(format!("Short RGB buffer for {w}x{h}")))?;

    Ok(DynamicImage::ImageRgb8(rgb).into_rgba8())
}
