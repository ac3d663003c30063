use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use qrstudio::engine::TRANSPARENT;
use qrstudio::surface::{Headless, RecordingSurface, Surface};
use qrstudio::{
    DotStyle, DownloadOptions, Error, ExportFormat, NotificationKind, PreviewController,
    QrEngine, RenderOptions, Result, Settings,
};

#[derive(Default)]
struct EngineLog {
    updates: Vec<RenderOptions>,
    downloads: Vec<(DownloadOptions, String)>,
}

/// Engine double that records calls and can be told to fail downloads
struct FakeEngine {
    options: RenderOptions,
    log: Arc<Mutex<EngineLog>>,
    fail_download: bool,
}

#[async_trait]
impl QrEngine for FakeEngine {
    fn update(&mut self, options: RenderOptions) -> Result<()> {
        self.log.lock().unwrap().updates.push(options.clone());
        self.options = options;
        Ok(())
    }

    fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn append(&mut self, _surface: Box<dyn Surface>) -> Result<()> {
        Ok(())
    }

    async fn download(&mut self, request: &DownloadOptions) -> Result<PathBuf> {
        self.log
            .lock()
            .unwrap()
            .downloads
            .push((request.clone(), self.options.background.color.clone()));
        if self.fail_download {
            return Err(Error::Export("disk on fire".to_string()));
        }
        Ok(PathBuf::from(request.file_name()))
    }
}

struct Harness {
    controller: PreviewController<FakeEngine>,
    log: Arc<Mutex<EngineLog>>,
    builds: Arc<AtomicUsize>,
}

fn harness(fail_download: bool) -> Harness {
    let log = Arc::new(Mutex::new(EngineLog::default()));
    let builds = Arc::new(AtomicUsize::new(0));
    let (engine_log, engine_builds) = (Arc::clone(&log), Arc::clone(&builds));
    let controller = PreviewController::new(Settings::default(), move |options| {
        engine_builds.fetch_add(1, Ordering::SeqCst);
        FakeEngine {
            options,
            log: Arc::clone(&engine_log),
            fail_download,
        }
    });
    Harness {
        controller,
        log,
        builds,
    }
}

fn mounted(fail_download: bool) -> Harness {
    let mut h = harness(fail_download);
    h.controller.mount(Box::new(Headless)).unwrap();
    h
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("qrstudio-{}-{name}", std::process::id()))
}

#[test]
fn every_setting_change_reaches_the_engine() {
    let mut h = mounted(false);
    let c = &mut h.controller;

    c.set_content("hello").unwrap();
    assert_eq!(c.engine().unwrap().options().data, "hello");

    c.set_foreground("#DC3545").unwrap();
    let options = c.engine().unwrap().options();
    assert_eq!(options.dots.color, "#DC3545");
    assert_eq!(options.corners_square.color, "#DC3545");
    assert_eq!(options.corners_dot.color, "#DC3545");

    c.set_background("#000000").unwrap();
    assert_eq!(c.engine().unwrap().options().background.color, "#000000");

    c.set_style(DotStyle::Classy).unwrap();
    assert_eq!(c.engine().unwrap().options().dots.style, DotStyle::Classy);

    c.set_size(450).unwrap();
    let options = c.engine().unwrap().options();
    assert_eq!((options.width, options.height), (450, 450));

    // Each change sends the full snapshot
    assert_eq!(c.engine().unwrap().options(), &c.snapshot());
    assert_eq!(h.log.lock().unwrap().updates.len(), 5);
}

#[test]
fn changes_before_mount_are_applied_at_mount() {
    let mut h = harness(false);
    h.controller.set_content("early").unwrap();
    h.controller.set_style(DotStyle::Dots).unwrap();
    assert!(h.controller.engine().is_none());

    h.controller.mount(Box::new(Headless)).unwrap();
    let options = h.controller.engine().unwrap().options();
    assert_eq!(options.data, "early");
    assert_eq!(options.dots.style, DotStyle::Dots);
}

#[test]
fn engine_is_built_once_and_rebuilt_after_reset() {
    let mut h = mounted(false);
    h.controller.mount(Box::new(RecordingSurface::new())).unwrap();
    assert_eq!(h.builds.load(Ordering::SeqCst), 1);

    h.controller.set_content("changed").unwrap();
    h.controller.reset();
    assert!(h.controller.engine().is_none());
    assert_eq!(h.controller.settings(), &Settings::default());

    h.controller.mount(Box::new(Headless)).unwrap();
    assert_eq!(h.builds.load(Ordering::SeqCst), 2);
    assert_eq!(
        h.controller.engine().unwrap().options().data,
        Settings::default().content
    );
}

#[tokio::test]
async fn oversized_logo_is_rejected() {
    let mut h = mounted(false);
    let path = temp_path("huge.png");
    tokio::fs::write(&path, vec![0u8; 5 * 1024 * 1024 + 1])
        .await
        .unwrap();

    let result = h.controller.upload_logo(&path).await;
    let _ = tokio::fs::remove_file(&path).await;

    assert!(matches!(result, Err(Error::LogoTooLarge { .. })));
    assert!(h.controller.settings().logo.is_none());
    assert!(h.controller.file_picker().value().is_none());

    let notes = h.controller.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(notes[0].message, "Image size should be less than 5MB");
}

#[tokio::test]
async fn logo_upload_sets_encoded_data() {
    let mut h = mounted(false);
    let png = png_bytes(16, 16);
    let path = temp_path("logo.png");
    tokio::fs::write(&path, &png).await.unwrap();

    h.controller.upload_logo(&path).await.unwrap();
    let _ = tokio::fs::remove_file(&path).await;

    let expected = qrstudio::logo::encode_data_url(&png);
    assert_eq!(h.controller.settings().logo.as_deref(), Some(expected.as_str()));
    assert_eq!(
        h.controller.engine().unwrap().options().image.as_deref(),
        Some(expected.as_str())
    );
    assert_eq!(h.controller.file_picker().value(), Some(path.as_path()));

    let notes = h.controller.drain_notifications();
    assert_eq!(notes[0].kind, NotificationKind::Success);
    assert_eq!(notes[0].message, "Logo uploaded successfully!");
}

#[test]
fn non_image_bytes_are_not_accepted_as_logo() {
    let mut h = mounted(false);
    let result = h.controller.upload_logo_bytes(b"just some text");
    assert!(matches!(result, Err(Error::InvalidLogo(_))));
    assert!(h.controller.settings().logo.is_none());
    assert_eq!(
        h.controller.drain_notifications()[0].kind,
        NotificationKind::Error
    );
}

#[tokio::test]
async fn removing_logo_clears_field_and_picker() {
    let mut h = mounted(false);
    let path = temp_path("remove.png");
    tokio::fs::write(&path, png_bytes(8, 8)).await.unwrap();
    h.controller.upload_logo(&path).await.unwrap();
    let _ = tokio::fs::remove_file(&path).await;
    assert!(h.controller.file_picker().value().is_some());

    h.controller.remove_logo().unwrap();

    assert!(h.controller.settings().logo.is_none());
    assert!(h.controller.engine().unwrap().options().image.is_none());
    assert!(h.controller.file_picker().value().is_none());
    let notes = h.controller.drain_notifications();
    assert_eq!(notes.last().unwrap().message, "Logo removed");
}

#[tokio::test]
async fn transparent_export_restores_background() {
    let mut h = mounted(false);
    h.controller.set_background("#f8fafc").unwrap();
    h.controller.set_transparent_export(true).unwrap();
    let before = h.controller.engine().unwrap().options().clone();

    let path = h.controller.export(ExportFormat::Png).await.unwrap();

    let after = h.controller.engine().unwrap().options().clone();
    assert_eq!(before, after);
    assert_eq!(after.background.color, "#f8fafc");

    let log = h.log.lock().unwrap();
    let (request, background_during) = log.downloads.last().unwrap();
    assert_eq!(background_during, TRANSPARENT);
    assert_eq!(request.format, ExportFormat::Png);
    assert!(request.name.starts_with("qrcode-"));
    assert_eq!(path, PathBuf::from(request.file_name()));
    drop(log);

    let notes = h.controller.drain_notifications();
    assert_eq!(notes.last().unwrap().message, "QR Code exported as PNG");
    assert!(!h.controller.is_generating());
}

#[tokio::test]
async fn opaque_export_keeps_background() {
    let mut h = mounted(false);
    h.controller.export(ExportFormat::Svg).await.unwrap();

    let log = h.log.lock().unwrap();
    assert_eq!(log.downloads.last().unwrap().1, "#ffffff");
    assert!(log.downloads.last().unwrap().0.file_name().ends_with(".svg"));
}

#[tokio::test]
async fn export_failure_notifies_and_clears_generating() {
    let mut h = mounted(true);
    h.controller.set_transparent_export(true).unwrap();

    let result = h.controller.export(ExportFormat::Svg).await;

    assert!(matches!(result, Err(Error::Export(_))));
    assert!(!h.controller.is_generating());
    assert_eq!(
        h.controller.engine().unwrap().options().background.color,
        "#ffffff"
    );
    let notes = h.controller.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(notes[0].message, "Failed to export QR code");
}

#[tokio::test]
async fn export_before_mount_is_refused() {
    let mut h = harness(false);
    let result = h.controller.export(ExportFormat::Png).await;
    assert!(matches!(result, Err(Error::EngineNotMounted)));
    assert!(h.controller.drain_notifications().is_empty());
    assert!(!h.controller.is_generating());
}
