//! Two-panel usage example (headless).
//!
//! Panel one is sized like an image (from an optional file given as the
//! first argument, 640x480 otherwise), panel two uses fixed 640x480 limits.
//! A scripted drag on panel one is mirrored onto panel two through a
//! release callback, and the resulting corner points are printed as JSON.
//!
//! Usage: `cornerdrag-demo [IMAGE] [CONFIG.json]`

use std::cell::RefCell;
use std::rc::Rc;

use cornerdrag_core::{
    Corner, CornerOverlay, EventKind, HandleEvent, HostEvent, MemorySurface, OverlayConfig,
    ViewLimits,
};
use kurbo::{Point, Size};

const DEFAULT_SIZE: (u32, u32) = (640, 480);

fn image_size(path: Option<&str>) -> (u32, u32) {
    let Some(path) = path else {
        return DEFAULT_SIZE;
    };
    match image::image_dimensions(path) {
        Ok(size) => {
            log::info!("Loaded {} ({}x{})", path, size.0, size.1);
            size
        }
        Err(e) => {
            log::error!("Failed to read image {}: {}", path, e);
            DEFAULT_SIZE
        }
    }
}

fn load_config(path: Option<&str>) -> OverlayConfig {
    let Some(path) = path else {
        return OverlayConfig::default();
    };
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| OverlayConfig::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config {}: {}", path, e);
            OverlayConfig::default()
        }
    }
}

/// View limits of an image displayed with its origin at the top left.
fn image_limits((width, height): (u32, u32)) -> ViewLimits {
    ViewLimits::new((0.0, width as f64), (height as f64, 0.0))
}

/// Pick `corner`, move the pointer by `delta` and release.
fn drag(overlay: &mut CornerOverlay, surface: &mut MemorySurface, corner: Corner, delta: (f64, f64)) {
    let artist = overlay.handle(corner).id;
    let start = overlay.handle(corner).origin;
    let end = Point::new(start.x + delta.0, start.y + delta.1);
    overlay.handle_event(surface, &HostEvent::Pick { artist, pointer: Some(start) });
    overlay.handle_event(surface, &HostEvent::Motion { pointer: Some(end) });
    overlay.handle_event(surface, &HostEvent::Release { pointer: Some(end) });
}

fn main() {
    env_logger::init();
    log::info!("Starting cornerdrag demo");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let size = image_size(args.first().map(String::as_str));
    let config = load_config(args.get(1).map(String::as_str));

    let mut image_panel = MemorySurface::new(image_limits(size));
    let mut plain_panel = MemorySurface::new(image_limits(DEFAULT_SIZE));

    let mut image_overlay = CornerOverlay::new(&mut image_panel, config.clone());
    let mut plain_overlay = CornerOverlay::new(&mut plain_panel, config);

    // Net displacement per corner, collected from panel one's callbacks.
    let displaced: Rc<RefCell<Vec<(Corner, Point, Point)>>> = Rc::default();
    let starts: Rc<RefCell<Vec<Point>>> = Rc::default();
    {
        let starts = starts.clone();
        image_overlay.connect(EventKind::HandleMoved, move |event| {
            if let HandleEvent::Moved { from, .. } = event {
                starts.borrow_mut().push(*from);
            }
        });
    }
    {
        let displaced = displaced.clone();
        let starts = starts.clone();
        image_overlay.connect(EventKind::HandleReleased, move |event| {
            if let HandleEvent::Released { corner, position, .. } = event {
                let start = starts.borrow_mut().drain(..).next();
                if let Some(start) = start {
                    displaced.borrow_mut().push((*corner, start, *position));
                }
            }
        });
    }
    image_overlay.connect(EventKind::HandleReleased, |event| {
        log::info!("Panel one: {} handle released", event.corner());
    });

    let span = Size::new(size.0 as f64, size.1 as f64);
    drag(&mut image_overlay, &mut image_panel, Corner::UpperLeft, (span.width * 0.1, span.height * 0.1));
    drag(&mut image_overlay, &mut image_panel, Corner::LowerRight, (-span.width * 0.2, -span.height * 0.05));

    // Mirror onto panel two, scaled to its extent.
    let scale = (
        DEFAULT_SIZE.0 as f64 / span.width.max(1.0),
        DEFAULT_SIZE.1 as f64 / span.height.max(1.0),
    );
    for (corner, start, end) in displaced.borrow().iter() {
        let delta = ((end.x - start.x) * scale.0, (end.y - start.y) * scale.1);
        drag(&mut plain_overlay, &mut plain_panel, *corner, delta);
    }

    let report = serde_json::json!({
        "image_panel": image_overlay.points(),
        "plain_panel": plain_overlay.points(),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize points: {}", e),
    }

    plain_overlay.reset(&mut plain_panel);
    log::info!(
        "Panel two after reset: upper left = {:?}",
        plain_overlay.point(Corner::UpperLeft)
    );
}
