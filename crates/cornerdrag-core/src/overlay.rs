//! The four-corner overlay controller.
//!
//! A [`CornerOverlay`] places one pickable rectangle at each corner of a
//! surface's view and keeps a dashed outline through the four true corners.
//! The host feeds it pick, pointer-move and pointer-release notifications;
//! the overlay moves the picked handle by the pointer delta and notifies
//! the callbacks connected through [`CornerOverlay::connect`].

use std::collections::HashMap;

use kurbo::{BezPath, Point};
use log::{debug, trace, warn};
use uuid::Uuid;

use crate::corner::{Corner, Corners, OUTLINE_ORDER};
use crate::events::{EventKind, HandleEvent, HandlerId, HandlerRegistry, Listener};
use crate::handle::Handle;
use crate::style::{OverlayConfig, SerializableColor};
use crate::surface::{
    polyline_path, ArtistId, HostEvent, HostEventKind, Legend, LegendEntry, LineArtist,
    SubscriptionId, Surface,
};

/// Host notifications the overlay subscribes to.
const SUBSCRIBED_EVENTS: [HostEventKind; 3] = [
    HostEventKind::Pick,
    HostEventKind::PointerMove,
    HostEventKind::PointerRelease,
];

/// Interactive overlay of four draggable corner handles.
#[derive(Debug)]
pub struct CornerOverlay {
    config: OverlayConfig,
    handles: Corners<Handle>,
    /// Artist id to corner, for resolving pick events.
    by_artist: HashMap<ArtistId, Corner>,
    /// Handle being dragged.
    dragged: Option<Corner>,
    /// Last pointer position seen during the drag.
    last_pointer: Option<Point>,
    /// Current outline artist.
    outline: Option<ArtistId>,
    legend_shown: bool,
    subscriptions: Vec<SubscriptionId>,
    handlers: HandlerRegistry,
}

impl CornerOverlay {
    /// Place the overlay on `surface` using the current view limits.
    pub fn new(surface: &mut dyn Surface, config: OverlayConfig) -> Self {
        let limits = surface.view_limits();
        let handles = Corners::from_fn(|corner| {
            let color = surface.next_cycle_color();
            Handle::new(corner, &limits, config.offset_fraction, color)
        });

        let mut by_artist = HashMap::with_capacity(4);
        for (corner, handle) in handles.iter() {
            surface.add_rect(handle.to_artist(&config));
            by_artist.insert(handle.id, corner);
        }

        let subscriptions = SUBSCRIBED_EVENTS
            .iter()
            .map(|kind| surface.subscribe(*kind))
            .collect();

        let mut overlay = Self {
            config,
            handles,
            by_artist,
            dragged: None,
            last_pointer: None,
            outline: None,
            legend_shown: false,
            subscriptions,
            handlers: HandlerRegistry::new(),
        };

        overlay.draw_outline(surface, true);
        overlay
            .handlers
            .insert(EventKind::HandleMoved, Listener::RedrawOutline);

        if overlay.config.show_legend {
            overlay.legend(surface);
        }

        debug!(
            "Corner overlay created: x={:?} y={:?}",
            limits.x, limits.y
        );
        overlay
    }

    /// Place the overlay with the default configuration.
    pub fn with_defaults(surface: &mut dyn Surface) -> Self {
        Self::new(surface, OverlayConfig::default())
    }

    /// The configuration in use.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// All handles in label order.
    pub fn handles(&self) -> &Corners<Handle> {
        &self.handles
    }

    /// The handle for `corner`.
    pub fn handle(&self, corner: Corner) -> &Handle {
        &self.handles[corner]
    }

    /// Corner currently being dragged.
    pub fn dragged(&self) -> Option<Corner> {
        self.dragged
    }

    /// Current outline artist, if drawn.
    pub fn outline_id(&self) -> Option<ArtistId> {
        self.outline
    }

    /// True corner positions, in label order.
    pub fn points(&self) -> Corners<Point> {
        self.handles.map(|_, handle| handle.true_corner())
    }

    /// True corner position of one corner.
    pub fn point(&self, corner: Corner) -> Point {
        self.handles[corner].true_corner()
    }

    /// Outline vertices in visiting order (closed: first == last).
    pub fn outline_points(&self) -> Vec<Point> {
        OUTLINE_ORDER
            .iter()
            .map(|corner| self.handles[*corner].true_corner())
            .collect()
    }

    /// Outline as a path, for renderers that want geometry directly.
    pub fn outline_path(&self) -> BezPath {
        polyline_path(&self.outline_points())
    }

    /// Move every handle back to its initial position.
    ///
    /// Each handle that actually moves is reported to the moved callbacks
    /// and then to the released callbacks, in label order.
    pub fn reset(&mut self, surface: &mut dyn Surface) {
        let mut changed = false;
        for corner in Corner::ALL {
            let handle = &mut self.handles[corner];
            if !handle.is_displaced() {
                continue;
            }
            let from = handle.origin;
            let to = handle.initial_origin;
            let artist = handle.id;
            handle.origin = to;
            surface.set_rect_origin(artist, to);

            self.emit(
                surface,
                &HandleEvent::Moved {
                    corner,
                    artist,
                    from,
                    to,
                },
            );
            self.emit(
                surface,
                &HandleEvent::Released {
                    corner,
                    artist,
                    position: to,
                },
            );
            changed = true;
        }

        if changed {
            debug!("Corner overlay reset");
            surface.request_redraw();
        }
    }

    /// Replace the outline with one through the current true corners.
    ///
    /// View limits are restored afterwards, so hosts that autoscale on new
    /// artists keep their zoom. With `refresh` a repaint is requested.
    pub fn draw_outline(&mut self, surface: &mut dyn Surface, refresh: bool) {
        let limits = surface.view_limits();

        if let Some(old) = self.outline.take() {
            if !surface.remove_artist(old) {
                warn!("Outline artist {} was already gone from the surface", old);
            }
        }

        let color: SerializableColor = self.config.outline_color.with_opacity(self.config.outline_opacity);
        let line = LineArtist {
            id: Uuid::new_v4(),
            points: self.outline_points(),
            color: color.into(),
            width: self.config.outline_width,
            stroke: self.config.outline_stroke,
        };
        self.outline = Some(line.id);
        surface.add_line(line);

        surface.set_view_limits(limits);
        if refresh {
            surface.request_redraw();
        }
    }

    /// Install a frameless legend of handle colors and corner labels.
    pub fn legend(&mut self, surface: &mut dyn Surface) {
        let entries = self
            .handles
            .iter()
            .map(|(corner, handle)| LegendEntry {
                artist: handle.id,
                color: SerializableColor::from(handle.color)
                    .with_opacity(self.config.handle_opacity)
                    .into(),
                label: corner.label().to_string(),
            })
            .collect();
        surface.set_legend(Legend {
            entries,
            frame: false,
        });
        self.legend_shown = true;
    }

    /// Register a callback for `kind`. Ids increase with every call.
    pub fn connect(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&HandleEvent) + 'static,
    ) -> HandlerId {
        self.handlers.connect(kind, callback)
    }

    /// Register a callback by event name (`"box_move_event"`,
    /// `"handle_moved"`, `"box_release_event"`, `"handle_released"`).
    ///
    /// Unknown names register nothing and return `None`.
    pub fn connect_named(
        &mut self,
        name: &str,
        callback: impl FnMut(&HandleEvent) + 'static,
    ) -> Option<HandlerId> {
        let kind = name.parse::<EventKind>().ok()?;
        Some(self.connect(kind, callback))
    }

    /// Remove a callback. Unknown ids are ignored; returns whether one was removed.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        self.handlers.disconnect(id)
    }

    /// Registered ids for `kind`, in invocation order.
    pub fn handler_ids(&self, kind: EventKind) -> Vec<HandlerId> {
        self.handlers.ids(kind)
    }

    /// Route a host notification to the matching handler.
    pub fn handle_event(&mut self, surface: &mut dyn Surface, event: &HostEvent) -> bool {
        match *event {
            HostEvent::Pick { artist, pointer } => self.on_pick(artist, pointer),
            HostEvent::Motion { pointer } => self.on_motion(surface, pointer),
            HostEvent::Release { pointer } => self.on_release(surface, pointer),
        }
    }

    /// Start dragging if `artist` is one of the handles.
    ///
    /// Always returns `true` to acknowledge the pick.
    pub fn on_pick(&mut self, artist: ArtistId, pointer: Option<Point>) -> bool {
        if let Some(&corner) = self.by_artist.get(&artist) {
            debug!("Picked {} handle at {:?}", corner, pointer);
            self.dragged = Some(corner);
            self.last_pointer = pointer;
        }
        true
    }

    /// Move the dragged handle by the pointer delta.
    ///
    /// Without data coordinates the move is skipped but the drag stays
    /// active.
    pub fn on_motion(&mut self, surface: &mut dyn Surface, pointer: Option<Point>) -> bool {
        let (Some(corner), Some(pointer)) = (self.dragged, pointer) else {
            return true;
        };
        // A pick outside the data area has no reference point yet.
        let Some(last) = self.last_pointer.replace(pointer) else {
            return true;
        };

        let handle = &mut self.handles[corner];
        let from = handle.origin;
        let to = from + (pointer - last);
        let artist = handle.id;
        handle.origin = to;
        surface.set_rect_origin(artist, to);
        trace!("Moved {} handle {:?} -> {:?}", corner, from, to);

        self.emit(
            surface,
            &HandleEvent::Moved {
                corner,
                artist,
                from,
                to,
            },
        );
        surface.request_redraw();
        true
    }

    /// Finish the drag at `pointer`.
    pub fn on_release(&mut self, surface: &mut dyn Surface, pointer: Option<Point>) -> bool {
        let (Some(corner), Some(position)) = (self.dragged, pointer) else {
            return true;
        };
        let artist = self.handles[corner].id;
        debug!("Released {} handle at {:?}", corner, position);
        self.emit(
            surface,
            &HandleEvent::Released {
                corner,
                artist,
                position,
            },
        );
        self.dragged = None;
        self.last_pointer = None;
        true
    }

    /// Remove everything this overlay put on the surface.
    pub fn detach(mut self, surface: &mut dyn Surface) {
        for (_, handle) in self.handles.iter() {
            surface.remove_artist(handle.id);
        }
        if let Some(outline) = self.outline.take() {
            surface.remove_artist(outline);
        }
        if self.legend_shown {
            surface.clear_legend();
        }
        for id in self.subscriptions.drain(..) {
            surface.unsubscribe(id);
        }
        surface.request_redraw();
        debug!("Corner overlay detached");
    }

    fn emit(&mut self, surface: &mut dyn Surface, event: &HandleEvent) {
        let mut redraw = false;
        self.handlers.emit(event, || redraw = true);
        if redraw {
            self.draw_outline(surface, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemorySurface, ViewLimits};
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    fn image_surface() -> MemorySurface {
        MemorySurface::new(ViewLimits::new((0.0, 640.0), (480.0, 0.0)))
    }

    fn assert_point(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < EPS && (actual.y - expected.y).abs() < EPS,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    fn drag(
        overlay: &mut CornerOverlay,
        surface: &mut MemorySurface,
        corner: Corner,
        start: Point,
        end: Point,
    ) {
        let artist = overlay.handle(corner).id;
        overlay.handle_event(surface, &HostEvent::Pick { artist, pointer: Some(start) });
        overlay.handle_event(surface, &HostEvent::Motion { pointer: Some(end) });
        overlay.handle_event(surface, &HostEvent::Release { pointer: Some(end) });
    }

    fn recorder(overlay: &mut CornerOverlay) -> Rc<RefCell<Vec<HandleEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::HandleMoved, EventKind::HandleReleased] {
            let log = log.clone();
            overlay.connect(kind, move |event| log.borrow_mut().push(*event));
        }
        log
    }

    #[test]
    fn test_points_match_view_corners() {
        let mut surface = MemorySurface::new(ViewLimits::new((-3.0, 7.0), (2.0, 12.0)));
        let overlay = CornerOverlay::with_defaults(&mut surface);
        let points = overlay.points();
        assert_point(points[Corner::UpperLeft], Point::new(-3.0, 12.0));
        assert_point(points[Corner::LowerLeft], Point::new(-3.0, 2.0));
        assert_point(points[Corner::UpperRight], Point::new(7.0, 12.0));
        assert_point(points[Corner::LowerRight], Point::new(7.0, 2.0));
    }

    #[test]
    fn test_construction_populates_surface() {
        let mut surface = image_surface();
        let overlay = CornerOverlay::with_defaults(&mut surface);

        for (_, handle) in overlay.handles().iter() {
            let rect = surface.rect(handle.id).expect("handle artist on surface");
            assert_point(rect.origin, handle.origin);
            assert_eq!(rect.pick_tolerance, Some(5.0));
        }
        let colors: Vec<_> = overlay
            .handles()
            .iter()
            .map(|(_, h)| SerializableColor::from(h.color))
            .collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }

        assert_eq!(surface.lines().count(), 1);
        assert!(surface.redraw_count() >= 1);
        for kind in SUBSCRIBED_EVENTS {
            assert!(surface.is_subscribed(kind));
        }

        let legend = surface.legend().expect("legend installed");
        assert!(!legend.frame);
        let labels: Vec<_> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["upper left", "lower left", "upper right", "lower right"]);
    }

    #[test]
    fn test_no_legend_when_disabled() {
        let mut surface = image_surface();
        let _overlay = CornerOverlay::new(&mut surface, OverlayConfig::default().with_legend(false));
        assert!(surface.legend().is_none());
    }

    #[test]
    fn test_handles_sit_inside_view() {
        let mut surface = MemorySurface::new(ViewLimits::new((0.0, 100.0), (0.0, 100.0)));
        let overlay = CornerOverlay::with_defaults(&mut surface);
        let view = kurbo::Rect::new(0.0, 0.0, 100.0, 100.0);
        for (_, handle) in overlay.handles().iter() {
            let rect = surface.rect(handle.id).map(|r| r.rect()).expect("rect");
            assert!(view.contains(rect.origin()));
            assert!(rect.x1 <= 100.0 + EPS && rect.y1 <= 100.0 + EPS);
        }
    }

    #[test]
    fn test_outline_visits_true_corners() {
        let mut surface = image_surface();
        let overlay = CornerOverlay::with_defaults(&mut surface);
        let outline = surface.line(overlay.outline_id().expect("outline")).expect("line");
        let expected = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 480.0),
            Point::new(640.0, 480.0),
            Point::new(640.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(outline.points.len(), 5);
        for (actual, expected) in outline.points.iter().zip(expected) {
            assert_point(*actual, expected);
        }
        assert_eq!(outline.stroke, crate::style::StrokeStyle::Dashed);
        assert_eq!(
            SerializableColor::from(outline.color),
            SerializableColor::new(128, 128, 128, 204)
        );
        assert_eq!(overlay.outline_path().elements(), outline.to_path().elements());
    }

    #[test]
    fn test_custom_outline_color() {
        let mut surface = image_surface();
        let config = OverlayConfig::default().with_outline_color(SerializableColor::new(255, 0, 0, 255));
        let mut overlay = CornerOverlay::new(&mut surface, config);
        let expected = SerializableColor::new(255, 0, 0, 204);

        let outline = surface.line(overlay.outline_id().expect("outline")).expect("line");
        assert_eq!(SerializableColor::from(outline.color), expected);

        drag(
            &mut overlay,
            &mut surface,
            Corner::LowerLeft,
            Point::new(5.0, 470.0),
            Point::new(25.0, 450.0),
        );
        let outline = surface.line(overlay.outline_id().expect("outline")).expect("line");
        assert_eq!(SerializableColor::from(outline.color), expected);
        assert_point(outline.points[1], Point::new(20.0, 460.0));
    }

    #[test]
    fn test_drag_moves_only_picked_handle() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let before = overlay.points();

        drag(
            &mut overlay,
            &mut surface,
            Corner::LowerRight,
            Point::new(630.0, 470.0),
            Point::new(600.0, 455.0),
        );

        let after = overlay.points();
        for corner in Corner::ALL {
            if corner == Corner::LowerRight {
                assert_point(after[corner], before[corner] + kurbo::Vec2::new(-30.0, -15.0));
            } else {
                assert_point(after[corner], before[corner]);
            }
        }
        assert_eq!(overlay.dragged(), None);
        let rect = surface.rect(overlay.handle(Corner::LowerRight).id).expect("rect");
        assert_point(rect.origin, overlay.handle(Corner::LowerRight).origin);
    }

    #[test]
    fn test_upper_left_scenario() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let original = overlay.point(Corner::UpperLeft);
        assert_point(original, Point::new(0.0, 0.0));

        let pick = Point::new(12.0, 8.0);
        drag(
            &mut overlay,
            &mut surface,
            Corner::UpperLeft,
            pick,
            Point::new(pick.x + 10.0, pick.y - 5.0),
        );
        assert_point(overlay.point(Corner::UpperLeft), Point::new(10.0, -5.0));
    }

    #[test]
    fn test_motion_accumulates_deltas() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let artist = overlay.handle(Corner::UpperRight).id;
        overlay.on_pick(artist, Some(Point::new(620.0, 10.0)));
        overlay.on_motion(&mut surface, Some(Point::new(621.0, 11.0)));
        overlay.on_motion(&mut surface, Some(Point::new(625.0, 13.0)));
        assert_point(overlay.point(Corner::UpperRight), Point::new(645.0, 3.0));
        assert_eq!(overlay.dragged(), Some(Corner::UpperRight));
    }

    #[test]
    fn test_move_without_coordinates_is_skipped() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let log = recorder(&mut overlay);
        let before = overlay.points();
        let redraws = surface.redraw_count();

        let artist = overlay.handle(Corner::LowerLeft).id;
        overlay.on_pick(artist, Some(Point::new(5.0, 470.0)));
        overlay.on_motion(&mut surface, None);

        assert_eq!(overlay.points(), before);
        assert!(log.borrow().is_empty());
        assert_eq!(surface.redraw_count(), redraws);
        assert_eq!(overlay.dragged(), Some(Corner::LowerLeft));

        overlay.on_motion(&mut surface, Some(Point::new(6.0, 470.0)));
        assert_point(overlay.point(Corner::LowerLeft), Point::new(1.0, 480.0));
    }

    #[test]
    fn test_release_without_coordinates_keeps_drag() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let log = recorder(&mut overlay);
        overlay.on_pick(overlay.handle(Corner::UpperLeft).id, Some(Point::new(1.0, 1.0)));
        overlay.on_release(&mut surface, None);
        assert_eq!(overlay.dragged(), Some(Corner::UpperLeft));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_pick_outside_data_area_seeds_on_first_move() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let before = overlay.points();
        overlay.on_pick(overlay.handle(Corner::UpperLeft).id, None);
        overlay.on_motion(&mut surface, Some(Point::new(4.0, 4.0)));
        assert_eq!(overlay.points(), before);
        overlay.on_motion(&mut surface, Some(Point::new(6.0, 7.0)));
        assert_point(overlay.point(Corner::UpperLeft), Point::new(2.0, 3.0));
    }

    #[test]
    fn test_foreign_pick_is_ignored() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        assert!(overlay.on_pick(Uuid::new_v4(), Some(Point::ZERO)));
        assert_eq!(overlay.dragged(), None);
        let before = overlay.points();
        overlay.on_motion(&mut surface, Some(Point::new(50.0, 50.0)));
        assert_eq!(overlay.points(), before);
    }

    #[test]
    fn test_motion_without_drag_is_noop() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let log = recorder(&mut overlay);
        overlay.on_motion(&mut surface, Some(Point::new(10.0, 10.0)));
        overlay.on_release(&mut surface, Some(Point::new(10.0, 10.0)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_callbacks_receive_drag_events() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let log = recorder(&mut overlay);
        let handle = overlay.handle(Corner::UpperLeft).clone();

        drag(
            &mut overlay,
            &mut surface,
            Corner::UpperLeft,
            Point::new(10.0, 10.0),
            Point::new(20.0, 15.0),
        );

        let events = log.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            HandleEvent::Moved {
                corner: Corner::UpperLeft,
                artist: handle.id,
                from: handle.origin,
                to: handle.origin + kurbo::Vec2::new(10.0, 5.0),
            }
        );
        assert_eq!(
            events[1],
            HandleEvent::Released {
                corner: Corner::UpperLeft,
                artist: handle.id,
                position: Point::new(20.0, 15.0),
            }
        );
    }

    #[test]
    fn test_outline_follows_moves() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let first_outline = overlay.outline_id();

        drag(
            &mut overlay,
            &mut surface,
            Corner::UpperLeft,
            Point::new(10.0, 10.0),
            Point::new(30.0, 40.0),
        );

        assert_ne!(overlay.outline_id(), first_outline);
        assert_eq!(surface.lines().count(), 1);
        let outline = surface.line(overlay.outline_id().expect("outline")).expect("line");
        assert_point(outline.points[0], Point::new(20.0, 30.0));
        assert_point(outline.points[4], Point::new(20.0, 30.0));
    }

    #[test]
    fn test_disconnecting_internal_listener_freezes_outline() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let internal = overlay.handler_ids(EventKind::HandleMoved)[0];
        assert!(overlay.disconnect(internal));
        let outline = overlay.outline_id();
        drag(
            &mut overlay,
            &mut surface,
            Corner::UpperLeft,
            Point::new(10.0, 10.0),
            Point::new(30.0, 40.0),
        );
        assert_eq!(overlay.outline_id(), outline);
    }

    #[test]
    fn test_draw_outline_preserves_limits() {
        let limits = ViewLimits::new((0.0, 640.0), (480.0, 0.0));
        let mut surface = MemorySurface::new(limits).with_autoscale(true);
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        assert_eq!(surface.view_limits(), limits);

        drag(
            &mut overlay,
            &mut surface,
            Corner::LowerRight,
            Point::new(630.0, 470.0),
            Point::new(900.0, 700.0),
        );
        assert_eq!(surface.view_limits(), limits);

        overlay.draw_outline(&mut surface, false);
        assert_eq!(surface.view_limits(), limits);
    }

    #[test]
    fn test_draw_outline_refresh_requests_repaint() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let redraws = surface.redraw_count();
        overlay.draw_outline(&mut surface, false);
        assert_eq!(surface.redraw_count(), redraws);
        overlay.draw_outline(&mut surface, true);
        assert_eq!(surface.redraw_count(), redraws + 1);
        assert_eq!(surface.lines().count(), 1);
    }

    #[test]
    fn test_reset_restores_points_and_notifies_changed_handles() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let initial = overlay.points();
        let initial_outline = overlay.outline_points();

        drag(
            &mut overlay,
            &mut surface,
            Corner::UpperRight,
            Point::new(630.0, 5.0),
            Point::new(600.0, 50.0),
        );
        drag(
            &mut overlay,
            &mut surface,
            Corner::UpperLeft,
            Point::new(5.0, 5.0),
            Point::new(50.0, 60.0),
        );
        let dragged_origin = overlay.handle(Corner::UpperLeft).origin;
        let log = recorder(&mut overlay);

        overlay.reset(&mut surface);

        assert_eq!(overlay.points(), initial);
        let events = log.borrow();
        let summary: Vec<_> = events.iter().map(|e| (e.corner(), e.kind())).collect();
        assert_eq!(
            summary,
            vec![
                (Corner::UpperLeft, EventKind::HandleMoved),
                (Corner::UpperLeft, EventKind::HandleReleased),
                (Corner::UpperRight, EventKind::HandleMoved),
                (Corner::UpperRight, EventKind::HandleReleased),
            ]
        );
        let handle = overlay.handle(Corner::UpperLeft);
        assert_eq!(
            events[0],
            HandleEvent::Moved {
                corner: Corner::UpperLeft,
                artist: handle.id,
                from: dragged_origin,
                to: handle.initial_origin,
            }
        );
        assert_eq!(
            events[1],
            HandleEvent::Released {
                corner: Corner::UpperLeft,
                artist: handle.id,
                position: handle.initial_origin,
            }
        );
        let rect = surface.rect(handle.id).expect("rect");
        assert_point(rect.origin, handle.initial_origin);

        let outline = surface.line(overlay.outline_id().expect("outline")).expect("line");
        assert_eq!(outline.points.len(), initial_outline.len());
        for (actual, expected) in outline.points.iter().zip(&initial_outline) {
            assert_point(*actual, *expected);
        }
    }

    #[test]
    fn test_reset_without_changes_is_silent() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let log = recorder(&mut overlay);
        let redraws = surface.redraw_count();
        overlay.reset(&mut surface);
        assert!(log.borrow().is_empty());
        assert_eq!(surface.redraw_count(), redraws);
    }

    #[test]
    fn test_connect_ids_and_disconnect() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let count = Rc::new(RefCell::new(0));

        let a = {
            let count = count.clone();
            overlay.connect(EventKind::HandleMoved, move |_| *count.borrow_mut() += 1)
        };
        let b = {
            let count = count.clone();
            overlay.connect(EventKind::HandleMoved, move |_| *count.borrow_mut() += 10)
        };
        assert!(b > a);

        drag(
            &mut overlay,
            &mut surface,
            Corner::LowerLeft,
            Point::new(5.0, 470.0),
            Point::new(6.0, 471.0),
        );
        assert_eq!(*count.borrow(), 11);

        assert!(overlay.disconnect(a));
        assert!(!overlay.disconnect(a));
        drag(
            &mut overlay,
            &mut surface,
            Corner::LowerLeft,
            Point::new(6.0, 471.0),
            Point::new(7.0, 472.0),
        );
        assert_eq!(*count.borrow(), 21);

        let c = overlay.connect(EventKind::HandleReleased, |_| {});
        assert!(c > b);
    }

    #[test]
    fn test_connect_named() {
        let mut surface = image_surface();
        let mut overlay = CornerOverlay::with_defaults(&mut surface);
        let moved = overlay.connect_named("box_move_event", |_| {});
        let released = overlay.connect_named("box_release_event", |_| {});
        assert!(moved.is_some() && released.is_some());
        assert!(released > moved);
        assert_eq!(overlay.connect_named("button_press_event", |_| {}), None);
        assert_eq!(overlay.handler_ids(EventKind::HandleReleased).len(), 1);
    }

    #[test]
    fn test_overlays_coexist_on_one_surface() {
        let mut surface = image_surface();
        let first = CornerOverlay::with_defaults(&mut surface);
        let mut second = CornerOverlay::new(&mut surface, OverlayConfig::default().with_legend(false));
        assert_eq!(surface.lines().count(), 2);

        drag(
            &mut second,
            &mut surface,
            Corner::UpperLeft,
            Point::new(1.0, 1.0),
            Point::new(11.0, 1.0),
        );
        assert_eq!(surface.lines().count(), 2);
        assert!(surface.line(first.outline_id().expect("outline")).is_some());
        assert_eq!(surface.artists().len(), 10);
    }

    #[test]
    fn test_detach_removes_everything() {
        let mut surface = image_surface();
        let overlay = CornerOverlay::with_defaults(&mut surface);
        overlay.detach(&mut surface);
        assert!(surface.artists().is_empty());
        assert!(surface.legend().is_none());
        assert!(surface.subscriptions().is_empty());
    }
}
