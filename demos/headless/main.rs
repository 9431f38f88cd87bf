//! Headless editing session driven by a scripted pointer sequence.
//!
//! Usage:
//! ```text
//! cargo run --example headless
//! RUST_LOG=polyedit=trace cargo run --example headless
//! ```

use polyedit::editor::HandleEvent;
use polyedit::gesture::{PointerEvent, PointerEventKind, PointerSource, SubscriptionId};
use polyedit::markers::{HandleKind, Marker, MarkerStore};
use polyedit::math::ScreenPoint;
use polyedit::{EditablePolygon, EditorConfig, GeoCoord, PolyEditError};

/// Pointer source that only counts live subscriptions.
#[derive(Debug, Default)]
struct Canvas {
    next: u64,
    live: usize,
}

impl PointerSource for Canvas {
    fn subscribe(&mut self, _kind: PointerEventKind) -> SubscriptionId {
        self.next += 1;
        self.live += 1;
        SubscriptionId(self.next)
    }

    fn unsubscribe(&mut self, _subscription: SubscriptionId) {
        self.live = self.live.saturating_sub(1);
    }
}

/// Equirectangular view: 800x600 pixels covering lat [-30, 30], lng [-40, 40].
fn project(p: ScreenPoint) -> Option<GeoCoord> {
    if !(0.0..=800.0).contains(&p.x) || !(0.0..=600.0).contains(&p.y) {
        return None;
    }
    Some(GeoCoord::new(30.0 - p.y / 10.0, p.x / 10.0 - 40.0))
}

fn click<S: PointerSource>(
    editor: &mut EditablePolygon<MarkerStore, S>,
    x: f64,
    y: f64,
) -> Result<(), PolyEditError> {
    editor.pointer_down(&PointerEvent::primary(x, y));
    editor.pointer_up(&project, &PointerEvent::primary(x + 1.0, y))?;
    Ok(())
}

fn main() -> Result<(), PolyEditError> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("polyedit=debug".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut editor = EditablePolygon::begin(
        MarkerStore::new(),
        Canvas::default(),
        EditorConfig::default(),
    );

    for (x, y) in [(200.0, 150.0), (600.0, 150.0), (600.0, 450.0), (200.0, 450.0)] {
        click(&mut editor, x, y)?;
    }

    // A drag across the surface pans, it doesn't add.
    editor.pointer_down(&PointerEvent::primary(400.0, 300.0));
    editor.pointer_up(&project, &PointerEvent::primary(420.0, 310.0))?;

    // Off the map: silently ignored.
    click(&mut editor, 900.0, 100.0)?;

    // Pull the first edge outward through its midpoint handle.
    let first = editor.vertex_ids()[0];
    if let Some(incident) = editor.registry().incident_midpoints(first) {
        if let Some(midpoint) = editor.registry().midpoint(incident.next) {
            let handle = midpoint.handle();
            let added = editor.handle_event(HandleEvent::MidpointActivated {
                handle,
                at: GeoCoord::new(16.0, 0.0),
            })?;
            // The rest of the drag moves the inserted vertex.
            let dragged = added.and_then(|id| editor.registry().drag_handle(id).map(Marker::handle));
            if let Some(handle) = dragged {
                for lat in [17.0, 18.5, 20.0] {
                    editor.handle_event(HandleEvent::Dragged {
                        handle,
                        to: GeoCoord::new(lat, 0.0),
                    })?;
                }
            }
        }
    }

    println!("vertices: {}", editor.len());
    for (id, position) in editor.vertex_ids().into_iter().zip(editor.outline()) {
        println!("  {id}: ({:.2}, {:.2})", position.lat, position.lng);
    }
    let status = editor.status();
    println!(
        "status: ({:.2}, {:.2}) visible={}",
        status.position().lat,
        status.position().lng,
        status.is_visible()
    );
    println!(
        "markers: {} vertex, {} midpoint",
        editor.markers().count_kind(HandleKind::Vertex),
        editor.markers().count_kind(HandleKind::Midpoint)
    );

    let (markers, canvas) = editor.finish();
    println!("after finish: {} markers, {} listeners", markers.len(), canvas.live);
    Ok(())
}
