//! Viewport controller: turns map events into render lists and camera moves.
//!
//! The map view sends [`ViewportEvent`]s, either directly through
//! [`ViewportController::handle`] or over a channel drained by
//! [`ViewportController::process_pending`]. Each event produces one
//! [`Reaction`] for the rendering layer.

use crate::compute::validation::validate_geographic_point;
use crate::compute::zoom::{scale_span, zoom_for_viewport};
use crate::error::{ClusterError, Result};
use crate::store::PointStore;
use crate::types::{ClusterId, ClusterOrPoint};
use geo::Point;
use spatio_cluster_types::Viewport;
use std::sync::mpsc::{self, Receiver, Sender};

/// Span in degrees used when the camera recenters on the device location.
pub const RECENTER_SPAN: f64 = 0.01;

/// Region shown before the device location is known: central Seoul.
pub fn default_viewport() -> Viewport {
    Viewport::new(Point::new(126.9780, 37.5665), 0.0922, 0.0421)
}

/// Input from the map view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    /// The camera stopped moving and now shows this region.
    Settled(Viewport),
    /// The user tapped a cluster badge from the last render.
    ClusterTapped(ClusterId),
    /// Move the camera onto a location, e.g. the device position.
    Recenter { latitude: f64, longitude: f64 },
}

/// Camera animation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommand {
    pub target: Viewport,
    pub zoom: i32,
}

/// What the rendering layer should do in response to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction<P> {
    /// Replace the markers on screen.
    Render(Vec<ClusterOrPoint<P>>),
    /// Animate the camera.
    Camera(CameraCommand),
    /// Nothing to do, e.g. a tap on a cluster from an outdated render.
    Ignored,
}

/// Owns the marker store and the live viewport.
#[derive(Debug)]
pub struct ViewportController<P = ()> {
    store: PointStore<P>,
    viewport: Viewport,
}

/// Channel pair for feeding events from the map view.
pub fn channel() -> (Sender<ViewportEvent>, Receiver<ViewportEvent>) {
    mpsc::channel()
}

impl<P: Clone> ViewportController<P> {
    pub fn new(store: PointStore<P>, viewport: Viewport) -> Self {
        Self { store, viewport }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn store(&self) -> &PointStore<P> {
        &self.store
    }

    /// Mutable access for adding, moving and removing markers. The index is
    /// rebuilt on the next render.
    pub fn store_mut(&mut self) -> &mut PointStore<P> {
        &mut self.store
    }

    /// Zoom level of the live viewport.
    pub fn zoom(&self) -> Result<i32> {
        zoom_for_viewport(self.viewport.longitude_span)
    }

    /// Markers for the live viewport.
    pub fn render(&mut self) -> Result<Vec<ClusterOrPoint<P>>> {
        let zoom = self.zoom()?;
        self.store.query_visible(&self.viewport.bbox(), zoom)
    }

    pub fn handle(&mut self, event: ViewportEvent) -> Result<Reaction<P>> {
        match event {
            ViewportEvent::Settled(viewport) => {
                self.viewport = viewport;
                Ok(Reaction::Render(self.render()?))
            }
            ViewportEvent::ClusterTapped(id) => self.expand(id),
            ViewportEvent::Recenter {
                latitude,
                longitude,
            } => {
                let center = Point::new(longitude, latitude);
                validate_geographic_point("recenter", &center)?;
                Ok(Reaction::Camera(CameraCommand {
                    target: Viewport::new(center, RECENTER_SPAN, RECENTER_SPAN),
                    zoom: zoom_for_viewport(RECENTER_SPAN)?,
                }))
            }
        }
    }

    /// Handle every event queued on `events` without blocking.
    pub fn process_pending(&mut self, events: &Receiver<ViewportEvent>) -> Result<Vec<Reaction<P>>> {
        events.try_iter().map(|event| self.handle(event)).collect()
    }

    fn expand(&mut self, id: ClusterId) -> Result<Reaction<P>> {
        let index = self.store.index()?;
        let (cluster, target_zoom) = match index.cluster(id).and_then(|c| {
            let zoom = index.expansion_zoom(id)?;
            Ok((c, zoom))
        }) {
            Ok(found) => found,
            Err(ClusterError::UnknownClusterId(_)) => {
                log::debug!("Ignoring tap on unknown cluster {}", id);
                return Ok(Reaction::Ignored);
            }
            Err(e) => return Err(e),
        };

        let current_zoom = self.zoom()?;
        let target = Viewport::new(
            cluster.centroid,
            scale_span(self.viewport.latitude_span, current_zoom, target_zoom),
            scale_span(self.viewport.longitude_span, current_zoom, target_zoom),
        );

        Ok(Reaction::Camera(CameraCommand {
            target,
            zoom: target_zoom,
        }))
    }
}
