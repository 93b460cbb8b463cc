//! Zoom and pan of a plane bounding box.
//!
//! Zoom and pan state belongs to the caller. Every gesture is a full
//! recomputation from the previous bounding box and state; nothing is kept in
//! progress between gestures.

use serde::{Deserialize, Serialize};

use crate::bounding_box::PlaneRect;
use crate::config::ViewConfig;
use crate::enums::{Plane, PlaneOrientation};
use crate::error::{GeometryError, Result};
use crate::math::{Affine2D, Vector4};
use crate::plane::map_physical_to_plane;
use crate::view::bounding_box_view_transform;

/// Result of zooming a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomOutcome {
    pub bounding_box: PlaneRect,
    pub translation: [f64; 2],
}

fn check_zoom_factor(zoom: f64) -> Result<()> {
    if zoom.is_finite() && zoom > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidZoomFactor(zoom))
    }
}

/// Zooms `bbox` by `zoom` around its centre.
///
/// With `translate`, the offset of the physical `anchor` from the box centre
/// (as a fraction of the half extent) is scaled by the extent removed by the
/// zoom, and the shrunk box is shifted by that amount. Zooming in pulls the
/// anchor toward the centre of the view, zooming out pushes it away. Without
/// `translate` the box stays centred and `translation` is returned unchanged.
///
/// `zoom` is a single step and is applied as given. The lower bound on the
/// cumulative zoom (`config.min_zoom`) is kept by [`ZoomPanState::zoom_by`],
/// which shortens the step before calling this.
///
/// # Errors
///
/// [`GeometryError::InvalidZoomFactor`] for a zoom that is not finite and
/// positive. With `translate`, [`GeometryError::ZeroExtent`] for a collapsed
/// box and [`GeometryError::NonFiniteAnchor`] for an anchor with a NaN or
/// infinite coordinate.
pub fn zoom_bounding_box(
    bbox: &PlaneRect,
    translation: [f64; 2],
    anchor: Vector4,
    zoom: f64,
    plane: impl Into<PlaneOrientation>,
    translate: bool,
    config: &ViewConfig,
) -> Result<ZoomOutcome> {
    let plane = plane.into().resolve()?;
    check_zoom_factor(zoom)?;

    let mut translation = translation;
    if translate {
        for (axis, extent) in [bbox.width, bbox.height].into_iter().enumerate() {
            if extent == 0.0 || !extent.is_finite() {
                return Err(GeometryError::ZeroExtent { axis });
            }
        }
        if !anchor.xyz().iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NonFiniteAnchor);
        }
        let (center_x, center_y) = bbox.center();
        let mapped = map_physical_to_plane(anchor, plane) * config.rastering();
        let diff_x = (center_x - mapped[0]) / (bbox.width / 2.0);
        let diff_y = (center_y - mapped[1]) / (bbox.height / 2.0);
        translation = [
            diff_x * ((bbox.width - bbox.width / zoom) / 2.0),
            diff_y * ((bbox.height - bbox.height / zoom) / 2.0),
        ];
    }

    let width = bbox.width / zoom;
    let height = bbox.height / zoom;
    let mut zoomed = PlaneRect::new(
        bbox.x + (bbox.width - width) / 2.0,
        bbox.y + (bbox.height - height) / 2.0,
        width,
        height,
    );
    if translate {
        zoomed.x -= translation[0];
        zoomed.y -= translation[1];
    }

    Ok(ZoomOutcome {
        bounding_box: zoomed,
        translation,
    })
}

/// Cumulative zoom factor and pan offset of a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomPanState {
    zoom: f64,
    translation: [f64; 2],
}

impl Default for ZoomPanState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            translation: [0.0, 0.0],
        }
    }
}

impl ZoomPanState {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn translation(&self) -> [f64; 2] {
        self.translation
    }

    /// Applies a zoom step. The cumulative zoom is clamped at
    /// `config.min_zoom`, which shortens the step accordingly.
    pub fn zoom_by(
        &self,
        factor: f64,
        anchor: Vector4,
        plane: Plane,
        bbox: &PlaneRect,
        translate: bool,
        config: &ViewConfig,
    ) -> Result<(Self, PlaneRect)> {
        check_zoom_factor(factor)?;
        let target = (self.zoom * factor).max(config.min_zoom);
        let step = target / self.zoom;
        let outcome = zoom_bounding_box(bbox, [0.0, 0.0], anchor, step, plane, translate, config)?;
        let next = Self {
            zoom: target,
            translation: [
                self.translation[0] + outcome.translation[0],
                self.translation[1] + outcome.translation[1],
            ],
        };
        Ok((next, outcome.bounding_box))
    }

    /// Shifts the view by `(dx, dy)` rastered plane units.
    pub fn pan_by(&self, bbox: &PlaneRect, dx: f64, dy: f64) -> (Self, PlaneRect) {
        let next = Self {
            zoom: self.zoom,
            translation: [self.translation[0] + dx, self.translation[1] + dy],
        };
        let moved = PlaneRect::new(bbox.x - dx, bbox.y - dy, bbox.width, bbox.height);
        (next, moved)
    }
}

/// Zoom/pan session of one view.
///
/// Owns the state that user gestures mutate. Mutation goes through `&mut self`,
/// so there is a single writer by construction; share it across UI event
/// sources behind a lock.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSession {
    plane: Plane,
    active_image: Option<usize>,
    config: ViewConfig,
    state: ZoomPanState,
    home: PlaneRect,
    bounding_box: PlaneRect,
}

impl ViewSession {
    /// # Errors
    ///
    /// [`GeometryError::InvalidConfiguration`] if `config` does not validate.
    pub fn new(plane: Plane, bounding_box: PlaneRect, config: ViewConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            plane,
            active_image: None,
            config,
            state: ZoomPanState::default(),
            home: bounding_box,
            bounding_box,
        })
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn active_image(&self) -> Option<usize> {
        self.active_image
    }

    pub fn state(&self) -> &ZoomPanState {
        &self.state
    }

    pub fn bounding_box(&self) -> &PlaneRect {
        &self.bounding_box
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Switches plane and resets zoom/pan to the new plane's bounding box.
    pub fn set_plane(&mut self, plane: Plane, bounding_box: PlaneRect) {
        self.plane = plane;
        self.home = bounding_box;
        self.reset();
    }

    /// Switches the active image; zoom/pan is reset when it changes.
    pub fn set_active_image(&mut self, image: usize, bounding_box: PlaneRect) {
        if self.active_image != Some(image) {
            self.active_image = Some(image);
            self.home = bounding_box;
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.state = ZoomPanState::default();
        self.bounding_box = self.home;
    }

    /// Zooms toward the physical `anchor`. On error the session is unchanged.
    pub fn zoom(&mut self, factor: f64, anchor: Vector4, translate: bool) -> Result<&PlaneRect> {
        let (state, bbox) = self.state.zoom_by(
            factor,
            anchor,
            self.plane,
            &self.bounding_box,
            translate,
            &self.config,
        )?;
        self.state = state;
        self.bounding_box = bbox;
        Ok(&self.bounding_box)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> &PlaneRect {
        let (state, bbox) = self.state.pan_by(&self.bounding_box, dx, dy);
        self.state = state;
        self.bounding_box = bbox;
        &self.bounding_box
    }

    /// Screen transform of the current bounding box.
    pub fn view_transform(&self, viewport_width: f64, viewport_height: f64) -> Result<Affine2D> {
        bounding_box_view_transform(&self.bounding_box, viewport_width, viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ViewConfig {
        ViewConfig::default()
    }

    fn zoom_axial(bbox: &PlaneRect, anchor: Vector4, zoom: f64) -> Result<ZoomOutcome> {
        zoom_bounding_box(bbox, [0.0, 0.0], anchor, zoom, Plane::Axial, true, &config())
    }

    #[test]
    fn test_zoom_at_center_scenario() {
        let bbox = PlaneRect::new(0.0, 0.0, 200.0, 200.0);
        let out = zoom_axial(&bbox, Vector4::point(10.0, 10.0, 3.0), 2.0).unwrap();
        assert_eq!(out.translation, [0.0, 0.0]);
        assert_eq!(out.bounding_box, PlaneRect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_zoom_one_is_identity() {
        let bbox = PlaneRect::new(-30.0, 12.0, 140.0, 90.0);
        let anchor = Vector4::point(1.0, -4.0, 2.0);
        let out = zoom_bounding_box(&bbox, [0.0; 2], anchor, 1.0, Plane::Coronal, true, &config())
            .unwrap();
        assert_eq!(out.bounding_box, bbox);
        assert_eq!(out.translation, [0.0, 0.0]);
    }

    #[test]
    fn test_zoom_in_moves_toward_anchor() {
        let bbox = PlaneRect::new(0.0, 0.0, 200.0, 200.0);
        let out = zoom_axial(&bbox, Vector4::point(15.0, 10.0, 0.0), 2.0).unwrap();
        assert_eq!(out.translation, [-25.0, 0.0]);
        assert_eq!(out.bounding_box.center(), (125.0, 100.0));
    }

    #[test]
    fn test_zoom_out_moves_away_from_anchor() {
        let bbox = PlaneRect::new(0.0, 0.0, 200.0, 200.0);
        let out = zoom_axial(&bbox, Vector4::point(15.0, 10.0, 0.0), 0.5).unwrap();
        assert_eq!(out.bounding_box.width, 400.0);
        assert_eq!(out.bounding_box.center(), (50.0, 100.0));
    }

    #[test]
    fn test_zoom_without_translate_keeps_translation() {
        let bbox = PlaneRect::new(0.0, 0.0, 100.0, 50.0);
        let out = zoom_bounding_box(
            &bbox,
            [3.0, 4.0],
            Vector4::zeros(),
            2.0,
            Plane::Sagittal,
            false,
            &config(),
        )
        .unwrap();
        assert_eq!(out.translation, [3.0, 4.0]);
        assert_eq!(out.bounding_box, PlaneRect::new(25.0, 12.5, 50.0, 25.0));
    }

    #[test]
    fn test_zoom_uses_plane_axes_for_anchor() {
        // sagittal plane spans physical y (horizontal) and z (vertical)
        let bbox = PlaneRect::new(0.0, 0.0, 200.0, 200.0);
        let anchor = Vector4::point(99.0, 10.0, 10.0);
        let out = zoom_bounding_box(&bbox, [0.0; 2], anchor, 2.0, Plane::Sagittal, true, &config())
            .unwrap();
        assert_eq!(out.translation, [0.0, 0.0]);
    }

    #[test]
    fn test_invalid_zoom_factor() {
        let bbox = PlaneRect::new(0.0, 0.0, 10.0, 10.0);
        for zoom in [0.0, -1.0, f64::NAN] {
            let err = zoom_axial(&bbox, Vector4::zeros(), zoom);
            assert!(matches!(err, Err(GeometryError::InvalidZoomFactor(_))));
        }
    }

    #[test]
    fn test_zero_extent_with_translate() {
        let bbox = PlaneRect::new(0.0, 0.0, 0.0, 10.0);
        let err = zoom_axial(&bbox, Vector4::zeros(), 2.0);
        assert_eq!(err.unwrap_err(), GeometryError::ZeroExtent { axis: 0 });
    }

    #[test]
    fn test_non_finite_anchor_is_rejected() {
        let bbox = PlaneRect::new(0.0, 0.0, 200.0, 200.0);
        for anchor in [
            Vector4::point(f64::NAN, 0.0, 0.0),
            Vector4::point(0.0, f64::INFINITY, 0.0),
        ] {
            let err = zoom_axial(&bbox, anchor, 2.0);
            assert_eq!(err.unwrap_err(), GeometryError::NonFiniteAnchor);
        }
        // the anchor is not used without translate
        let anchor = Vector4::point(f64::NAN, 0.0, 0.0);
        let out = zoom_bounding_box(&bbox, [0.0; 2], anchor, 2.0, Plane::Axial, false, &config())
            .unwrap();
        assert_eq!(out.bounding_box, PlaneRect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_single_step_is_not_clamped() {
        let bbox = PlaneRect::new(0.0, 0.0, 100.0, 100.0);
        let config = ViewConfig {
            min_zoom: 0.5,
            ..Default::default()
        };
        let out =
            zoom_bounding_box(&bbox, [0.0; 2], Vector4::zeros(), 0.25, Plane::Axial, false, &config)
                .unwrap();
        assert_eq!(out.bounding_box.width, 400.0);
    }

    #[test]
    fn test_state_clamps_to_min_zoom() {
        let bbox = PlaneRect::new(0.0, 0.0, 100.0, 100.0);
        let config = ViewConfig {
            min_zoom: 0.5,
            ..Default::default()
        };
        let (state, zoomed) = ZoomPanState::default()
            .zoom_by(0.1, Vector4::zeros(), Plane::Axial, &bbox, false, &config)
            .unwrap();
        assert_eq!(state.zoom(), 0.5);
        assert_eq!(zoomed.width, 200.0);

        let (state, zoomed) = state
            .zoom_by(1e-300, Vector4::zeros(), Plane::Axial, &zoomed, false, &config)
            .unwrap();
        assert_eq!(state.zoom(), 0.5);
        assert_eq!(zoomed.width, 200.0);
    }

    #[test]
    fn test_session_resets_on_plane_change() {
        let home = PlaneRect::new(0.0, 0.0, 200.0, 200.0);
        let mut session = ViewSession::new(Plane::Axial, home, config()).unwrap();
        session.zoom(2.0, Vector4::point(15.0, 10.0, 0.0), true).unwrap();
        session.pan(5.0, -5.0);
        assert_eq!(session.state().zoom(), 2.0);
        assert_eq!(session.state().translation(), [-20.0, -5.0]);

        let sagittal = PlaneRect::new(0.0, 0.0, 300.0, 100.0);
        session.set_plane(Plane::Sagittal, sagittal);
        assert_eq!(session.state(), &ZoomPanState::default());
        assert_eq!(session.bounding_box(), &sagittal);
    }

    #[test]
    fn test_session_resets_on_image_change_only() {
        let home = PlaneRect::new(0.0, 0.0, 100.0, 100.0);
        let mut session = ViewSession::new(Plane::Coronal, home, config()).unwrap();
        session.set_active_image(1, home);
        session.pan(10.0, 0.0);
        session.set_active_image(1, home);
        assert_eq!(session.state().translation(), [10.0, 0.0]);
        session.set_active_image(2, home);
        assert_eq!(session.state().translation(), [0.0, 0.0]);
        assert_eq!(session.active_image(), Some(2));
    }

    #[test]
    fn test_failed_zoom_leaves_session_untouched() {
        let home = PlaneRect::new(0.0, 0.0, 100.0, 100.0);
        let mut session = ViewSession::new(Plane::Axial, home, config()).unwrap();
        assert!(session.zoom(-2.0, Vector4::zeros(), true).is_err());
        assert_eq!(session.bounding_box(), &home);
        assert_eq!(session.state().zoom(), 1.0);
    }

    #[test]
    fn test_nan_anchor_leaves_session_untouched() {
        let home = PlaneRect::new(0.0, 0.0, 200.0, 200.0);
        let mut session = ViewSession::new(Plane::Axial, home, config()).unwrap();
        session.zoom(2.0, Vector4::point(10.0, 10.0, 0.0), true).unwrap();
        let before = session.clone();

        let err = session.zoom(2.0, Vector4::point(f64::NAN, 0.0, 0.0), true);
        assert_eq!(err.unwrap_err(), GeometryError::NonFiniteAnchor);
        assert_eq!(session, before);
        assert_eq!(session.bounding_box(), &PlaneRect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_session_view_transform() {
        let home = PlaneRect::new(0.0, 0.0, 200.0, 200.0);
        let mut session = ViewSession::new(Plane::Axial, home, config()).unwrap();
        session.zoom(2.0, Vector4::point(10.0, 10.0, 0.0), true).unwrap();
        let t = session.view_transform(400.0, 400.0).unwrap();
        assert_eq!(t.map(50.0, 50.0), (0.0, 0.0));
        assert_eq!(t.map(150.0, 150.0), (400.0, 400.0));
    }
}
