//! Conversions between continuous viewport spans and discrete zoom levels.
//!
//! Map views describe the camera with degree spans while the index works with
//! integer slippy-map zooms, where each increment doubles the resolution.

use crate::error::{ClusterError, Result};

/// Discrete zoom for a viewport showing `longitude_span` degrees:
/// `floor(log2(360 / longitude_span))`.
///
/// Spans wider than the world give negative zooms, which index queries clamp.
///
/// # Examples
///
/// ```
/// use spatio_cluster::compute::zoom::zoom_for_viewport;
///
/// assert_eq!(zoom_for_viewport(360.0).unwrap(), 0);
/// assert_eq!(zoom_for_viewport(0.0421).unwrap(), 13);
/// assert!(zoom_for_viewport(0.0).is_err());
/// ```
pub fn zoom_for_viewport(longitude_span: f64) -> Result<i32> {
    if !longitude_span.is_finite() || longitude_span <= 0.0 {
        return Err(ClusterError::InvalidInput(format!(
            "Longitude span must be positive and finite, got: {}",
            longitude_span
        )));
    }

    let zoom = (360.0 / longitude_span).log2().floor();
    Ok(zoom as i32)
}

/// Span to show after moving the camera from `from_zoom` to `to_zoom`:
/// `current_span / 2^(to_zoom - from_zoom)`.
///
/// # Examples
///
/// ```
/// use spatio_cluster::compute::zoom::scale_span;
///
/// assert_eq!(scale_span(0.08, 12, 14), 0.02);
/// assert_eq!(scale_span(0.08, 12, 12), 0.08);
/// ```
pub fn scale_span(current_span: f64, from_zoom: i32, to_zoom: i32) -> f64 {
    current_span / 2f64.powi(to_zoom - from_zoom)
}

/// Longitude span that [`zoom_for_viewport`] maps exactly onto `zoom`.
pub fn span_for_zoom(zoom: i32) -> f64 {
    360.0 / 2f64.powi(zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_for_viewport_levels() {
        assert_eq!(zoom_for_viewport(360.0).unwrap(), 0);
        assert_eq!(zoom_for_viewport(180.0).unwrap(), 1);
        assert_eq!(zoom_for_viewport(179.0).unwrap(), 1);
        assert_eq!(zoom_for_viewport(181.0).unwrap(), 0);
        assert_eq!(zoom_for_viewport(0.01).unwrap(), 15);
        assert_eq!(zoom_for_viewport(720.0).unwrap(), -1);
    }

    #[test]
    fn test_zoom_for_viewport_rejects_degenerate_spans() {
        assert!(zoom_for_viewport(0.0).is_err());
        assert!(zoom_for_viewport(-1.0).is_err());
        assert!(zoom_for_viewport(f64::NAN).is_err());
        assert!(zoom_for_viewport(f64::INFINITY).is_err());
    }

    #[test]
    fn test_scale_span_identity_on_current_zoom() {
        for span in [0.0042, 0.0421, 1.5, 90.0, 360.0] {
            let zoom = zoom_for_viewport(span).unwrap();
            assert_eq!(scale_span(span, zoom, zoom), span);
        }
    }

    #[test]
    fn test_scale_span_direction() {
        assert_eq!(scale_span(1.0, 10, 11), 0.5);
        assert_eq!(scale_span(1.0, 10, 8), 4.0);
    }

    #[test]
    fn test_span_for_zoom_roundtrip() {
        for zoom in 0..=22 {
            assert_eq!(zoom_for_viewport(span_for_zoom(zoom)).unwrap(), zoom);
        }
    }
}
