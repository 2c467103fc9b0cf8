//! `screenDisplay`: screen geometry, viewport, density and media features.

use crate::host::{EnvironmentProvider, HostError, ScreenOrientation};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DARK_MODE_QUERY: &str = "(prefers-color-scheme: dark)";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const HIGH_CONTRAST_QUERY: &str = "(prefers-contrast: more)";
pub const HDR_QUERY: &str = "(dynamic-range: high)";
pub const GAMUT_SRGB_QUERY: &str = "(color-gamut: srgb)";
pub const GAMUT_P3_QUERY: &str = "(color-gamut: p3)";
pub const GAMUT_REC2020_QUERY: &str = "(color-gamut: rec2020)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenGeometry {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub avail_width: Option<u32>,
    pub avail_height: Option<u32>,
    pub color_depth: Option<u32>,
    pub pixel_depth: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub inner_width: Option<u32>,
    pub inner_height: Option<u32>,
    pub outer_width: Option<u32>,
    pub outer_height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Density {
    pub device_pixel_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPreferences {
    pub dark_mode: bool,
    pub reduced_motion: bool,
    pub high_contrast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorGamut {
    pub srgb: bool,
    pub p3: bool,
    pub rec2020: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSupport {
    pub hdr: bool,
    pub gamut: ColorGamut,
}

/// Screen and display characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenDisplay {
    pub screen: ScreenGeometry,
    pub viewport: Viewport,
    pub density: Density,
    /// `null` when the host has no orientation API or it fails
    pub orientation: Option<ScreenOrientation>,
    pub preferences: DisplayPreferences,
    pub color: ColorSupport,
}

pub fn screen_display(host: &dyn EnvironmentProvider) -> Result<ScreenDisplay, HostError> {
    let screen = host.screen()?;
    let viewport = host.viewport()?;

    // Orientation is the one soft-fail field.
    let orientation = match host.orientation() {
        Ok(orientation) => Some(orientation),
        Err(e) => {
            debug!(error = %e, "Orientation lookup failed, reporting null");
            None
        }
    };

    Ok(ScreenDisplay {
        screen: ScreenGeometry {
            width: screen.width,
            height: screen.height,
            avail_width: screen.avail_width,
            avail_height: screen.avail_height,
            color_depth: screen.color_depth,
            pixel_depth: screen.pixel_depth,
        },
        viewport: Viewport {
            inner_width: viewport.inner_width,
            inner_height: viewport.inner_height,
            outer_width: viewport.outer_width,
            outer_height: viewport.outer_height,
        },
        density: Density {
            device_pixel_ratio: viewport
                .device_pixel_ratio
                .filter(|r| *r > 0.0)
                .unwrap_or(1.0),
        },
        orientation,
        preferences: DisplayPreferences {
            dark_mode: host.match_media(DARK_MODE_QUERY)?,
            reduced_motion: host.match_media(REDUCED_MOTION_QUERY)?,
            high_contrast: host.match_media(HIGH_CONTRAST_QUERY)?,
        },
        color: ColorSupport {
            hdr: host.match_media(HDR_QUERY)?,
            gamut: ColorGamut {
                srgb: host.match_media(GAMUT_SRGB_QUERY)?,
                p3: host.match_media(GAMUT_P3_QUERY)?,
                rec2020: host.match_media(GAMUT_REC2020_QUERY)?,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostApi, StaticHost};

    #[test]
    fn test_orientation_soft_fails() {
        let host = StaticHost::default();
        assert!(screen_display(&host).unwrap().orientation.is_none());

        host.update(|h| {
            h.orientation = Some(ScreenOrientation {
                orientation_type: "landscape-primary".to_string(),
                angle: 0,
            })
        });
        host.fail(HostApi::Orientation);
        assert!(screen_display(&host).unwrap().orientation.is_none());

        host.restore(HostApi::Orientation);
        let orientation = screen_display(&host).unwrap().orientation.unwrap();
        assert_eq!(orientation.orientation_type, "landscape-primary");
    }

    #[test]
    fn test_media_features() {
        let host = StaticHost::from_json(
            r#"{"matchingMedia": [
                "(prefers-color-scheme: dark)",
                "(color-gamut: srgb)",
                "(color-gamut: p3)"
            ]}"#,
        )
        .unwrap();
        let display = screen_display(&host).unwrap();

        assert!(display.preferences.dark_mode);
        assert!(!display.preferences.reduced_motion);
        assert!(!display.color.hdr);
        assert!(display.color.gamut.srgb);
        assert!(display.color.gamut.p3);
        assert!(!display.color.gamut.rec2020);
    }

    #[test]
    fn test_device_pixel_ratio_defaults_to_one() {
        let host = StaticHost::default();
        assert_eq!(screen_display(&host).unwrap().density.device_pixel_ratio, 1.0);

        host.update(|h| h.viewport.device_pixel_ratio = Some(2.0));
        assert_eq!(screen_display(&host).unwrap().density.device_pixel_ratio, 2.0);
    }

    #[test]
    fn test_match_media_failure_propagates() {
        let host = StaticHost::default();
        host.fail(HostApi::MatchMedia);
        assert_eq!(
            screen_display(&host).unwrap_err().api(),
            HostApi::MatchMedia
        );
    }

    #[test]
    fn test_orientation_serializes_type() {
        let host = StaticHost::default();
        host.update(|h| {
            h.orientation = Some(ScreenOrientation {
                orientation_type: "portrait-primary".to_string(),
                angle: 90,
            })
        });
        let json = serde_json::to_value(screen_display(&host).unwrap()).unwrap();
        assert_eq!(json["orientation"]["type"], "portrait-primary");
        assert_eq!(json["orientation"]["angle"], 90);
        assert!(json["screen"]["width"].is_null());
    }
}
