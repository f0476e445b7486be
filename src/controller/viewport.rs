//! Device emulation inside the host's preview container.

use crate::channel::Viewport;
use crate::settings::Device;

/// Emulated screen size for a device. Desktop has none: it fills the
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub width: u32,
    pub height: u32,
}

impl DeviceProfile {
    pub const MOBILE: Self = Self { width: 375, height: 667 };
    pub const TABLET: Self = Self { width: 768, height: 1024 };

    pub const fn for_device(device: Device) -> Option<Self> {
        match device {
            Device::Desktop => None,
            Device::Tablet => Some(Self::TABLET),
            Device::Mobile => Some(Self::MOBILE),
        }
    }

    /// Uniform scale fitting this profile into the container, never above 1.
    pub fn scale_in(self, container_width: u32, container_height: u32) -> f64 {
        let sx = f64::from(container_width) / f64::from(self.width);
        let sy = f64::from(container_height) / f64::from(self.height);
        sx.min(sy).min(1.0)
    }
}

/// Viewport for `device` in a container of the given size.
pub fn viewport_for(device: Device, container_width: u32, container_height: u32) -> Viewport {
    match DeviceProfile::for_device(device) {
        Some(profile) => Viewport {
            width: profile.width,
            height: profile.height,
            scale: profile.scale_in(container_width, container_height),
        },
        None => Viewport {
            width: container_width,
            height: container_height,
            scale: 1.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_fills_container() {
        let viewport = viewport_for(Device::Desktop, 1440, 900);
        assert_eq!((viewport.width, viewport.height, viewport.scale), (1440, 900, 1.0));
    }

    #[test]
    fn test_scale_fits_smaller_side() {
        let viewport = viewport_for(Device::Tablet, 800, 512);
        assert_eq!((viewport.width, viewport.height), (768, 1024));
        assert!((viewport.scale - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_scale_never_exceeds_one() {
        for device in Device::ALL {
            for (w, h) in [(0, 0), (320, 480), (1920, 1080), (4000, 4000)] {
                let scale = viewport_for(device, w, h).scale;
                assert!((0.0..=1.0).contains(&scale), "{device} {w}x{h}: {scale}");
            }
        }
        assert_eq!(DeviceProfile::MOBILE.scale_in(3000, 3000), 1.0);
    }
}
