use winit::dpi::PhysicalSize;

/// First sRGB 8-bit BGRA/RGBA format if preferred and offered, else the
/// surface's first format.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }
    Some(first)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Copies a new size into `config`; returns `false` for a 0×0 (minimized)
/// size, which wgpu cannot configure.
pub(crate) fn resize_config(config: &mut wgpu::SurfaceConfiguration, size: PhysicalSize<u32>) -> bool {
    if size.width == 0 || size.height == 0 {
        return false;
    }
    config.width = size.width;
    config.height = size.height;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat], alpha: &[wgpu::CompositeAlphaMode]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            alpha_modes: alpha.to_vec(),
            ..Default::default()
        }
    }

    fn config() -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            width: 640,
            height: 480,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    // ── format ─────────────────────────────────────────────────────────────

    #[test]
    fn srgb_is_preferred_when_offered() {
        let c = caps(
            &[wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Rgba8UnormSrgb],
            &[],
        );
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn first_format_when_no_srgb() {
        let c = caps(&[wgpu::TextureFormat::Rgba16Float], &[]);
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Rgba16Float));
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&caps(&[], &[]), true), None);
    }

    // ── alpha ──────────────────────────────────────────────────────────────

    #[test]
    fn unsupported_alpha_request_falls_back() {
        let c = caps(&[], &[wgpu::CompositeAlphaMode::Opaque]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&caps(&[], &[]), None), wgpu::CompositeAlphaMode::Auto);
    }

    // ── resize ─────────────────────────────────────────────────────────────

    #[test]
    fn zero_size_leaves_config_untouched() {
        let mut cfg = config();
        assert!(!resize_config(&mut cfg, PhysicalSize::new(0, 300)));
        assert_eq!((cfg.width, cfg.height), (640, 480));
        assert!(resize_config(&mut cfg, PhysicalSize::new(800, 600)));
        assert_eq!((cfg.width, cfg.height), (800, 600));
    }
}
