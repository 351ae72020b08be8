use super::SurfaceErrorAction;

/// First supported format, or an sRGB one when asked for and available.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = formats.first().copied()?;
    let wanted = |f: &wgpu::TextureFormat| f.is_srgb() == prefer_srgb;

    // Same channel order as the first format, with the requested encoding.
    let matching = if prefer_srgb {
        first.add_srgb_suffix()
    } else {
        first.remove_srgb_suffix()
    };
    if formats.contains(&matching) {
        return Some(matching);
    }
    Some(formats.iter().copied().find(wanted).unwrap_or(first))
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
