use super::DeviceError;

/// The platform's native backend.
pub fn native_backend() -> wgpu::Backend {
    if cfg!(target_os = "windows") {
        wgpu::Backend::Dx12
    } else if cfg!(any(target_os = "macos", target_os = "ios")) {
        wgpu::Backend::Metal
    } else {
        wgpu::Backend::Vulkan
    }
}

/// Instance backend set that asks for `backend` only.
///
/// wgpu may still hand back a different adapter on some platforms; the hint is
/// checked after creation with [`verify_adapter`].
pub fn hint_for(backend: wgpu::Backend) -> wgpu::Backends {
    match backend {
        wgpu::Backend::Vulkan => wgpu::Backends::VULKAN,
        wgpu::Backend::Metal => wgpu::Backends::METAL,
        wgpu::Backend::Dx12 => wgpu::Backends::DX12,
        wgpu::Backend::Gl => wgpu::Backends::GL,
        wgpu::Backend::BrowserWebGpu => wgpu::Backends::BROWSER_WEBGPU,
        _ => wgpu::Backends::all(),
    }
}

/// Checks the identity of an acquired adapter.
pub fn verify_adapter(
    required: Option<wgpu::Backend>,
    require_hardware: bool,
    actual: wgpu::Backend,
    device_type: wgpu::DeviceType,
) -> Result<(), DeviceError> {
    if let Some(required) = required {
        if required != actual {
            return Err(DeviceError::BackendMismatch { required, actual });
        }
    }

    if require_hardware && device_type == wgpu::DeviceType::Cpu {
        return Err(DeviceError::NotAccelerated { device_type });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_backend_passes() {
        let r = verify_adapter(
            Some(wgpu::Backend::Vulkan),
            true,
            wgpu::Backend::Vulkan,
            wgpu::DeviceType::DiscreteGpu,
        );
        assert!(r.is_ok());
    }

    #[test]
    fn mismatched_backend_is_fatal() {
        let err = verify_adapter(
            Some(wgpu::Backend::Dx12),
            true,
            wgpu::Backend::Gl,
            wgpu::DeviceType::IntegratedGpu,
        )
        .unwrap_err();

        match err {
            DeviceError::BackendMismatch { required, actual } => {
                assert_eq!(required, wgpu::Backend::Dx12);
                assert_eq!(actual, wgpu::Backend::Gl);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn no_requirement_accepts_any_backend() {
        for backend in [wgpu::Backend::Vulkan, wgpu::Backend::Metal, wgpu::Backend::Gl] {
            assert!(verify_adapter(None, false, backend, wgpu::DeviceType::Other).is_ok());
        }
    }

    #[test]
    fn software_adapter_rejected_when_hardware_required() {
        let err = verify_adapter(None, true, wgpu::Backend::Vulkan, wgpu::DeviceType::Cpu)
            .unwrap_err();
        assert!(matches!(err, DeviceError::NotAccelerated { .. }));

        assert!(verify_adapter(None, false, wgpu::Backend::Vulkan, wgpu::DeviceType::Cpu).is_ok());
    }

    #[test]
    fn hint_contains_requested_backend() {
        assert_eq!(hint_for(wgpu::Backend::Dx12), wgpu::Backends::DX12);
        assert_eq!(hint_for(wgpu::Backend::Metal), wgpu::Backends::METAL);
        assert!(hint_for(native_backend()).bits().count_ones() >= 1);
    }
}
