/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode. FIFO is supported everywhere and fine for an inspector.
    pub present_mode: wgpu::PresentMode,

    /// Power preference used when picking an adapter.
    pub power_preference: wgpu::PowerPreference,

    /// Limits requested from the device. Downlevel defaults keep GL/WebGL
    /// adapters usable, which is where captured buffers usually come from.
    pub required_limits: wgpu::Limits,

    /// Hint for the surface's frame queue depth.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            power_preference: wgpu::PowerPreference::LowPower,
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
