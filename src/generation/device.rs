use std::path::Path;

use crate::models::ComputeDevice;

const NVIDIA_MARKERS: [&str; 2] = ["/proc/driver/nvidia/version", "/dev/nvidia0"];

/// Configured device wins; otherwise CUDA when an NVIDIA driver is visible.
pub fn select_device(preferred: Option<ComputeDevice>) -> ComputeDevice {
    if let Some(device) = preferred {
        return device;
    }
    if cuda_available() {
        ComputeDevice::Cuda
    } else {
        ComputeDevice::Cpu
    }
}

pub fn cuda_available() -> bool {
    NVIDIA_MARKERS.iter().any(|marker| Path::new(marker).exists())
}
