use std::fmt;
use std::str::FromStr;

/// Compute device the diffusion pipeline runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeDevice {
    Cuda,
    Cpu,
}

impl ComputeDevice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeDevice::Cuda => "cuda",
            ComputeDevice::Cpu => "cpu",
        }
    }

    pub fn is_accelerated(&self) -> bool {
        matches!(self, ComputeDevice::Cuda)
    }
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputeDevice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cuda" | "gpu" => Ok(ComputeDevice::Cuda),
            "cpu" => Ok(ComputeDevice::Cpu),
            other => Err(format!("unknown device '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Half,
    Full,
}

impl Precision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Half => "float16",
            Precision::Full => "float32",
        }
    }
}

/// Options the model is loaded with. Memory savers are only switched on
/// for accelerated devices.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub model_id: String,
    pub device: ComputeDevice,
    pub precision: Precision,
    pub attention_slicing: bool,
    pub cpu_offload: bool,
    pub safety_checker: bool,
}

impl PipelineSettings {
    pub fn for_device(model_id: impl Into<String>, device: ComputeDevice) -> Self {
        let accelerated = device.is_accelerated();
        Self {
            model_id: model_id.into(),
            device,
            precision: if accelerated {
                Precision::Half
            } else {
                Precision::Full
            },
            attention_slicing: accelerated,
            cpu_offload: accelerated,
            safety_checker: false,
        }
    }
}
