use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository the node images are published under
pub const NODE_IMAGE_REPOSITORY: &str = "ritualnetwork/infernet-node";

/// Tag used when none is given
pub const DEFAULT_IMAGE_TAG: &str = "1.2.0";

/// Image build variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageVariant {
    /// Default CPU image
    #[default]
    Cpu,
    /// CUDA-enabled image, tagged with a `-gpu` suffix
    Gpu,
}

/// Reference to a published node container image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeImage {
    /// Image tag without the variant suffix
    pub tag: String,

    /// Build variant
    #[serde(default)]
    pub variant: ImageVariant,
}

impl NodeImage {
    /// CPU image for `tag`
    #[must_use]
    pub fn cpu(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            variant: ImageVariant::Cpu,
        }
    }

    /// GPU image for `tag`
    #[must_use]
    pub fn gpu(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            variant: ImageVariant::Gpu,
        }
    }

    /// Full tag including the variant suffix
    #[must_use]
    pub fn full_tag(&self) -> String {
        match self.variant {
            ImageVariant::Cpu => self.tag.clone(),
            ImageVariant::Gpu => format!("{}-gpu", self.tag),
        }
    }
}

impl Default for NodeImage {
    fn default() -> Self {
        Self::cpu(DEFAULT_IMAGE_TAG)
    }
}

impl fmt::Display for NodeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NODE_IMAGE_REPOSITORY}:{}", self.full_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_image() {
        assert_eq!(
            NodeImage::default().to_string(),
            "ritualnetwork/infernet-node:1.2.0"
        );
    }

    #[test]
    fn test_gpu_image_suffix() {
        assert_eq!(
            NodeImage::gpu("1.3.0").to_string(),
            "ritualnetwork/infernet-node:1.3.0-gpu"
        );
        assert_eq!(NodeImage::cpu("dev").full_tag(), "dev");
    }
}
