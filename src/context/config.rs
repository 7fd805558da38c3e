use std::env;

pub const DEFAULT_CONTAINER_TOOL: &str = "podman";
pub const DEFAULT_IMAGE_TAG: &str = "whisper-transcriber";

/// Runtime configuration for container invocations.
///
/// Resolution priority (highest to lowest):
/// 1. CLI flag
/// 2. Environment variable (`SCRIB_CONTAINER_TOOL`, `SCRIB_IMAGE_TAG`)
/// 3. Default fallback
#[derive(Debug, Clone)]
pub struct ScribConfig {
    pub container_tool: String,
    pub image_tag: String,
}

impl ScribConfig {
    pub fn resolve(container_tool: Option<String>, image_tag: Option<String>) -> Self {
        Self {
            container_tool: resolve_setting(
                container_tool,
                env::var("SCRIB_CONTAINER_TOOL").ok(),
                DEFAULT_CONTAINER_TOOL,
            ),
            image_tag: resolve_setting(
                image_tag,
                env::var("SCRIB_IMAGE_TAG").ok(),
                DEFAULT_IMAGE_TAG,
            ),
        }
    }
}

impl Default for ScribConfig {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

fn resolve_setting(flag: Option<String>, env_value: Option<String>, default: &str) -> String {
    flag.or(env_value)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_env() {
        assert_eq!(
            resolve_setting(
                Some("docker".to_string()),
                Some("podman".to_string()),
                DEFAULT_CONTAINER_TOOL
            ),
            "docker"
        );
    }

    #[test]
    fn test_env_wins_over_default() {
        assert_eq!(
            resolve_setting(None, Some("docker".to_string()), DEFAULT_CONTAINER_TOOL),
            "docker"
        );
    }

    #[test]
    fn test_default_when_unset_or_blank() {
        assert_eq!(
            resolve_setting(None, None, DEFAULT_CONTAINER_TOOL),
            "podman"
        );
        assert_eq!(
            resolve_setting(Some("  ".to_string()), None, DEFAULT_IMAGE_TAG),
            "whisper-transcriber"
        );
    }
}
