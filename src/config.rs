//! Server configuration loaded from environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `SLIDECAST_ADDR` | `0.0.0.0:3000` |
//! | `SLIDECAST_GATE_CODE` | `1234` |
//! | `SLIDECAST_SAMPLE_IMAGES` | five `/slides/image*.png` entries, comma separated |
//! | `SLIDECAST_SLIDES_DIR` | `public/slides` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Result, SlidecastError};

pub const ENV_ADDR: &str = "SLIDECAST_ADDR";
pub const ENV_GATE_CODE: &str = "SLIDECAST_GATE_CODE";
pub const ENV_SAMPLE_IMAGES: &str = "SLIDECAST_SAMPLE_IMAGES";
pub const ENV_SLIDES_DIR: &str = "SLIDECAST_SLIDES_DIR";

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_GATE_CODE: &str = "1234";
pub const DEFAULT_SLIDES_DIR: &str = "public/slides";

/// Images offered on the admin page when nothing else is configured
pub const DEFAULT_SAMPLE_IMAGES: [&str; 5] = [
    "/slides/image.png",
    "/slides/image (1).png",
    "/slides/image (2).png",
    "/slides/image (3).png",
    "/slides/image (4).png",
];

/// Deployment-time settings for the HTTP/WebSocket server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub addr: SocketAddr,
    /// Code the admin page asks for before connecting (checked in the browser only)
    pub gate_code: String,
    /// Image URLs offered as one-click choices on the admin page
    pub sample_images: Vec<String>,
    /// Directory served under `/slides`
    pub slides_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            gate_code: DEFAULT_GATE_CODE.to_string(),
            sample_images: DEFAULT_SAMPLE_IMAGES.iter().map(|s| s.to_string()).collect(),
            slides_dir: PathBuf::from(DEFAULT_SLIDES_DIR),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_ADDR) {
            config.addr = addr
                .trim()
                .parse::<SocketAddr>()
                .map_err(|source| SlidecastError::InvalidAddress {
                    value: addr.clone(),
                    source,
                })?;
        }

        if let Some(code) = lookup(ENV_GATE_CODE) {
            config.gate_code = validate_gate_code(code.trim())?;
        }

        if let Some(list) = lookup(ENV_SAMPLE_IMAGES) {
            config.sample_images = parse_image_list(&list);
        }

        if let Some(dir) = lookup(ENV_SLIDES_DIR) {
            if !dir.trim().is_empty() {
                config.slides_dir = PathBuf::from(dir.trim());
            }
        }

        Ok(config)
    }
}

/// Accept only four ASCII digits
pub fn validate_gate_code(code: &str) -> Result<String> {
    if code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(code.to_string())
    } else {
        Err(SlidecastError::InvalidGateCode(code.to_string()))
    }
}

/// Split a comma separated list, dropping blank entries
fn parse_image_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
