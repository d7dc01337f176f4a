use ini::{Ini, ParseOption, Properties};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::overlay::{Overlay, OverlayKind, Placement};

/// Directories and files the watermarker reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Videos waiting to be watermarked
    pub source_dir: PathBuf,
    /// Destination of watermarked videos
    pub output_dir: PathBuf,
    /// Logo images referenced by the `Logo` section
    pub logos_dir: PathBuf,
    /// The overlay settings file
    pub config_file: PathBuf,
}

impl Layout {
    pub fn from_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            source_dir: base.join("tobewatermarked"),
            output_dir: base.join("watermarked"),
            logos_dir: base.join("logos"),
            config_file: base.join("overlays.ini"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read overlay configuration {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    #[error("Failed to parse overlay configuration: {0}")]
    Parse(#[from] ini::ParseError),
    #[error("Section [{0}] is missing from the overlay configuration")]
    MissingSection(&'static str),
    #[error("Key \"{key}\" is missing from section [{section}]")]
    MissingKey { section: &'static str, key: &'static str },
    #[error("Key \"{key}\" in section [{section}] has invalid value \"{value}\"")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}

// Values are taken verbatim: marquee text and logo paths may carry quotes or backslashes.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    }
}

/// Overlay settings file with one section per overlay kind
pub struct OverlayConfig {
    ini: Ini,
}

impl OverlayConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ini = Ini::load_from_file_opt(path, parse_option()).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded overlay configuration from {:?}", path);
        Ok(Self { ini })
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            ini: Ini::load_from_str_opt(contents, parse_option())?,
        })
    }

    /// Build the overlay of the requested kind from its section
    pub fn overlay(&self, kind: OverlayKind) -> Result<Overlay, ConfigError> {
        let section = Section::find(&self.ini, kind.section())?;

        let overlay = match kind {
            OverlayKind::Marquee => Overlay::marquee(
                section.required("marquee")?,
                section.number_or("size", Overlay::DEFAULT_MARQUEE_SIZE)?,
                section
                    .get("color")
                    .unwrap_or(Overlay::DEFAULT_MARQUEE_COLOR),
            ),
            OverlayKind::Logo => Overlay::logo(section.required("logoFileName")?),
        };

        let defaults = Placement::default();
        let placement = Placement {
            x: section.number_or("x", defaults.x)?,
            y: section.number_or("y", defaults.y)?,
            position: section.number_or("position", defaults.position)?,
            opacity: section.number_or("opacity", defaults.opacity)?,
        };

        Ok(overlay.with_placement(placement))
    }
}

struct Section<'a> {
    name: &'static str,
    properties: &'a Properties,
}

impl<'a> Section<'a> {
    fn find(ini: &'a Ini, name: &'static str) -> Result<Self, ConfigError> {
        ini.iter()
            .find(|(section, _)| section.is_some_and(|s| s == name))
            .map(|(_, properties)| Section { name, properties })
            .ok_or(ConfigError::MissingSection(name))
    }

    // Keys are matched case-insensitively, like most INI readers do.
    fn get(&self, key: &str) -> Option<&'a str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.trim())
    }

    fn required(&self, key: &'static str) -> Result<&'a str, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingKey {
            section: self.name,
            key,
        })
    }

    fn number_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                section: self.name,
                key,
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayContent;

    const SAMPLE: &str = "\
[Marquee]
marquee = Hello there
size = 42
color = 0xFF0000
x = 10
y = 15
position = 6
opacity = 200

[Logo]
logoFileName = brand.png
x = 30
y = 40
position = 9
opacity = 128
";

    #[test]
    fn test_marquee_section() {
        let config = OverlayConfig::parse(SAMPLE).unwrap();
        let overlay = config.overlay(OverlayKind::Marquee).unwrap();

        assert_eq!(
            overlay.content,
            OverlayContent::Marquee {
                text: "Hello there".to_string(),
                size: 42,
                color: "0xFF0000".to_string(),
            }
        );
        assert_eq!(
            overlay.placement,
            Placement {
                x: 10,
                y: 15,
                position: 6,
                opacity: 200,
            }
        );
    }

    #[test]
    fn test_logo_section() {
        let config = OverlayConfig::parse(SAMPLE).unwrap();
        let overlay = config.overlay(OverlayKind::Logo).unwrap();

        assert_eq!(overlay.kind(), OverlayKind::Logo);
        assert_eq!(
            overlay.content,
            OverlayContent::Logo {
                file_name: "brand.png".to_string()
            }
        );
        assert_eq!(overlay.placement.opacity, 128);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let config = OverlayConfig::parse("[Logo]\nlogofilename = a.png\n").unwrap();
        let overlay = config.overlay(OverlayKind::Logo).unwrap();
        assert_eq!(overlay.placement, Placement::default());
    }

    #[test]
    fn test_values_are_taken_verbatim() {
        let config = OverlayConfig::parse(
            "[Marquee]\nmarquee = \"Quoted\"\n\n[Logo]\nlogoFileName = C:\\logos\\a.png\n",
        )
        .unwrap();

        match config.overlay(OverlayKind::Marquee).unwrap().content {
            OverlayContent::Marquee { text, .. } => assert_eq!(text, r#""Quoted""#),
            other => panic!("unexpected content {other:?}"),
        }
        match config.overlay(OverlayKind::Logo).unwrap().content {
            OverlayContent::Logo { file_name } => assert_eq!(file_name, r"C:\logos\a.png"),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_missing_values() {
        let config = OverlayConfig::parse("[Logo]\nx = 1\n").unwrap();
        assert!(matches!(
            config.overlay(OverlayKind::Logo),
            Err(ConfigError::MissingKey {
                key: "logoFileName",
                ..
            })
        ));
        assert!(matches!(
            config.overlay(OverlayKind::Marquee),
            Err(ConfigError::MissingSection("Marquee"))
        ));
    }

    #[test]
    fn test_invalid_number() {
        let config = OverlayConfig::parse("[Logo]\nlogoFileName = a.png\nopacity = 300\n").unwrap();
        assert!(matches!(
            config.overlay(OverlayKind::Logo),
            Err(ConfigError::InvalidValue { key: "opacity", .. })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::from_base(dir.path());
        std::fs::write(&layout.config_file, SAMPLE).unwrap();

        let config = OverlayConfig::load(&layout.config_file).unwrap();
        assert!(config.overlay(OverlayKind::Marquee).is_ok());

        let missing = OverlayConfig::load(dir.path().join("nope.ini"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_layout_from_base() {
        let layout = Layout::from_base("/srv/wm");
        assert_eq!(layout.source_dir, PathBuf::from("/srv/wm/tobewatermarked"));
        assert_eq!(layout.output_dir, PathBuf::from("/srv/wm/watermarked"));
        assert_eq!(layout.logos_dir, PathBuf::from("/srv/wm/logos"));
        assert_eq!(layout.config_file, PathBuf::from("/srv/wm/overlays.ini"));
    }
}
