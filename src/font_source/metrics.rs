//! Font naming and vertical metrics

/// Naming and metric data written into the font info
#[derive(Clone, Debug, PartialEq)]
pub struct FontInfo {
    pub family_name: String,
    pub style_name: String,
    pub version_major: i32,
    pub version_minor: u32,
    pub copyright: Option<String>,
    pub units_per_em: u32,
    pub ascender: f64,
    pub descender: f64,
}

impl FontInfo {
    /// `Family-Style`, used for file names and the PostScript name
    pub fn postscript_name(&self) -> String {
        format!(
            "{}-{}",
            self.family_name.replace(' ', ""),
            self.style_name.replace(' ', "")
        )
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.family_name, self.style_name)
    }

    /// Parse a `major.minor` version string, e.g. `0.1`
    pub fn parse_version(version: &str) -> Option<(i32, u32)> {
        let (major, minor) = version.split_once('.').unwrap_or((version, "0"));
        Some((major.trim().parse().ok()?, minor.trim().parse().ok()?))
    }

    /// Convert to norad's font info for the UFO
    pub fn to_norad_font_info(&self) -> norad::FontInfo {
        norad::FontInfo {
            family_name: Some(self.family_name.clone()),
            style_name: Some(self.style_name.clone()),
            style_map_family_name: Some(self.family_name.clone()),
            postscript_font_name: Some(self.postscript_name()),
            postscript_full_name: Some(self.full_name()),
            version_major: Some(self.version_major),
            version_minor: Some(self.version_minor),
            copyright: self.copyright.clone(),
            units_per_em: norad::fontinfo::NonNegativeIntegerOrFloat::new(f64::from(
                self.units_per_em,
            )),
            ascender: Some(self.ascender),
            descender: Some(self.descender),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> FontInfo {
        FontInfo {
            family_name: "Scopin Sans".to_string(),
            style_name: "No Noise".to_string(),
            version_major: 0,
            version_minor: 1,
            copyright: None,
            units_per_em: 512,
            ascender: 384.0,
            descender: -128.0,
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(info().postscript_name(), "ScopinSans-NoNoise");
        assert_eq!(info().full_name(), "Scopin Sans No Noise");
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(FontInfo::parse_version("0.1"), Some((0, 1)));
        assert_eq!(FontInfo::parse_version("2"), Some((2, 0)));
        assert_eq!(FontInfo::parse_version("x.1"), None);
    }

    #[test]
    fn test_norad_font_info() {
        let norad_info = info().to_norad_font_info();
        assert_eq!(norad_info.family_name.as_deref(), Some("Scopin Sans"));
        assert_eq!(norad_info.units_per_em.map(|u| u.as_f64()), Some(512.0));
        assert_eq!(norad_info.version_minor, Some(1));
    }
}
