use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(alias = "input_file")]
    pub data: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub region_field: Option<String>,
    #[serde(alias = "province")]
    pub community: Option<String>,
    pub municipality: Option<String>,
    #[serde(alias = "type")]
    pub grave_type: Option<String>,
    #[serde(alias = "range")]
    pub person_range: Option<String>,
    pub stroke_color: Option<String>,
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub title: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".fosamap").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, String> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents).map_err(|e| e.to_string())
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

pub fn default_config_yaml() -> String {
    r##"# fosamap config
#
# Location (default):
#   ~/.fosamap/config.yml

# Dataset (CSV with Provincia, ComAutonom, Municipio, TIPO_FOSA,
# NUMERO_PERSONAS_FOSA, Latitude, Longitude, URL, NUMERO_REGISTRO,
# OBSERVACIONES, ESTADO_ACTUAL columns)
data: ./fosas_with_url.csv

# Output (optional; text/json/geojson go to stdout when unset)
# output: ./map.html
# output_format: html

# Column used by the region selector: community (ComAutonom) or province (Provincia)
region_field: community

# Initial selection (optional)
# community: Andalucía
# municipality: Sevilla
# grave_type: Fosa común
# person_range: "10-30"

# Marker style
stroke_color: "#E66100"
fill_color: "#5D3A9B"
fill_opacity: 0.6

# Page title for html output
# title: Mass graves from the Spanish Civil War

# Output styling
no_color: false
"##
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent).map_err(|e| {
            format!(
                "failed to create config directory '{}': {e}",
                parent.display()
            )
        })?;
    }
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let cfg = parse_config(&default_config_yaml()).unwrap();
        assert_eq!(cfg.data.as_deref(), Some("./fosas_with_url.csv"));
        assert_eq!(cfg.region_field.as_deref(), Some("community"));
        assert_eq!(cfg.fill_opacity, Some(0.6));
        assert_eq!(cfg.community, None);
    }

    #[test]
    fn aliases_are_accepted() {
        let cfg = parse_config("province: Madrid\ntype: Fosa común\nrange: \"+100\"\n").unwrap();
        assert_eq!(cfg.community.as_deref(), Some("Madrid"));
        assert_eq!(cfg.grave_type.as_deref(), Some("Fosa común"));
        assert_eq!(cfg.person_range.as_deref(), Some("+100"));
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_config("   \n").unwrap(), ConfigFile::default());
    }

    #[test]
    fn missing_config_allowed_only_when_requested() {
        let path = std::env::temp_dir().join("fosamap-missing-config-does-not-exist.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn ensure_default_config_writes_once() {
        let dir = std::env::temp_dir().join(format!("fosamap-config-{}", std::process::id()));
        let path = dir.join("config.yml");
        let _ = std::fs::remove_file(&path);
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        assert_eq!(load_config(&path, false).unwrap().fill_color.as_deref(), Some("#5D3A9B"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
