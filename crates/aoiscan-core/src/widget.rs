//! Widget configuration carried in URL query parameters
//!
//! A widget URL such as
//! `https://host/tool?title=Wells&layers=https%3A%2F%2F...%2FFeatureServer%2F0&extent=-98,39.5,4`
//! is resolved into a [`WidgetConfig`]. Resolution never fails: absent or
//! malformed parameters leave the corresponding field unset so defaults apply.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AoiscanError, Result};

/// Report title used when none is configured
pub const DEFAULT_REPORT_TITLE: &str = "Area Analysis Tool";

/// Basemap used when none is configured
pub const DEFAULT_BASEMAP: &str = "satellite";

/// Initial map extent `[lon, lat, zoom]` used when none is configured
pub const DEFAULT_EXTENT: [f64; 3] = [-98.0, 39.5, 4.0];

/// Layers queried when a run names none
pub const DEFAULT_LAYERS: [&str; 2] = [
    "https://services.arcgis.com/P3ePLMYs2RVChkJx/arcgis/rest/services/USA_Oil_and_Gas_Wells/FeatureServer/0",
    "https://services.arcgis.com/P3ePLMYs2RVChkJx/arcgis/rest/services/USA_Oil_and_Gas_Pipelines/FeatureServer/0",
];

const PARAM_TITLE: &str = "title";
const PARAM_LAYERS: &str = "layers";
const PARAM_BASEMAP: &str = "basemap";
const PARAM_EXTENT: &str = "extent";

/// Characters escaped by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Configuration read from a widget URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub basemap: Option<String>,

    /// `[longitude, latitude, zoom]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<[f64; 3]>,
}

impl WidgetConfig {
    /// Resolve from a full URL or a bare query string (with or without `?`)
    pub fn from_url(input: &str) -> Self {
        match Url::parse(input) {
            Ok(url) => Self::from_query(url.query().unwrap_or("")),
            Err(_) => Self::from_query(input),
        }
    }

    /// Resolve from a query string
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let param = |name: &str| -> Option<String> {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = WidgetConfig::default();

        if let Some(title) = param(PARAM_TITLE) {
            config.report_title = Some(decode_component(&title));
        }

        if let Some(layers) = param(PARAM_LAYERS) {
            let parsed: Vec<String> = layers
                .split(',')
                .map(|layer| decode_component(layer.trim()))
                .filter(|layer| !layer.is_empty())
                .collect();
            if !parsed.is_empty() {
                config.layers = Some(parsed);
            }
        }

        if let Some(basemap) = param(PARAM_BASEMAP) {
            config.basemap = Some(basemap);
        }

        if let Some(extent) = param(PARAM_EXTENT) {
            config.extent = parse_extent(&extent);
        }

        config
    }

    /// True when no parameter was recognised
    pub fn is_empty(&self) -> bool {
        self.report_title.is_none()
            && self.layers.is_none()
            && self.basemap.is_none()
            && self.extent.is_none()
    }

    /// Whether a page should render only the embedded tool
    pub fn is_embedded(&self, query: &str) -> bool {
        !self.is_empty() || query.contains("iframe=true")
    }

    /// Apply defaults to every unset field
    pub fn resolve(&self) -> ResolvedWidget {
        ResolvedWidget {
            report_title: self
                .report_title
                .clone()
                .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
            layers: self.layers.clone().unwrap_or_default(),
            basemap: self.basemap.clone().unwrap_or_else(|| DEFAULT_BASEMAP.to_string()),
            extent: self.extent.unwrap_or(DEFAULT_EXTENT),
        }
    }
}

/// Widget configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWidget {
    pub report_title: String,
    pub layers: Vec<String>,
    pub basemap: String,
    pub extent: [f64; 3],
}

/// Parse `lon,lat,zoom`; anything but three finite numbers is rejected
pub fn parse_extent(text: &str) -> Option<[f64; 3]> {
    let values: Vec<f64> = text
        .split(',')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                Some(0.0)
            } else {
                part.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        })
        .collect::<Option<_>>()?;

    match values.as_slice() {
        [lon, lat, zoom] => Some([*lon, *lat, *zoom]),
        _ => None,
    }
}

/// Decode a URI component, keeping the input when it is not valid UTF-8 after decoding
fn decode_component(text: &str) -> String {
    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| text.to_string())
}

fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Build a widget URL carrying `config` as query parameters
///
/// Existing widget parameters on `base_url` are replaced; other parameters
/// are kept.
pub fn generate_config_url(base_url: &str, config: &WidgetConfig) -> Result<String> {
    let mut url = Url::parse(base_url).map_err(|e| AoiscanError::ConfigInvalid {
        key: "base_url".to_string(),
        reason: format!("'{}' is not an absolute URL: {}", base_url, e),
    })?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| {
            ![PARAM_TITLE, PARAM_LAYERS, PARAM_BASEMAP, PARAM_EXTENT].contains(&&**key)
        })
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }

        if let Some(title) = config.report_title.as_deref().filter(|t| !t.is_empty()) {
            pairs.append_pair(PARAM_TITLE, &encode_component(title));
        }

        if let Some(layers) = config.layers.as_ref().filter(|l| !l.is_empty()) {
            let joined =
                layers.iter().map(|layer| encode_component(layer)).collect::<Vec<_>>().join(",");
            pairs.append_pair(PARAM_LAYERS, &joined);
        }

        if let Some(basemap) = config.basemap.as_deref().filter(|b| !b.is_empty()) {
            pairs.append_pair(PARAM_BASEMAP, basemap);
        }

        if let Some([lon, lat, zoom]) = config.extent {
            pairs.append_pair(PARAM_EXTENT, &format!("{},{},{}", lon, lat, zoom));
        }
    }

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url.to_string())
}

/// Whether a URL looks like an https feature-service layer endpoint
pub fn validate_layer_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            parsed.scheme() == "https"
                && (url.contains("/FeatureServer/") || url.contains("/MapServer/"))
        }
        Err(_) => false,
    }
}

/// Ready-made widget configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    OilAndGas,
    Environmental,
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::OilAndGas, Preset::Environmental, Preset::Custom];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::OilAndGas => "oil-and-gas",
            Preset::Environmental => "environmental",
            Preset::Custom => "custom",
        }
    }

    /// Parse a preset name
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "oil-and-gas" | "oilandgas" | "oil-gas" => Ok(Preset::OilAndGas),
            "environmental" => Ok(Preset::Environmental),
            "custom" => Ok(Preset::Custom),
            _ => Err(AoiscanError::ConfigInvalid {
                key: "preset".to_string(),
                reason: format!(
                    "Unknown preset: {}. Use oil-and-gas, environmental, or custom",
                    name
                ),
            }),
        }
    }

    pub fn config(&self) -> WidgetConfig {
        match self {
            Preset::OilAndGas => WidgetConfig {
                report_title: Some("Oil & Gas Infrastructure Analysis".to_string()),
                layers: Some(DEFAULT_LAYERS.iter().map(|l| l.to_string()).collect()),
                basemap: Some("satellite".to_string()),
                extent: Some([-98.0, 39.5, 4.0]),
            },
            Preset::Environmental => WidgetConfig {
                report_title: Some("Environmental Impact Assessment".to_string()),
                layers: Some(vec![
                    "https://services.arcgis.com/P3ePLMYs2RVChkJx/arcgis/rest/services/USA_Protected_Areas/FeatureServer/0"
                        .to_string(),
                ]),
                basemap: Some("hybrid".to_string()),
                extent: Some([-95.0, 37.0, 5.0]),
            },
            Preset::Custom => WidgetConfig {
                report_title: Some("Custom Analysis".to_string()),
                layers: Some(Vec::new()),
                basemap: Some("streets-navigation-vector".to_string()),
                extent: Some([-98.0, 39.5, 4.0]),
            },
        }
    }
}
