use anyhow::{Context, Result};
use image::Rgba;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// color of tracks that have no category at all (no manifest)
pub const DEFAULT_TRACK_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Category label -> stroke color. Labels match exactly (case and spacing
/// included).
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRules {
    rules: BTreeMap<String, Rgba<u8>>,
    default_color: Rgba<u8>,
}

impl Default for ColorRules {
    fn default() -> Self {
        Self::new(
            [
                ("Ride", Rgba([255, 102, 0, 255])),
                ("E-Bike Ride", Rgba([255, 196, 0, 255])),
                ("Run", Rgba([0, 170, 255, 255])),
                ("Walk", Rgba([120, 220, 80, 255])),
                ("Hike", Rgba([200, 120, 255, 255])),
            ]
            .into_iter()
            .map(|(label, color)| (label.to_owned(), color))
            .collect(),
            DEFAULT_TRACK_COLOR,
        )
    }
}

impl ColorRules {
    pub fn new(rules: BTreeMap<String, Rgba<u8>>, default_color: Rgba<u8>) -> Self {
        Self {
            rules,
            default_color,
        }
    }

    /// Reads a JSON object of `"label": "#rrggbb"` (or `#rrggbbaa`) pairs.
    /// These replace the built-in table, the default color is kept.
    pub fn from_json_file(file_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(file_path)
            .with_context(|| format!("failed to read {}", file_path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("invalid color rules in {}", file_path.display()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_str(content)?;
        let rules = raw
            .into_iter()
            .map(|(label, color)| {
                let color = parse_hex_color(&color)
                    .ok_or_else(|| anyhow!("invalid color {color:?} for {label:?}"))?;
                Ok((label, color))
            })
            .collect::<Result<_>>()?;
        Ok(Self::new(rules, DEFAULT_TRACK_COLOR))
    }

    pub fn get(&self, label: &str) -> Option<Rgba<u8>> {
        self.rules.get(label).copied()
    }

    pub fn default_color(&self) -> Rgba<u8> {
        self.default_color
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

/// `#rrggbb` or `#rrggbbaa`, the leading `#` is optional.
pub fn parse_hex_color(input: &str) -> Option<Rgba<u8>> {
    let hex = input.trim().trim_start_matches('#');
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(3)? } else { 255 };
    Some(Rgba([channel(0)?, channel(1)?, channel(2)?, alpha]))
}

/// Picks the stroke color of each track and keeps a tally of the labels that
/// have no rule.
pub struct ActivityClassifier {
    rules: ColorRules,
    unmatched: BTreeMap<String, usize>,
}

impl ActivityClassifier {
    pub fn new(rules: ColorRules) -> Self {
        Self {
            rules,
            unmatched: BTreeMap::new(),
        }
    }

    /// Returns `None` when the label has no color. Tracks without any label
    /// get the default color.
    pub fn classify(&mut self, label: Option<&str>) -> Option<Rgba<u8>> {
        let Some(label) = label else {
            return Some(self.rules.default_color());
        };
        match self.rules.get(label) {
            Some(color) => Some(color),
            None => {
                *self.unmatched.entry(label.to_owned()).or_insert(0) += 1;
                None
            }
        }
    }

    pub fn unmatched(&self) -> &BTreeMap<String, usize> {
        &self.unmatched
    }
}
