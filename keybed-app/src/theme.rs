/// Theme system for Keybed
///
/// Parses CSS rules from assets/styles.css and resolves them per selector for
/// light and dark mode. Widgets ask for a class (".select-trigger") and fall
/// back to egui's own visuals for anything the stylesheet leaves unset.

use anyhow::{anyhow, Result};
use eframe::egui;
use lightningcss::declaration::DeclarationBlock;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule;
use lightningcss::selector::SelectorList;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::System, ThemeMode::Light, ThemeMode::Dark];

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::System => "System",
        }
    }

    pub fn preference(self) -> egui::ThemePreference {
        match self {
            ThemeMode::Light => egui::ThemePreference::Light,
            ThemeMode::Dark => egui::ThemePreference::Dark,
            ThemeMode::System => egui::ThemePreference::System,
        }
    }
}

/// Style properties that can be applied to UI elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub background_color: Option<egui::Color32>,
    pub border_color: Option<egui::Color32>,
    pub text_color: Option<egui::Color32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub border_radius: Option<f32>,
}

impl Style {
    /// Overlay `other` on top of this style
    pub fn merge(&mut self, other: &Style) {
        self.background_color = other.background_color.or(self.background_color);
        self.border_color = other.border_color.or(self.border_color);
        self.text_color = other.text_color.or(self.text_color);
        self.width = other.width.or(self.width);
        self.height = other.height.or(self.height);
        self.border_radius = other.border_radius.or(self.border_radius);
    }

    pub fn merged(mut self, other: &Style) -> Style {
        self.merge(other);
        self
    }
}

type Variables = HashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct Theme {
    light_styles: HashMap<String, Style>,
    dark_styles: HashMap<String, Style>,
    current_mode: ThemeMode,
}

impl Theme {
    /// Load theme from CSS source
    pub fn from_css(css: &str) -> Result<Self> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| anyhow!("Failed to parse CSS: {}", e))?;

        // Variables first, so rules can reference ones declared below them
        let mut light_variables = Variables::new();
        let mut dark_overrides = Variables::new();
        for rule in &stylesheet.rules.0 {
            match rule {
                CssRule::Style(style_rule) if is_root(&style_rule.selectors) => {
                    extract_css_variables(&style_rule.declarations, &mut light_variables)?;
                }
                CssRule::Media(media_rule) if is_dark_query(&media_rule.query) => {
                    for inner in &media_rule.rules.0 {
                        if let CssRule::Style(style_rule) = inner {
                            if is_root(&style_rule.selectors) {
                                extract_css_variables(&style_rule.declarations, &mut dark_overrides)?;
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        let mut dark_variables = light_variables.clone();
        dark_variables.extend(dark_overrides);

        let mut light_styles = HashMap::new();
        let mut dark_styles = HashMap::new();
        for rule in &stylesheet.rules.0 {
            match rule {
                CssRule::Style(style_rule) => {
                    for selector in class_selectors(&style_rule.selectors) {
                        let light = parse_style_properties(&style_rule.declarations, &light_variables)?;
                        let dark = parse_style_properties(&style_rule.declarations, &dark_variables)?;
                        light_styles.insert(selector.clone(), light);
                        dark_styles.insert(selector, dark);
                    }
                }
                CssRule::Media(media_rule) if is_dark_query(&media_rule.query) => {
                    // Dark-only rules override the dark resolution of the base rule
                    for inner in &media_rule.rules.0 {
                        if let CssRule::Style(style_rule) = inner {
                            for selector in class_selectors(&style_rule.selectors) {
                                let style = parse_style_properties(&style_rule.declarations, &dark_variables)?;
                                dark_styles.entry(selector).or_default().merge(&style);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            light_styles,
            dark_styles,
            current_mode: ThemeMode::System,
        })
    }

    /// Load theme from the embedded stylesheet
    pub fn load_default() -> Result<Self> {
        Self::from_css(include_str!("../assets/styles.css"))
    }

    pub fn set_mode(&mut self, mode: ThemeMode) {
        self.current_mode = mode;
    }

    pub fn mode(&self) -> ThemeMode {
        self.current_mode
    }

    pub fn is_dark(&self, ctx: &egui::Context) -> bool {
        match self.current_mode {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::System => ctx.style().visuals.dark_mode,
        }
    }

    /// Get style for a selector (e.g. ".popover-content")
    pub fn style(&self, selector: &str, ctx: &egui::Context) -> Style {
        self.style_for(selector, self.is_dark(ctx))
    }

    /// Style for a selector in an explicit mode
    pub fn style_for(&self, selector: &str, dark: bool) -> Style {
        let light = self.light_styles.get(selector);
        if dark {
            self.dark_styles.get(selector).or(light).cloned().unwrap_or_default()
        } else {
            light.cloned().unwrap_or_default()
        }
    }

    /// Number of loaded selectors
    pub fn len(&self) -> usize {
        self.light_styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.light_styles.is_empty()
    }
}

fn selector_strings(selectors: &SelectorList) -> Vec<String> {
    selectors
        .0
        .iter()
        .filter_map(|s| s.to_css_string(PrinterOptions::default()).ok())
        .map(|s| s.trim().to_string())
        .collect()
}

fn is_root(selectors: &SelectorList) -> bool {
    selector_strings(selectors).iter().any(|s| s.contains(":root"))
}

/// Class and id selectors of a rule; element and :root selectors are skipped
fn class_selectors(selectors: &SelectorList) -> Vec<String> {
    selector_strings(selectors)
        .into_iter()
        .filter(|s| s.starts_with('.') || s.starts_with('#'))
        .collect()
}

fn is_dark_query(query: &lightningcss::media_query::MediaList) -> bool {
    let media = query.to_css_string(PrinterOptions::default()).unwrap_or_default();
    media.contains("prefers-color-scheme") && media.contains("dark")
}

/// Collect custom properties (--name: value)
fn extract_css_variables(declarations: &DeclarationBlock, variables: &mut Variables) -> Result<()> {
    for property in &declarations.declarations {
        if !matches!(property, Property::Custom(_)) {
            continue;
        }
        let css = property
            .to_css_string(false, PrinterOptions::default())
            .map_err(|e| anyhow!("Failed to serialize property: {}", e))?;

        if let Some((name, value)) = css.split_once(':') {
            let name = name.trim();
            let name = name.strip_prefix("--").unwrap_or(name);
            variables.insert(name.to_string(), value.trim().to_string());
        }
    }
    Ok(())
}

fn parse_style_properties(declarations: &DeclarationBlock, variables: &Variables) -> Result<Style> {
    let mut style = Style::default();

    for property in &declarations.declarations {
        let css = property
            .to_css_string(false, PrinterOptions::default())
            .map_err(|e| anyhow!("Failed to serialize property: {}", e))?;

        let Some((name, value)) = css.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_end_matches(';');

        match name.trim() {
            "background-color" => style.background_color = parse_color_value(value, variables),
            "border-color" | "border-top-color" => {
                style.border_color = parse_color_value(value, variables)
            }
            "color" => style.text_color = parse_color_value(value, variables),
            "width" => style.width = parse_dimension_value(value, variables),
            "height" => style.height = parse_dimension_value(value, variables),
            "border-radius" => style.border_radius = parse_dimension_value(value, variables),
            _ => {}
        }
    }

    Ok(style)
}

/// Follow a var() reference to its value, or return the value itself
fn resolve<'a>(value: &'a str, variables: &'a Variables) -> Option<&'a str> {
    let value = value.trim();
    match parse_var_reference(value) {
        Some(name) => variables.get(name).map(String::as_str),
        None => Some(value),
    }
}

fn parse_color_value(value: &str, variables: &Variables) -> Option<egui::Color32> {
    resolve(value, variables).and_then(parse_hex_color)
}

fn parse_dimension_value(value: &str, variables: &Variables) -> Option<f32> {
    resolve(value, variables).and_then(parse_dimension_string)
}

/// Name inside `var(--name)`
fn parse_var_reference(value: &str) -> Option<&str> {
    let inner = value.strip_prefix("var(")?.strip_suffix(')')?;
    inner.trim().strip_prefix("--")
}

/// Parse #rgb, #rrggbb or #rrggbbaa
pub fn parse_hex_color(value: &str) -> Option<egui::Color32> {
    let hex = value.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| channel(&c.to_string().repeat(2)));
            Some(egui::Color32::from_rgb(
                digits.next()??,
                digits.next()??,
                digits.next()??,
            ))
        }
        6 => Some(egui::Color32::from_rgb(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        8 => Some(egui::Color32::from_rgba_unmultiplied(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
            channel(hex.get(6..8)?)?,
        )),
        _ => None,
    }
}

/// Parse "50px" or "25"
fn parse_dimension_string(value: &str) -> Option<f32> {
    let value = value.trim();
    value.strip_suffix("px").unwrap_or(value).trim().parse().ok()
}
