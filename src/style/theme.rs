use std::collections::BTreeMap;

use crate::style::text_style::{Align, TextStyle};

/// Named text styles available to markup (`~name{...}`) and node roles.
pub type StyleTable = BTreeMap<String, TextStyle>;

/// Style names the cascade consults on its own.
pub mod names {
    /// Base style for every text run.
    pub const DEFAULT: &str = "default";
    /// Applied when any ancestor is a frame.
    pub const FRAME: &str = "frame";
    /// Frame title text.
    pub const FRAME_TITLE: &str = "frame_title";
    /// Applied when any ancestor box is a list item or column.
    pub const LIST_ITEM: &str = "list_item";
    /// Code blocks.
    pub const CODE: &str = "code";
    /// Shell blocks.
    pub const SHELL: &str = "shell";
}

/// Colors used by slide chrome and node backgrounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Page background.
    pub background: String,
    /// Header bar, title band, frame title bar.
    pub major: String,
    /// Header strip and title band outline.
    pub minor: String,
    /// Frame body background.
    pub frame_background: String,
    /// Default line emphasis color behind plain text.
    pub text_emphasis: String,
    /// Code block background.
    pub code_background: String,
    /// Default line emphasis color in code blocks.
    pub code_emphasis: String,
    /// Shell block background.
    pub shell_background: String,
    /// Default line emphasis color in shell blocks.
    pub shell_emphasis: String,
    /// Separator lines.
    pub separator: String,
}

/// Spacing constants used by the layout engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// Gap between vertically stacked children of a box or list.
    pub box_padding: f64,
    /// Gap between columns.
    pub column_padding: f64,
    /// Left indentation reserved for list bullets.
    pub list_indent: f64,
    /// Height of a frame's title bar.
    pub frame_title_bar: f64,
    /// Extra width/height a frame adds around its body.
    pub frame_padding: f64,
    /// Default separator thickness.
    pub separator_thickness: f64,
    /// Height of the titled-slide header bar.
    pub header_height: f64,
    /// Height of the strip at the bottom of the header bar.
    pub header_strip: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            box_padding: 10.0,
            column_padding: 30.0,
            list_indent: 15.0,
            frame_title_bar: 60.0,
            frame_padding: 20.0,
            separator_thickness: 2.0,
            header_height: 80.0,
            header_strip: 10.0,
        }
    }
}

/// Visual theme: palette, spacing and the named style table.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    /// Chrome and background colors.
    pub palette: Palette,
    /// Layout spacing.
    pub metrics: Metrics,
    /// Named styles.
    pub styles: StyleTable,
    /// Slide title in the header bar.
    pub title_style: TextStyle,
    /// Title of a title slide.
    pub main_title_style: TextStyle,
}

struct Colors {
    major: &'static str,
    minor: &'static str,
    text: &'static str,
    emph: &'static str,
    frame_background: &'static str,
    code_emphasis: &'static str,
    shell_emphasis: &'static str,
    separator: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_colors(&Colors {
            major: "#86c800",
            minor: "#d2d9bd",
            text: "#86b800",
            emph: "#f6b800",
            frame_background: "#f2ffcb",
            code_emphasis: "#96d820",
            shell_emphasis: "#76a810",
            separator: "#005000",
        })
    }
}

impl Theme {
    /// Blue variant of the default theme.
    pub fn blue() -> Self {
        Self::from_colors(&Colors {
            major: "#4040aa",
            minor: "#404088",
            text: "#000080",
            emph: "#60b8f0",
            frame_background: "#aaaaff",
            code_emphasis: "#c0c0ff",
            shell_emphasis: "#76a810",
            separator: "#000060",
        })
    }

    /// Dark teal variant of the default theme.
    pub fn teal() -> Self {
        Self::from_colors(&Colors {
            major: "#004455",
            minor: "#37abc8",
            text: "#004455",
            emph: "#60b8f0",
            frame_background: "#aaaaff",
            code_emphasis: "#c0c0ff",
            shell_emphasis: "#76a810",
            separator: "#000060",
        })
    }

    fn from_colors(c: &Colors) -> Self {
        let default_style = TextStyle::new()
            .font("Ubuntu")
            .color(c.text)
            .size(30.0)
            .line_spacing(1.1)
            .align(Align::Center);
        let code_style = TextStyle::new()
            .font("Ubuntu Mono")
            .align(Align::Left)
            .color("#222");
        let shell_style = code_style.clone().color("white");

        let mut styles = StyleTable::new();
        styles.insert(names::DEFAULT.to_string(), default_style.clone());
        styles.insert("tt".to_string(), TextStyle::new().font("Ubuntu Mono"));
        styles.insert(
            "emph".to_string(),
            TextStyle::new().color(c.emph).italic(true),
        );
        styles.insert(
            "alert".to_string(),
            TextStyle::new().color("#ff2800").bold(true),
        );
        styles.insert("h1".to_string(), TextStyle::new().size(60.0));
        styles.insert("h2".to_string(), TextStyle::new().size(40.0));
        styles.insert("h3".to_string(), TextStyle::new().size(35.0));
        styles.insert(names::CODE.to_string(), code_style);
        styles.insert(names::SHELL.to_string(), shell_style);
        styles.insert(
            "shell_prompt".to_string(),
            TextStyle::new().color("#7070f0"),
        );
        styles.insert(
            "shell_cmd".to_string(),
            TextStyle::new().color("#f0f070").bold(true),
        );
        styles.insert(names::FRAME.to_string(), TextStyle::new());
        styles.insert(
            names::FRAME_TITLE.to_string(),
            TextStyle::new()
                .color("white")
                .size(35.0)
                .align(Align::Right),
        );
        styles.insert(
            names::LIST_ITEM.to_string(),
            TextStyle::new().align(Align::Left),
        );

        Self {
            palette: Palette {
                background: "white".to_string(),
                major: c.major.to_string(),
                minor: c.minor.to_string(),
                frame_background: c.frame_background.to_string(),
                text_emphasis: c.minor.to_string(),
                code_background: "#f0f0f0".to_string(),
                code_emphasis: c.code_emphasis.to_string(),
                shell_background: "#101010".to_string(),
                shell_emphasis: c.shell_emphasis.to_string(),
                separator: c.separator.to_string(),
            },
            metrics: Metrics::default(),
            styles,
            title_style: default_style
                .clone()
                .color("white")
                .align(Align::Right),
            main_title_style: default_style
                .color("white")
                .align(Align::Center)
                .size(60.0),
        }
    }

    /// Theme styles overlaid with user-defined ones (user entries win by name).
    pub fn style_table(&self, overrides: &StyleTable) -> StyleTable {
        let mut table = self.styles.clone();
        for (name, style) in overrides {
            table.insert(name.clone(), style.clone());
        }
        table
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/theme.rs"]
mod tests;
