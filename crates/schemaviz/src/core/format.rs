//! Output format selection
//!
//! [`DiagramOutputFormat`] is what a caller asks for. [`GraphFormat`] is what a
//! rendering engine understands. [`map_format`] bridges the two and returns
//! `None` for selectors no engine can produce.

use std::fmt;
use std::str::FromStr;

use super::error::SchemaError;

/// Diagram output format requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DiagramOutputFormat {
    /// Scalable Vector Graphics
    #[default]
    Svg,
    /// Portable Network Graphics
    Png,
    /// PostScript
    Ps,
    /// DOT with layout and drawing information
    Xdot,
    /// Graphviz plain text layout
    Plain,
    /// Portable Document Format
    Pdf,
    /// JPEG image
    Jpg,
    /// GIF image
    Gif,
    /// HTML page with an embedded SVG diagram
    Htmlx,
}

impl DiagramOutputFormat {
    /// All format names accepted by [`FromStr`]
    pub fn variants() -> &'static [&'static str] {
        &["svg", "png", "ps", "xdot", "plain", "pdf", "jpg", "gif", "htmlx"]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramOutputFormat::Svg => "svg",
            DiagramOutputFormat::Png => "png",
            DiagramOutputFormat::Ps => "ps",
            DiagramOutputFormat::Xdot => "xdot",
            DiagramOutputFormat::Plain => "plain",
            DiagramOutputFormat::Pdf => "pdf",
            DiagramOutputFormat::Jpg => "jpg",
            DiagramOutputFormat::Gif => "gif",
            DiagramOutputFormat::Htmlx => "htmlx",
        }
    }
}

impl fmt::Display for DiagramOutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DiagramOutputFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "svg" => Ok(DiagramOutputFormat::Svg),
            "png" => Ok(DiagramOutputFormat::Png),
            "ps" => Ok(DiagramOutputFormat::Ps),
            "xdot" => Ok(DiagramOutputFormat::Xdot),
            "plain" => Ok(DiagramOutputFormat::Plain),
            "pdf" => Ok(DiagramOutputFormat::Pdf),
            "jpg" | "jpeg" => Ok(DiagramOutputFormat::Jpg),
            "gif" => Ok(DiagramOutputFormat::Gif),
            "htmlx" => Ok(DiagramOutputFormat::Htmlx),
            _ => Err(SchemaError::invalid_argument(format!(
                "Unknown diagram output format: {}",
                s
            ))),
        }
    }
}

/// Format token understood by the rendering engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphFormat {
    Svg,
    Png,
    Ps,
    Xdot,
    Plain,
}

impl GraphFormat {
    /// The value passed to Graphviz as `-T<token>`
    pub fn token(&self) -> &'static str {
        match self {
            GraphFormat::Svg => "svg",
            GraphFormat::Png => "png",
            GraphFormat::Ps => "ps",
            GraphFormat::Xdot => "xdot",
            GraphFormat::Plain => "plain",
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Map a requested output format to an engine format
///
/// Returns `None` when no engine can produce the format directly.
pub fn map_format(format: DiagramOutputFormat) -> Option<GraphFormat> {
    match format {
        DiagramOutputFormat::Svg => Some(GraphFormat::Svg),
        DiagramOutputFormat::Png => Some(GraphFormat::Png),
        DiagramOutputFormat::Ps => Some(GraphFormat::Ps),
        DiagramOutputFormat::Xdot => Some(GraphFormat::Xdot),
        DiagramOutputFormat::Plain => Some(GraphFormat::Plain),
        DiagramOutputFormat::Pdf
        | DiagramOutputFormat::Jpg
        | DiagramOutputFormat::Gif
        | DiagramOutputFormat::Htmlx => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(
            DiagramOutputFormat::from_str("svg").unwrap(),
            DiagramOutputFormat::Svg
        );
        assert_eq!(
            DiagramOutputFormat::from_str("PNG").unwrap(),
            DiagramOutputFormat::Png
        );
        assert_eq!(
            DiagramOutputFormat::from_str(" jpeg ").unwrap(),
            DiagramOutputFormat::Jpg
        );
        let err = DiagramOutputFormat::from_str("bmp").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_variants_round_trip_through_display() {
        for name in DiagramOutputFormat::variants() {
            let format = DiagramOutputFormat::from_str(name).unwrap();
            assert_eq!(format.to_string(), *name);
        }
    }

    #[test]
    fn test_map_renderable_formats() {
        assert_eq!(map_format(DiagramOutputFormat::Svg), Some(GraphFormat::Svg));
        assert_eq!(map_format(DiagramOutputFormat::Png), Some(GraphFormat::Png));
        assert_eq!(map_format(DiagramOutputFormat::Ps), Some(GraphFormat::Ps));
        assert_eq!(map_format(DiagramOutputFormat::Xdot), Some(GraphFormat::Xdot));
        assert_eq!(
            map_format(DiagramOutputFormat::Plain),
            Some(GraphFormat::Plain)
        );
    }

    #[test]
    fn test_map_unsupported_formats() {
        assert_eq!(map_format(DiagramOutputFormat::Pdf), None);
        assert_eq!(map_format(DiagramOutputFormat::Jpg), None);
        assert_eq!(map_format(DiagramOutputFormat::Gif), None);
        assert_eq!(map_format(DiagramOutputFormat::Htmlx), None);
    }

    #[test]
    fn test_graph_format_tokens() {
        assert_eq!(GraphFormat::Svg.token(), "svg");
        assert_eq!(GraphFormat::Plain.to_string(), "plain");
    }
}
