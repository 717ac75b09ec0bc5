use std::path::Path;

use anyhow::{bail, Context, Result};
use palette::{Hsl, IntoColor, Srgb, Srgba};

// ---------------------------------------------------------------------------
// Label colours
// ---------------------------------------------------------------------------

/// One region of a parcellation and the colour it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelColor {
    pub index: u32,
    pub name: String,
    pub color: Srgba<u8>,
}

impl LabelColor {
    /// `#rrggbb` form of the colour (alpha dropped).
    pub fn hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.color.red, self.color.green, self.color.blue
        )
    }
}

/// Colour lookup table of a parcellation, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    labels: Vec<LabelColor>,
}

impl LabelTable {
    pub fn new(labels: Vec<LabelColor>) -> Self {
        LabelTable { labels }
    }

    /// Default table for `n` labels: evenly spaced hues, named
    /// `label-01`, `label-02`, ... and indexed from 1.
    pub fn generated(n: usize) -> Self {
        let labels = generate_palette(n)
            .into_iter()
            .enumerate()
            .map(|(i, rgb)| LabelColor {
                index: i as u32 + 1,
                name: format!("label-{:02}", i + 1),
                color: Srgba::new(rgb.red, rgb.green, rgb.blue, 255),
            })
            .collect();
        LabelTable { labels }
    }

    /// Load a colour table.  Dispatch by extension.
    ///
    /// Supported formats:
    /// * `.tsv` – header with `index`, `name` and `color` (`#rrggbb`) columns
    /// * anything else – whitespace separated lookup table, either
    ///   FreeSurfer style `index name r g b [a]` (0-255, `a` is transparency)
    ///   or `index r g b name` with 0-255 integers or 0-1 floats
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "tsv" => load_tsv(path),
            _ => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                parse_lut(&text)
            }
        }
    }

    pub fn get(&self, index: u32) -> Option<&LabelColor> {
        self.labels.iter().find(|l| l.index == index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelColor> + '_ {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Colour palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Lookup-table text
// ---------------------------------------------------------------------------

/// Parse whitespace separated lookup-table text. Blank lines and `#`
/// comments are skipped.
pub fn parse_lut(text: &str) -> Result<LabelTable> {
    let mut labels = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 5 {
            bail!("LUT line {}: expected at least 5 fields, got {}", line_no + 1, tokens.len());
        }
        let index = tokens[0]
            .parse::<u32>()
            .with_context(|| format!("LUT line {}: '{}' is not a label index", line_no + 1, tokens[0]))?;

        let label = if tokens[1].parse::<f64>().is_ok() {
            // index r g b name...
            let [r, g, b] = parse_channels(&tokens[1..4], line_no)?;
            LabelColor {
                index,
                name: tokens[4..].join(" "),
                color: Srgba::new(r, g, b, 255),
            }
        } else {
            // index name r g b [transparency]
            let [r, g, b] = parse_channels(&tokens[2..5], line_no)?;
            let transparency = match tokens.get(5) {
                Some(tok) => parse_byte(tok, line_no)?,
                None => 0,
            };
            LabelColor {
                index,
                name: tokens[1].to_string(),
                color: Srgba::new(r, g, b, 255 - transparency),
            }
        };
        labels.push(label);
    }

    Ok(LabelTable { labels })
}

/// Three colour channels, either all 0-255 integers or 0-1 floats.
fn parse_channels(tokens: &[&str], line_no: usize) -> Result<[u8; 3]> {
    let is_unit = tokens.iter().any(|t| t.contains('.'))
        && tokens
            .iter()
            .all(|t| t.parse::<f64>().map(|v| (0.0..=1.0).contains(&v)).unwrap_or(false));

    let mut out = [0u8; 3];
    for (slot, tok) in out.iter_mut().zip(tokens) {
        *slot = if is_unit {
            let v: f64 = tok
                .parse()
                .with_context(|| format!("LUT line {}: '{tok}' is not a number", line_no + 1))?;
            (v * 255.0).round() as u8
        } else {
            parse_byte(tok, line_no)?
        };
    }
    Ok(out)
}

fn parse_byte(tok: &str, line_no: usize) -> Result<u8> {
    tok.parse::<u8>()
        .with_context(|| format!("LUT line {}: '{tok}' is not a 0-255 value", line_no + 1))
}

// ---------------------------------------------------------------------------
// TSV colour table
// ---------------------------------------------------------------------------

fn load_tsv(path: &Path) -> Result<LabelTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = reader.headers().context("reading TSV headers")?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("TSV missing '{name}' column"))
    };
    let index_idx = column("index")?;
    let name_idx = column("name")?;
    let color_idx = column("color")?;

    let mut labels = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("TSV row {row_no}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let index = field(index_idx)
            .parse::<u32>()
            .with_context(|| format!("TSV row {row_no}: bad index '{}'", field(index_idx)))?;
        let color = parse_hex(field(color_idx))
            .with_context(|| format!("TSV row {row_no}: bad colour '{}'", field(color_idx)))?;

        labels.push(LabelColor {
            index,
            name: field(name_idx).to_string(),
            color,
        });
    }

    Ok(LabelTable { labels })
}

/// `#rrggbb` or `#rrggbbaa`.
fn parse_hex(s: &str) -> Result<Srgba<u8>> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
        bail!("expected #rrggbb");
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).context("invalid hex digit");
    let alpha = if digits.len() == 8 { byte(6)? } else { 255 };
    Ok(Srgba::new(byte(0)?, byte(2)?, byte(4)?, alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freesurfer_lut() {
        let text = "\
# Yeo 7 networks
  0     NONE                    0   0   0   0
  1     7Networks_1           120  18 134   0
  2     7Networks_2            70 130 180   0
";
        let table = parse_lut(text).unwrap();
        assert_eq!(table.len(), 3);
        let net1 = table.get(1).unwrap();
        assert_eq!(net1.name, "7Networks_1");
        assert_eq!(net1.color, Srgba::new(120, 18, 134, 255));
        assert_eq!(net1.hex(), "#781286");
    }

    #[test]
    fn index_first_lut_with_unit_floats() {
        let table = parse_lut("1 0.1804 0.4941 0.7137 MDTB01\n2 1.0 0.5 0.0 Right Hand\n").unwrap();
        assert_eq!(table.get(1).unwrap().color, Srgba::new(46, 126, 182, 255));
        assert_eq!(table.get(2).unwrap().name, "Right Hand");
        assert_eq!(table.get(2).unwrap().color, Srgba::new(255, 128, 0, 255));
    }

    #[test]
    fn index_first_lut_with_bytes() {
        let table = parse_lut("3 1 1 1 dark\n").unwrap();
        assert_eq!(table.get(3).unwrap().color, Srgba::new(1, 1, 1, 255));
    }

    #[test]
    fn short_line_is_an_error() {
        assert!(parse_lut("1 MDTB01 12\n").is_err());
    }

    #[test]
    fn tsv_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atl-MDTB10.tsv");
        std::fs::write(&path, "index\tname\tcolor\n1\tMDTB01\t#2e7eb6\n2\tMDTB02\t#FF8000\n").unwrap();
        let table = LabelTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap().color, Srgba::new(0x2e, 0x7e, 0xb6, 255));
        assert_eq!(table.get(2).unwrap().hex(), "#ff8000");
    }

    #[test]
    fn generated_table_names_and_distinct_colours() {
        let table = LabelTable::generated(10);
        assert_eq!(table.len(), 10);
        assert_eq!(table.get(1).unwrap().name, "label-01");
        assert_eq!(table.get(10).unwrap().name, "label-10");
        let hexes: std::collections::BTreeSet<_> = table.iter().map(LabelColor::hex).collect();
        assert_eq!(hexes.len(), 10);
        assert!(LabelTable::generated(0).is_empty());
    }
}
