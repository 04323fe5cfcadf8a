//! OSGi bundle manifest parsing
//!
//! Two layers: `parse_manifest` turns MANIFEST.MF text into a header map
//! (main section only, continuation lines unfolded), and `parse_header`
//! applies the OSGi manifest-element grammar to a single header value:
//! elements separated by `,`, components by `;`, with `attr=value`
//! attributes, `directive:=value` directives, and quoted values that may
//! contain any of the separators.
//!
//! `requirement_refs` is the shape the generators consume: entries marked
//! `resolution` = `optional` are dropped, and a missing or empty `version`
//! attribute becomes `0.0.0`.

use std::collections::BTreeMap;

use crate::domain::{UnitRef, DEFAULT_VERSION};
use crate::error::{BrowserError, Result};

/// Parses the main section of a bundle manifest into a header map
pub fn parse_manifest(text: &str) -> Result<BTreeMap<String, String>> {
    let mut headers = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    for raw_line in text.lines() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            // Blank line ends the main section
            break;
        }
        if let Some(continuation) = line.strip_prefix(' ') {
            match current.as_mut() {
                Some((_, value)) => value.push_str(continuation),
                None => {
                    return Err(BrowserError::MalformedManifest {
                        message: "continuation line before any header".to_string(),
                    });
                }
            }
            continue;
        }
        if let Some((name, value)) = current.take() {
            headers.insert(name, value);
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(BrowserError::MalformedManifest {
                message: format!("header line without ':': {line}"),
            });
        };
        current = Some((
            name.trim().to_string(),
            value.strip_prefix(' ').unwrap_or(value).to_string(),
        ));
    }
    if let Some((name, value)) = current.take() {
        headers.insert(name, value);
    }

    Ok(headers)
}

/// One element of a multi-valued manifest header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestElement {
    value: String,
    attributes: Vec<(String, String)>,
    directives: Vec<(String, String)>,
}

impl ManifestElement {
    /// First value component of the element (the bundle/package name)
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn directive(&self, name: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// `resolution` marker from either an attribute or a directive
    fn resolution(&self) -> Option<&str> {
        self.attribute("resolution").or_else(|| self.directive("resolution"))
    }
}

/// Parses a header value into its manifest elements
pub fn parse_header(value: &str) -> Result<Vec<ManifestElement>> {
    let mut elements = Vec::new();
    for part in split_quoted(value, ',') {
        let mut element = ManifestElement {
            value: String::new(),
            attributes: Vec::new(),
            directives: Vec::new(),
        };
        let mut has_value = false;
        for component in split_quoted(&part, ';') {
            let component = component.trim();
            if component.is_empty() {
                continue;
            }
            if let Some((name, val)) = split_parameter(component) {
                let unquoted = unquote(val).to_string();
                if let Some(directive) = name.strip_suffix(':') {
                    element
                        .directives
                        .push((directive.trim().to_string(), unquoted));
                } else {
                    element.attributes.push((name.trim().to_string(), unquoted));
                }
            } else if !has_value {
                element.value = component.to_string();
                has_value = true;
            }
        }
        if !has_value {
            return Err(BrowserError::MalformedManifest {
                message: format!("header element without a value: {part}"),
            });
        }
        elements.push(element);
    }
    Ok(elements)
}

/// Parses a header into requirement references, dropping optional entries
/// and defaulting missing versions. `None` or empty input yields no entries.
pub fn requirement_refs(header: Option<&str>) -> Result<Vec<UnitRef>> {
    let Some(header) = header else {
        return Ok(Vec::new());
    };
    if header.is_empty() {
        return Ok(Vec::new());
    }
    let refs = parse_header(header)?
        .into_iter()
        .filter(|el| el.resolution() != Some("optional"))
        .map(|el| {
            let version = match el.attribute("version") {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => DEFAULT_VERSION.to_string(),
            };
            UnitRef {
                id: el.value().to_string(),
                version,
            }
        })
        .collect();
    Ok(refs)
}

/// Splits on `separator`, honoring double-quoted runs
fn split_quoted(value: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in value.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch == separator && !in_quotes {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Splits `name=value` at the first `=` outside quotes, keeping a trailing
/// `:` on the name when the component is a directive
fn split_parameter(component: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (i, ch) in component.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '=' if !in_quotes => {
                return Some((&component[..i], &component[i + 1..]));
            }
            _ => {}
        }
    }
    None
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
