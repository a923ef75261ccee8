use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Rgba8,
    error::{TutoError, TutoResult},
};

/// A color as written in configuration: a literal or a palette entry name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorRef {
    Literal(Rgba8),
    Named(String),
}

impl ColorRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl From<Rgba8> for ColorRef {
    fn from(value: Rgba8) -> Self {
        Self::Literal(value)
    }
}

/// Named colors shared by every artifact of a tutorial.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: BTreeMap<String, Rgba8>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, color: Rgba8) -> Self {
        self.entries.insert(name.into(), color);
        self
    }

    pub fn get(&self, name: &str) -> Option<Rgba8> {
        self.entries.get(name).copied()
    }

    pub fn resolve(&self, c: &ColorRef) -> TutoResult<Rgba8> {
        match c {
            ColorRef::Literal(rgba) => Ok(*rgba),
            ColorRef::Named(name) => self
                .get(name)
                .ok_or_else(|| TutoError::validation(format!("unknown palette color '{name}'"))),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex(s: &str) -> TutoResult<Rgba8> {
    let hex = s
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| TutoError::validation(format!("color '{s}' must start with '#'")))?;
    if !hex.is_ascii() {
        return Err(TutoError::validation(format!("invalid hex color '{s}'")));
    }
    let byte = |i: usize| -> TutoResult<u8> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| TutoError::validation(format!("invalid hex color '{s}'")))
    };
    let nibble = |i: usize| -> TutoResult<u8> {
        u8::from_str_radix(&hex[i..i + 1], 16)
            .map(|v| v * 17)
            .map_err(|_| TutoError::validation(format!("invalid hex color '{s}'")))
    };
    match hex.len() {
        3 => Ok(Rgba8::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Ok(Rgba8::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Rgba8::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => Err(TutoError::validation(format!(
            "hex color '{s}' must have 3, 6 or 8 digits"
        ))),
    }
}

fn from_components(v: &[u16]) -> Result<Rgba8, String> {
    let ch = |x: u16| u8::try_from(x).map_err(|_| format!("color component {x} exceeds 255"));
    match v {
        [r, g, b] => Ok(Rgba8::rgb(ch(*r)?, ch(*g)?, ch(*b)?)),
        [r, g, b, a] => Ok(Rgba8::rgba(ch(*r)?, ch(*g)?, ch(*b)?, ch(*a)?)),
        _ => Err("rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])".to_string()),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Str(String),
    Arr(Vec<u16>),
}

impl Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => from_components(&v).map_err(serde::de::Error::custom),
        }
    }
}

impl Serialize for ColorRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(c) => c.serialize(serializer),
            Self::Named(n) => serializer.serialize_str(n),
        }
    }
}

impl<'de> Deserialize<'de> for ColorRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Str(s) if s.trim_start().starts_with('#') => parse_hex(&s)
                .map(Self::Literal)
                .map_err(serde::de::Error::custom),
            Repr::Str(s) => Ok(Self::Named(s)),
            Repr::Arr(v) => from_components(&v)
                .map(Self::Literal)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
