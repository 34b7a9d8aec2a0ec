use std::collections::HashMap;
use std::fmt;

use crate::error::ParseError;

/// A 3-letter IATA-style city code. Equality and hashing are bytewise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CityCode([u8; 3]);

impl CityCode {
    /// Parses a code from ASCII text, rejecting anything but three
    /// uppercase letters.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let bytes = text.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(ParseError::BadCityCode(text.to_string()));
        }
        Ok(CityCode([bytes[0], bytes[1], bytes[2]]))
    }
}

impl fmt::Display for CityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// Dense 16-bit index space for interned city codes.
///
/// Index 0 is always the first code interned, which by parser convention
/// is the starting city.
#[derive(Debug, Default)]
pub struct CityRegistry {
    by_code: HashMap<CityCode, u16>,
    by_index: Vec<CityCode>,
}

impl CityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing index for `code`, interning it if unseen.
    pub fn intern(&mut self, code: CityCode) -> u16 {
        if let Some(&idx) = self.by_code.get(&code) {
            return idx;
        }
        let idx = self.by_index.len() as u16;
        self.by_code.insert(code, idx);
        self.by_index.push(code);
        idx
    }

    /// Reverse lookup, used only by the output formatter.
    pub fn lookup(&self, idx: u16) -> CityCode {
        self.by_index[idx as usize]
    }

    pub fn count(&self) -> usize {
        self.by_index.len()
    }
}
