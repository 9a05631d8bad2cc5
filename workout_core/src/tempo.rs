//! Repetition tempo (eccentric / pause / concentric phase timing).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase timing of a single repetition, in seconds.
///
/// Stored as a self-contained blob on an exercise row. Unsigned fields keep
/// every phase non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tempo {
    pub eccentric_seconds: u32,
    pub pause_seconds: u32,
    pub concentric_seconds: u32,
}

impl Tempo {
    pub fn new(eccentric_seconds: u32, pause_seconds: u32, concentric_seconds: u32) -> Self {
        Self {
            eccentric_seconds,
            pause_seconds,
            concentric_seconds,
        }
    }

    /// `E-P-C` notation; a zero-length concentric phase is written as `X`
    /// (explosive).
    pub fn notation(&self) -> String {
        let concentric = if self.concentric_seconds == 0 {
            "X".to_string()
        } else {
            self.concentric_seconds.to_string()
        };
        format!(
            "{}-{}-{}",
            self.eccentric_seconds, self.pause_seconds, concentric
        )
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

impl FromStr for Tempo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() != 3 {
            return Err(Error::Other(format!(
                "Invalid tempo '{}': expected E-P-C",
                s
            )));
        }

        let phase = |text: &str| -> Result<u32> {
            if text.eq_ignore_ascii_case("x") {
                return Ok(0);
            }
            text.parse::<u32>()
                .map_err(|e| Error::Other(format!("Invalid tempo '{}': {}", s, e)))
        };

        Ok(Tempo::new(phase(parts[0])?, phase(parts[1])?, phase(parts[2])?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation_explosive_concentric() {
        assert_eq!(Tempo::new(2, 0, 0).notation(), "2-0-X");
        assert_eq!(Tempo::new(0, 0, 0).notation(), "0-0-X");
    }

    #[test]
    fn test_notation_plain() {
        assert_eq!(Tempo::new(2, 1, 2).notation(), "2-1-2");
        assert_eq!(Tempo::new(0, 3, 1).to_string(), "0-3-1");
    }

    #[test]
    fn test_parse_notation() {
        assert_eq!("3-1-X".parse::<Tempo>().unwrap(), Tempo::new(3, 1, 0));
        assert_eq!("4-0-2".parse::<Tempo>().unwrap(), Tempo::new(4, 0, 2));
        assert_eq!("2-0-x".parse::<Tempo>().unwrap(), Tempo::new(2, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("2-0".parse::<Tempo>().is_err());
        assert!("a-b-c".parse::<Tempo>().is_err());
        assert!("-1-0-2".parse::<Tempo>().is_err());
    }
}
