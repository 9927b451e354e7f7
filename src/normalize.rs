//! Canonical step types and the editor-label alias table.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StepType {
    Start,
    End,
    Motion,
    Wait,
    Io,
    LinearMove,
    RelMove,
    CircularMove,
    Counter,
    Goto,
    /// Unmapped label, uppercased.
    Other(String),
}

/// Editor labels (uppercase) and the canonical type each one means.
const ALIASES: &[(&str, StepType)] = &[
    ("START", StepType::Start),
    ("END", StepType::End),
    ("MOTION", StepType::Motion),
    ("M", StepType::Motion),
    ("ABS MOVE", StepType::Motion),
    ("ABS_MOVE", StepType::Motion),
    ("WAIT", StepType::Wait),
    ("IO", StepType::Io),
    ("SET DO", StepType::Io),
    ("SET_DO", StepType::Io),
    ("CHECK DI", StepType::Io),
    ("CHECK_DI", StepType::Io),
    ("GOTO", StepType::Goto),
    ("JUMP", StepType::Goto),
    ("JUMP IMPORT", StepType::Goto),
    ("JUMP EXPORT", StepType::Goto),
    ("LINEAR MOVE", StepType::LinearMove),
    ("LINEAR_MOVE", StepType::LinearMove),
    ("REL MOVE", StepType::RelMove),
    ("REL_MOVE", StepType::RelMove),
    ("CIRCULAR MOVE", StepType::CircularMove),
    ("CIRCULAR_MOVE", StepType::CircularMove),
    ("ARC", StepType::CircularMove),
    ("COUNTER", StepType::Counter),
    ("LOOP COUNTER", StepType::Counter),
];

/// Map an editor type label to its canonical step type. Case-insensitive;
/// unmapped labels pass through uppercased.
pub fn normalize_type(raw: &str) -> StepType {
    let upper = raw.trim().to_uppercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, ty)| ty.clone())
        .unwrap_or(StepType::Other(upper))
}

impl StepType {
    pub fn as_str(&self) -> &str {
        match self {
            StepType::Start => "START",
            StepType::End => "END",
            StepType::Motion => "MOTION",
            StepType::Wait => "WAIT",
            StepType::Io => "IO",
            StepType::LinearMove => "LINEAR_MOVE",
            StepType::RelMove => "REL_MOVE",
            StepType::CircularMove => "CIRCULAR_MOVE",
            StepType::Counter => "COUNTER",
            StepType::Goto => "GOTO",
            StepType::Other(name) => name.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, StepType::Other(_))
    }

    /// START and END carry no parameters of their own.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepType::Start | StepType::End)
    }

    /// Port presence (`has_input`, `has_output`) for a node of this type.
    pub fn default_ports(&self) -> (bool, bool) {
        match self {
            StepType::Start => (false, true),
            StepType::End => (true, false),
            _ => (true, true),
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StepType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StepType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(normalize_type(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_aliases() {
        for raw in ["MOTION", "m", "Abs Move", " ABS MOVE "] {
            assert_eq!(normalize_type(raw), StepType::Motion, "{raw}");
        }
    }

    #[test]
    fn io_and_goto_aliases() {
        assert_eq!(normalize_type("set do"), StepType::Io);
        assert_eq!(normalize_type("CHECK DI"), StepType::Io);
        assert_eq!(normalize_type("Jump Import"), StepType::Goto);
        assert_eq!(normalize_type("JUMP"), StepType::Goto);
    }

    #[test]
    fn linear_move_spellings() {
        assert_eq!(normalize_type("linear move"), StepType::LinearMove);
        assert_eq!(normalize_type("LINEAR_MOVE"), StepType::LinearMove);
    }

    #[test]
    fn unknown_passes_through_uppercased() {
        let ty = normalize_type("homing");
        assert_eq!(ty, StepType::Other("HOMING".into()));
        assert_eq!(ty.as_str(), "HOMING");
        assert!(!ty.is_known());
    }

    #[test]
    fn canonical_names_are_fixed_points() {
        for (_, ty) in ALIASES {
            assert_eq!(&normalize_type(ty.as_str()), ty);
        }
    }
}
