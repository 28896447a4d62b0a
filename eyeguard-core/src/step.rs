use serde::{Deserialize, Serialize};
use std::fmt;

/// One mode of the engine.
///
/// Variants carry no ordering meaning; the sequence between them lives in
/// [`StepKind::next`]. The discriminants are only used to index
/// [`crate::StepDurations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Off,
    Suspended,
    Working,
    /// Pre-break warning with the long lead.
    #[serde(rename = "notify_1")]
    Notify1,
    /// Pre-break warning with the short lead.
    #[serde(rename = "notify_2")]
    Notify2,
    Break,
}

impl StepKind {
    pub const COUNT: usize = 6;

    pub const ALL: [StepKind; Self::COUNT] = [
        StepKind::Off,
        StepKind::Suspended,
        StepKind::Working,
        StepKind::Notify1,
        StepKind::Notify2,
        StepKind::Break,
    ];

    pub fn index(self) -> usize {
        match self {
            StepKind::Off => 0,
            StepKind::Suspended => 1,
            StepKind::Working => 2,
            StepKind::Notify1 => 3,
            StepKind::Notify2 => 4,
            StepKind::Break => 5,
        }
    }

    /// Automatic successor, used when no override is pending.
    pub fn next(self) -> StepKind {
        match self {
            StepKind::Working => StepKind::Notify1,
            StepKind::Notify1 => StepKind::Notify2,
            StepKind::Notify2 => StepKind::Break,
            StepKind::Break => StepKind::Working,
            StepKind::Off => StepKind::Off,
            StepKind::Suspended => StepKind::Working,
        }
    }

    /// Steps that count down towards the next break.
    pub fn is_work(self) -> bool {
        matches!(
            self,
            StepKind::Working | StepKind::Notify1 | StepKind::Notify2
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            StepKind::Off => "off",
            StepKind::Suspended => "suspended",
            StepKind::Working => "working",
            StepKind::Notify1 => "notify_1",
            StepKind::Notify2 => "notify_2",
            StepKind::Break => "break",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position_in_all() {
        for (i, kind) in StepKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn work_cycle_returns_to_working() {
        let mut kind = StepKind::Working;
        let mut visited = vec![kind];
        for _ in 0..4 {
            kind = kind.next();
            visited.push(kind);
        }
        assert_eq!(
            visited,
            vec![
                StepKind::Working,
                StepKind::Notify1,
                StepKind::Notify2,
                StepKind::Break,
                StepKind::Working,
            ]
        );
    }

    #[test]
    fn off_loops_and_suspended_resumes() {
        assert_eq!(StepKind::Off.next(), StepKind::Off);
        assert_eq!(StepKind::Suspended.next(), StepKind::Working);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&StepKind::Notify1).unwrap();
        assert_eq!(json, "\"notify_1\"");
    }
}
