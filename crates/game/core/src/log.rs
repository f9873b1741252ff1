//! Battle narration.
//!
//! [`BattleLog`] is the append-only record of a battle. Rules code never owns a
//! log directly; it narrates through the [`LogSink`] trait, which is the
//! host-facing `{ battle_log, message_log }` contract.

/// Category of a log entry, used by hosts for colouring and filtering.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogKind {
    Damage,
    Heal,
    Buff,
    Debuff,
    DamageOverTime,
    Shield,
    Recharge,
    Energy,
    Charge,
    Action,
    Trigger,
    Info,
    Victory,
    Error,
}

impl LogKind {
    /// Render the human-readable message for a stat-affecting event.
    pub fn describe(self, source: &str, value: Option<i32>, target: &str) -> String {
        let v = value.unwrap_or_default();
        match self {
            LogKind::Damage => format!("{source} deals {v} damage to {target}"),
            LogKind::Heal => format!("{source} restores {v} health"),
            LogKind::Buff => format!("{source} empowers {target} ({v:+})"),
            LogKind::Debuff => format!("{source} weakens {target} ({v:+})"),
            LogKind::DamageOverTime => {
                format!("{source} afflicts {target} with {v} damage per turn")
            }
            LogKind::Shield => format!("{source} gains {v} shield"),
            LogKind::Recharge => format!("{source} recovers {v} energy"),
            LogKind::Energy => format!("{source} lacks energy and rests (+{v})"),
            LogKind::Charge => format!("{source} is charging ({v} turns left)"),
            LogKind::Action => format!("{source} acts against {target}"),
            LogKind::Trigger => format!("{source} triggers an effect on {target}"),
            LogKind::Info | LogKind::Victory | LogKind::Error => {
                format!("{source}: {target}")
            }
        }
    }
}

/// A single narrated event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub turn: u32,
    pub message: String,
    pub kind: LogKind,
    pub value: Option<i32>,
    pub source: String,
    pub target: String,
}

/// Host-facing narration contract.
///
/// `battle_log` is invoked for every stat-affecting event, `message_log` for
/// free-text narration.
pub trait LogSink {
    fn battle_log(&mut self, source: &str, kind: LogKind, value: Option<i32>, target: &str);

    fn message_log(&mut self, kind: LogKind, message: &str);
}

/// Sink that discards everything. Used for out-of-battle bookkeeping.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLog;

impl LogSink for NullLog {
    fn battle_log(&mut self, _: &str, _: LogKind, _: Option<i32>, _: &str) {}

    fn message_log(&mut self, _: LogKind, _: &str) {}
}

/// Ordered, append-only record of a battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    turn: u32,
    entries: Vec<LogEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current turn number stamped onto new entries.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Advance the turn stamp.
    pub fn next_turn(&mut self) {
        self.turn += 1;
    }

    /// Remove every entry and reset the turn stamp.
    pub fn clear(&mut self) {
        self.turn = 0;
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Entries appended at or after `index`.
    pub fn since(&self, index: usize) -> &[LogEntry] {
        self.entries.get(index..).unwrap_or(&[])
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}

impl LogSink for BattleLog {
    fn battle_log(&mut self, source: &str, kind: LogKind, value: Option<i32>, target: &str) {
        let message = kind.describe(source, value, target);
        self.push(LogEntry {
            turn: self.turn,
            message,
            kind,
            value,
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    fn message_log(&mut self, kind: LogKind, message: &str) {
        self.push(LogEntry {
            turn: self.turn,
            message: message.to_string(),
            kind,
            value: None,
            source: String::new(),
            target: String::new(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_stamped_with_current_turn() {
        let mut log = BattleLog::new();
        log.battle_log("Hero", LogKind::Damage, Some(12), "Slime");
        log.next_turn();
        log.message_log(LogKind::Info, "Slime wobbles");

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].turn, 0);
        assert_eq!(log.entries()[0].message, "Hero deals 12 damage to Slime");
        assert_eq!(log.entries()[1].turn, 1);
        assert_eq!(log.entries()[1].message, "Slime wobbles");
    }

    #[test]
    fn clear_resets_turn_and_entries() {
        let mut log = BattleLog::new();
        log.next_turn();
        log.message_log(LogKind::Info, "x");
        log.clear();

        assert!(log.is_empty());
        assert_eq!(log.turn(), 0);
    }

    #[test]
    fn since_returns_tail() {
        let mut log = BattleLog::new();
        log.message_log(LogKind::Info, "a");
        log.message_log(LogKind::Info, "b");

        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(5).is_empty());
    }
}
