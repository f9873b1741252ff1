//! Named stat references.

/// Identifies a single field of a [`super::StatBlock`].
///
/// Used by attacks to pick the stat they scale with and by buffs to pick the
/// stat they modify.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKey {
    HitPoints,
    MaxHitPoints,
    Attack,
    Defence,
    Shield,
    Energy,
    MaxEnergy,
    EnergyRegen,
    HpRegen,
    Speed,
}

impl StatKey {
    /// Stats that an active buff is allowed to modify.
    ///
    /// Resource pools (HP, energy, their maximums) are not buffable; buffs
    /// that name them are ignored by the stat pipeline.
    pub const BUFFABLE: [StatKey; 6] = [
        StatKey::Attack,
        StatKey::Defence,
        StatKey::Shield,
        StatKey::EnergyRegen,
        StatKey::HpRegen,
        StatKey::Speed,
    ];

    pub fn is_buffable(self) -> bool {
        Self::BUFFABLE.contains(&self)
    }

    /// Short label used in descriptions ("attack", "hp regen").
    pub fn label(self) -> &'static str {
        match self {
            StatKey::HitPoints => "health",
            StatKey::MaxHitPoints => "max health",
            StatKey::Attack => "attack",
            StatKey::Defence => "defence",
            StatKey::Shield => "shield",
            StatKey::Energy => "energy",
            StatKey::MaxEnergy => "max energy",
            StatKey::EnergyRegen => "energy regen",
            StatKey::HpRegen => "hp regen",
            StatKey::Speed => "speed",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_snake_case() {
        assert_eq!(StatKey::from_str("energy_regen"), Ok(StatKey::EnergyRegen));
        assert_eq!(StatKey::from_str("DEFENCE"), Ok(StatKey::Defence));
    }

    #[test]
    fn only_six_stats_are_buffable() {
        let buffable = StatKey::iter().filter(|k| k.is_buffable()).count();
        assert_eq!(buffable, 6);
        assert!(!StatKey::HitPoints.is_buffable());
    }
}
