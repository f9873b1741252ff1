//! Equipment slots and items.
//!
//! A character holds at most one item per slot. Items contribute a flat
//! [`StatBonus`] and a list of passive buffs that stay active while equipped.

use crate::effect::{BuffEffect, EffectSource};
use crate::stats::StatBonus;

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
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

/// An equippable item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub slot: EquipmentSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defence: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_hit_points: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive_buffs: Vec<BuffEffect>,
}

impl Item {
    pub fn new(name: impl Into<String>, slot: EquipmentSlot) -> Self {
        Self {
            name: name.into(),
            slot,
            attack: 0,
            defence: 0,
            max_hit_points: 0,
            passive_buffs: Vec::new(),
        }
    }

    pub fn with_attack(mut self, attack: i32) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_defence(mut self, defence: i32) -> Self {
        self.defence = defence;
        self
    }

    pub fn with_max_hit_points(mut self, max_hit_points: i32) -> Self {
        self.max_hit_points = max_hit_points;
        self
    }

    pub fn with_passive(mut self, buff: BuffEffect) -> Self {
        self.passive_buffs.push(buff);
        self
    }

    pub fn bonus(&self) -> StatBonus {
        StatBonus::new()
            .with_attack(self.attack)
            .with_defence(self.defence)
            .with_max_hit_points(self.max_hit_points)
    }

    /// Passive buffs, tagged as equipment-sourced.
    pub fn passive_buffs(&self) -> impl Iterator<Item = BuffEffect> + '_ {
        self.passive_buffs.iter().map(|buff| BuffEffect {
            source: EffectSource::Equipment,
            is_self_targeted: true,
            ..buff.clone()
        })
    }

    pub fn description(&self) -> String {
        let mut parts = Vec::new();
        if self.attack != 0 {
            parts.push(format!("{:+} attack", self.attack));
        }
        if self.defence != 0 {
            parts.push(format!("{:+} defence", self.defence));
        }
        if self.max_hit_points != 0 {
            parts.push(format!("{:+} max health", self.max_hit_points));
        }
        for buff in &self.passive_buffs {
            parts.push(format!("{:+} {}", buff.amount, buff.stat.label()));
        }
        format!("{} ({}): {}", self.name, self.slot, parts.join(", "))
    }
}

/// One optional item per slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub accessory: Option<Item>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Accessory => &mut self.accessory,
        }
    }

    /// Equip `item` in its slot, returning whatever was there before.
    pub fn equip(&mut self, item: Item) -> Option<Item> {
        self.slot_mut(item.slot).replace(item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
        }
    }

    /// Equipped items in slot order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKey;

    #[test]
    fn slots_are_exclusive() {
        let mut equipment = Equipment::empty();
        assert!(equipment.equip(Item::new("Dagger", EquipmentSlot::Weapon)).is_none());
        let replaced = equipment.equip(Item::new("Sword", EquipmentSlot::Weapon));

        assert_eq!(replaced.map(|item| item.name), Some("Dagger".to_string()));
        assert_eq!(equipment.items().count(), 1);
        assert_eq!(equipment.get(EquipmentSlot::Weapon).map(|i| i.name.as_str()), Some("Sword"));
    }

    #[test]
    fn passives_are_tagged_as_equipment() {
        let ring = Item::new("Ring", EquipmentSlot::Accessory)
            .with_passive(BuffEffect::new(StatKey::Speed, 5, 3, false));
        let passive: Vec<_> = ring.passive_buffs().collect();
        assert!(passive[0].is_passive());
        assert!(passive[0].is_self_targeted);
    }

    #[test]
    fn description_lists_bonuses() {
        let plate = Item::new("Plate", EquipmentSlot::Armor)
            .with_defence(4)
            .with_max_hit_points(-10);
        assert_eq!(plate.description(), "Plate (armor): +4 defence, -10 max health");
    }
}
