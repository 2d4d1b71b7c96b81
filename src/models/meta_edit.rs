use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EquipSlot {
    Head,
    Body,
    Hands,
    Legs,
    Feet,
    Ears,
    Neck,
    Wrists,
    RFinger,
    LFinger,
}

impl EquipSlot {
    pub fn is_accessory(self) -> bool {
        matches!(
            self,
            EquipSlot::Ears | EquipSlot::Neck | EquipSlot::Wrists | EquipSlot::RFinger | EquipSlot::LFinger
        )
    }

    /// Bits of a set's EQP entry owned by this slot. Accessories have none.
    pub fn eqp_mask(self) -> u64 {
        match self {
            EquipSlot::Body => 0x0000_0000_0000_FFFF,
            EquipSlot::Legs => 0x0000_0000_00FF_0000,
            EquipSlot::Hands => 0x0000_0000_FF00_0000,
            EquipSlot::Feet => 0x0000_00FF_0000_0000,
            EquipSlot::Head => 0xFFFF_FF00_0000_0000,
            _ => 0,
        }
    }

    /// Two bits of an EQDP entry owned by this slot.
    pub fn eqdp_mask(self) -> u16 {
        let offset = match self {
            EquipSlot::Head | EquipSlot::Ears => 0,
            EquipSlot::Body | EquipSlot::Neck => 2,
            EquipSlot::Hands | EquipSlot::Wrists => 4,
            EquipSlot::Legs | EquipSlot::RFinger => 6,
            EquipSlot::Feet | EquipSlot::LFinger => 8,
        };
        0b11 << offset
    }
}

#[derive(Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EstKind {
    Face,
    Hair,
    Head,
    Body,
}

#[derive(Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    Equipment,
    Accessory,
    Weapon,
    Monster,
    DemiHuman,
}

#[derive(Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RspAttribute {
    MaleMinSize,
    MaleMaxSize,
    MaleMinTail,
    MaleMaxTail,
    FemaleMinSize,
    FemaleMaxSize,
    FemaleMinTail,
    FemaleMaxTail,
    BustMinX,
    BustMinY,
    BustMinZ,
    BustMaxX,
    BustMaxY,
    BustMaxZ,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ImcEntry {
    pub material_id: u8,
    pub decal_id: u8,
    pub attribute_and_sound: u16,
    pub vfx_id: u8,
    pub material_animation_id: u8,
}

/// Identity of a structured edit: the table it touches and the entry in it.
///
/// Two edits with the same identity compete; their values are irrelevant to
/// whether they collide.
#[derive(Serialize, Display, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaEditId {
    #[display("eqp {set_id} {slot}")]
    Eqp { set_id: u16, slot: EquipSlot },
    #[display("eqdp {set_id} {slot} {race}")]
    Eqdp {
        set_id: u16,
        slot: EquipSlot,
        race: u16,
    },
    #[display("est {kind} {race} {set_id}")]
    Est { kind: EstKind, race: u16, set_id: u16 },
    #[display("gmp {set_id}")]
    Gmp { set_id: u16 },
    #[display("imc {object} {primary_id} {secondary_id} {variant} {slot}")]
    Imc {
        object: ObjectKind,
        primary_id: u16,
        secondary_id: u16,
        variant: u16,
        slot: EquipSlot,
    },
    #[display("rsp {sub_race} {attribute}")]
    Rsp { sub_race: u8, attribute: RspAttribute },
}

/// A structured, non-file modification contributed by a mod.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum MetaEdit {
    Eqp {
        set_id: u16,
        slot: EquipSlot,
        entry: u64,
    },
    Eqdp {
        set_id: u16,
        slot: EquipSlot,
        race: u16,
        entry: u16,
    },
    Est {
        kind: EstKind,
        race: u16,
        set_id: u16,
        entry: u16,
    },
    Gmp {
        set_id: u16,
        entry: u64,
    },
    Imc {
        object: ObjectKind,
        primary_id: u16,
        secondary_id: u16,
        variant: u16,
        slot: EquipSlot,
        entry: ImcEntry,
    },
    Rsp {
        sub_race: u8,
        attribute: RspAttribute,
        value: f32,
    },
}

impl MetaEdit {
    pub fn id(&self) -> MetaEditId {
        match *self {
            MetaEdit::Eqp { set_id, slot, .. } => MetaEditId::Eqp { set_id, slot },
            MetaEdit::Eqdp {
                set_id, slot, race, ..
            } => MetaEditId::Eqdp { set_id, slot, race },
            MetaEdit::Est {
                kind, race, set_id, ..
            } => MetaEditId::Est { kind, race, set_id },
            MetaEdit::Gmp { set_id, .. } => MetaEditId::Gmp { set_id },
            MetaEdit::Imc {
                object,
                primary_id,
                secondary_id,
                variant,
                slot,
                ..
            } => MetaEditId::Imc {
                object,
                primary_id,
                secondary_id,
                variant,
                slot,
            },
            MetaEdit::Rsp {
                sub_race, attribute, ..
            } => MetaEditId::Rsp { sub_race, attribute },
        }
    }

    /// Whether applying either edit leaves the game in the same state.
    ///
    /// EQP and EQDP entries are shared by several slots, so only the bits the
    /// slot owns are compared.
    pub fn same_effect(&self, other: &MetaEdit) -> bool {
        if self.id() != other.id() {
            return false;
        }
        match (self, other) {
            (MetaEdit::Eqp { slot, entry: a, .. }, MetaEdit::Eqp { entry: b, .. }) => {
                a & slot.eqp_mask() == b & slot.eqp_mask()
            }
            (MetaEdit::Eqdp { slot, entry: a, .. }, MetaEdit::Eqdp { entry: b, .. }) => {
                a & slot.eqdp_mask() == b & slot.eqdp_mask()
            }
            (MetaEdit::Est { entry: a, .. }, MetaEdit::Est { entry: b, .. }) => a == b,
            (MetaEdit::Gmp { entry: a, .. }, MetaEdit::Gmp { entry: b, .. }) => a == b,
            (MetaEdit::Imc { entry: a, .. }, MetaEdit::Imc { entry: b, .. }) => a == b,
            (MetaEdit::Rsp { value: a, .. }, MetaEdit::Rsp { value: b, .. }) => {
                a.to_bits() == b.to_bits()
            }
            _ => false,
        }
    }

    /// Folds this edit into a set's EQP entry. Other kinds leave it untouched.
    pub fn merge_eqp(&self, base: u64) -> u64 {
        match *self {
            MetaEdit::Eqp { slot, entry, .. } => {
                let mask = slot.eqp_mask();
                (base & !mask) | (entry & mask)
            }
            _ => base,
        }
    }

    /// Folds this edit into an EQDP entry. Other kinds leave it untouched.
    pub fn merge_eqdp(&self, base: u16) -> u16 {
        match *self {
            MetaEdit::Eqdp { slot, entry, .. } => {
                let mask = slot.eqdp_mask();
                (base & !mask) | (entry & mask)
            }
            _ => base,
        }
    }
}
