//! Material definitions and registry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every material a cell can hold
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum MaterialKind {
    #[default]
    Empty,
    Sand,
    Water,
    Wall,
    Fire,
    Oil,
    Plant,
    Acid,
    Ice,
    Steam,
}

/// Physical properties of a material
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialProperties {
    /// Only used for relative ordering in the displacement rule
    pub density: f32,
    pub flammable: bool,
    /// Lifespan written into metadata when the material is placed
    pub default_lifespan: i32,
    /// Temperature written into metadata when the material is placed
    pub spawn_temperature: Option<f32>,
    /// Per-tick chance to grow into an empty neighbor (plants)
    pub growth_rate: Option<f32>,
    /// Per-neighbor dissolve roll (acid)
    pub dissolve_rate: Option<f32>,
    /// Melt chance per degree above zero (ice)
    pub melt_rate: Option<f32>,
    /// Base color (RGBA) for renderers
    pub color: [u8; 4],
}

impl MaterialProperties {
    const BASE: MaterialProperties = MaterialProperties {
        density: 0.0,
        flammable: false,
        default_lifespan: 0,
        spawn_temperature: None,
        growth_rate: None,
        dissolve_rate: None,
        melt_rate: None,
        color: [0, 0, 0, 0],
    };
}

const EMPTY: MaterialProperties = MaterialProperties::BASE;

const SAND: MaterialProperties = MaterialProperties {
    density: 3.0,
    color: [194, 178, 128, 255],
    ..MaterialProperties::BASE
};

const WATER: MaterialProperties = MaterialProperties {
    density: 2.0,
    color: [40, 100, 220, 255],
    ..MaterialProperties::BASE
};

const WALL: MaterialProperties = MaterialProperties {
    density: 10.0,
    color: [110, 110, 115, 255],
    ..MaterialProperties::BASE
};

const FIRE: MaterialProperties = MaterialProperties {
    density: 0.5,
    default_lifespan: 100,
    spawn_temperature: Some(400.0),
    color: [255, 120, 20, 255],
    ..MaterialProperties::BASE
};

const OIL: MaterialProperties = MaterialProperties {
    density: 1.5,
    flammable: true,
    color: [70, 50, 30, 255],
    ..MaterialProperties::BASE
};

const PLANT: MaterialProperties = MaterialProperties {
    density: 1.0,
    flammable: true,
    growth_rate: Some(0.01),
    color: [40, 160, 60, 255],
    ..MaterialProperties::BASE
};

const ACID: MaterialProperties = MaterialProperties {
    density: 2.2,
    default_lifespan: 500,
    dissolve_rate: Some(0.2),
    color: [150, 230, 40, 255],
    ..MaterialProperties::BASE
};

const ICE: MaterialProperties = MaterialProperties {
    density: 1.8,
    melt_rate: Some(0.01),
    color: [180, 220, 255, 255],
    ..MaterialProperties::BASE
};

const STEAM: MaterialProperties = MaterialProperties {
    density: 0.3,
    default_lifespan: 200,
    spawn_temperature: Some(110.0),
    color: [210, 210, 225, 255],
    ..MaterialProperties::BASE
};

impl MaterialKind {
    /// All materials in id order
    pub const ALL: [MaterialKind; 10] = [
        MaterialKind::Empty,
        MaterialKind::Sand,
        MaterialKind::Water,
        MaterialKind::Wall,
        MaterialKind::Fire,
        MaterialKind::Oil,
        MaterialKind::Plant,
        MaterialKind::Acid,
        MaterialKind::Ice,
        MaterialKind::Steam,
    ];

    /// Static properties of this material
    pub fn properties(self) -> &'static MaterialProperties {
        match self {
            MaterialKind::Empty => &EMPTY,
            MaterialKind::Sand => &SAND,
            MaterialKind::Water => &WATER,
            MaterialKind::Wall => &WALL,
            MaterialKind::Fire => &FIRE,
            MaterialKind::Oil => &OIL,
            MaterialKind::Plant => &PLANT,
            MaterialKind::Acid => &ACID,
            MaterialKind::Ice => &ICE,
            MaterialKind::Steam => &STEAM,
        }
    }

    /// Lowercase display name
    pub fn name(self) -> &'static str {
        match self {
            MaterialKind::Empty => "empty",
            MaterialKind::Sand => "sand",
            MaterialKind::Water => "water",
            MaterialKind::Wall => "wall",
            MaterialKind::Fire => "fire",
            MaterialKind::Oil => "oil",
            MaterialKind::Plant => "plant",
            MaterialKind::Acid => "acid",
            MaterialKind::Ice => "ice",
            MaterialKind::Steam => "steam",
        }
    }

    /// Numeric id, stable for the lifetime of the enum
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn is_empty(self) -> bool {
        self == MaterialKind::Empty
    }

    /// Whether `self` may move into a cell holding `target`
    ///
    /// True iff the target is empty, or the target is not a wall and is
    /// strictly less dense than `self`.
    pub fn can_displace(self, target: MaterialKind) -> bool {
        match target {
            MaterialKind::Empty => true,
            MaterialKind::Wall => false,
            _ => self.properties().density > target.properties().density,
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a material name does not match any [`MaterialKind`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material '{0}'")]
pub struct UnknownMaterial(pub String);

impl FromStr for MaterialKind {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MaterialKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownMaterial(s.to_string()))
    }
}
