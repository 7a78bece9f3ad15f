//! Particle type definitions and registry

use serde::{Deserialize, Serialize};

/// Built-in particle types
///
/// The discriminant is the stable id used by [`Particles::get_by_id`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ParticleType {
    /// Empty space
    #[default]
    None = 0,
    Sand = 1,
    Water = 2,
    Stone = 3,
    Oil = 4,
}

impl ParticleType {
    /// Every type, in id order
    pub const ALL: [ParticleType; 5] = [
        ParticleType::None,
        ParticleType::Sand,
        ParticleType::Water,
        ParticleType::Stone,
        ParticleType::Oil,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Map a raw id back to a type; unknown ids become `None`
    pub fn from_id(id: u8) -> Self {
        Self::ALL
            .get(id as usize)
            .copied()
            .unwrap_or(ParticleType::None)
    }

    /// Lowercase display name
    pub fn name(self) -> &'static str {
        match self {
            ParticleType::None => "none",
            ParticleType::Sand => "sand",
            ParticleType::Water => "water",
            ParticleType::Stone => "stone",
            ParticleType::Oil => "oil",
        }
    }

    /// Parse a display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for ParticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a particle behaves physically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleState {
    /// Doesn't move, can't be displaced (stone)
    Solid,
    /// Falls, piles up (sand)
    Powder,
    /// Falls, then spreads sideways (water, oil)
    Liquid,
    /// No movement rule yet
    Gas,
}

/// Immutable properties shared by every particle of one type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticleProperties {
    pub kind: ParticleType,
    pub name: String,
    pub state: ParticleState,

    /// Base color (RGBA)
    pub color: [u8; 4],

    /// Heavier particles sink through lighter non-solid ones
    pub density: f32,

    /// 0.0 (runny) - 1.0 (thick), only read for liquids
    pub viscosity: f32,
}

impl Default for ParticleProperties {
    fn default() -> Self {
        Self {
            kind: ParticleType::None,
            name: "none".to_string(),
            state: ParticleState::Gas,
            color: [0, 0, 0, 0],
            density: 0.0,
            viscosity: 0.0,
        }
    }
}

/// Registry of particle properties, indexed by type id
pub struct Particles {
    properties: Vec<ParticleProperties>,
}

impl Particles {
    pub fn new() -> Self {
        let mut particles = Self {
            properties: Vec::with_capacity(ParticleType::ALL.len()),
        };
        particles.register_defaults();
        log::debug!("Registered {} particle types", particles.properties.len());
        particles
    }

    fn register_defaults(&mut self) {
        // Empty space, never actually stored in the grid
        self.register(ParticleProperties::default());

        self.register(ParticleProperties {
            kind: ParticleType::Sand,
            name: "sand".to_string(),
            state: ParticleState::Powder,
            color: [236, 204, 160, 220],
            density: 1.5,
            ..Default::default()
        });

        self.register(ParticleProperties {
            kind: ParticleType::Water,
            name: "water".to_string(),
            state: ParticleState::Liquid,
            color: [66, 135, 245, 180],
            density: 1.0,
            viscosity: 0.1,
        });

        self.register(ParticleProperties {
            kind: ParticleType::Stone,
            name: "stone".to_string(),
            state: ParticleState::Solid,
            color: [128, 128, 128, 255],
            density: 2.5,
            ..Default::default()
        });

        // Floats on water
        self.register(ParticleProperties {
            kind: ParticleType::Oil,
            name: "oil".to_string(),
            state: ParticleState::Liquid,
            color: [50, 40, 30, 230],
            density: 0.8,
            viscosity: 0.3,
        });
    }

    fn register(&mut self, properties: ParticleProperties) {
        let id = properties.kind.id() as usize;

        if self.properties.len() <= id {
            self.properties.resize(id + 1, ParticleProperties::default());
        }

        self.properties[id] = properties;
    }

    /// Get properties for a type
    pub fn get(&self, kind: ParticleType) -> &ParticleProperties {
        self.get_by_id(kind.id())
    }

    /// Get properties by raw id, falling back to the empty type
    pub fn get_by_id(&self, id: u8) -> &ParticleProperties {
        self.properties
            .get(id as usize)
            .unwrap_or(&self.properties[0])
    }

    /// Build a fresh particle: at rest, not yet updated, colored by type
    pub fn create(&self, kind: ParticleType) -> crate::Particle {
        crate::Particle::new(kind, self.get(kind).color)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticleProperties> {
        self.properties.iter()
    }
}

impl Default for Particles {
    fn default() -> Self {
        Self::new()
    }
}
