use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a produce type, e.g. "tomato", "strawberry".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProduceId(pub String);

impl ProduceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProduceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProduceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A crop type with fixed economic and timing parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceType {
    /// Catalog key.
    pub id: ProduceId,
    /// Human-readable name used in reports.
    pub name: String,
    /// Display glyph, opaque to the simulation.
    pub icon: String,
    /// Price of one seed (> 0).
    pub seed_cost: u64,
    /// Price one harvested unit fetches at the weekly sale (> 0).
    pub sell_price: u64,
    /// Days from planting until the crop is ready (> 0).
    pub growth_time_days: u32,
}

impl ProduceType {
    /// Whether a crop planted on `planted_at_day` is ripe when observed on `day`.
    pub fn is_ripe(&self, planted_at_day: u32, day: u32) -> bool {
        day.saturating_sub(planted_at_day) >= self.growth_time_days
    }
}

/// Static list of produce types, looked up by id.
///
/// Iteration order is the declaration order; it decides ties in
/// [`Catalog::cheapest_seed`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<ProduceType>,
}

impl Catalog {
    pub fn new(entries: Vec<ProduceType>) -> Self {
        Self { entries }
    }

    /// Look up a produce type by id.
    pub fn find(&self, id: &str) -> Option<&ProduceType> {
        self.entries.iter().find(|p| p.id.as_str() == id)
    }

    /// The entry with the lowest seed cost; the first one wins ties.
    pub fn cheapest_seed(&self) -> Option<&ProduceType> {
        self.entries.iter().min_by_key(|p| p.seed_cost)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProduceType> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn produce(id: &str, name: &str, icon: &str, seed: u64, sell: u64, days: u32) -> ProduceType {
    ProduceType {
        id: ProduceId::from(id),
        name: name.to_string(),
        icon: icon.to_string(),
        seed_cost: seed,
        sell_price: sell,
        growth_time_days: days,
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![
            produce("tomato", "Tomato", "🍅", 5, 15, 3),
            produce("strawberry", "Strawberry", "🍓", 10, 25, 2),
            produce("carrot", "Carrot", "🥕", 3, 12, 4),
            produce("corn", "Corn", "🌽", 8, 30, 5),
            produce("potato", "Potato", "🥔", 6, 20, 4),
            produce("wheat", "Wheat", "🌾", 4, 10, 6),
        ])
    }
}
