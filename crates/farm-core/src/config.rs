use crate::{Catalog, LedgerItem, ProduceId, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Tunable constants for a farm session.
///
/// Every field has a default, so an override file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Cash at session start.
    pub initial_cash: i64,
    /// Number of plots in the grid.
    pub plot_count: usize,
    /// Seed stock at session start, in inventory order.
    pub initial_seeds: Vec<LedgerItem>,
    /// Days per sales cycle.
    pub days_in_week: u32,
    /// Clock ticks per simulated day.
    pub hours_in_day: u32,
    /// Real-time period of one clock tick, in milliseconds.
    pub tick_interval_ms: u64,
    /// How long a notification stays visible, in milliseconds.
    pub notification_ttl_ms: u64,
    /// Produce the automation plants and restocks first.
    pub priority_produce: ProduceId,
    /// Restock the priority produce when its stock falls below this.
    pub priority_threshold: u32,
    /// Maximum priority seeds bought per day.
    pub priority_batch_size: u32,
    /// Buy the cheapest seed when total stock falls below this.
    pub any_seed_threshold: u64,
    /// Maximum cheapest seeds bought per day.
    pub cheapest_batch_size: u32,
    /// Also run the automation once when the session opens on day 1.
    pub automate_opening_day: bool,
    pub catalog: Catalog,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            initial_cash: 100,
            plot_count: 9,
            initial_seeds: vec![
                LedgerItem::new("tomato", 5),
                LedgerItem::new("strawberry", 3),
            ],
            days_in_week: 7,
            hours_in_day: 24,
            tick_interval_ms: 200,
            notification_ttl_ms: 5_000,
            priority_produce: ProduceId::from("strawberry"),
            priority_threshold: 3,
            priority_batch_size: 5,
            any_seed_threshold: 2,
            cheapest_batch_size: 3,
            automate_opening_day: false,
            catalog: Catalog::default(),
        }
    }
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

impl FarmConfig {
    /// Parse and validate a YAML override document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: FarmConfig = serde_yaml::from_str(text)?;
        validate_config(&cfg)?;
        Ok(cfg)
    }

    /// Read, parse and validate a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// 1-based week number for `day`.
    pub fn week_of(&self, day: u32) -> u32 {
        day.saturating_sub(1) / self.days_in_week.max(1) + 1
    }
}

/// Validate a configuration, including catalog cross-references.
pub fn validate_config(cfg: &FarmConfig) -> Result<(), ValidationError> {
    if cfg.catalog.is_empty() {
        return Err(ValidationError::EmptyCatalog);
    }
    let mut ids = BTreeSet::new();
    for p in cfg.catalog.iter() {
        if !ids.insert(p.id.as_str()) {
            return Err(ValidationError::DuplicateProduce(p.id.to_string()));
        }
        if p.seed_cost == 0 || p.sell_price == 0 || p.growth_time_days == 0 {
            return Err(ValidationError::NonPositiveProduce(p.id.to_string()));
        }
    }
    for seed in &cfg.initial_seeds {
        if cfg.catalog.find(seed.produce_id.as_str()).is_none() {
            return Err(ValidationError::ProduceNotInCatalog(seed.produce_id.to_string()));
        }
    }
    if cfg.catalog.find(cfg.priority_produce.as_str()).is_none() {
        return Err(ValidationError::ProduceNotInCatalog(
            cfg.priority_produce.to_string(),
        ));
    }
    if cfg.initial_cash < 0 {
        return Err(ValidationError::NegativeCash);
    }
    let counts = [
        ("plot_count", cfg.plot_count as u64),
        ("days_in_week", u64::from(cfg.days_in_week)),
        ("hours_in_day", u64::from(cfg.hours_in_day)),
        ("tick_interval_ms", cfg.tick_interval_ms),
        ("priority_batch_size", u64::from(cfg.priority_batch_size)),
        ("cheapest_batch_size", u64::from(cfg.cheapest_batch_size)),
    ];
    for (name, value) in counts {
        if value == 0 {
            return Err(ValidationError::ZeroSetting(name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = FarmConfig::default();
        validate_config(&cfg).unwrap();
        assert_eq!(cfg.tick_interval(), Duration::from_millis(200));
        assert_eq!(cfg.notification_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn yaml_overrides_keep_defaults() {
        let cfg = FarmConfig::from_yaml_str("initial_cash: 250\nplot_count: 4\n").unwrap();
        assert_eq!(cfg.initial_cash, 250);
        assert_eq!(cfg.plot_count, 4);
        assert_eq!(cfg.days_in_week, 7);
        assert_eq!(cfg.catalog.len(), 6);
    }

    #[test]
    fn yaml_catalog_override() {
        let text = r#"
catalog:
  - { id: kale, name: Kale, icon: "k", seed_cost: 2, sell_price: 9, growth_time_days: 1 }
priority_produce: kale
initial_seeds:
  - { produce_id: kale, quantity: 4 }
"#;
        let cfg = FarmConfig::from_yaml_str(text).unwrap();
        assert_eq!(cfg.catalog.len(), 1);
        assert_eq!(cfg.catalog.find("kale").unwrap().sell_price, 9);
        assert_eq!(cfg.initial_seeds, vec![LedgerItem::new("kale", 4)]);
    }

    #[test]
    fn rejects_unknown_seed_reference() {
        let mut cfg = FarmConfig::default();
        cfg.initial_seeds.push(LedgerItem::new("pumpkin", 1));
        assert_eq!(
            validate_config(&cfg),
            Err(ValidationError::ProduceNotInCatalog("pumpkin".into()))
        );
    }

    #[test]
    fn rejects_zero_settings() {
        let mut cfg = FarmConfig::default();
        cfg.hours_in_day = 0;
        assert_eq!(
            validate_config(&cfg),
            Err(ValidationError::ZeroSetting("hours_in_day"))
        );
        let err = FarmConfig::from_yaml_str("days_in_week: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn week_numbering() {
        let cfg = FarmConfig::default();
        assert_eq!(cfg.week_of(1), 1);
        assert_eq!(cfg.week_of(7), 1);
        assert_eq!(cfg.week_of(8), 2);
        assert_eq!(cfg.week_of(15), 3);
    }
}
