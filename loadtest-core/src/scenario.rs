use std::collections::BTreeMap;

use rand::seq::IndexedRandom as _;

/// A named request variant that replaces the configured target for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scenario {
    pub name: String,
    pub endpoint: String,
    /// Empty means `GET`.
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub payload: String,
}

/// Supplies an optional per-request override.
pub trait ScenarioSource: Send + Sync {
    fn pick(&self) -> Option<&Scenario>;
}

/// Scenarios picked uniformly at random.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }
}

impl ScenarioSource for ScenarioSet {
    fn pick(&self) -> Option<&Scenario> {
        self.scenarios.choose(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn scenario(name: &str) -> Scenario {
        Scenario {
            name: name.to_string(),
            endpoint: format!("http://localhost/{name}"),
            ..Scenario::default()
        }
    }

    #[test]
    fn empty_set_picks_nothing() {
        assert_eq!(ScenarioSet::default().pick(), None);
    }

    #[test]
    fn picks_every_scenario_eventually() {
        let set = ScenarioSet::new(vec![scenario("a"), scenario("b"), scenario("c")]);

        let mut seen: HashMap<String, u32> = HashMap::new();
        for _ in 0..3_000 {
            if let Some(s) = set.pick() {
                *seen.entry(s.name.clone()).or_insert(0) += 1;
            }
        }

        assert_eq!(seen.len(), 3);
        // Uniform choice: each variant lands near 1000 picks.
        for (name, count) in &seen {
            assert!((700..=1_300).contains(count), "{name} picked {count} times");
        }
    }
}
