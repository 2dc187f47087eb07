//! The five-category knowledge vector carried by every human.
//!
//! Knowledge accumulates without decay. It only moves downward through
//! parent averaging at birth and through pairwise exchange, which pulls
//! two values toward their mean. Components are never clamped here; an
//! optional ceiling is applied by the engine when configured.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::KnowledgeCategory;

/// A fixed five-component knowledge vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Knowledge {
    /// Abstract understanding of the world.
    pub science: f64,
    /// Tool making and construction.
    pub crafting: f64,
    /// Fighting skill.
    pub combat: f64,
    /// Foraging and staying alive.
    pub survival: f64,
    /// Cooperation and communication.
    pub social: f64,
}

impl Knowledge {
    /// The all-zero vector.
    pub const ZERO: Self = Self {
        science: 0.0,
        crafting: 0.0,
        combat: 0.0,
        survival: 0.0,
        social: 0.0,
    };

    /// Build a vector with every component set to `value`.
    pub const fn uniform(value: f64) -> Self {
        Self {
            science: value,
            crafting: value,
            combat: value,
            survival: value,
            social: value,
        }
    }

    /// Read one component.
    pub const fn get(&self, category: KnowledgeCategory) -> f64 {
        match category {
            KnowledgeCategory::Science => self.science,
            KnowledgeCategory::Crafting => self.crafting,
            KnowledgeCategory::Combat => self.combat,
            KnowledgeCategory::Survival => self.survival,
            KnowledgeCategory::Social => self.social,
        }
    }

    /// Mutable access to one component.
    pub const fn get_mut(&mut self, category: KnowledgeCategory) -> &mut f64 {
        match category {
            KnowledgeCategory::Science => &mut self.science,
            KnowledgeCategory::Crafting => &mut self.crafting,
            KnowledgeCategory::Combat => &mut self.combat,
            KnowledgeCategory::Survival => &mut self.survival,
            KnowledgeCategory::Social => &mut self.social,
        }
    }

    /// Add `amount` to one component.
    pub fn add(&mut self, category: KnowledgeCategory, amount: f64) {
        *self.get_mut(category) += amount;
    }

    /// Sum of all five components.
    pub fn total(&self) -> f64 {
        self.science + self.crafting + self.combat + self.survival + self.social
    }

    /// Component-wise sum.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    /// Component-wise scaling.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// Component-wise mean of two vectors.
    #[must_use]
    pub fn average(a: &Self, b: &Self) -> Self {
        a.zip_with(b, |x, y| (x + y) / 2.0)
    }

    /// Component-wise blend: `self + (other - self) * weight`.
    ///
    /// A weight of 0 keeps `self`, a weight of 1 yields `other`.
    #[must_use]
    pub fn blend(&self, other: &Self, weight: f64) -> Self {
        self.zip_with(other, |a, b| (b - a).mul_add(weight, a))
    }

    /// Component-wise upper bound.
    #[must_use]
    pub fn capped(&self, ceiling: f64) -> Self {
        self.map(|v| v.min(ceiling))
    }

    /// Sum a sequence of vectors. An empty sequence yields [`Knowledge::ZERO`].
    pub fn sum<'a>(items: impl IntoIterator<Item = &'a Self>) -> Self {
        items
            .into_iter()
            .fold(Self::ZERO, |acc, k| acc.plus(k))
    }

    /// Mean of a sequence of vectors. An empty sequence yields [`Knowledge::ZERO`].
    pub fn mean<'a>(items: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut count: u32 = 0;
        let total = items.into_iter().fold(Self::ZERO, |acc, k| {
            count = count.saturating_add(1);
            acc.plus(k)
        });
        if count == 0 {
            return Self::ZERO;
        }
        total.scaled(1.0 / f64::from(count))
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            science: f(self.science),
            crafting: f(self.crafting),
            combat: f(self.combat),
            survival: f(self.survival),
            social: f(self.social),
        }
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            science: f(self.science, other.science),
            crafting: f(self.crafting, other.crafting),
            combat: f(self.combat, other.combat),
            survival: f(self.survival, other.survival),
            social: f(self.social, other.social),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn sample() -> Knowledge {
        Knowledge {
            science: 1.0,
            crafting: 2.0,
            combat: 3.0,
            survival: 4.0,
            social: 5.0,
        }
    }

    #[test]
    fn total_sums_components() {
        assert_eq!(sample().total(), 15.0);
    }

    #[test]
    fn get_and_add_address_the_same_component() {
        let mut k = sample();
        k.add(KnowledgeCategory::Combat, 0.5);
        assert_eq!(k.get(KnowledgeCategory::Combat), 3.5);
        assert_eq!(k.combat, 3.5);
    }

    #[test]
    fn average_is_componentwise() {
        let avg = Knowledge::average(&sample(), &Knowledge::ZERO);
        assert_eq!(avg.science, 0.5);
        assert_eq!(avg.social, 2.5);
    }

    #[test]
    fn blend_endpoints() {
        let a = sample();
        let b = Knowledge::uniform(10.0);
        assert_eq!(a.blend(&b, 0.0), a);
        assert_eq!(a.blend(&b, 1.0), b);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        let empty: Vec<Knowledge> = Vec::new();
        assert_eq!(Knowledge::mean(&empty), Knowledge::ZERO);
    }

    #[test]
    fn mean_of_two() {
        let items = [Knowledge::uniform(2.0), Knowledge::uniform(4.0)];
        assert_eq!(Knowledge::mean(&items), Knowledge::uniform(3.0));
        assert_eq!(Knowledge::sum(&items), Knowledge::uniform(6.0));
    }

    #[test]
    fn capped_limits_each_component() {
        let k = sample().capped(2.5);
        assert_eq!(k.science, 1.0);
        assert_eq!(k.crafting, 2.0);
        assert_eq!(k.social, 2.5);
    }
}
