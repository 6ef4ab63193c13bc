use std::collections::BTreeMap;

use rand::Rng;

use libseed_core::{Error, Result};

use crate::catalog::Entity;

/// Ids `1..=count` of a parent table, assumed to be assigned sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRange {
    count: u64,
}

impl ParentRange {
    pub fn new(entity: Entity, count: u64) -> Result<Self> {
        if count == 0 {
            return Err(Error::MissingParent(entity.table_name().to_string()));
        }
        Ok(Self { count })
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn contains(&self, id: i64) -> bool {
        id >= 1 && (id as u64) <= self.count
    }
}

/// Positional id guess: a uniformly random id in `[1, parent.count()]`.
///
/// The referenced row is not looked up.
pub fn pick_existing_id<R: Rng + ?Sized>(parent: ParentRange, rng: &mut R) -> i64 {
    rng.random_range(1..=parent.count) as i64
}

/// Source of the id ranges child rows may reference.
pub trait ForeignContext {
    fn parent(&self, entity: Entity) -> Result<ParentRange>;
}

/// Tracks how many rows each parent table holds.
#[derive(Debug, Default)]
pub struct PositionalIds {
    counts: BTreeMap<Entity, u64>,
}

impl PositionalIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&mut self, entity: Entity, count: u64) {
        self.counts.insert(entity, count);
    }

    pub fn count(&self, entity: Entity) -> Option<u64> {
        self.counts.get(&entity).copied()
    }
}

impl ForeignContext for PositionalIds {
    fn parent(&self, entity: Entity) -> Result<ParentRange> {
        let count = self
            .count(entity)
            .ok_or_else(|| Error::MissingParent(entity.table_name().to_string()))?;
        ParentRange::new(entity, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn picks_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let parent = ParentRange::new(Entity::Users, 3).unwrap();
        let mut seen = [false; 3];
        for _ in 0..500 {
            let id = pick_existing_id(parent, &mut rng);
            assert!(parent.contains(id), "id {id} out of range");
            seen[(id - 1) as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit), "every id should be reachable");
    }

    #[test]
    fn unknown_or_empty_parent_is_an_error() {
        let mut ids = PositionalIds::new();
        assert!(matches!(
            ids.parent(Entity::Books),
            Err(Error::MissingParent(table)) if table == "books"
        ));

        ids.record_count(Entity::Books, 0);
        assert!(ids.parent(Entity::Books).is_err());

        ids.record_count(Entity::Books, 12);
        assert_eq!(ids.parent(Entity::Books).unwrap().count(), 12);
    }
}
