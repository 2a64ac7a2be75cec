//! Numeric record identifiers.

/// Identifier shared by every persisted collection.
pub type EntityId = u64;

/// Next identifier for a collection.
///
/// `1 + max(existing)`, but never at or below `high_water`, so an id handed
/// out once is not handed out again after its record is deleted.
pub fn next_id<I>(existing: I, high_water: EntityId) -> EntityId
where
    I: IntoIterator<Item = EntityId>,
{
    existing.into_iter().fold(high_water, EntityId::max) + 1
}
