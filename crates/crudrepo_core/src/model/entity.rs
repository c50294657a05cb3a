//! Entity contract shared by repositories and stores.

/// A record managed by a generic repository.
///
/// Only the primary key and the declared field names are visible to the
/// repository layer. Field names are used to reject unknown `order_by`
/// columns before any store round-trip.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name of the primary key field.
    const ID_FIELD: &'static str = "id";

    /// All field names, primary key included.
    const FIELDS: &'static [&'static str];

    /// Primary key value in text form.
    fn id(&self) -> &str;

    /// Returns whether `field` is a declared field of this entity.
    fn has_field(field: &str) -> bool {
        Self::FIELDS.contains(&field)
    }
}
