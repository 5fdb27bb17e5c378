/// Admin exposure for the management collaborator
///
/// Entities are exposed through configuration objects, not subclassing:
/// each `EntityAdmin` descriptor names what the management UI may list,
/// search, filter, and edit in place, and the handlers dispatch on those
/// descriptors.
pub mod handlers;
pub mod registry;

pub use registry::{EntityAdmin, ENTITY_ADMINS};
