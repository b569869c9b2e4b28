//! SPID SP metadata assembly.
//!
//! The pipeline runs in this order:
//!
//! 1. [`mapper`] turns the provider config into contact value objects.
//! 2. [`skeleton`] builds the baseline SP descriptor.
//! 3. [`entity`] and [`sp_descriptor`] produce organization, contact and
//!    endpoint fragments.
//! 4. [`builder`] applies the fragments to the baseline.
//! 5. [`generator`] serializes the result and signs it when configured.

pub mod builder;
pub mod entity;
pub mod generator;
pub mod keys;
pub mod mapper;
pub mod skeleton;
pub mod sp_descriptor;

pub use builder::SpMetadataBuilder;
pub use entity::{
    build_contact_persons, build_organization, customize_entity_descriptor, EntityCustomization,
};
pub use generator::MetadataGenerator;
pub use keys::{SigningCertificate, SigningKey, SigningKeySource};
pub use mapper::{map_billing_contact, map_other_contact};
pub use skeleton::SpDescriptorSkeleton;
pub use sp_descriptor::{build_attribute_consuming_service, customize_sp_descriptor, SpEndpoints};
