use std::fmt;

use crate::entity_catalog::{EntitySchema, EntityType, Property, SchemaError, ID_PROPERTY};
use crate::variable_mapping::ScopeKey;

/// What a property-tree node represents.
///
/// Equality and hashing cover the tag and every field, so two logically
/// identical branch requests collapse into one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BranchingArgs {
    Property(PropertyArgs),
    /// A lambda variable of an enclosing `any`; its children are compiled against
    /// the variable's own mapping.
    InScopeVariable { name: String, entity_type: String },
    /// The collection edge of an `any` quantifier.
    Any(AnyArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyArgs {
    pub name: String,
    /// Edge predicate; for inverse properties the inverse property's predicate
    pub predicate: String,
    pub complex: bool,
    pub inverse: bool,
    pub mandatory: bool,
    pub single_valued: bool,
    pub mirrored_from: Option<MirroredFrom>,
}

/// The navigation hop a foreign-key copy is rendered through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MirroredFrom {
    pub property: String,
    pub predicate: String,
    pub inverse: bool,
    pub id_predicate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnyArgs {
    /// Name of the collection property
    pub name: String,
    pub predicate: String,
    pub inverse: bool,
    pub lambda_variable: String,
    pub scope: ScopeKey,
}

impl PropertyArgs {
    /// Describe `property` of `owner` for branching.
    pub fn for_property(
        schema: &EntitySchema,
        owner: &EntityType,
        property: &Property,
    ) -> Result<Self, SchemaError> {
        let (predicate, inverse) = if property.is_elementary() {
            (property.predicate.clone(), false)
        } else {
            schema.edge(property)?
        };

        let mirrored_from = match schema.resolve_foreign_key(owner, property)? {
            Some([related, related_id]) => {
                let (related_predicate, related_inverse) = schema.edge(related)?;
                Some(MirroredFrom {
                    property: related.name.clone(),
                    predicate: related_predicate,
                    inverse: related_inverse,
                    id_predicate: related_id.predicate.clone(),
                })
            }
            None => None,
        };

        Ok(PropertyArgs {
            name: property.name.clone(),
            predicate,
            complex: !property.is_elementary(),
            inverse,
            mandatory: property.is_mandatory(),
            single_valued: property.is_cardinality_one(),
            mirrored_from,
        })
    }

    pub fn is_id(&self) -> bool {
        self.name == ID_PROPERTY
    }
}

impl BranchingArgs {
    pub fn property(
        schema: &EntitySchema,
        owner: &EntityType,
        property: &Property,
    ) -> Result<Self, SchemaError> {
        PropertyArgs::for_property(schema, owner, property).map(BranchingArgs::Property)
    }

    pub fn as_property(&self) -> Option<&PropertyArgs> {
        match self {
            BranchingArgs::Property(args) => Some(args),
            _ => None,
        }
    }
}

impl fmt::Display for BranchingArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchingArgs::Property(p) => write!(
                f,
                "Property({}, complex={}, inverse={}, mandatory={}, single_valued={}, mirrored={})",
                p.name,
                p.complex,
                p.inverse,
                p.mandatory,
                p.single_valued,
                p.mirrored_from.is_some()
            ),
            BranchingArgs::InScopeVariable { name, entity_type } => {
                write!(f, "InScopeVariable({}: {})", name, entity_type)
            }
            BranchingArgs::Any(a) => write!(f, "Any({}, {})", a.name, a.lambda_variable),
        }
    }
}
