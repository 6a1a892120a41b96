//! Enum value linkage

use crate::ir::{EnumValueRecord, TypeShape};
use crate::naming::enum_value_name;
use crate::registry::{Registry, TypeId};
use gqlforge_core::{GenError, GenResult};
use std::collections::HashMap;

/// Values of every `@gqlEnum` type, in declaration order
pub type EnumValues = HashMap<TypeId, Vec<EnumValueRecord>>;

/// Join constants to their enum by declared type identity.
///
/// Any constant whose type is an `@gqlEnum` type becomes a value, from any
/// file or package. A `@gqlEnumValue` constant whose type is not an enum,
/// an enum without values, and two values with one display name are errors.
pub fn link_enums(registry: &Registry) -> GenResult<EnumValues> {
    let mut values: EnumValues = registry
        .ids()
        .filter(|&id| registry.get(id).enum_spec.is_some())
        .map(|id| (id, Vec::new()))
        .collect();

    for constant in registry.consts() {
        let target = constant
            .ty
            .as_ref()
            .and_then(|ty| registry.resolve(ty))
            .filter(|id| values.contains_key(id));

        let Some(enum_id) = target else {
            if constant.value_spec.is_some() {
                return Err(GenError::OrphanEnumValue {
                    path: constant.path.clone(),
                    constant: constant.name.clone(),
                    type_name: constant
                        .ty
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "untyped".to_string()),
                });
            }
            continue;
        };

        let record = registry.get(enum_id);
        let spec = constant.value_spec.clone().unwrap_or_default();
        let value = EnumValueRecord {
            const_name: constant.name.clone(),
            display_name: spec
                .name
                .unwrap_or_else(|| enum_value_name(&constant.name, &record.name)),
            description: spec.description.or_else(|| constant.doc.clone()),
            deprecated: spec.deprecated,
        };

        let list = values.entry(enum_id).or_default();
        if let Some(existing) = list.iter().find(|v| v.display_name == value.display_name) {
            return Err(GenError::FieldCollision {
                artifact: record.label(),
                name: value.display_name,
                first: existing.const_name.clone(),
                second: value.const_name,
            });
        }
        list.push(value);
    }

    let mut empty: Vec<&TypeId> = values
        .iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(id, _)| id)
        .collect();
    empty.sort();
    if let Some(&&id) = empty.first() {
        return Err(GenError::EmptyEnum {
            name: registry.get(id).label(),
        });
    }

    Ok(values)
}

/// `true` when the enum's underlying type is not a struct
pub fn is_enum_capable(shape: &TypeShape) -> bool {
    !matches!(shape, TypeShape::Struct(_))
}
