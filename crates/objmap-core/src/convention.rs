//! Default mapping pass
//!
//! Copies fields by exact name between two values. Nested objects and list
//! elements are handed back to [`Mapper::map_into`] so relations for nested
//! type pairs apply. Fields that cannot be mapped are skipped, never
//! reported.

use crate::mapper::Mapper;
use crate::Result;
use objmap_meta::{FieldInfo, Kind, Layout, Reflect, Shape, TypePair};
use std::any::Any;
use tracing::trace;

/// Run the default pass from `source` into `target`
pub(crate) fn map_fields(
    mapper: &Mapper,
    source: &dyn Reflect,
    target: &mut dyn Reflect,
) -> Result<()> {
    if source.kind() == Kind::Simple || target.kind() == Kind::Simple {
        if !target.assign_from(source) {
            trace!(
                "Skipping {} -> {}: differing simple types",
                source.type_key(),
                target.type_key()
            );
        }
        return Ok(());
    }

    let source_shape = mapper.shapes().shape_of(source);
    let target_shape = mapper.shapes().shape_of(&*target);

    for field in source_shape.fields() {
        let Some(target_field) = eligible_target(field, &target_shape) else {
            continue;
        };

        match (field.layout(), target_field.layout()) {
            (Layout::Value, Layout::Value) => {
                copy_value(mapper, field, target_field, source, target)?;
            }
            (Layout::Object { .. }, Layout::Object { .. }) => {
                map_object(mapper, field, target_field, source, target)?;
            }
            (Layout::List { .. }, Layout::List { .. }) => {
                map_list(mapper, field, target_field, source, target)?;
            }
            (from, to) => {
                trace!(
                    "Skipping field '{}': {:?} does not map onto {:?}",
                    field.name(),
                    from,
                    to
                );
            }
        }
    }

    Ok(())
}

/// Target field for `field`, when the pair is eligible for copying.
///
/// The source needs both accessor and mutator (computed members are not
/// data); the target needs a mutator.
fn eligible_target<'s>(field: &FieldInfo, target_shape: &'s Shape) -> Option<&'s FieldInfo> {
    if !(field.is_readable() && field.is_writable()) {
        trace!("Skipping field '{}': not read/write in source", field.name());
        return None;
    }

    let target_field = target_shape.field(field.name())?;
    if !target_field.is_writable() {
        trace!("Skipping field '{}': not writable in target", field.name());
        return None;
    }
    Some(target_field)
}

fn copy_value(
    mapper: &Mapper,
    field: &FieldInfo,
    target_field: &FieldInfo,
    source: &dyn Reflect,
    target: &mut dyn Reflect,
) -> Result<()> {
    let Some(value) = field.get(source.as_any()) else {
        return Ok(());
    };

    if field.value_type() == target_field.value_type() {
        target_field
            .update(target.as_any_mut(), |slot| {
                slot.assign_from(value);
                Ok(())
            })
            .unwrap_or(Ok(()))
    } else {
        let pair = TypePair::new(field.value_type(), target_field.value_type());
        if !mapper.registry().contains(&pair) {
            trace!("Skipping field '{}': no relation for {}", field.name(), pair);
            return Ok(());
        }
        target_field
            .update(target.as_any_mut(), |slot| mapper.map_into(value, slot))
            .unwrap_or(Ok(()))
    }
}

fn map_object(
    mapper: &Mapper,
    field: &FieldInfo,
    target_field: &FieldInfo,
    source: &dyn Reflect,
    target: &mut dyn Reflect,
) -> Result<()> {
    let Some(value) = field.get(source.as_any()) else {
        trace!("Field '{}' is null in source; target kept", field.name());
        return Ok(());
    };

    let was_null = target_field.get(target.as_any()).is_none();
    let result = target_field
        .update(target.as_any_mut(), |slot| mapper.map_into(value, slot))
        .unwrap_or(Ok(()));

    // A slot allocated for a null target must not outlive a failed mapping
    if result.is_err() && was_null {
        target_field.clear(target.as_any_mut());
    }
    result
}

fn map_list(
    mapper: &Mapper,
    field: &FieldInfo,
    target_field: &FieldInfo,
    source: &dyn Reflect,
    target: &mut dyn Reflect,
) -> Result<()> {
    let Some(items) = field.items(source.as_any()) else {
        return Ok(());
    };

    if field.value_type() != target_field.value_type() {
        let pair = TypePair::new(field.value_type(), target_field.value_type());
        let simple = target_field.create().kind() == Kind::Simple
            || items.iter().flatten().any(|item| item.kind() == Kind::Simple);
        if simple && !mapper.registry().contains(&pair) {
            trace!("Skipping field '{}': no relation for {}", field.name(), pair);
            return Ok(());
        }
    }

    let mut mapped: Vec<Option<Box<dyn Any>>> = Vec::with_capacity(items.len());
    for item in items {
        let Some(item) = item else {
            mapped.push(None);
            continue;
        };

        let mut element = target_field.create();
        if !element.assign_from(item) {
            mapper.map_into(item, &mut *element)?;
        }
        mapped.push(Some(element.into_any()));
    }

    if !target_field.set_items(target.as_any_mut(), mapped) {
        trace!("Field '{}' rejected the mapped elements", field.name());
    }
    Ok(())
}
