//! Named property access on opaque records.
//!
//! Controls are configured with property *names* ("title", "done",
//! "children"). The functions here resolve such a name against a record's
//! registered [`TypeDescriptor`](horizon_binding_core::TypeDescriptor),
//! including properties inherited from a base type.
//!
//! [`read_property`] and [`write_property`] are lenient: a missing,
//! unreadable or unwritable property reads as [`Value::Null`] or skips the
//! write. The `try_` variants report why.
//!
//! A null record or an empty name is an identity binding: reading returns
//! the record itself, so a list of plain strings can be bound with an empty
//! text property.

use horizon_binding_core::logging::targets;
use horizon_binding_core::{BindingError, Result, Value, type_registry};

/// Reads `name` from `record`, reporting lookup misses.
pub fn try_read_property(record: &Value, name: &str) -> Result<Value> {
    if record.is_null() || name.is_empty() {
        return Ok(record.clone());
    }

    let object = record
        .as_object()
        .ok_or(BindingError::NotAnObject { kind: record.kind() })?;
    let descriptor = type_registry()
        .descriptor_of(&**object)
        .ok_or(BindingError::UnregisteredType)?;
    let info = descriptor
        .property_by_name(name, true)
        .ok_or_else(|| BindingError::PropertyNotFound {
            type_name: descriptor.type_name(),
            name: name.to_string(),
        })?;

    info.get_value(&**object)
        .ok_or_else(|| BindingError::PropertyNotReadable {
            type_name: descriptor.type_name(),
            name: name.to_string(),
        })
}

/// Writes `value` to `name` on `record`, reporting lookup misses.
///
/// A null record or an empty name is a successful no-op.
pub fn try_write_property(record: &Value, name: &str, value: Value) -> Result<()> {
    if record.is_null() || name.is_empty() {
        return Ok(());
    }

    let object = record
        .as_object()
        .ok_or(BindingError::NotAnObject { kind: record.kind() })?;
    let descriptor = type_registry()
        .descriptor_of(&**object)
        .ok_or(BindingError::UnregisteredType)?;
    let info = descriptor
        .property_by_name(name, true)
        .ok_or_else(|| BindingError::PropertyNotFound {
            type_name: descriptor.type_name(),
            name: name.to_string(),
        })?;

    if info.set_value(&**object, value) {
        Ok(())
    } else {
        Err(BindingError::PropertyNotWritable {
            type_name: descriptor.type_name(),
            name: name.to_string(),
        })
    }
}

/// Reads `name` from `record`, or [`Value::Null`] if it cannot be read.
pub fn read_property(record: &Value, name: &str) -> Value {
    try_read_property(record, name).unwrap_or_else(|err| {
        tracing::trace!(target: targets::REFLECT, property = name, %err, "binding miss on read");
        Value::Null
    })
}

/// Writes `value` to `name` on `record`, skipping the write if the property
/// cannot be written.
pub fn write_property(record: &Value, name: &str, value: Value) {
    if let Err(err) = try_write_property(record, name, value) {
        tracing::trace!(target: targets::REFLECT, property = name, %err, "binding miss on write");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_binding_core::{Property, TypeDescriptor, ValueKind};
    use std::sync::Arc;

    struct Shape {
        label: Property<String>,
    }

    struct Circle {
        shape: Shape,
        radius: Property<f64>,
    }

    fn register() {
        let shape = Arc::new(
            TypeDescriptor::builder::<Shape>("Shape")
                .property(
                    "label",
                    |s| Value::from(s.label.get()),
                    |s, v| s.label.set_silent(v.text()),
                )
                .build(),
        );
        TypeDescriptor::builder::<Circle>("Circle")
            .inherits(&shape, |c| &c.shape)
            .readable("radius", |c| Value::from(c.radius.get()))
            .write_only("diameter", |c, v| {
                if let Some(d) = v.as_float() {
                    c.radius.set_silent(d / 2.0);
                }
            })
            .register();
    }

    fn circle() -> Value {
        register();
        Value::object(Circle {
            shape: Shape {
                label: Property::new("unit".into()),
            },
            radius: Property::new(1.0),
        })
    }

    #[test]
    fn test_identity_passthrough() {
        let record = Value::from("plain");
        assert_eq!(read_property(&record, ""), record);
        assert_eq!(read_property(&Value::Null, "label"), Value::Null);
        assert_eq!(try_write_property(&Value::Null, "label", Value::from(1)), Ok(()));
    }

    #[test]
    fn test_reads_own_and_inherited() {
        let record = circle();
        assert_eq!(read_property(&record, "radius"), Value::Float(1.0));
        assert_eq!(read_property(&record, "label"), Value::from("unit"));
    }

    #[test]
    fn test_writes_through_setter() {
        let record = circle();
        write_property(&record, "label", Value::from("big"));
        write_property(&record, "diameter", Value::Float(8.0));
        assert_eq!(read_property(&record, "label"), Value::from("big"));
        assert_eq!(read_property(&record, "radius"), Value::Float(4.0));
    }

    #[test]
    fn test_misses_are_reported() {
        let record = circle();
        assert_eq!(
            try_read_property(&record, "area"),
            Err(BindingError::PropertyNotFound {
                type_name: "Circle",
                name: "area".into(),
            })
        );
        assert_eq!(
            try_read_property(&record, "diameter"),
            Err(BindingError::PropertyNotReadable {
                type_name: "Circle",
                name: "diameter".into(),
            })
        );
        assert_eq!(
            try_write_property(&record, "radius", Value::Float(2.0)),
            Err(BindingError::PropertyNotWritable {
                type_name: "Circle",
                name: "radius".into(),
            })
        );
        assert_eq!(
            try_read_property(&Value::Int(3), "radius"),
            Err(BindingError::NotAnObject {
                kind: ValueKind::Int
            })
        );
        assert_eq!(read_property(&record, "area"), Value::Null);
        assert_eq!(read_property(&Value::object(7_u8), "x"), Value::Null);
    }
}
