//! Runtime reflection for bound records.
//!
//! Controls only know property *names*. To resolve a name against an opaque
//! record, the record's concrete type registers a [`TypeDescriptor`] with the
//! global [`TypeRegistry`]. A descriptor maps property names to type-erased
//! getter/setter closures.
//!
//! Setters take the record by shared reference, so writable fields are
//! usually wrapped in [`Property`](crate::Property) or another interior
//! mutability type.
//!
//! # Example
//!
//! ```
//! use horizon_binding_core::{Property, TypeDescriptor, Value, type_registry};
//!
//! struct Task {
//!     title: String,
//!     done: Property<bool>,
//! }
//!
//! TypeDescriptor::builder::<Task>("Task")
//!     .readable("title", |t| Value::from(&t.title))
//!     .property(
//!         "done",
//!         |t| Value::from(t.done.get()),
//!         |t, v| {
//!             if let Some(done) = v.as_bool() {
//!                 t.done.set(done);
//!             }
//!         },
//!     )
//!     .register();
//!
//! let task = Task { title: "Write docs".into(), done: Property::new(false) };
//! let descriptor = type_registry().descriptor_of(&task).unwrap();
//! let title = descriptor.property_by_name("title", true).unwrap();
//! assert_eq!(title.get_value(&task), Some(Value::from("Write docs")));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::logging::targets;
use crate::value::Value;

/// A type-erased reference to a record.
pub type AnyRecord = dyn Any + Send + Sync;

type Getter = Arc<dyn Fn(&AnyRecord) -> Value + Send + Sync>;
type Setter = Arc<dyn Fn(&AnyRecord, Value) + Send + Sync>;

/// One named property of a registered type.
#[derive(Clone)]
pub struct PropertyInfo {
    name: String,
    getter: Option<Getter>,
    setter: Option<Setter>,
    inherited: bool,
}

impl PropertyInfo {
    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the property has a getter.
    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    /// Returns `true` if the property has a setter.
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Returns `true` if the property was contributed by a base type.
    pub fn is_inherited(&self) -> bool {
        self.inherited
    }

    /// Reads the property from `record`.
    ///
    /// Returns `None` if the property is write-only.
    pub fn get_value(&self, record: &AnyRecord) -> Option<Value> {
        self.getter.as_ref().map(|get| get(record))
    }

    /// Writes the property on `record`.
    ///
    /// Returns `false` if the property is read-only.
    pub fn set_value(&self, record: &AnyRecord, value: Value) -> bool {
        match &self.setter {
            Some(set) => {
                set(record, value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("inherited", &self.inherited)
            .finish()
    }
}

/// Describes the named properties of one concrete record type.
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    properties: HashMap<String, PropertyInfo>,
    base: Option<Arc<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// Starts building a descriptor for `T`.
    pub fn builder<T: Any + Send + Sync>(type_name: &'static str) -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder {
            type_name,
            own: HashMap::new(),
            inherited: HashMap::new(),
            base: None,
            _marker: PhantomData,
        }
    }

    /// The `TypeId` of the described type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The display name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The descriptor of the base type, if one was declared.
    pub fn base(&self) -> Option<&Arc<TypeDescriptor>> {
        self.base.as_ref()
    }

    /// Looks up a property by name.
    ///
    /// When `inherited` is `false`, properties contributed by the base type
    /// are not considered.
    pub fn property_by_name(&self, name: &str, inherited: bool) -> Option<&PropertyInfo> {
        self.properties
            .get(name)
            .filter(|info| inherited || !info.inherited)
    }

    /// Iterates over all properties, own and inherited, in no particular order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties.values()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties.len())
            .field("base", &self.base.as_ref().map(|b| b.type_name))
            .finish()
    }
}

/// Builder for [`TypeDescriptor`].
pub struct TypeDescriptorBuilder<T> {
    type_name: &'static str,
    own: HashMap<String, PropertyInfo>,
    inherited: HashMap<String, PropertyInfo>,
    base: Option<Arc<TypeDescriptor>>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Any + Send + Sync> TypeDescriptorBuilder<T> {
    fn erase_getter<G>(get: G) -> Getter
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Arc::new(move |record: &AnyRecord| {
            record.downcast_ref::<T>().map(&get).unwrap_or_default()
        })
    }

    fn erase_setter<S>(set: S) -> Setter
    where
        S: Fn(&T, Value) + Send + Sync + 'static,
    {
        Arc::new(move |record: &AnyRecord, value: Value| {
            if let Some(record) = record.downcast_ref::<T>() {
                set(record, value);
            }
        })
    }

    fn insert(mut self, name: &str, getter: Option<Getter>, setter: Option<Setter>) -> Self {
        self.own.insert(
            name.to_string(),
            PropertyInfo {
                name: name.to_string(),
                getter,
                setter,
                inherited: false,
            },
        );
        self
    }

    /// Declares a read-only property.
    pub fn readable<G>(self, name: &str, get: G) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.insert(name, Some(Self::erase_getter(get)), None)
    }

    /// Declares a read-write property.
    pub fn property<G, S>(self, name: &str, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
        S: Fn(&T, Value) + Send + Sync + 'static,
    {
        self.insert(
            name,
            Some(Self::erase_getter(get)),
            Some(Self::erase_setter(set)),
        )
    }

    /// Declares a write-only property.
    pub fn write_only<S>(self, name: &str, set: S) -> Self
    where
        S: Fn(&T, Value) + Send + Sync + 'static,
    {
        self.insert(name, None, Some(Self::erase_setter(set)))
    }

    /// Declares `B` as the base type of `T`.
    ///
    /// Every property of `base` becomes available on `T`, reached through
    /// `project`. Properties declared on `T` itself take precedence.
    pub fn inherits<B: Any + Send + Sync>(
        mut self,
        base: &Arc<TypeDescriptor>,
        project: fn(&T) -> &B,
    ) -> Self {
        for info in base.properties.values() {
            let getter = info.getter.clone().map(|get| -> Getter {
                Arc::new(move |record: &AnyRecord| match record.downcast_ref::<T>() {
                    Some(record) => {
                        let base: &AnyRecord = project(record);
                        get(base)
                    }
                    None => Value::Null,
                })
            });
            let setter = info.setter.clone().map(|set| -> Setter {
                Arc::new(move |record: &AnyRecord, value: Value| {
                    if let Some(record) = record.downcast_ref::<T>() {
                        let base: &AnyRecord = project(record);
                        set(base, value);
                    }
                })
            });
            self.inherited.insert(
                info.name.clone(),
                PropertyInfo {
                    name: info.name.clone(),
                    getter,
                    setter,
                    inherited: true,
                },
            );
        }
        self.base = Some(base.clone());
        self
    }

    /// Finishes the descriptor without registering it.
    pub fn build(self) -> TypeDescriptor {
        let mut properties = self.inherited;
        properties.extend(self.own);
        TypeDescriptor {
            type_id: TypeId::of::<T>(),
            type_name: self.type_name,
            properties,
            base: self.base,
        }
    }

    /// Finishes the descriptor and registers it with the global registry.
    pub fn register(self) -> Arc<TypeDescriptor> {
        type_registry().register(self.build())
    }
}

/// A registry of type descriptors keyed by `TypeId`.
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous one for the same type.
    pub fn register(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        tracing::debug!(
            target: targets::REFLECT,
            type_name = descriptor.type_name,
            properties = descriptor.properties.len(),
            "registered type descriptor"
        );
        self.types
            .write()
            .insert(descriptor.type_id, descriptor.clone());
        descriptor
    }

    /// Returns the descriptor registered for `type_id`.
    pub fn get(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.types.read().get(&type_id).cloned()
    }

    /// Returns the descriptor for the runtime type of `record`.
    pub fn descriptor_of(&self, record: &AnyRecord) -> Option<Arc<TypeDescriptor>> {
        self.get(record.type_id())
    }

    /// Returns `true` if a descriptor is registered for `T`.
    pub fn contains<T: Any>(&self) -> bool {
        self.types.read().contains_key(&TypeId::of::<T>())
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.read().len())
            .finish()
    }
}

/// Returns the process-wide type registry.
pub fn type_registry() -> &'static TypeRegistry {
    static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TypeRegistry::new)
}

static_assertions::assert_impl_all!(TypeRegistry: Send, Sync);
static_assertions::assert_impl_all!(TypeDescriptor: Send, Sync);
