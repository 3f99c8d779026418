//! Field descriptors
//!
//! A [`Shape`] is the field table of one type, built once from its
//! [`Mappable::describe`] declarations. Each [`FieldInfo`] carries erased
//! accessors that downcast the owner back to its concrete type.

use crate::reflect::{Kind, Mappable, Reflect, Simple};
use crate::types::TypeKey;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type GetFn = Box<dyn Fn(&dyn Any) -> Option<&dyn Reflect> + Send + Sync>;
type ItemsFn = Box<dyn Fn(&dyn Any) -> Option<Vec<Option<&dyn Reflect>>> + Send + Sync>;
type ComputeFn = Box<dyn Fn(&dyn Any) -> Option<Box<dyn Reflect>> + Send + Sync>;
type SlotFn = Box<dyn Fn(&mut dyn Any) -> Option<&mut dyn Reflect> + Send + Sync>;
type SetFn = Box<dyn Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync>;
type SetItemsFn = Box<dyn Fn(&mut dyn Any, Vec<Option<Box<dyn Any>>>) -> bool + Send + Sync>;
type ClearFn = Box<dyn Fn(&mut dyn Any) -> bool + Send + Sync>;

// The helpers below pin each closure to its higher-ranked signature.

fn read_value<C>(f: C) -> GetFn
where
    C: Fn(&dyn Any) -> Option<&dyn Reflect> + Send + Sync + 'static,
{
    Box::new(f)
}

fn read_items<C>(f: C) -> ItemsFn
where
    C: Fn(&dyn Any) -> Option<Vec<Option<&dyn Reflect>>> + Send + Sync + 'static,
{
    Box::new(f)
}

fn read_computed<C>(f: C) -> ComputeFn
where
    C: Fn(&dyn Any) -> Option<Box<dyn Reflect>> + Send + Sync + 'static,
{
    Box::new(f)
}

fn write_slot<C>(f: C) -> SlotFn
where
    C: Fn(&mut dyn Any) -> Option<&mut dyn Reflect> + Send + Sync + 'static,
{
    Box::new(f)
}

fn write_set<C>(f: C) -> SetFn
where
    C: Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}

fn write_items<C>(f: C) -> SetItemsFn
where
    C: Fn(&mut dyn Any, Vec<Option<Box<dyn Any>>>) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}

fn write_clear<C>(f: C) -> ClearFn
where
    C: Fn(&mut dyn Any) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}

fn create_default<F: Mappable + Default>() -> Box<dyn Reflect> {
    Box::new(F::default())
}

enum Read {
    Value(GetFn),
    Items(ItemsFn),
    Computed(ComputeFn),
}

enum Write {
    Slot(SlotFn),
    Set(SetFn),
    Items(SetItemsFn),
}

/// Storage layout of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A simple value
    Value,

    /// A nested object, `Option<F>` when nullable
    Object { nullable: bool },

    /// An ordered sequence, `Vec<Option<E>>` when nullable
    List { nullable: bool },
}

/// Erased descriptor of one declared field
pub struct FieldInfo {
    name: &'static str,
    value_type: TypeKey,
    layout: Layout,
    read: Option<Read>,
    write: Option<Write>,
    clear: Option<ClearFn>,
    create: fn() -> Box<dyn Reflect>,
}

impl FieldInfo {
    /// Declared field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared value type; the element type for lists, the inner type for
    /// nullable objects
    pub fn value_type(&self) -> TypeKey {
        self.value_type
    }

    /// Storage layout
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Has a public accessor
    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    /// Has a public mutator
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Whether this field is computed from other state
    pub fn is_computed(&self) -> bool {
        matches!(self.read, Some(Read::Computed(_)))
    }

    /// Borrow a value or object field. `None` for a null object, for lists,
    /// and for fields without a stored accessor.
    pub fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Reflect> {
        match &self.read {
            Some(Read::Value(get)) => get(owner),
            _ => None,
        }
    }

    /// Borrow the elements of a list field; `None` entries are null elements
    pub fn items<'a>(&self, owner: &'a dyn Any) -> Option<Vec<Option<&'a dyn Reflect>>> {
        match &self.read {
            Some(Read::Items(items)) => items(owner),
            _ => None,
        }
    }

    /// Evaluate a computed field
    pub fn compute(&self, owner: &dyn Any) -> Option<Box<dyn Reflect>> {
        match &self.read {
            Some(Read::Computed(compute)) => compute(owner),
            _ => None,
        }
    }

    /// Mutable access to the stored value or object in place.
    ///
    /// A null nullable object is replaced by a default instance first.
    pub fn slot<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Reflect> {
        match &self.write {
            Some(Write::Slot(slot)) => slot(owner),
            _ => None,
        }
    }

    /// Replace the value of a setter-only field
    pub fn set(&self, owner: &mut dyn Any, value: Box<dyn Any>) -> bool {
        match &self.write {
            Some(Write::Set(set)) => set(owner, value),
            _ => false,
        }
    }

    /// Replace the whole content of a list field
    pub fn set_items(&self, owner: &mut dyn Any, items: Vec<Option<Box<dyn Any>>>) -> bool {
        match &self.write {
            Some(Write::Items(set)) => set(owner, items),
            _ => false,
        }
    }

    /// Run `f` against the field's target value and store the result.
    ///
    /// In-place fields hand out their slot. Setter-only fields get a fresh
    /// default value which is stored only when `f` succeeds. Returns `None`
    /// when the field cannot be written this way.
    pub fn update<E>(
        &self,
        owner: &mut dyn Any,
        f: impl FnOnce(&mut dyn Reflect) -> Result<(), E>,
    ) -> Option<Result<(), E>> {
        match &self.write {
            Some(Write::Slot(slot)) => slot(owner).map(f),
            Some(Write::Set(set)) => {
                let mut fresh = self.create();
                if let Err(err) = f(&mut *fresh) {
                    return Some(Err(err));
                }
                set(owner, fresh.into_any()).then_some(Ok(()))
            }
            _ => None,
        }
    }

    /// Reset a nullable object field to null
    pub fn clear(&self, owner: &mut dyn Any) -> bool {
        match &self.clear {
            Some(clear) => clear(owner),
            None => false,
        }
    }

    /// Default instance of [`FieldInfo::value_type`]
    pub fn create(&self) -> Box<dyn Reflect> {
        (self.create)()
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("value_type", &self.value_type.name())
            .field("layout", &self.layout)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// Field declarations for `T`, filled in by [`Mappable::describe`]
pub struct Fields<T> {
    fields: Vec<FieldInfo>,
    _owner: PhantomData<fn() -> T>,
}

impl<T: Mappable> Fields<T> {
    /// Create an empty declaration list
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Declare a simple field with public read and write access
    pub fn value<F, G, M>(&mut self, name: &'static str, get: G, get_mut: M) -> &mut Self
    where
        F: Simple,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.push(FieldInfo {
            name,
            value_type: TypeKey::of::<F>(),
            layout: Layout::Value,
            read: Some(Read::Value(read_value(move |owner| {
                owner.downcast_ref::<T>().map(|o| get(o) as &dyn Reflect)
            }))),
            write: Some(Write::Slot(write_slot(move |owner| {
                owner
                    .downcast_mut::<T>()
                    .map(|o| get_mut(o) as &mut dyn Reflect)
            }))),
            clear: None,
            create: create_default::<F>,
        })
    }

    /// Declare a nullable nested object (`Option<F>`)
    pub fn object<F, G, M>(&mut self, name: &'static str, get: G, get_mut: M) -> &mut Self
    where
        F: Mappable + Default,
        G: Fn(&T) -> &Option<F> + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut Option<F> + Send + Sync + 'static,
    {
        let get_mut = Arc::new(get_mut);
        let reset = Arc::clone(&get_mut);
        self.push(FieldInfo {
            name,
            value_type: TypeKey::of::<F>(),
            layout: Layout::Object { nullable: true },
            read: Some(Read::Value(read_value(move |owner| {
                owner
                    .downcast_ref::<T>()
                    .and_then(|o| get(o).as_ref())
                    .map(|v| v as &dyn Reflect)
            }))),
            write: Some(Write::Slot(write_slot(move |owner| {
                owner
                    .downcast_mut::<T>()
                    .map(|o| get_mut(o).get_or_insert_with(F::default) as &mut dyn Reflect)
            }))),
            clear: Some(write_clear(move |owner| match owner.downcast_mut::<T>() {
                Some(o) => {
                    *reset(o) = None;
                    true
                }
                None => false,
            })),
            create: create_default::<F>,
        })
    }

    /// Declare an always-present nested object
    pub fn nested<F, G, M>(&mut self, name: &'static str, get: G, get_mut: M) -> &mut Self
    where
        F: Mappable + Default,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.push(FieldInfo {
            name,
            value_type: TypeKey::of::<F>(),
            layout: Layout::Object { nullable: false },
            read: Some(Read::Value(read_value(move |owner| {
                owner.downcast_ref::<T>().map(|o| get(o) as &dyn Reflect)
            }))),
            write: Some(Write::Slot(write_slot(move |owner| {
                owner
                    .downcast_mut::<T>()
                    .map(|o| get_mut(o) as &mut dyn Reflect)
            }))),
            clear: None,
            create: create_default::<F>,
        })
    }

    /// Declare a list whose elements are never null (`Vec<E>`)
    pub fn list<E, G, M>(&mut self, name: &'static str, get: G, get_mut: M) -> &mut Self
    where
        E: Mappable + Default,
        G: Fn(&T) -> &Vec<E> + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut Vec<E> + Send + Sync + 'static,
    {
        self.push(FieldInfo {
            name,
            value_type: TypeKey::of::<E>(),
            layout: Layout::List { nullable: false },
            read: Some(Read::Items(read_items(move |owner| {
                owner
                    .downcast_ref::<T>()
                    .map(|o| get(o).iter().map(|e| Some(e as &dyn Reflect)).collect())
            }))),
            write: Some(Write::Items(write_items(move |owner, values| {
                let Some(o) = owner.downcast_mut::<T>() else {
                    return false;
                };
                let mut out = Vec::with_capacity(values.len());
                for value in values {
                    match value.map(|v| v.downcast::<E>()) {
                        None => out.push(E::default()),
                        Some(Ok(element)) => out.push(*element),
                        Some(Err(_)) => return false,
                    }
                }
                *get_mut(o) = out;
                true
            }))),
            clear: None,
            create: create_default::<E>,
        })
    }

    /// Declare a list that may hold null elements (`Vec<Option<E>>`)
    pub fn nullable_list<E, G, M>(&mut self, name: &'static str, get: G, get_mut: M) -> &mut Self
    where
        E: Mappable + Default,
        G: Fn(&T) -> &Vec<Option<E>> + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut Vec<Option<E>> + Send + Sync + 'static,
    {
        self.push(FieldInfo {
            name,
            value_type: TypeKey::of::<E>(),
            layout: Layout::List { nullable: true },
            read: Some(Read::Items(read_items(move |owner| {
                owner.downcast_ref::<T>().map(|o| {
                    get(o)
                        .iter()
                        .map(|e| e.as_ref().map(|v| v as &dyn Reflect))
                        .collect()
                })
            }))),
            write: Some(Write::Items(write_items(move |owner, values| {
                let Some(o) = owner.downcast_mut::<T>() else {
                    return false;
                };
                let mut out = Vec::with_capacity(values.len());
                for value in values {
                    match value.map(|v| v.downcast::<E>()) {
                        None => out.push(None),
                        Some(Ok(element)) => out.push(Some(*element)),
                        Some(Err(_)) => return false,
                    }
                }
                *get_mut(o) = out;
                true
            }))),
            clear: None,
            create: create_default::<E>,
        })
    }

    /// Declare a get-only member derived from other state
    pub fn computed<F, G>(&mut self, name: &'static str, get: G) -> &mut Self
    where
        F: Mappable + Default,
        G: Fn(&T) -> F + Send + Sync + 'static,
    {
        self.push(FieldInfo {
            name,
            value_type: TypeKey::of::<F>(),
            layout: Layout::Value,
            read: Some(Read::Computed(read_computed(move |owner| {
                owner
                    .downcast_ref::<T>()
                    .map(|o| Box::new(get(o)) as Box<dyn Reflect>)
            }))),
            write: None,
            clear: None,
            create: create_default::<F>,
        })
    }

    /// Declare a setter-only simple member
    pub fn write_only<F, S>(&mut self, name: &'static str, set: S) -> &mut Self
    where
        F: Simple,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        self.push(FieldInfo {
            name,
            value_type: TypeKey::of::<F>(),
            layout: Layout::Value,
            read: None,
            write: Some(Write::Set(write_set(move |owner, value| {
                match (owner.downcast_mut::<T>(), value.downcast::<F>()) {
                    (Some(o), Ok(v)) => {
                        set(o, *v);
                        true
                    }
                    _ => false,
                }
            }))),
            clear: None,
            create: create_default::<F>,
        })
    }

    fn push(&mut self, field: FieldInfo) -> &mut Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Finish the declarations into a field table
    pub fn into_shape(self) -> Shape {
        let index = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name, i))
            .collect();
        Shape {
            type_key: TypeKey::of::<T>(),
            kind: T::KIND,
            fields: self.fields,
            index,
        }
    }
}

impl<T: Mappable> Default for Fields<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Field table of one type
#[derive(Debug)]
pub struct Shape {
    type_key: TypeKey,
    kind: Kind,
    fields: Vec<FieldInfo>,
    index: HashMap<&'static str, usize>,
}

impl Shape {
    /// Build the field table of `T` from its declarations
    pub fn of<T: Mappable>() -> Self {
        let mut fields = Fields::<T>::new();
        T::describe(&mut fields);
        fields.into_shape()
    }

    /// Type this table describes
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// Mapping kind of the described type
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Look up a field by exact, case-sensitive name
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the type declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
