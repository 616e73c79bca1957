//! Codecs for records, i.e. structs with fields.
//!
//! A record is encoded as the concatenation of its fields, in declaration
//! order, without any tags or framing. Embedded records are flattened: their
//! fields are spliced in at the position of the embedding field, depth-first.
//!
//! Most users get these through [`#[derive(Pack)]`](derive@crate::Pack)
//! instead of using them directly.

use std::sync::Arc;
use std::{fmt, io};

use crate::cache::Builder;
use crate::codec::{Codec, Pack};
use crate::error::{Partial, Result};

/// Accesses one field of `S` and en-/decodes it.
trait FieldCodec<S>: Send + Sync {
    fn size(&self, record: &S) -> usize;
    fn write(&self, writer: &mut dyn io::Write, record: &S) -> Result<usize, Partial>;
    fn read(&self, reader: &mut dyn io::Read, record: &mut S) -> Result<usize, Partial>;
}

/// A field directly owned by the record.
struct Direct<S, T: Pack> {
    codec: Arc<T::Codec>,
    get: fn(&S) -> &T,
    get_mut: fn(&mut S) -> &mut T,
}

impl<S, T: Pack> FieldCodec<S> for Direct<S, T> {
    fn size(&self, record: &S) -> usize {
        self.codec.size((self.get)(record))
    }

    fn write(&self, writer: &mut dyn io::Write, record: &S) -> Result<usize, Partial> {
        self.codec.write(writer, (self.get)(record))
    }

    fn read(&self, reader: &mut dyn io::Read, record: &mut S) -> Result<usize, Partial> {
        self.codec.read(reader, (self.get_mut)(record))
    }
}

/// A field of an embedded record `E`, reached through the embedding field.
struct Embedded<S, E> {
    inner: Arc<dyn FieldCodec<E>>,
    get: fn(&S) -> &E,
    get_mut: fn(&mut S) -> &mut E,
}

impl<S, E: 'static> FieldCodec<S> for Embedded<S, E> {
    fn size(&self, record: &S) -> usize {
        self.inner.size((self.get)(record))
    }

    fn write(&self, writer: &mut dyn io::Write, record: &S) -> Result<usize, Partial> {
        self.inner.write(writer, (self.get)(record))
    }

    fn read(&self, reader: &mut dyn io::Read, record: &mut S) -> Result<usize, Partial> {
        self.inner.read(reader, (self.get_mut)(record))
    }
}

struct Field<S> {
    path: String,
    codec: Arc<dyn FieldCodec<S>>,
}

/// Codec for a record type `S`.
///
/// Holds the flattened list of packed fields. Size, write, and read visit
/// them in order and stop at the first failure, reporting the bytes
/// processed up to that point.
pub struct StructCodec<S> {
    fields: Vec<Field<S>>,
}

impl<S: 'static> StructCodec<S> {
    /// Starts building the codec for `S`.
    pub fn builder<'b, 'c>(builder: &'b mut Builder<'c>) -> StructBuilder<'b, 'c, S> {
        StructBuilder {
            builder,
            fields: Vec::new(),
        }
    }

    /// The paths of the packed fields, in wire order.
    ///
    /// Fields of flattened records are named `outer.inner`.
    pub fn field_paths(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.path.as_str())
    }

    /// The number of packed fields after flattening.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no packed fields and encodes to nothing.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: 'static> Codec for StructCodec<S> {
    type Value = S;

    fn size(&self, value: &S) -> usize {
        self.fields.iter().map(|f| f.codec.size(value)).sum()
    }

    fn write(&self, writer: &mut dyn io::Write, value: &S) -> Result<usize, Partial> {
        let mut n = 0usize;
        for field in &self.fields {
            n += field.codec.write(writer, value).map_err(|e| e.after(n))?;
        }
        Ok(n)
    }

    fn read(&self, reader: &mut dyn io::Read, dst: &mut S) -> Result<usize, Partial> {
        let mut n = 0usize;
        for field in &self.fields {
            n += field.codec.read(reader, dst).map_err(|e| e.after(n))?;
        }
        Ok(n)
    }
}

impl<S> fmt::Debug for StructCodec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|f| &f.path))
            .finish()
    }
}

/// Collects the fields of a record while its codec is built.
///
/// Get one via [`StructCodec::builder`].
#[must_use]
pub struct StructBuilder<'b, 'c, S> {
    builder: &'b mut Builder<'c>,
    fields: Vec<Field<S>>,
}

impl<S: 'static> StructBuilder<'_, '_, S> {
    /// Adds a field of type `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec for `T` can't be built.
    pub fn field<T: Pack>(
        mut self,
        name: &'static str,
        get: fn(&S) -> &T,
        get_mut: fn(&mut S) -> &mut T,
    ) -> Result<Self> {
        let codec = self.builder.resolve::<T>()?;
        self.fields.push(Field {
            path: name.to_owned(),
            codec: Arc::new(Direct { codec, get, get_mut }),
        });
        Ok(self)
    }

    /// Adds the fields of the embedded record `E` in place of this field.
    ///
    /// A record held behind a `Box<E>` is flattened by projecting through
    /// the box, e.g. `|v| &*v.base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec for `E` can't be built.
    pub fn flatten<E>(
        mut self,
        name: &'static str,
        get: fn(&S) -> &E,
        get_mut: fn(&mut S) -> &mut E,
    ) -> Result<Self>
    where
        E: Pack<Codec = StructCodec<E>>,
    {
        let embedded = self.builder.resolve::<E>()?;
        self.fields
            .extend(embedded.fields.iter().map(|field| Field {
                path: format!("{name}.{}", field.path),
                codec: Arc::new(Embedded {
                    inner: Arc::clone(&field.codec),
                    get,
                    get_mut,
                }),
            }));
        Ok(self)
    }

    /// Finishes the codec.
    pub fn finish(self) -> StructCodec<S> {
        log::trace!(
            "Record `{}` has {} packed field(s).",
            std::any::type_name::<S>(),
            self.fields.len()
        );
        StructCodec {
            fields: self.fields,
        }
    }
}
