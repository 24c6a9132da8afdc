use alloc::{collections::BTreeMap, string::String, vec::Vec};

use bstr::ByteSlice;

use crate::value::Value;

/// Abstraction over decoded value construction.
///
/// The decoder calls these methods as it walks the input and never inspects
/// the values it gets back; it only hands them to [`array_append`] and
/// [`object_insert`]. Ownership of every value stays with the builder's
/// caller.
///
/// [`array_append`]: Builder::array_append
/// [`object_insert`]: Builder::object_insert
pub trait Builder {
    /// Handle for any decoded value.
    type Value;

    /// An integer literal without fraction or exponent.
    fn new_integer(&mut self, n: i64) -> Self::Value;
    /// A literal with a fraction or exponent.
    fn new_double(&mut self, n: f64) -> Self::Value;
    /// A string with escapes already translated. The bytes are whatever the
    /// input held and are not validated as UTF-8.
    fn new_string(&mut self, bytes: &[u8]) -> Self::Value;
    /// The `true` literal.
    fn new_true(&mut self) -> Self::Value;
    /// The `false` literal.
    fn new_false(&mut self) -> Self::Value;
    /// The `null` literal.
    fn new_null(&mut self) -> Self::Value;
    /// An empty array that items will be appended to.
    fn new_array(&mut self) -> Self::Value;
    /// An empty object that members will be inserted into.
    fn new_object(&mut self) -> Self::Value;

    /// Appends `item` to an array produced by [`Builder::new_array`].
    fn array_append(&mut self, array: &mut Self::Value, item: Self::Value);
    /// Inserts a member into an object produced by [`Builder::new_object`].
    /// `key` was produced by [`Builder::new_string`].
    fn object_insert(&mut self, object: &mut Self::Value, key: Self::Value, value: Self::Value);
}

impl<B: Builder + ?Sized> Builder for &mut B {
    type Value = B::Value;

    #[inline]
    fn new_integer(&mut self, n: i64) -> Self::Value {
        (**self).new_integer(n)
    }

    #[inline]
    fn new_double(&mut self, n: f64) -> Self::Value {
        (**self).new_double(n)
    }

    #[inline]
    fn new_string(&mut self, bytes: &[u8]) -> Self::Value {
        (**self).new_string(bytes)
    }

    #[inline]
    fn new_true(&mut self) -> Self::Value {
        (**self).new_true()
    }

    #[inline]
    fn new_false(&mut self) -> Self::Value {
        (**self).new_false()
    }

    #[inline]
    fn new_null(&mut self) -> Self::Value {
        (**self).new_null()
    }

    #[inline]
    fn new_array(&mut self) -> Self::Value {
        (**self).new_array()
    }

    #[inline]
    fn new_object(&mut self) -> Self::Value {
        (**self).new_object()
    }

    #[inline]
    fn array_append(&mut self, array: &mut Self::Value, item: Self::Value) {
        (**self).array_append(array, item);
    }

    #[inline]
    fn object_insert(&mut self, object: &mut Self::Value, key: Self::Value, value: Self::Value) {
        (**self).object_insert(object, key, value);
    }
}

/// Builder producing [`Value`]s.
///
/// String bytes are decoded as UTF-8, with invalid sequences replaced by
/// U+FFFD. Object keys that are not strings never reach this builder; a
/// duplicate key keeps the last value.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueBuilder;

impl Builder for ValueBuilder {
    type Value = Value;

    #[inline]
    fn new_integer(&mut self, n: i64) -> Value {
        Value::Integer(n)
    }

    #[inline]
    fn new_double(&mut self, n: f64) -> Value {
        Value::Double(n)
    }

    #[inline]
    fn new_string(&mut self, bytes: &[u8]) -> Value {
        Value::String(bytes.to_str_lossy().into_owned())
    }

    #[inline]
    fn new_true(&mut self) -> Value {
        Value::Boolean(true)
    }

    #[inline]
    fn new_false(&mut self) -> Value {
        Value::Boolean(false)
    }

    #[inline]
    fn new_null(&mut self) -> Value {
        Value::Null
    }

    #[inline]
    fn new_array(&mut self) -> Value {
        Value::Array(Vec::new())
    }

    #[inline]
    fn new_object(&mut self) -> Value {
        Value::Object(BTreeMap::new())
    }

    fn array_append(&mut self, array: &mut Value, item: Value) {
        if let Value::Array(items) = array {
            items.push(item);
        } else {
            debug_assert!(false, "array_append on {array:?}");
        }
    }

    fn object_insert(&mut self, object: &mut Value, key: Value, value: Value) {
        let key = match key {
            Value::String(s) => s,
            other => {
                debug_assert!(false, "object key {other:?}");
                return;
            }
        };
        if let Value::Object(map) = object {
            map.insert(key, value);
        } else {
            debug_assert!(false, "object_insert on {object:?}");
        }
    }
}

/// Source of heap memory for the string scratch buffer.
///
/// The decoder asks for memory only when a string decode needs more room than
/// the inline scratch region offers, and hands every buffer back through
/// [`ScratchAllocator::release`] before the decode call returns, whether it
/// succeeded or not.
pub trait ScratchAllocator {
    /// Returns a buffer whose length is at least `size`. Its contents are
    /// overwritten before they are read.
    fn allocate(&mut self, size: usize) -> Vec<u8>;
    /// Takes back a buffer returned by [`ScratchAllocator::allocate`].
    fn release(&mut self, buffer: Vec<u8>);
}

/// Allocates scratch buffers from the global allocator and frees them on
/// release.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalScratch;

impl ScratchAllocator for GlobalScratch {
    fn allocate(&mut self, size: usize) -> Vec<u8> {
        alloc::vec![0; size]
    }

    fn release(&mut self, buffer: Vec<u8>) {
        drop(buffer);
    }
}

/// Keeps the largest released scratch buffer and hands it out again, so a
/// decoder reused across many large documents allocates once.
#[derive(Debug, Default)]
pub struct PooledScratch {
    spare: Option<Vec<u8>>,
}

impl PooledScratch {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the buffer currently held for reuse, if any.
    #[must_use]
    pub fn spare_capacity(&self) -> Option<usize> {
        self.spare.as_ref().map(Vec::len)
    }
}

impl ScratchAllocator for PooledScratch {
    fn allocate(&mut self, size: usize) -> Vec<u8> {
        match self.spare.take() {
            Some(buffer) if buffer.len() >= size => buffer,
            spare => {
                self.spare = spare;
                alloc::vec![0; size]
            }
        }
    }

    fn release(&mut self, buffer: Vec<u8>) {
        let keep = self
            .spare
            .as_ref()
            .is_none_or(|spare| spare.len() < buffer.len());
        if keep {
            self.spare = Some(buffer);
        }
    }
}

impl<A: ScratchAllocator + ?Sized> ScratchAllocator for &mut A {
    fn allocate(&mut self, size: usize) -> Vec<u8> {
        (**self).allocate(size)
    }

    fn release(&mut self, buffer: Vec<u8>) {
        (**self).release(buffer);
    }
}
