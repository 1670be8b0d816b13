//! Array paths. All elements share one element shape; probe mode runs the
//! element mapper exactly once against the shared element probe.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::Result;
use crate::path::{probe_array_element, ElementPath, SharedProbe};
use crate::serializer::JsonSerializer;

#[derive(Clone)]
pub struct ArrayPath<'a> {
    repr: Repr<'a>,
}

#[derive(Clone)]
enum Repr<'a> {
    Actual(&'a Vec<Value>),
    /// Probe whose shape is already `Array`.
    Dummy(SharedProbe),
}

impl<'a> ArrayPath<'a> {
    pub(crate) fn actual(items: &'a Vec<Value>) -> Self {
        Self {
            repr: Repr::Actual(items),
        }
    }

    pub(crate) fn dummy(probe: SharedProbe) -> Self {
        Self {
            repr: Repr::Dummy(probe),
        }
    }

    /// Map every element in document order. The first element error aborts the
    /// whole collection.
    pub fn collect<T>(&self, mut map: impl FnMut(ElementPath<'a>) -> Result<T>) -> Result<Vec<T>> {
        match &self.repr {
            Repr::Actual(items) => items.iter().map(|v| map(ElementPath::actual(v))).collect(),
            Repr::Dummy(probe) => {
                map(ElementPath::dummy(probe_array_element(probe)?))?;
                Ok(Vec::new())
            }
        }
    }

    /// Collect into an ordered set, dropping duplicates.
    pub fn collect_set<T: Ord>(
        &self,
        map: impl FnMut(ElementPath<'a>) -> Result<T>,
    ) -> Result<BTreeSet<T>> {
        Ok(self.collect(map)?.into_iter().collect())
    }

    pub fn collect_sorted_by<T>(
        &self,
        map: impl FnMut(ElementPath<'a>) -> Result<T>,
        compare: impl FnMut(&T, &T) -> Ordering,
    ) -> Result<Vec<T>> {
        let mut items = self.collect(map)?;
        items.sort_by(compare);
        Ok(items)
    }

    /// Decode every element through another serializer.
    pub fn collect_serialized<T>(&self, serializer: &JsonSerializer<T>) -> Result<Vec<T>> {
        self.collect(|element| serializer.deserialize_path(element))
    }
}

/// An array that may be absent.
#[derive(Clone)]
pub struct ArrayPathNullable<'a> {
    repr: NullableRepr<'a>,
}

#[derive(Clone)]
enum NullableRepr<'a> {
    Actual(Option<&'a Vec<Value>>),
    Dummy(SharedProbe),
}

impl<'a> ArrayPathNullable<'a> {
    pub(crate) fn actual(items: Option<&'a Vec<Value>>) -> Self {
        Self {
            repr: NullableRepr::Actual(items),
        }
    }

    pub(crate) fn dummy(probe: SharedProbe) -> Self {
        Self {
            repr: NullableRepr::Dummy(probe),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self.repr, NullableRepr::Actual(Some(_)))
    }

    /// Run `f` against the array if present. Probe mode records the shape of
    /// `f` but reports "not present".
    pub fn map<T>(&self, f: impl FnOnce(ArrayPath<'a>) -> Result<T>) -> Result<Option<T>> {
        match &self.repr {
            NullableRepr::Actual(Some(items)) => f(ArrayPath::actual(items)).map(Some),
            NullableRepr::Actual(None) => Ok(None),
            NullableRepr::Dummy(probe) => {
                f(ArrayPath::dummy(probe.clone()))?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DescriptorKind;
    use crate::error::Error;
    use crate::path::{descriptor_of, new_probe};
    use serde_json::json;

    fn int_of(element: ElementPath<'_>) -> Result<i64> {
        Ok(element
            .get_as_primitive_path()?
            .get_as_number_path()?
            .get_i64())
    }

    #[test]
    fn collect_maps_in_document_order() {
        let value = json!([3, 1, 2]);
        let array = ElementPath::actual(&value).get_as_array_path().unwrap();
        assert_eq!(array.collect(int_of).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn collect_aborts_on_first_element_error() {
        let value = json!([1, "two", 3]);
        let array = ElementPath::actual(&value).get_as_array_path().unwrap();
        assert!(matches!(
            array.collect(int_of),
            Err(Error::TypeCoercion { .. })
        ));
    }

    #[test]
    fn collect_set_drops_duplicates() {
        let value = json!([2, 1, 2, 1]);
        let array = ElementPath::actual(&value).get_as_array_path().unwrap();
        let set = array.collect_set(int_of).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn collect_sorted_by_orders_the_result() {
        let value = json!([3, 1, 2]);
        let array = ElementPath::actual(&value).get_as_array_path().unwrap();
        let sorted = array.collect_sorted_by(int_of, |a, b| b.cmp(a)).unwrap();
        assert_eq!(sorted, vec![3, 2, 1]);
    }

    #[test]
    fn dummy_collect_probes_one_shared_element() {
        let root = new_probe(false);
        let array = ElementPath::dummy(root.clone()).get_as_array_path().unwrap();
        let collected = array
            .collect(|element| {
                element.get_as_object_path()?.get_string("name")
            })
            .unwrap();
        assert!(collected.is_empty());
        let descriptor = descriptor_of(&root);
        match descriptor.kind {
            DescriptorKind::Array { element_type } => match element_type.kind {
                DescriptorKind::Object { ref properties } => {
                    assert!(properties.contains_key("name"));
                }
                other => panic!("expected object element, got {other:?}"),
            },
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn nullable_array_map_runs_only_when_present() {
        let value = json!({"ids": [1, 2]});
        let object = ElementPath::actual(&value).get_as_object_path().unwrap();
        let present = object
            .get_nullable_array_path("ids")
            .unwrap()
            .map(|a| a.collect(int_of))
            .unwrap();
        assert_eq!(present, Some(vec![1, 2]));
        let absent = object
            .get_nullable_array_path("missing")
            .unwrap()
            .map(|a| a.collect(int_of))
            .unwrap();
        assert_eq!(absent, None);
    }
}
