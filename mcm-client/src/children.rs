//! One page of folder children

use crate::object::Object;

/// Single-pass iterator over one page of children.
///
/// The page is fully materialized; further pages are fetched by calling
/// `get_children` again with a `skip_count`.
#[derive(Debug)]
pub struct ChildrenIterator<'s> {
    children: std::vec::IntoIter<Object<'s>>,
    has_more_items: bool,
    num_items: Option<i64>,
}

impl<'s> ChildrenIterator<'s> {
    pub fn new(children: Vec<Object<'s>>, has_more_items: bool, num_items: Option<i64>) -> Self {
        Self {
            children: children.into_iter(),
            has_more_items,
            num_items,
        }
    }

    /// Whether the server holds more children past this page
    pub fn has_more_items(&self) -> bool {
        self.has_more_items
    }

    /// Total number of children, if the server reported it
    pub fn num_items(&self) -> Option<i64> {
        self.num_items
    }
}

impl<'s> Iterator for ChildrenIterator<'s> {
    type Item = Object<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        self.children.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl ExactSizeIterator for ChildrenIterator<'_> {}
