//! Query options for the `object` and `children` selectors
//!
//! Each option maps to one browser binding query parameter. Unset optional
//! parameters are left out of the query string; the others are always sent
//! with their defaults.

use crate::types::IncludeRelationships;

/// Default `renditionFilter`
pub const DEFAULT_RENDITION_FILTER: &str = "cmis:none";

/// Query pairs ready to be URL-encoded
pub type QueryPairs = Vec<(&'static str, String)>;

/// Options for fetching a single object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectOptions {
    pub filter: Option<String>,
    pub include_allowable_actions: bool,
    pub include_relationships: IncludeRelationships,
    pub rendition_filter: String,
    pub include_policy_ids: bool,
    pub include_acl: bool,
    pub succinct: bool,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            filter: None,
            include_allowable_actions: false,
            include_relationships: IncludeRelationships::None,
            rendition_filter: DEFAULT_RENDITION_FILTER.to_string(),
            include_policy_ids: false,
            include_acl: false,
            succinct: true,
        }
    }
}

impl ObjectOptions {
    /// Set the property filter, e.g. `*` or `cmis:name,cmis:objectId`
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_allowable_actions(mut self, include: bool) -> Self {
        self.include_allowable_actions = include;
        self
    }

    pub fn with_relationships(mut self, relationships: IncludeRelationships) -> Self {
        self.include_relationships = relationships;
        self
    }

    pub fn with_rendition_filter(mut self, filter: impl Into<String>) -> Self {
        self.rendition_filter = filter.into();
        self
    }

    pub fn with_policy_ids(mut self, include: bool) -> Self {
        self.include_policy_ids = include;
        self
    }

    pub fn with_acl(mut self, include: bool) -> Self {
        self.include_acl = include;
        self
    }

    pub fn with_succinct(mut self, succinct: bool) -> Self {
        self.succinct = succinct;
        self
    }

    /// Build the query string for fetching `object_id`
    pub fn to_query(&self, object_id: &str) -> QueryPairs {
        let mut query = vec![
            ("objectId", object_id.to_string()),
            ("cmisselector", "object".to_string()),
        ];
        if let Some(filter) = &self.filter {
            query.push(("filter", filter.clone()));
        }
        query.extend([
            (
                "includeAllowableActions",
                self.include_allowable_actions.to_string(),
            ),
            (
                "includeRelationships",
                self.include_relationships.to_string(),
            ),
            ("renditionFilter", self.rendition_filter.clone()),
            ("includePolicyIds", self.include_policy_ids.to_string()),
            ("includeAcl", self.include_acl.to_string()),
            ("succinct", self.succinct.to_string()),
        ]);
        query
    }
}

/// Options for listing the children of a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildrenOptions {
    pub filter: Option<String>,
    pub order_by: Option<String>,
    pub include_allowable_actions: bool,
    pub include_relationships: IncludeRelationships,
    pub rendition_filter: String,
    pub include_path_segment: bool,
    pub max_items: Option<u64>,
    pub skip_count: Option<u64>,
    pub succinct: bool,
}

impl Default for ChildrenOptions {
    fn default() -> Self {
        Self {
            filter: None,
            order_by: None,
            include_allowable_actions: false,
            include_relationships: IncludeRelationships::None,
            rendition_filter: DEFAULT_RENDITION_FILTER.to_string(),
            include_path_segment: false,
            max_items: None,
            skip_count: None,
            succinct: true,
        }
    }
}

impl ChildrenOptions {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the sort order, e.g. `cmis:name ASC`
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_allowable_actions(mut self, include: bool) -> Self {
        self.include_allowable_actions = include;
        self
    }

    pub fn with_relationships(mut self, relationships: IncludeRelationships) -> Self {
        self.include_relationships = relationships;
        self
    }

    pub fn with_rendition_filter(mut self, filter: impl Into<String>) -> Self {
        self.rendition_filter = filter.into();
        self
    }

    pub fn with_path_segment(mut self, include: bool) -> Self {
        self.include_path_segment = include;
        self
    }

    /// Limit the page size
    pub fn with_max_items(mut self, max_items: u64) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Skip the first `skip_count` children
    pub fn with_skip_count(mut self, skip_count: u64) -> Self {
        self.skip_count = Some(skip_count);
        self
    }

    pub fn with_succinct(mut self, succinct: bool) -> Self {
        self.succinct = succinct;
        self
    }

    /// Build the query string for listing the children of `folder_id`
    pub fn to_query(&self, folder_id: &str) -> QueryPairs {
        let mut query = vec![
            ("objectId", folder_id.to_string()),
            ("cmisselector", "children".to_string()),
        ];
        if let Some(filter) = &self.filter {
            query.push(("filter", filter.clone()));
        }
        if let Some(order_by) = &self.order_by {
            query.push(("orderBy", order_by.clone()));
        }
        query.extend([
            (
                "includeAllowableActions",
                self.include_allowable_actions.to_string(),
            ),
            (
                "includeRelationships",
                self.include_relationships.to_string(),
            ),
            ("renditionFilter", self.rendition_filter.clone()),
            ("includePathSegment", self.include_path_segment.to_string()),
        ]);
        if let Some(max_items) = self.max_items {
            query.push(("maxItems", max_items.to_string()));
        }
        if let Some(skip_count) = self.skip_count {
            query.push(("skipCount", skip_count.to_string()));
        }
        query.push(("succinct", self.succinct.to_string()));
        query
    }
}
