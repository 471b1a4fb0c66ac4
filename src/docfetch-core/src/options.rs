//! Per-call options. Every operation accepts an optional options value;
//! `label` is forwarded as a tracing header on the request.

use bson::Document;

/// Options for calls that take nothing besides a label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    pub label: Option<String>,
}

impl CallOptions {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOneOptions {
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub label: Option<String>,
}

impl FindOneOptions {
    pub fn with_projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub label: Option<String>,
}

impl FindOptions {
    pub fn with_projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Options for `updateOne`, `updateMany` and `replaceOne`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    pub upsert: Option<bool>,
    pub label: Option<String>,
}

impl UpdateOptions {
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
