use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::TopicId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicCategory {
    Number,
    Algebra,
    Geometry,
    Data,
}

impl fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TopicCategory::Number => "Number",
            TopicCategory::Algebra => "Algebra",
            TopicCategory::Geometry => "Geometry",
            TopicCategory::Data => "Data",
        };
        f.write_str(label)
    }
}

/// Read-only curriculum entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    code: String,
    title: String,
    description: String,
    category: TopicCategory,
}

impl Topic {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: TopicCategory,
    ) -> Self {
        Self {
            id: TopicId::new(id),
            code: code.into(),
            title: title.into(),
            description: description.into(),
            category,
        }
    }

    #[must_use]
    pub fn id(&self) -> &TopicId {
        &self.id
    }

    /// Standards code such as `5.2.B`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn category(&self) -> TopicCategory {
        self.category
    }
}
