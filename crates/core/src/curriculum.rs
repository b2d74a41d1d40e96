//! Built-in grade 5 topic catalog.

use crate::model::{Topic, TopicCategory, TopicId};

/// Returns the catalog in display order.
#[must_use]
pub fn curriculum() -> Vec<Topic> {
    vec![
        Topic::new(
            "topic-1",
            "5.2.B",
            "Place Value & Decimals",
            "Compare and order two decimals to thousandths and represent comparisons using >, <, or =.",
            TopicCategory::Number,
        ),
        Topic::new(
            "topic-2",
            "5.3.K",
            "Adding & Subtracting Rational Numbers",
            "Add and subtract positive rational numbers fluently.",
            TopicCategory::Number,
        ),
        Topic::new(
            "topic-3",
            "5.4.B",
            "Algebraic Reasoning",
            "Represent and solve multi-step problems involving the four operations with whole numbers.",
            TopicCategory::Algebra,
        ),
        Topic::new(
            "topic-4",
            "5.5.A",
            "Geometry & 2D Figures",
            "Classify two-dimensional figures in a hierarchy of sets and subsets using graphic organizers.",
            TopicCategory::Geometry,
        ),
        Topic::new(
            "topic-5",
            "5.9.C",
            "Data Analysis",
            "Solve one- and two-step problems using data from a frequency table, dot plot, bar graph, stem-and-leaf plot, or scatterplot.",
            TopicCategory::Data,
        ),
    ]
}

#[must_use]
pub fn find_topic(id: &TopicId) -> Option<Topic> {
    curriculum().into_iter().find(|topic| topic.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let topics = curriculum();
        let ids: HashSet<_> = topics.iter().map(|t| t.id().clone()).collect();
        assert_eq!(ids.len(), topics.len());
    }

    #[test]
    fn find_topic_by_id() {
        let topic = find_topic(&TopicId::new("topic-4")).unwrap();
        assert_eq!(topic.code(), "5.5.A");
        assert_eq!(topic.category(), TopicCategory::Geometry);
        assert!(find_topic(&TopicId::new("topic-99")).is_none());
    }
}
