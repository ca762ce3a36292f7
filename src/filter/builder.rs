use super::error::FilterError;
use super::parser::FilterParser;
use super::predicate::{Predicate, PredicateFactory};
use super::schema::EntitySchema;
use super::types::FilterTerm;

/// Drives parser → resolver → coercer → factory for one request and ANDs the
/// results together.
pub struct SpecificationBuilder {
    entity: &'static EntitySchema,
    debug_logging: bool,
}

impl SpecificationBuilder {
    pub fn new(entity: &'static EntitySchema) -> Self {
        Self { entity, debug_logging: false }
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    pub fn entity(&self) -> &'static EntitySchema {
        self.entity
    }

    /// `params` are filter keys with the prefix already stripped.
    /// Returns `None` when no predicate was produced (match all).
    pub fn build(&self, params: &[(String, String)]) -> Result<Option<Predicate>, FilterError> {
        let terms = FilterParser::parse(params);
        self.build_terms(&terms)
    }

    pub fn build_terms(&self, terms: &[FilterTerm]) -> Result<Option<Predicate>, FilterError> {
        let mut predicates = Vec::with_capacity(terms.len());
        for term in terms {
            predicates.push(PredicateFactory::build(self.entity, term)?);
        }

        let combined = Predicate::all(predicates);
        if self.debug_logging {
            match &combined {
                Some(predicate) => tracing::debug!(
                    "Built {} predicate(s) for {}: {}",
                    predicate.leaf_count(),
                    self.entity.name,
                    predicate
                ),
                None => tracing::debug!("No filter predicates for {}", self.entity.name),
            }
        }
        Ok(combined)
    }
}
