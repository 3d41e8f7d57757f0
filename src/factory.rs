//! Graph construction entry points

use crate::config::GraphConfig;
use crate::graph::{RdfStore, Triple};

/// New empty in-memory graph
pub fn create_default_graph() -> RdfStore {
    RdfStore::new()
}

/// New in-memory graph seeded with `triples`
pub fn create_graph<I>(triples: I) -> RdfStore
where
    I: IntoIterator<Item = Triple>,
{
    RdfStore::from_triples(triples)
}

/// New empty in-memory graph sized by `config`
pub fn create_graph_with_config(config: &GraphConfig) -> RdfStore {
    RdfStore::with_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::shorthand::triples;
    use crate::graph::Graph;

    #[test]
    fn test_factories() {
        assert!(create_default_graph().is_empty().unwrap());
        let seeded = create_graph(triples("a p b; a p b; a q c").unwrap());
        assert_eq!(seeded.size().unwrap(), 2);

        let config = GraphConfig {
            lookup_cache_slots: 0,
            ..GraphConfig::default()
        };
        let mut g = create_graph_with_config(&config);
        g.add_all(triples("a p b").unwrap()).unwrap();
        assert!(g.contains_triple(&triples("a p b").unwrap()[0]).unwrap());
    }
}
