use indexmap::IndexMap;
use parlor_providers::{KnowledgeBase, KnowledgeBaseId};

pub const DEFAULT_BASE_NAME: &str = "Default knowledge base";

/// Knowledge bases known to this session, in display order.
///
/// The default base is always present.
#[derive(Debug, Clone)]
pub struct KnowledgeCatalog {
    default_id: KnowledgeBaseId,
    bases: IndexMap<KnowledgeBaseId, KnowledgeBase>,
}

impl KnowledgeCatalog {
    pub fn new(default_id: KnowledgeBaseId) -> Self {
        let mut catalog = Self { default_id, bases: IndexMap::new() };
        catalog.ensure_default();
        catalog
    }

    fn ensure_default(&mut self) {
        if !self.bases.contains_key(&self.default_id) {
            let base = KnowledgeBase::new(self.default_id.clone(), DEFAULT_BASE_NAME, "");
            self.bases.shift_insert(0, self.default_id.clone(), base);
        }
    }

    /// Replace the contents with a fresh registry listing
    pub fn replace(&mut self, bases: Vec<KnowledgeBase>) {
        self.bases = bases.into_iter().map(|base| (base.id.clone(), base)).collect();
        self.ensure_default();
    }

    pub fn insert(&mut self, base: KnowledgeBase) {
        self.bases.insert(base.id.clone(), base);
    }

    /// Remove a base; the default cannot be removed
    pub fn remove(&mut self, id: &KnowledgeBaseId) -> Option<KnowledgeBase> {
        if id == &self.default_id {
            return None;
        }
        self.bases.shift_remove(id)
    }

    pub fn get(&self, id: &KnowledgeBaseId) -> Option<&KnowledgeBase> {
        self.bases.get(id)
    }

    pub fn contains(&self, id: &KnowledgeBaseId) -> bool {
        self.bases.contains_key(id)
    }

    pub fn is_default(&self, id: &KnowledgeBaseId) -> bool {
        id == &self.default_id
    }

    pub fn default_id(&self) -> &KnowledgeBaseId {
        &self.default_id
    }

    /// Display name, falling back to the id
    pub fn name_of(&self, id: &KnowledgeBaseId) -> String {
        self.get(id).map(|base| base.name.clone()).unwrap_or_else(|| id.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeBase> {
        self.bases.values()
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}
