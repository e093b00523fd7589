use super::model::{GameObject, ObjectId, ObjectKind};

/// Catalog of every object constructed for the world, addressed by id.
///
/// Ids are handed out sequentially starting at 0 and never reused, so the
/// backing vec doubles as the id-to-object arena. Objects are never
/// deregistered; eaten objects simply stop appearing in any placement
/// container.
#[derive(Default, Debug)]
pub struct ObjectRegistry {
    objects: Vec<GameObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object and return its assigned id.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        keyword: impl Into<String>,
        kind: ObjectKind,
    ) -> ObjectId {
        let id = ObjectId(self.objects.len() as u16);
        self.objects.push(GameObject {
            id,
            name: name.into(),
            description: description.into(),
            keyword: keyword.into(),
            kind,
        });
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(usize::from(id.0))
    }

    /// First object whose keyword matches, if any. This is the authoritative
    /// existence check when an object is in neither the room nor the
    /// inventory.
    pub fn find_by_keyword(&self, keyword: &str) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.keyword == keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
