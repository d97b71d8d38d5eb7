use crate::domain::store::JsonStore;

pub struct AuditQueryService {
    pub(super) store: JsonStore,
}

impl AuditQueryService {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }
}
