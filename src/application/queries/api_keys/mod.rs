use crate::application::{dto::ApiKeySummary, error::ApplicationResult};
use crate::domain::api_key::ApiKey;
use crate::domain::store::{JsonStore, keys};

pub struct ApiKeyQueryService {
    store: JsonStore,
}

impl ApiKeyQueryService {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// All keys in storage order, without their secrets.
    pub async fn list_api_keys(&self) -> ApplicationResult<Vec<ApiKeySummary>> {
        let api_keys: Vec<ApiKey> = self.store.get_or_default(keys::API_KEYS).await?;
        Ok(api_keys.iter().map(ApiKeySummary::from).collect())
    }
}
