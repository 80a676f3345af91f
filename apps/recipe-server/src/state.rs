// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::auth::{JwtCenter, SocialProvider, SocialTokenVerifier};
use crate::config::AuthSettings;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub jwt: Arc<JwtCenter>,
    pub auth_settings: Arc<AuthSettings>,
    social: Arc<HashMap<SocialProvider, Arc<dyn SocialTokenVerifier>>>,
}

impl AppState {
    pub fn new(store: InMemoryStore, jwt: JwtCenter, auth_settings: AuthSettings) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            jwt: Arc::new(jwt),
            auth_settings: Arc::new(auth_settings),
            social: Arc::new(HashMap::new()),
        }
    }

    /// Register the verifier used for its provider's login endpoint.
    pub fn with_social_verifier(mut self, verifier: Arc<dyn SocialTokenVerifier>) -> Self {
        Arc::make_mut(&mut self.social).insert(verifier.provider(), verifier);
        self
    }

    pub fn social_verifier(&self, provider: SocialProvider) -> Option<Arc<dyn SocialTokenVerifier>> {
        self.social.get(&provider).cloned()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::JwtSettings;

    pub const TEST_SECRET: &str = "test_secret_key_for_testing_only";

    pub fn test_state() -> AppState {
        AppState::new(
            InMemoryStore::new(),
            JwtCenter::new(&JwtSettings::with_secret(TEST_SECRET)),
            AuthSettings::default(),
        )
    }
}
