//! Composition of the paymail request pipeline.
//!
//! Stage order, innermost to outermost:
//! 1. discovery endpoint and sub-protocol routes (API nested under the base path)
//! 2. unmatched-route fallback
//! 3. body parsing (JSON body-size limit)
//! 4. CORS, when configured
//! 5. error stage
//!
//! `Router::layer` only wraps routes that already exist, so the layers are
//! applied after every route is mounted even though their configuration is
//! validated first.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use bsvalias_core::{
    BasePath, BaseUrl, CapabilityCode, CapabilityKey, CapabilityRegistry,
    CapabilityRegistryBuilder, CapabilityValue, ConfigurationError, WELL_KNOWN_PATH,
};
use tracing::info;

use super::config::PaymailConfig;
use super::discovery::discovery_handler;
use super::protocols::REGISTRARS;
use super::stages::{build_cors_layer, error_stage, not_found};

/// A fully built paymail service: the router plus the frozen registry it
/// advertises.
#[derive(Debug, Clone)]
pub struct PaymailRouter {
    router: Router,
    capabilities: Arc<CapabilityRegistry>,
    mounted: Vec<CapabilityKey>,
}

impl PaymailRouter {
    /// Validates `base_url`, runs every registrar and composes the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the base URL, base path or CORS
    /// origins are invalid, or if two registrations claim the same
    /// capability key. Nothing is returned on failure, so a partially built
    /// pipeline can never serve traffic.
    pub fn build(base_url: &str, config: &PaymailConfig) -> Result<Self, ConfigurationError> {
        let base_url = BaseUrl::parse(base_url)?;
        let base_path = BasePath::parse(&config.base_path)?;
        let cors = config.cors.as_ref().map(build_cors_layer).transpose()?;

        let mut capabilities = CapabilityRegistryBuilder::new(base_url, base_path.clone());
        capabilities.insert(
            CapabilityCode::RequestSenderValidation.into(),
            CapabilityValue::Flag(config.request_sender_validation),
        )?;

        let mut api = Router::new();
        let mut mounted = Vec::new();
        for register in REGISTRARS {
            let Some(registration) = register(config) else {
                continue;
            };
            capabilities.insert_template(registration.key)?;
            api = api.merge(registration.router);
            mounted.push(registration.key);
            info!(capability = %registration.key, "sub-protocol mounted");
        }

        capabilities.insert_fixed()?;
        let capabilities = Arc::new(capabilities.build());

        let mut router = Router::new()
            .route(WELL_KNOWN_PATH, get(discovery_handler))
            .with_state(Arc::clone(&capabilities));
        router = if base_path.is_root() {
            router.merge(api)
        } else {
            router.nest(base_path.as_str(), api)
        };

        router = router
            .fallback(not_found)
            .layer(DefaultBodyLimit::max(config.body.limit));
        if let Some(cors) = cors {
            router = router.layer(cors);
        }
        router = router.layer(from_fn_with_state(
            Arc::clone(&config.error_handler),
            error_stage,
        ));

        info!(
            base_path = base_path.as_str(),
            capabilities = capabilities.len(),
            "paymail router built"
        );

        Ok(Self {
            router,
            capabilities,
            mounted,
        })
    }

    /// The frozen capability registry served at the well-known path.
    #[must_use]
    pub fn capabilities(&self) -> &Arc<CapabilityRegistry> {
        &self.capabilities
    }

    /// Keys of the sub-protocols that mounted routes, in registration order.
    #[must_use]
    pub fn mounted(&self) -> &[CapabilityKey] {
        &self.mounted
    }

    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}
