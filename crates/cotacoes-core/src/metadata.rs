//! Sector and asset-type option lists for the filter controls.
//!
//! Transitions:
//!
//! - sector selected: reload types for that sector (never merged with the
//!   previous list);
//! - types loaded: clear the selected type if it is not in the new list;
//! - types failed: clear the selected type, since no catalog confirms it
//!   for the current sector.
//!
//! The sector change and the types generation bump happen under the
//! selection lock, and the types-loaded step only touches the selection
//! while its generation is still current. A late catalog therefore never
//! clears a type chosen for a newer sector.
//!
//! Both catalogs get the same last-request-wins treatment as the quote list
//! and fail independently of it.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::api::CotacoesApi;
use crate::query::Filters;
use crate::surface::{LoadOutcome, Surface, SurfaceKind, SurfaceSnapshot};
use crate::{AssetType, Sector, ValidationError};

#[derive(Clone)]
pub struct MetadataCascade {
    api: Arc<dyn CotacoesApi>,
    sectors: Arc<Surface<Vec<Sector>>>,
    types: Arc<Surface<Vec<AssetType>>>,
    selection: Arc<Mutex<Filters>>,
}

impl MetadataCascade {
    pub fn new(api: Arc<dyn CotacoesApi>) -> Self {
        Self {
            api,
            sectors: Arc::new(Surface::new(SurfaceKind::Sectors)),
            types: Arc::new(Surface::new(SurfaceKind::Types)),
            selection: Arc::new(Mutex::new(Filters::default())),
        }
    }

    pub fn load_sectors(&self) -> impl Future<Output = LoadOutcome<Vec<Sector>>> + Send + 'static {
        let generation = self.sectors.begin();
        let api = Arc::clone(&self.api);
        let sectors = Arc::clone(&self.sectors);
        debug!("sectors generation {generation}: loading catalog");

        async move {
            let result = api.sectors().await;
            sectors.commit(generation, result)
        }
    }

    /// Load the types available in `sector` (all types for `None`) and drop
    /// the type selection if it is no longer offered.
    pub fn load_types(
        &self,
        sector: Option<Sector>,
    ) -> impl Future<Output = LoadOutcome<Vec<AssetType>>> + Send + 'static {
        let generation = self.types.begin();
        self.types_request(sector, generation)
    }

    /// Select `sector` and reload the type catalog for it.
    pub fn select_sector(
        &self,
        sector: Option<Sector>,
    ) -> impl Future<Output = LoadOutcome<Vec<AssetType>>> + Send + 'static {
        let generation = {
            let mut selection = lock(&self.selection);
            selection.sector = sector;
            self.types.begin()
        };
        self.types_request(sector, generation)
    }

    fn types_request(
        &self,
        sector: Option<Sector>,
        generation: u64,
    ) -> impl Future<Output = LoadOutcome<Vec<AssetType>>> + Send + 'static {
        let api = Arc::clone(&self.api);
        let types = Arc::clone(&self.types);
        let selection = Arc::clone(&self.selection);
        let label = sector.map_or("<any>", Sector::as_str);
        debug!("types generation {generation}: loading for sector {label}");

        async move {
            let outcome = types.commit(generation, api.types(sector).await);
            if outcome.is_superseded() {
                return outcome;
            }

            let mut selection = lock(&selection);
            if !types.is_current(generation) {
                return outcome;
            }
            if let Some(selected) = selection.asset_type {
                let confirmed = match &outcome {
                    LoadOutcome::Applied(available) => available.contains(&selected),
                    _ => false,
                };
                if !confirmed {
                    info!("clearing asset type '{selected}', not confirmed for sector {label}");
                    selection.asset_type = None;
                }
            }
            outcome
        }
    }

    /// Select an asset type. Once a type catalog is loaded, only its members
    /// are accepted.
    pub fn select_type(&self, asset_type: Option<AssetType>) -> Result<(), ValidationError> {
        if let (Some(selected), Some(available)) = (asset_type, self.types.data()) {
            if !available.contains(&selected) {
                return Err(ValidationError::AssetTypeUnavailable {
                    value: selected.as_str().to_owned(),
                });
            }
        }
        lock(&self.selection).asset_type = asset_type;
        Ok(())
    }

    /// Current selection, ready to go into a list request.
    pub fn filters(&self) -> Filters {
        *lock(&self.selection)
    }

    pub fn sectors(&self) -> SurfaceSnapshot<Vec<Sector>> {
        self.sectors.snapshot()
    }

    pub fn types(&self) -> SurfaceSnapshot<Vec<AssetType>> {
        self.types.snapshot()
    }
}

fn lock(selection: &Mutex<Filters>) -> MutexGuard<'_, Filters> {
    selection.lock().unwrap_or_else(PoisonError::into_inner)
}
