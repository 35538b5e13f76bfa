use rand::Rng;
use std::sync::Arc;
use tracing::instrument;

use crate::models::{AddCafeForm, Cafe, NewCafe, RepositoryError, ServiceError, ServiceResult};
use crate::observability::Metrics;
use crate::repositories::CafeRepository;
use crate::services::ApiKey;

/// Business operations over the cafe table
pub struct CafeService {
    repository: Arc<dyn CafeRepository>,
    api_key: ApiKey,
    metrics: Option<Arc<Metrics>>,
}

impl CafeService {
    /// Create a new CafeService
    pub fn new(repository: Arc<dyn CafeRepository>, api_key: ApiKey) -> Self {
        Self {
            repository,
            api_key,
            metrics: None,
        }
    }

    /// Record business outcomes in the given metrics registry
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Pick a cafe uniformly at random
    #[instrument(skip(self))]
    pub async fn get_random(&self) -> ServiceResult<Cafe> {
        let result = self.pick_random().await;
        self.record("get_random", &result);
        result
    }

    async fn pick_random(&self) -> ServiceResult<Cafe> {
        let count = self.repository.count().await?;
        if count <= 0 {
            crate::warn_with_trace!("Random cafe requested from an empty store");
            return Err(ServiceError::EmptyStore);
        }

        let offset = rand::thread_rng().gen_range(0..count);
        crate::info_with_trace!(count, offset, "Picking random cafe");

        // A concurrent delete can shrink the table between the two reads
        self.repository
            .find_at_offset(offset)
            .await?
            .ok_or(ServiceError::EmptyStore)
    }

    /// List every cafe in store order
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ServiceResult<Vec<Cafe>> {
        let result = self.repository.find_all().await.map_err(ServiceError::from);
        if let Ok(cafes) = &result {
            crate::info_with_trace!("Found {} cafes", cafes.len());
        }
        self.record("list_all", &result);
        result
    }

    /// First cafe whose location equals `location` exactly
    #[instrument(skip(self))]
    pub async fn search_by_location(&self, location: Option<&str>) -> ServiceResult<Cafe> {
        let result = match location {
            Some(location) => self
                .repository
                .find_first_by_location(location)
                .await
                .map_err(ServiceError::from)
                .and_then(|found| {
                    found.ok_or_else(|| ServiceError::NoCafeAtLocation {
                        location: location.to_string(),
                    })
                }),
            None => Err(ServiceError::NoCafeAtLocation {
                location: String::new(),
            }),
        };
        self.record("search_by_location", &result);
        result
    }

    /// Validate a form submission and insert it, returning the new id
    #[instrument(skip(self, form), fields(name = form.name.as_deref().unwrap_or("<missing>")))]
    pub async fn add_cafe(&self, form: AddCafeForm) -> ServiceResult<i64> {
        let result = self.insert(form).await;
        self.record("add_cafe", &result);
        result
    }

    async fn insert(&self, form: AddCafeForm) -> ServiceResult<i64> {
        let cafe = NewCafe::try_from(form)?;
        let name = cafe.display_name().to_string();

        match self.repository.create(cafe).await {
            Ok(id) => {
                crate::info_with_trace!(id, name = %name, "Cafe added");
                Ok(id)
            }
            Err(RepositoryError::ConstraintViolation { message }) => {
                crate::warn_with_trace!(name = %name, "Cafe rejected by store: {}", message);
                Err(ServiceError::Conflict { message })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Set the coffee price of an existing cafe
    #[instrument(skip(self))]
    pub async fn update_price(&self, cafe_id: &str, new_price: Option<&str>) -> ServiceResult<()> {
        let result = self.apply_price(cafe_id, new_price).await;
        self.record("update_price", &result);
        result
    }

    async fn apply_price(&self, cafe_id: &str, new_price: Option<&str>) -> ServiceResult<()> {
        let id = parse_cafe_id(cafe_id)?;
        let Some(new_price) = new_price else {
            // An unknown id reports not found even when the price is missing too
            if self.repository.find_by_id(id).await?.is_none() {
                return Err(ServiceError::CafeNotFound {
                    id: cafe_id.to_string(),
                });
            }
            return Err(ServiceError::ValidationError {
                message: "Required field missing: new_price".to_string(),
            });
        };
        crate::models::validate_length(
            "new_price",
            Some(new_price),
            crate::models::MAX_PRICE_LENGTH,
        )?;

        if self.repository.update_coffee_price(id, new_price).await? {
            crate::info_with_trace!(id, new_price, "Coffee price updated");
            Ok(())
        } else {
            Err(ServiceError::CafeNotFound {
                id: cafe_id.to_string(),
            })
        }
    }

    /// Delete a cafe after checking the presented api key
    #[instrument(skip(self, api_key))]
    pub async fn delete_cafe(&self, cafe_id: &str, api_key: Option<&str>) -> ServiceResult<()> {
        let result = self.remove(cafe_id, api_key).await;
        self.record("delete_cafe", &result);
        result
    }

    async fn remove(&self, cafe_id: &str, api_key: Option<&str>) -> ServiceResult<()> {
        if !api_key.is_some_and(|key| self.api_key.verify(key)) {
            crate::warn_with_trace!(cafe_id, "Delete rejected: api key mismatch");
            return Err(ServiceError::Forbidden);
        }

        let id = parse_cafe_id(cafe_id)?;
        if self.repository.delete(id).await? {
            crate::info_with_trace!(id, "Cafe deleted");
            Ok(())
        } else {
            Err(ServiceError::CafeNotFound {
                id: cafe_id.to_string(),
            })
        }
    }

    fn record<T>(&self, operation: &str, result: &ServiceResult<T>) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cafe_operation(operation, outcome(result));
        }
    }
}

/// Path ids that are not integers cannot name a cafe
fn parse_cafe_id(cafe_id: &str) -> ServiceResult<i64> {
    cafe_id
        .trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::CafeNotFound {
            id: cafe_id.to_string(),
        })
}

fn outcome<T>(result: &ServiceResult<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(ServiceError::CafeNotFound { .. })
        | Err(ServiceError::NoCafeAtLocation { .. })
        | Err(ServiceError::EmptyStore) => "not_found",
        Err(ServiceError::ValidationError { .. }) => "invalid",
        Err(ServiceError::Conflict { .. }) => "conflict",
        Err(ServiceError::Forbidden) => "forbidden",
        Err(ServiceError::Repository { .. }) => "error",
    }
}
