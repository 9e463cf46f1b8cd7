//! Fuzzy lookup of a helpdesk user by display name.
//!
//! The locator walks the paginated user directory one page at a time and keeps
//! the closest name within the configured edit distance.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::types::{DirectoryError, RelayError, User};
use crate::utils::edit_distance;

pub const DEFAULT_MAX_DISTANCE: usize = 3;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub const USER_NOT_FOUND_MESSAGE: &str = "No user found matching the criteria.";

/// Source of user directory pages.
///
/// An empty page marks the end of the directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn fetch_user_page(&self, page: u32, page_size: u32) -> Result<Vec<User>, DirectoryError>;
}

#[async_trait]
impl<D: UserDirectory + ?Sized> UserDirectory for std::sync::Arc<D> {
    async fn fetch_user_page(&self, page: u32, page_size: u32) -> Result<Vec<User>, DirectoryError> {
        (**self).fetch_user_page(page, page_size).await
    }
}

/// Search settings for [`UserLocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorSettings {
    pub max_distance: usize,
    pub page_size: u32,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub struct UserLocator<D> {
    directory: D,
    settings: LocatorSettings,
}

impl<D: UserDirectory> UserLocator<D> {
    pub fn new(directory: D) -> Self {
        Self::with_settings(directory, LocatorSettings::default())
    }

    pub fn with_settings(directory: D, settings: LocatorSettings) -> Self {
        Self {
            directory,
            settings,
        }
    }

    pub fn settings(&self) -> LocatorSettings {
        self.settings
    }

    /// Return the user whose name is closest to `query`.
    ///
    /// Ties keep the first user seen. Users without a name are skipped.
    ///
    /// # Errors
    ///
    /// [`RelayError::NotFound`] when the directory is exhausted without a
    /// candidate, [`RelayError::UpstreamFetch`] as soon as any page fetch fails.
    pub async fn find_closest_user(&self, query: &str) -> Result<User, RelayError> {
        let mut best: Option<(User, usize)> = None;
        let mut page = 1;

        loop {
            debug!("Fetching directory page {} (size {})", page, self.settings.page_size);
            let users = self
                .directory
                .fetch_user_page(page, self.settings.page_size)
                .await
                .map_err(|e| {
                    warn!("User search for {:?} aborted on page {}: {}", query, page, e);
                    RelayError::UpstreamFetch(e.to_string())
                })?;

            if users.is_empty() {
                break;
            }

            for user in users {
                let Some(name) = user.display_name() else {
                    debug!("Skipping directory record without a name: {}", user.id_value());
                    continue;
                };

                let distance = edit_distance(name, query);
                let closer = best
                    .as_ref()
                    .map_or(true, |(_, best_distance)| distance < *best_distance);
                if distance <= self.settings.max_distance && closer {
                    best = Some((user, distance));
                }
            }

            page += 1;
        }

        match best {
            Some((user, distance)) => {
                info!("User search for {:?} matched {} at distance {}", query, user.id_value(), distance);
                Ok(user)
            }
            None => {
                info!("User search for {:?} found no match after {} pages", query, page);
                Err(RelayError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()))
            }
        }
    }
}
