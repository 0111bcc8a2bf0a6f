use jsonwebtoken::{DecodingKey, EncodingKey};
use ripple_db::Pool;
use std::sync::Arc;

/// Inner type of [`App`] object.
///
/// [`App`]: super::App
pub struct AppInner {
    pub config: Arc<ripple_config::Config>,

    pub(super) primary_db: Pool,
    pub(super) replica_db: Option<Pool>,

    pub(crate) jwt_encode: EncodingKey,
    pub(crate) jwt_decode: DecodingKey,
}
