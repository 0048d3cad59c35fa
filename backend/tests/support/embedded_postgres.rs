//! Embedded PostgreSQL for the Diesel repository suites.
//!
//! Every test gets its own temporary database on the process-wide cluster,
//! migrated with the same embedded migrations the server runs at startup.

use std::future::Future;
use std::time::Duration;

use blog::domain::ports::StorePorts;
use blog::outbound::persistence::{
    DbPool, PoolConfig, postgres_store_ports, run_pending_migrations,
};
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use rstest::fixture;
use tokio::runtime::Runtime;

use super::handle_cluster_setup_failure;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated database with Diesel adapters bound to it.
pub struct DieselWorld {
    /// Runtime reused for every async call in one test.
    runtime: Runtime,
    /// Diesel adapters sharing one pool.
    pub ports: StorePorts,
    _database: TemporaryDatabase,
}

impl DieselWorld {
    /// Drive `future` to completion on the world's runtime.
    pub fn run<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Keep `PG_PASSWORD` stable so a reused data directory still accepts us.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster spawns threads; the shared cluster
        // singleton serialises bootstrap.
        unsafe {
            std::env::set_var("PG_PASSWORD", "blog_embedded_test");
        }
    }
}

fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= SHARED_CLUSTER_RETRIES => return Err(error),
            Err(_) => {
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

fn setup_world() -> Result<DieselWorld, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| format!("{err:?}"))?;
    let database = cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4()))
        .map_err(|err| format!("{err:?}"))?;
    let database_url = database.url().to_owned();

    let pool = runtime.block_on(async {
        run_pending_migrations(&database_url)
            .await
            .map_err(|err| err.to_string())?;
        DbPool::new(
            PoolConfig::new(database_url.as_str())
                .with_max_size(2)
                .with_min_idle(Some(1)),
        )
        .await
        .map_err(|err| err.to_string())
    })?;

    Ok(DieselWorld {
        runtime,
        ports: postgres_store_ports(&pool),
        _database: database,
    })
}

/// A fresh migrated database, or `None` when the cluster is unavailable and
/// `SKIP_TEST_CLUSTER` is set.
#[fixture]
pub fn diesel_world() -> Option<DieselWorld> {
    match setup_world() {
        Ok(world) => Some(world),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
