//! Integration test modules.

mod lookup_test;
mod statement_test;
mod tool_test;

use lawdesk::config::{Credentials, WarehouseConfig};
use lawdesk::lookup::CaseLookup;
use lawdesk::query::PollPolicy;
use lawdesk::warehouse::MockWarehouseApi;
use std::sync::Arc;
use std::time::Duration;

/// Builds a lookup service over the mock with no sleep between polls.
pub fn mock_lookup(api: Arc<MockWarehouseApi>) -> CaseLookup {
    let config = WarehouseConfig::new(
        Credentials::new("https://adb-123.azuredatabricks.net", "client-id", "client-secret"),
        "wh-test",
    )
    .expect("valid test config");

    CaseLookup::new(api, config).with_policy(PollPolicy::default().with_interval(Duration::ZERO))
}
