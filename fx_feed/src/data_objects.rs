use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The rate sheet as returned by the external service.
///
/// `rates` maps a currency code to its rate relative to the sheet's base currency. Fields the
/// service includes beyond these are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSheet {
    pub result: String,
    #[serde(default)]
    pub base_code: Option<String>,
    pub rates: HashMap<String, f64>,
}

impl RateSheet {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}
