use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::ledger::Ledger;

/// Format tag identifying a dashboard ledger file.
pub const FORMAT_TAG: &str = "portfolio-dashboard-ledger";

/// Current ledger format version.
pub const CURRENT_VERSION: u16 = 1;

/// On-disk envelope around the ledger.
///
/// ```text
/// { "format": "portfolio-dashboard-ledger", "version": 1, "ledger": { ... } }
/// ```
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<L> {
    format: String,
    version: u16,
    ledger: L,
}

/// Serialize a ledger inside the current envelope (pretty-printed).
pub fn write_document(ledger: &Ledger) -> Result<String, CoreError> {
    let envelope = Envelope {
        format: FORMAT_TAG.to_string(),
        version: CURRENT_VERSION,
        ledger,
    };
    serde_json::to_string_pretty(&envelope)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
}

/// Parse and validate an envelope, returning the ledger.
///
/// The header is checked before the ledger body is decoded, so a foreign
/// or future file is reported as such rather than as a field error.
/// Settings are validated and trades are put back into date order.
pub fn read_document(data: &str) -> Result<Ledger, CoreError> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(data)
        .map_err(|e| CoreError::InvalidFileFormat(format!("Not a ledger document: {e}")))?;

    if envelope.format != FORMAT_TAG {
        return Err(CoreError::InvalidFileFormat(format!(
            "Unexpected format tag '{}'",
            envelope.format
        )));
    }
    if envelope.version == 0 || envelope.version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(envelope.version));
    }

    let mut ledger: Ledger = serde_json::from_value(envelope.ledger)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize ledger: {e}")))?;
    ledger.settings.validate()?;
    ledger.sort_trades();
    Ok(ledger)
}
