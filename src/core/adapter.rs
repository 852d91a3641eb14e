//! Adapter resolution
//!
//! Adapters are looked up by gearbox model and motor shaft size, then one
//! entry is picked by trying resolution strategies in order:
//!
//! 1. [`ExactFlange`] - the motor's full flange code matches a part code
//! 2. [`ServoPreferred`] - the first "SV" adapter type
//! 3. [`FirstListed`] - the first entry in catalog order
//!
//! Each strategy is independent, so callers can supply their own chain.

use crate::entities::adapter::{Adapter, AdapterCatalog, AdapterEntry, AdapterMatch};
use crate::entities::Motor;

/// One way of picking an adapter from the entries for a shaft size
pub trait AdapterStrategy {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Pick an entry, or `None` to defer to the next strategy
    fn pick<'a>(&self, entries: &'a [AdapterEntry], motor: &Motor) -> Option<&'a AdapterEntry>;

    /// How a result from this strategy is reported
    fn kind(&self) -> AdapterMatch;
}

/// Match the motor's flange code against part codes exactly.
///
/// Applies only when centering diameter, fixing PCD and mounting tap are
/// all known.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactFlange;

impl AdapterStrategy for ExactFlange {
    fn name(&self) -> &'static str {
        "exact-flange"
    }

    fn pick<'a>(&self, entries: &'a [AdapterEntry], motor: &Motor) -> Option<&'a AdapterEntry> {
        let target = motor.flange_code()?.to_string();
        entries.iter().find(|e| e.code == target)
    }

    fn kind(&self) -> AdapterMatch {
        AdapterMatch::Exact
    }
}

/// First adapter whose type label starts with "SV" (servo)
#[derive(Debug, Clone, Copy, Default)]
pub struct ServoPreferred;

impl AdapterStrategy for ServoPreferred {
    fn name(&self) -> &'static str {
        "servo-preferred"
    }

    fn pick<'a>(&self, entries: &'a [AdapterEntry], _motor: &Motor) -> Option<&'a AdapterEntry> {
        entries.iter().find(|e| e.adapter_type.starts_with("SV"))
    }

    fn kind(&self) -> AdapterMatch {
        AdapterMatch::ServoPreferred
    }
}

/// First adapter in catalog order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstListed;

impl AdapterStrategy for FirstListed {
    fn name(&self) -> &'static str {
        "first-listed"
    }

    fn pick<'a>(&self, entries: &'a [AdapterEntry], _motor: &Motor) -> Option<&'a AdapterEntry> {
        entries.first()
    }

    fn kind(&self) -> AdapterMatch {
        AdapterMatch::FirstListed
    }
}

/// Strategy chain used by [`find_adapter`]
pub const DEFAULT_STRATEGIES: &[&dyn AdapterStrategy] = &[&ExactFlange, &ServoPreferred, &FirstListed];

/// Resolve the adapter for a gearbox model and motor.
///
/// Returns `None` when the catalog has no entries for the model and the
/// motor's shaft size (e.g. hollow rotary models that mount without one).
pub fn find_adapter(catalog: &AdapterCatalog, reducer_model: &str, motor: &Motor) -> Option<Adapter> {
    find_adapter_with(catalog, reducer_model, motor, DEFAULT_STRATEGIES)
}

/// Resolve an adapter with a custom strategy chain
pub fn find_adapter_with(
    catalog: &AdapterCatalog,
    reducer_model: &str,
    motor: &Motor,
    strategies: &[&dyn AdapterStrategy],
) -> Option<Adapter> {
    let key = motor.shaft_key();
    let Some(entries) = catalog.entries_for(reducer_model, key) else {
        tracing::debug!(model = reducer_model, shaft = %key, "no adapters registered");
        return None;
    };

    for strategy in strategies {
        if let Some(entry) = strategy.pick(entries, motor) {
            tracing::debug!(
                model = reducer_model,
                shaft = %key,
                strategy = strategy.name(),
                code = %entry.code,
                "adapter resolved"
            );
            return Some(Adapter::from_entry(reducer_model, key, entry, strategy.kind()));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::adapter::RawAdapterCatalog;

    fn catalog(json: &str) -> AdapterCatalog {
        let raw: RawAdapterCatalog = serde_json::from_str(json).unwrap();
        AdapterCatalog::from_raw(raw).unwrap()
    }

    fn motor(shaft: f64) -> Motor {
        Motor::new("M1", "Acme", "A1", shaft, 2.39, 3000.0)
    }

    #[test]
    fn test_fallback_prefers_servo_type() {
        let cat = catalog(r#"{"GPB042":{"G08":{"SV1":"8-30-45-M3","ST1":"8-30-45"}}}"#);
        let adapter = find_adapter(&cat, "GPB042", &motor(8.0)).unwrap();

        assert_eq!(adapter.adapter_type, "SV1");
        assert_eq!(adapter.code, "8-30-45-M3");
        assert_eq!(adapter.shaft, "G08");
        assert_eq!(adapter.shaft_dia, 8.0);
        assert_eq!(adapter.centering_dia, 30.0);
        assert_eq!(adapter.fixing_pcd, 45.0);
        assert_eq!(adapter.mounting_tap.as_deref(), Some("M3"));
        assert_eq!(adapter.matched_by, AdapterMatch::ServoPreferred);
    }

    #[test]
    fn test_servo_type_wins_even_when_listed_later() {
        let cat = catalog(r#"{"GPB042":{"G08":{"ST1":"8-30-45","SV2":"8-30-46-M4"}}}"#);
        let adapter = find_adapter(&cat, "GPB042", &motor(8.0)).unwrap();
        assert_eq!(adapter.adapter_type, "SV2");
    }

    #[test]
    fn test_first_listed_without_servo_type() {
        let cat = catalog(r#"{"GPB042":{"G08":{"ST2":"8-30-46","ST1":"8-30-45"}}}"#);
        let adapter = find_adapter(&cat, "GPB042", &motor(8.0)).unwrap();
        assert_eq!(adapter.adapter_type, "ST2");
        assert_eq!(adapter.matched_by, AdapterMatch::FirstListed);
        assert!(adapter.mounting_tap.is_none());
    }

    #[test]
    fn test_exact_flange_match() {
        let cat = catalog(r#"{"GPB042":{"G08":{"SV1":"8-30-45-M3","SV2":"8-30-46-M4"}}}"#);
        let flanged = motor(8.0).with_flange(30.0, 46.0, "M4");
        let adapter = find_adapter(&cat, "GPB042", &flanged).unwrap();

        assert_eq!(adapter.adapter_type, "SV2");
        assert_eq!(adapter.matched_by, AdapterMatch::Exact);
    }

    #[test]
    fn test_unmatched_flange_falls_back() {
        let cat = catalog(r#"{"GPB042":{"G08":{"SV1":"8-30-45-M3"}}}"#);
        let flanged = motor(8.0).with_flange(40.0, 63.0, "M5");
        let adapter = find_adapter(&cat, "GPB042", &flanged).unwrap();
        assert_eq!(adapter.adapter_type, "SV1");
        assert_eq!(adapter.matched_by, AdapterMatch::ServoPreferred);
    }

    #[test]
    fn test_decimal_shaft_key() {
        let cat = catalog(r#"{"GPB042":{"G6.35":{"SV1":"6.35-22-30-M3"}}}"#);
        let adapter = find_adapter(&cat, "GPB042", &motor(6.35)).unwrap();
        assert_eq!(adapter.shaft, "G6.35");

        let flanged = motor(6.35).with_flange(22.0, 30.0, "M3");
        let exact = find_adapter(&cat, "GPB042", &flanged).unwrap();
        assert_eq!(exact.matched_by, AdapterMatch::Exact);
    }

    #[test]
    fn test_absent_model_or_shaft() {
        let cat = catalog(r#"{"GPB042":{"G08":{"SV1":"8-30-45-M3"}}}"#);
        assert!(find_adapter(&cat, "GPB060", &motor(8.0)).is_none());
        assert!(find_adapter(&cat, "GPB042", &motor(14.0)).is_none());
    }

    #[test]
    fn test_empty_shaft_mapping() {
        let cat = catalog(r#"{"GPB042":{"G08":{}}}"#);
        assert!(find_adapter(&cat, "GPB042", &motor(8.0)).is_none());
    }

    #[test]
    fn test_custom_strategy_chain() {
        let cat = catalog(r#"{"GPB042":{"G08":{"SV1":"8-30-45-M3"}}}"#);
        let strict: &[&dyn AdapterStrategy] = &[&ExactFlange];
        assert!(find_adapter_with(&cat, "GPB042", &motor(8.0), strict).is_none());
    }
}
